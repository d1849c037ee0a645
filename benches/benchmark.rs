use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bigeast_sim::exact::calculate_odds_exact;
use bigeast_sim::monte_carlo::{run_monte_carlo, run_seeded};
use bigeast_sim::registry::Registry;
use bigeast_sim::sensitivity::all_team_deltas;
use bigeast_sim::tournament::simulate_tournament;
use bigeast_sim::win_prob::{PredictionMethod, Predictor};

fn bench_calculate_win_prob(c: &mut Criterion) {
    let registry = Registry::big_east_2025();
    let (team1, team2) = (registry.by_seed(1), registry.by_seed(4));

    for method in PredictionMethod::ALL {
        let predictor = Predictor::new(method);
        c.bench_function(&format!("win_prob_{method}"), |b| {
            b.iter(|| predictor.win_prob(black_box(team1), black_box(team2)))
        });
    }
}

fn bench_single_trial(c: &mut Criterion) {
    let registry = Registry::big_east_2025();
    let predictor = Predictor::new(PredictionMethod::CalibratedRatingDifferential);
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("tournament_single_sim", |b| {
        b.iter(|| simulate_tournament(black_box(&registry), &predictor, &mut rng).champion.seed)
    });
}

fn bench_monte_carlo(c: &mut Criterion) {
    let registry = Registry::big_east_2025();
    let predictor = Predictor::new(PredictionMethod::CalibratedRatingDifferential);

    c.bench_function("tournament_10000_sims", |b| {
        b.iter(|| run_seeded(black_box(&registry), &predictor, 10_000, 42))
    });

    c.bench_function("tournament_10000_sims_shared_stream", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| run_monte_carlo(black_box(&registry), &predictor, 10_000, &mut rng))
    });
}

fn bench_exact(c: &mut Criterion) {
    let registry = Registry::big_east_2025();
    let predictor = Predictor::new(PredictionMethod::RatingDifferential);

    c.bench_function("exact_odds", |b| {
        b.iter(|| calculate_odds_exact(black_box(&registry), &predictor))
    });

    c.bench_function("all_team_deltas", |b| {
        b.iter(|| all_team_deltas(black_box(&registry), &predictor, 1.0))
    });
}

criterion_group!(
    benches,
    bench_calculate_win_prob,
    bench_single_trial,
    bench_monte_carlo,
    bench_exact,
);
criterion_main!(benches);
