use crate::bracket::{FIRST_ROUND_SEEDS, QUARTERFINAL_BYES, QUARTERFINAL_FEEDS};
use crate::constants::LAST_BYE_SEED;
use crate::monte_carlo::{AggregateReport, TeamOdds};
use crate::registry::Registry;
use crate::team::Team;
use crate::win_prob::Predictor;

/// Distribution over who comes out of a bracket slot.
pub type Outcome<'r> = Vec<(&'r Team, f64)>;

fn point_mass(team: &Team) -> Outcome<'_> {
    vec![(team, 1.0)]
}

/// Probabilistic game transformation.
///
/// Given the outcome distributions of the two slots feeding a game,
/// computes the distribution of its winner. The two supports are disjoint
/// in a single-elimination bracket.
///
/// # Arguments
/// * `child1` - Distribution over side A
/// * `child2` - Distribution over side B
/// * `predictor` - Outcome model
///
/// # Returns
/// Each team's probability of winning the game, side A teams first
pub fn game_transform_prob<'r>(
    child1: &[(&'r Team, f64)],
    child2: &[(&'r Team, f64)],
    predictor: &Predictor,
) -> Outcome<'r> {
    let mut parent: Outcome<'r> = child1
        .iter()
        .chain(child2)
        .map(|&(team, _)| (team, 0.0))
        .collect();

    for (i, &(team1, win1)) in child1.iter().enumerate() {
        for (j, &(team2, win2)) in child2.iter().enumerate() {
            let game_prob = win1 * win2;
            let p1 = predictor.win_prob(team1, team2);

            parent[i].1 += game_prob * p1;
            parent[child1.len() + j].1 += game_prob * (1.0 - p1);
        }
    }

    parent
}

fn accumulate(totals: &mut [f64], registry: &Registry, outcome: &[(&Team, f64)]) {
    for &(team, prob) in outcome {
        totals[registry.index_of_seed(team.seed)] += prob;
    }
}

/// Stage odds computed by propagating outcome distributions through the
/// bracket instead of sampling it.
///
/// Same shape and ordering as a Monte Carlo report, which converges to it.
pub fn calculate_odds_exact(registry: &Registry, predictor: &Predictor) -> AggregateReport {
    let seed = |s: u32| point_mass(registry.by_seed(s));

    let first_round: Vec<Outcome<'_>> = FIRST_ROUND_SEEDS
        .iter()
        .map(|&(a, b)| game_transform_prob(&seed(a), &seed(b), predictor))
        .collect();

    let quarterfinals: Vec<Outcome<'_>> = QUARTERFINAL_BYES
        .iter()
        .zip(QUARTERFINAL_FEEDS)
        .map(|(&bye, feed)| {
            let side_b = match feed {
                Some(game) => first_round[game].clone(),
                None => seed(LAST_BYE_SEED),
            };
            game_transform_prob(&seed(bye), &side_b, predictor)
        })
        .collect();

    let semifinals: Vec<Outcome<'_>> = quarterfinals
        .chunks(2)
        .map(|pair| game_transform_prob(&pair[0], &pair[1], predictor))
        .collect();

    let champion = game_transform_prob(&semifinals[0], &semifinals[1], predictor);

    let n = registry.len();
    let (mut semis, mut finals, mut titles) = (vec![0.0; n], vec![0.0; n], vec![0.0; n]);
    for qf in &quarterfinals {
        accumulate(&mut semis, registry, qf);
    }
    for sf in &semifinals {
        accumulate(&mut finals, registry, sf);
    }
    accumulate(&mut titles, registry, &champion);

    let odds = registry
        .teams()
        .iter()
        .enumerate()
        .map(|(i, team)| TeamOdds {
            name: team.name.clone(),
            seed: team.seed,
            championship_pct: titles[i] * 100.0,
            finals_pct: finals[i] * 100.0,
            semifinals_pct: semis[i] * 100.0,
        })
        .collect();

    AggregateReport::from_registry_order(predictor.method, None, odds)
}
