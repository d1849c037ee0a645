use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::registry::Registry;
use crate::tournament::{simulate_tournament, TrialResult};
use crate::win_prob::{PredictionMethod, Predictor};

/// Per-team tallies of how far a team got.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub championships: u64,
    pub finals: u64,
    pub semifinals: u64,
}

/// Stage-reaching odds for one team, in percent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamOdds {
    pub name: String,
    pub seed: u32,
    pub championship_pct: f64,
    pub finals_pct: f64,
    pub semifinals_pct: f64,
}

/// Stage odds for the whole field, sorted by championship odds.
///
/// Ties keep registry order. `trials` is `None` for analytically computed
/// reports.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateReport {
    pub method: PredictionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trials: Option<usize>,
    pub teams: Vec<TeamOdds>,
}

impl AggregateReport {
    /// Sort `odds` (given in registry order) into presentation order.
    pub(crate) fn from_registry_order(
        method: PredictionMethod,
        trials: Option<usize>,
        mut odds: Vec<TeamOdds>,
    ) -> Self {
        // sort_by is stable, so equal odds keep registry order
        odds.sort_by(|a, b| b.championship_pct.total_cmp(&a.championship_pct));
        AggregateReport {
            method,
            trials,
            teams: odds,
        }
    }

    pub fn get(&self, name: &str) -> Option<&TeamOdds> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn favorite(&self) -> Option<&TeamOdds> {
        self.teams.first()
    }

    pub fn championship_total(&self) -> f64 {
        self.teams.iter().map(|t| t.championship_pct).sum()
    }

    pub fn finals_total(&self) -> f64 {
        self.teams.iter().map(|t| t.finals_pct).sum()
    }

    pub fn semifinals_total(&self) -> f64 {
        self.teams.iter().map(|t| t.semifinals_pct).sum()
    }

    /// Normal-approximation half-width, in percentage points, of a sampled
    /// percentage at the given two-sided confidence level.
    ///
    /// `None` for analytic reports or a confidence outside (0, 1).
    pub fn margin_of_error(&self, pct: f64, confidence: f64) -> Option<f64> {
        let trials = self.trials? as f64;
        if !(confidence > 0.0 && confidence < 1.0) {
            return None;
        }
        let normal = Normal::new(0.0, 1.0).ok()?;
        let z = normal.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
        let p = (pct / 100.0).clamp(0.0, 1.0);
        Some(100.0 * z * (p * (1.0 - p) / trials).sqrt())
    }
}

fn record_trial(counts: &mut [StageCounts], registry: &Registry, result: &TrialResult<'_>) {
    counts[registry.index_of_seed(result.champion.seed)].championships += 1;
    for team in result.finalists {
        counts[registry.index_of_seed(team.seed)].finals += 1;
    }
    for team in result.semifinalists {
        counts[registry.index_of_seed(team.seed)].semifinals += 1;
    }
}

/// Convert tallies (in registry order) into a sorted percentage report.
pub fn counts_to_report(
    registry: &Registry,
    counts: &[StageCounts],
    trials: usize,
    method: PredictionMethod,
) -> AggregateReport {
    let pct = |count: u64| count as f64 / trials as f64 * 100.0;
    let odds = registry
        .teams()
        .iter()
        .zip(counts)
        .map(|(team, c)| TeamOdds {
            name: team.name.clone(),
            seed: team.seed,
            championship_pct: pct(c.championships),
            finals_pct: pct(c.finals),
            semifinals_pct: pct(c.semifinals),
        })
        .collect();
    AggregateReport::from_registry_order(method, Some(trials), odds)
}

/// Run multiple Monte Carlo simulations off one random stream.
///
/// Trials run sequentially, so the same stream state, registry, model and
/// trial count always produce the same report.
///
/// # Errors
/// `ConfigError::ZeroTrials` if `trials` is zero; nothing is simulated.
pub fn run_monte_carlo<R: Rng + ?Sized>(
    registry: &Registry,
    predictor: &Predictor,
    trials: usize,
    rng: &mut R,
) -> Result<AggregateReport> {
    if trials == 0 {
        return Err(ConfigError::ZeroTrials.into());
    }

    debug!(trials, method = %predictor.method, teams = registry.len(), "starting monte carlo run");

    let mut counts = vec![StageCounts::default(); registry.len()];
    for _ in 0..trials {
        let result = simulate_tournament(registry, predictor, rng);
        record_trial(&mut counts, registry, &result);
    }

    let report = counts_to_report(registry, &counts, trials, predictor.method);
    if let Some(fav) = report.favorite() {
        debug!(
            favorite = %fav.name,
            championship_pct = fav.championship_pct,
            "monte carlo run finished"
        );
    }
    Ok(report)
}

/// Monte Carlo run from a fresh `ChaCha8Rng` seeded with `seed`.
pub fn run_seeded(
    registry: &Registry,
    predictor: &Predictor,
    trials: usize,
    seed: u64,
) -> Result<AggregateReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    run_monte_carlo(registry, predictor, trials, &mut rng)
}
