//! Big East Sim - Monte Carlo odds for an 11-team conference tournament.
//!
//! Plays the fixed bracket (seeds 1-5 on byes, 8v9 / 7v10 / 6v11 in the
//! first round) many times with rating- or record-driven win probabilities
//! and tallies how often each team reaches the semifinals, the final and
//! the title. Exact odds and rating sensitivity are computed analytically
//! from the same models. Python bindings are available with the `python`
//! feature.

pub mod bracket;
pub mod config;
pub mod constants;
pub mod error;
pub mod exact;
pub mod monte_carlo;
pub mod registry;
pub mod report;
pub mod sensitivity;
pub mod team;
pub mod tournament;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use bracket::{build_bracket, Bracket, Matchup};
pub use config::{load_config, SimulationConfig};
pub use error::{ConfigError, RegistryError, Result, SimError};
pub use exact::calculate_odds_exact;
pub use monte_carlo::{run_monte_carlo, run_seeded, AggregateReport, StageCounts, TeamOdds};
pub use registry::Registry;
pub use sensitivity::{all_team_deltas, pairwise_deltas, team_delta, TeamDelta};
pub use team::Team;
pub use tournament::{simulate_tournament, Stage, Tournament, TrialResult};
pub use win_prob::{
    calculate_expected_scores, calculate_win_prob, predict, ModelParams, PredictionMethod,
    Predictor,
};
