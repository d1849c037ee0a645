use rand::Rng;

use crate::bracket::{build_bracket, Matchup, QUARTERFINAL_FEEDS};
use crate::error::{ConfigError, Result};
use crate::exact::calculate_odds_exact;
use crate::monte_carlo::{run_monte_carlo, AggregateReport};
use crate::registry::Registry;
use crate::sensitivity::{all_team_deltas, TeamDelta};
use crate::team::Team;
use crate::win_prob::{ModelParams, PredictionMethod, Predictor};

/// Bracket progress within one trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    FirstRound,
    Quarterfinals,
    Semifinals,
    Final,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::FirstRound => Stage::Quarterfinals,
            Stage::Quarterfinals => Stage::Semifinals,
            Stage::Semifinals => Stage::Final,
            Stage::Final | Stage::Done => Stage::Done,
        }
    }
}

/// Outcome of one simulated bracket.
///
/// `finalists[i]` won semifinal `i`; `semifinalists[2i..2i + 2]` played in it.
#[derive(Clone, Copy, Debug)]
pub struct TrialResult<'r> {
    pub champion: &'r Team,
    pub finalists: [&'r Team; 2],
    pub semifinalists: [&'r Team; 4],
}

/// Winner of a game that must already have been played.
///
/// A missing winner here means the stage wiring fed an empty slot forward.
fn decided<'r>(game: &Matchup<'r>, stage: Stage, index: usize) -> &'r Team {
    match game.winner {
        Some(team) => team,
        None => panic!(
            "{stage:?} game {index} finished without a winner ({:?} vs {:?}); bracket wiring is broken",
            game.team_a.map(|t| &t.name),
            game.team_b.map(|t| &t.name),
        ),
    }
}

fn play_round<'r, R: Rng + ?Sized>(games: &mut [Matchup<'r>], predictor: &Predictor, rng: &mut R) {
    for game in games.iter_mut() {
        game.winner = predictor.predict(game.team_a, game.team_b, rng);
    }
}

/// Play one bracket to completion.
///
/// A fresh bracket is built per call, so nothing carries over between
/// trials. Consumes exactly one random draw per game, in bracket order.
///
/// # Panics
/// If a stage completes with an undecided game.
pub fn simulate_tournament<'r, R: Rng + ?Sized>(
    registry: &'r Registry,
    predictor: &Predictor,
    rng: &mut R,
) -> TrialResult<'r> {
    let mut bracket = build_bracket(registry);
    let mut stage = Stage::FirstRound;

    while stage != Stage::Done {
        match stage {
            Stage::FirstRound => {
                play_round(&mut bracket.first_round, predictor, rng);
                for (qf, feed) in QUARTERFINAL_FEEDS.iter().enumerate() {
                    if let Some(game) = *feed {
                        bracket.quarterfinals[qf].team_b =
                            Some(decided(&bracket.first_round[game], stage, game));
                    }
                }
            }
            Stage::Quarterfinals => {
                play_round(&mut bracket.quarterfinals, predictor, rng);
                for (sf, semi) in bracket.semifinals.iter_mut().enumerate() {
                    semi.team_a = Some(decided(&bracket.quarterfinals[2 * sf], stage, 2 * sf));
                    semi.team_b =
                        Some(decided(&bracket.quarterfinals[2 * sf + 1], stage, 2 * sf + 1));
                }
            }
            Stage::Semifinals => {
                play_round(&mut bracket.semifinals, predictor, rng);
                bracket.final_game.team_a = Some(decided(&bracket.semifinals[0], stage, 0));
                bracket.final_game.team_b = Some(decided(&bracket.semifinals[1], stage, 1));
            }
            Stage::Final => {
                play_round(std::slice::from_mut(&mut bracket.final_game), predictor, rng);
            }
            Stage::Done => unreachable!(),
        }
        stage = stage.next();
    }

    let [sf0, sf1] = bracket.semifinals;
    let side = |slot: Option<&'r Team>| match slot {
        Some(team) => team,
        None => panic!("semifinal slot left empty after quarterfinals"),
    };

    TrialResult {
        champion: decided(&bracket.final_game, Stage::Final, 0),
        finalists: [side(bracket.final_game.team_a), side(bracket.final_game.team_b)],
        semifinalists: [side(sf0.team_a), side(sf0.team_b), side(sf1.team_a), side(sf1.team_b)],
    }
}

/// Tournament field plus the outcome model used to play it.
#[derive(Clone, Debug)]
pub struct Tournament {
    pub registry: Registry,
    pub predictor: Predictor,
}

impl Tournament {
    pub fn new(registry: Registry, method: PredictionMethod) -> Self {
        Tournament {
            registry,
            predictor: Predictor::new(method),
        }
    }

    pub fn with_params(
        registry: Registry,
        method: PredictionMethod,
        params: ModelParams,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(Tournament {
            registry,
            predictor: Predictor::with_params(method, params)?,
        })
    }

    pub fn method(&self) -> PredictionMethod {
        self.predictor.method
    }

    /// Simulate tournament once.
    pub fn simulate_once<R: Rng + ?Sized>(&self, rng: &mut R) -> TrialResult<'_> {
        simulate_tournament(&self.registry, &self.predictor, rng)
    }

    /// Run `trials` Monte Carlo simulations off one random stream.
    pub fn run_simulations<R: Rng + ?Sized>(
        &self,
        trials: usize,
        rng: &mut R,
    ) -> Result<AggregateReport> {
        run_monte_carlo(&self.registry, &self.predictor, trials, rng)
    }

    /// Stage odds computed analytically instead of by sampling.
    pub fn calculate_odds_exact(&self) -> AggregateReport {
        calculate_odds_exact(&self.registry, &self.predictor)
    }

    /// Championship sensitivity of every team to a `points` rating shift.
    pub fn team_deltas(&self, points: f64) -> Vec<TeamDelta> {
        all_team_deltas(&self.registry, &self.predictor, points)
    }
}
