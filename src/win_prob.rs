use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    HOME_COURT_SHIFT, K_CALIBRATED, K_RATING_DIFF, LOG5_EPSILON, PROB_CEILING, PROB_FLOOR,
    RECORD_SHIFT, RECORD_WEIGHT, SQUEEZE_FACTOR, SQUEEZE_LOWER, SQUEEZE_UPPER, TRAVEL_SHIFT,
};
use crate::error::ConfigError;
use crate::team::Team;

/// Game outcome model used to turn two teams into a win probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// KenPom-style logistic on the expected score differential
    RatingDifferential,
    /// Log5 on damped conference win fractions
    RecordBased,
    /// Barttorvik-style logistic with venue shifts and mean reversion
    CalibratedRatingDifferential,
}

impl PredictionMethod {
    pub const ALL: [PredictionMethod; 3] = [
        PredictionMethod::RatingDifferential,
        PredictionMethod::RecordBased,
        PredictionMethod::CalibratedRatingDifferential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::RatingDifferential => "rating_differential",
            PredictionMethod::RecordBased => "record_based",
            PredictionMethod::CalibratedRatingDifferential => "calibrated_rating_differential",
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PredictionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PredictionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

/// Tunable constants behind the three models.
///
/// Defaults are the calibrated values for the 11-team conference bracket.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelParams {
    pub k_rating_diff: f64,
    pub k_calibrated: f64,
    pub record_weight: f64,
    pub record_shift: f64,
    pub home_court_shift: f64,
    pub travel_shift: f64,
    pub prob_floor: f64,
    pub prob_ceiling: f64,
    pub squeeze_upper: f64,
    pub squeeze_lower: f64,
    pub squeeze_factor: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            k_rating_diff: K_RATING_DIFF,
            k_calibrated: K_CALIBRATED,
            record_weight: RECORD_WEIGHT,
            record_shift: RECORD_SHIFT,
            home_court_shift: HOME_COURT_SHIFT,
            travel_shift: TRAVEL_SHIFT,
            prob_floor: PROB_FLOOR,
            prob_ceiling: PROB_CEILING,
            squeeze_upper: SQUEEZE_UPPER,
            squeeze_lower: SQUEEZE_LOWER,
            squeeze_factor: SQUEEZE_FACTOR,
        }
    }
}

impl ModelParams {
    /// Reject parameter sets that would produce probabilities outside (0, 1)
    /// or invert the clamp/squeeze bands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("k_rating_diff", self.k_rating_diff),
            ("k_calibrated", self.k_calibrated),
            ("record_weight", self.record_weight),
            ("record_shift", self.record_shift),
            ("home_court_shift", self.home_court_shift),
            ("travel_shift", self.travel_shift),
            ("prob_floor", self.prob_floor),
            ("prob_ceiling", self.prob_ceiling),
            ("squeeze_upper", self.squeeze_upper),
            ("squeeze_lower", self.squeeze_lower),
            ("squeeze_factor", self.squeeze_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParam { name, value });
            }
        }

        let check = |ok: bool, name: &'static str, value: f64| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::InvalidParam { name, value })
            }
        };
        check(self.k_rating_diff > 0.0, "k_rating_diff", self.k_rating_diff)?;
        check(self.k_calibrated > 0.0, "k_calibrated", self.k_calibrated)?;
        check(self.record_weight > 0.0, "record_weight", self.record_weight)?;
        check(self.record_shift > 0.0, "record_shift", self.record_shift)?;
        check(
            self.record_weight + self.record_shift < 1.0,
            "record_weight",
            self.record_weight,
        )?;
        check(self.prob_ceiling <= 1.0, "prob_ceiling", self.prob_ceiling)?;
        check(self.prob_floor < self.prob_ceiling, "prob_floor", self.prob_floor)?;
        check(self.squeeze_upper < 1.0, "squeeze_upper", self.squeeze_upper)?;
        check(
            self.squeeze_lower <= self.squeeze_upper,
            "squeeze_lower",
            self.squeeze_lower,
        )?;
        check(
            self.squeeze_factor > 0.0 && self.squeeze_factor <= 1.0,
            "squeeze_factor",
            self.squeeze_factor,
        )?;
        Ok(())
    }
}

/// Expected points per 100 possessions for each side.
///
/// Returns (team1_expected_score, team2_expected_score)
pub fn calculate_expected_scores(team1: &Team, team2: &Team) -> (f64, f64) {
    let team1_score = team1.adjusted_offensive_rating * (team2.adjusted_defensive_rating / 100.0);
    let team2_score = team2.adjusted_offensive_rating * (team1.adjusted_defensive_rating / 100.0);
    (team1_score, team2_score)
}

/// Base-10 logistic on a score differential.
fn logistic(point_diff: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-point_diff * steepness))
}

fn rating_differential_prob(team1: &Team, team2: &Team, params: &ModelParams) -> f64 {
    let (s1, s2) = calculate_expected_scores(team1, team2);
    logistic(s1 - s2, params.k_rating_diff)
}

/// Classical log5 combination of two win rates.
///
/// Falls back to 0.5 when the denominator degenerates.
pub fn log5(p1: f64, p2: f64) -> f64 {
    let denom = p1 + p2 - 2.0 * p1 * p2;
    if denom.abs() < LOG5_EPSILON {
        return 0.5;
    }
    (p1 - p1 * p2) / denom
}

fn record_based_prob(team1: &Team, team2: &Team, params: &ModelParams) -> f64 {
    let damp = |p: f64| params.record_weight * p + params.record_shift;
    log5(damp(team1.conference_win_pct()), damp(team2.conference_win_pct()))
}

fn clamp_prob(prob: f64, params: &ModelParams) -> f64 {
    prob.clamp(params.prob_floor, params.prob_ceiling)
}

/// Pull probabilities outside the squeeze band back toward it.
fn squeeze(prob: f64, params: &ModelParams) -> f64 {
    if prob > params.squeeze_upper {
        params.squeeze_upper + (prob - params.squeeze_upper) * params.squeeze_factor
    } else if prob < params.squeeze_lower {
        params.squeeze_lower - (params.squeeze_lower - prob) * params.squeeze_factor
    } else {
        prob
    }
}

/// Home-court and travel shifts, clamped after each step.
fn venue_adjusted_prob(base: f64, team1: &Team, team2: &Team, params: &ModelParams) -> f64 {
    let mut prob = base;

    if team1.home_court && !team2.home_court {
        prob += params.home_court_shift;
    } else if team2.home_court && !team1.home_court {
        prob -= params.home_court_shift;
    }
    prob = clamp_prob(prob, params);

    if team1.travel_advantage && !team2.travel_advantage && !team2.home_court {
        prob += params.travel_shift;
    } else if team2.travel_advantage && !team1.travel_advantage && !team1.home_court {
        prob -= params.travel_shift;
    }
    clamp_prob(prob, params)
}

fn calibrated_prob(team1: &Team, team2: &Team, params: &ModelParams) -> f64 {
    let (s1, s2) = calculate_expected_scores(team1, team2);
    let base = logistic(s1 - s2, params.k_calibrated);
    squeeze(venue_adjusted_prob(base, team1, team2, params), params)
}

/// Calculate the probability of team1 beating team2.
///
/// # Arguments
/// * `team1` - First team
/// * `team2` - Second team
/// * `method` - Which outcome model to use
/// * `params` - Model constants
///
/// # Returns
/// Probability of team1 winning (0.0-1.0)
pub fn calculate_win_prob(
    team1: &Team,
    team2: &Team,
    method: PredictionMethod,
    params: &ModelParams,
) -> f64 {
    match method {
        PredictionMethod::RatingDifferential => rating_differential_prob(team1, team2, params),
        PredictionMethod::RecordBased => record_based_prob(team1, team2, params),
        PredictionMethod::CalibratedRatingDifferential => calibrated_prob(team1, team2, params),
    }
}

/// A selected model plus its constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Predictor {
    pub method: PredictionMethod,
    pub params: ModelParams,
}

impl Predictor {
    pub fn new(method: PredictionMethod) -> Self {
        Predictor {
            method,
            params: ModelParams::default(),
        }
    }

    pub fn with_params(method: PredictionMethod, params: ModelParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Predictor { method, params })
    }

    pub fn win_prob(&self, team1: &Team, team2: &Team) -> f64 {
        calculate_win_prob(team1, team2, self.method, &self.params)
    }

    /// Draw one game outcome.
    ///
    /// An unresolved side yields no decision and consumes no randomness.
    /// Otherwise exactly one uniform draw in [0, 1) is taken and team1 wins
    /// when the draw is strictly below its win probability.
    pub fn predict<'t, R: Rng + ?Sized>(
        &self,
        team1: Option<&'t Team>,
        team2: Option<&'t Team>,
        rng: &mut R,
    ) -> Option<&'t Team> {
        let (team1, team2) = (team1?, team2?);
        let prob = self.win_prob(team1, team2);
        if rng.gen::<f64>() < prob {
            Some(team1)
        } else {
            Some(team2)
        }
    }
}

/// Draw one game outcome with the default constants for `method`.
pub fn predict<'t, R: Rng + ?Sized>(
    team1: Option<&'t Team>,
    team2: Option<&'t Team>,
    method: PredictionMethod,
    rng: &mut R,
) -> Option<&'t Team> {
    Predictor::new(method).predict(team1, team2, rng)
}
