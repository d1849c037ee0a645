/// Number of entrants in the conference tournament bracket
pub const BRACKET_SIZE: usize = 11;

/// Highest seed that receives a bye into the quarterfinals
pub const LAST_BYE_SEED: u32 = 5;

/// Logistic steepness for the rating-differential (KenPom-style) model
pub const K_RATING_DIFF: f64 = 0.175;

/// Logistic steepness for the calibrated (Barttorvik-style) model
pub const K_CALIBRATED: f64 = 0.135;

/// Weight on the raw conference win fraction in the record-based model
pub const RECORD_WEIGHT: f64 = 0.85;

/// Shift added after weighting, pulling records toward .500
pub const RECORD_SHIFT: f64 = 0.075;

/// Log5 denominators smaller than this are treated as a coin flip
pub const LOG5_EPSILON: f64 = 1e-12;

/// Win probability bump for the sole home-court team
pub const HOME_COURT_SHIFT: f64 = 0.04;

/// Win probability bump for the sole travel-advantaged team
pub const TRAVEL_SHIFT: f64 = 0.02;

/// Lower clamp applied after each venue adjustment
pub const PROB_FLOOR: f64 = 0.05;

/// Upper clamp applied after each venue adjustment
pub const PROB_CEILING: f64 = 0.95;

/// Probabilities above this are squeezed back toward it
pub const SQUEEZE_UPPER: f64 = 0.7;

/// Probabilities below this are squeezed back toward it
pub const SQUEEZE_LOWER: f64 = 0.3;

/// Fraction of the excess beyond a squeeze threshold that is kept
pub const SQUEEZE_FACTOR: f64 = 0.8;

/// Default number of Monte Carlo trials per run
pub const DEFAULT_TRIALS: usize = 10_000;

/// Default seed for the simulation random stream
pub const DEFAULT_SEED: u64 = 42;
