use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::constants::{DEFAULT_SEED, DEFAULT_TRIALS};
use crate::exact::calculate_odds_exact;
use crate::monte_carlo::{run_seeded, AggregateReport};
use crate::registry::Registry;
use crate::win_prob::{PredictionMethod, Predictor};

/// (team, seed, championship %, finals %, semifinals %)
type OddsRow = (String, u32, f64, f64, f64);

fn parse_method(method: &str) -> PyResult<PredictionMethod> {
    method
        .parse()
        .map_err(|e: crate::error::ConfigError| PyValueError::new_err(e.to_string()))
}

fn to_rows(report: AggregateReport) -> Vec<OddsRow> {
    report
        .teams
        .into_iter()
        .map(|t| (t.name, t.seed, t.championship_pct, t.finals_pct, t.semifinals_pct))
        .collect()
}

/// Monte Carlo odds for the built-in field, sorted by championship odds.
#[pyfunction]
#[pyo3(signature = (method, trials = DEFAULT_TRIALS, seed = DEFAULT_SEED))]
fn simulate(method: &str, trials: usize, seed: u64) -> PyResult<Vec<OddsRow>> {
    let predictor = Predictor::new(parse_method(method)?);
    let report = run_seeded(&Registry::big_east_2025(), &predictor, trials, seed)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(to_rows(report))
}

/// Exact odds for the built-in field.
#[pyfunction]
fn exact_odds(method: &str) -> PyResult<Vec<OddsRow>> {
    let predictor = Predictor::new(parse_method(method)?);
    Ok(to_rows(calculate_odds_exact(&Registry::big_east_2025(), &predictor)))
}

/// Probability that `team_a` beats `team_b`.
#[pyfunction]
fn win_prob(team_a: &str, team_b: &str, method: &str) -> PyResult<f64> {
    let registry = Registry::big_east_2025();
    let lookup = |name: &str| {
        registry
            .by_name(name)
            .ok_or_else(|| PyValueError::new_err(format!("unknown team {name:?}")))
    };
    let predictor = Predictor::new(parse_method(method)?);
    Ok(predictor.win_prob(lookup(team_a)?, lookup(team_b)?))
}

/// Python module definition
#[pymodule]
fn bigeast_sim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(exact_odds, m)?)?;
    m.add_function(wrap_pyfunction!(win_prob, m)?)?;

    m.add(
        "METHODS",
        PredictionMethod::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>(),
    )?;
    m.add("DEFAULT_TRIALS", DEFAULT_TRIALS)?;
    m.add("DEFAULT_SEED", DEFAULT_SEED)?;

    Ok(())
}
