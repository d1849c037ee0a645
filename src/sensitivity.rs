use rayon::prelude::*;
use serde::Serialize;

use crate::exact::calculate_odds_exact;
use crate::monte_carlo::AggregateReport;
use crate::registry::Registry;
use crate::win_prob::Predictor;

/// How one team's title odds respond to a rating shift.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamDelta {
    pub team: String,
    pub championship_pct: f64,
    /// Title odds with the team `points` better on both ends
    pub championship_pct_up: f64,
    /// Title odds with the team `points` worse on both ends
    pub championship_pct_down: f64,
    /// `championship_pct_up - championship_pct_down`
    pub swing: f64,
}

fn title_pct(report: &AggregateReport, team: &str) -> f64 {
    report.get(team).map_or(0.0, |t| t.championship_pct)
}

/// Exact odds with `team`'s ratings improved and worsened by `points`.
///
/// Returns (positive_report, negative_report), or `None` for an unknown team.
pub fn team_delta(
    registry: &Registry,
    predictor: &Predictor,
    team: &str,
    points: f64,
) -> Option<(AggregateReport, AggregateReport)> {
    let positive = registry.with_team_adjustment(team, points)?;
    let negative = registry.with_team_adjustment(team, -points)?;
    Some((
        calculate_odds_exact(&positive, predictor),
        calculate_odds_exact(&negative, predictor),
    ))
}

/// Change in every team's title odds when `team` moves by `points`.
///
/// Returned in registry order as (name, positive minus negative).
pub fn pairwise_deltas(
    registry: &Registry,
    predictor: &Predictor,
    team: &str,
    points: f64,
) -> Option<Vec<(String, f64)>> {
    let (positive, negative) = team_delta(registry, predictor, team, points)?;
    Some(
        registry
            .teams()
            .iter()
            .map(|t| {
                let delta = title_pct(&positive, &t.name) - title_pct(&negative, &t.name);
                (t.name.clone(), delta)
            })
            .collect(),
    )
}

/// Calculate title-odds sensitivity for all teams in the bracket.
///
/// Uses parallel processing over teams. Results are in registry order.
pub fn all_team_deltas(registry: &Registry, predictor: &Predictor, points: f64) -> Vec<TeamDelta> {
    let baseline = calculate_odds_exact(registry, predictor);

    registry
        .teams()
        .par_iter()
        .filter_map(|team| {
            let (positive, negative) = team_delta(registry, predictor, &team.name, points)?;
            let up = title_pct(&positive, &team.name);
            let down = title_pct(&negative, &team.name);
            Some(TeamDelta {
                team: team.name.clone(),
                championship_pct: title_pct(&baseline, &team.name),
                championship_pct_up: up,
                championship_pct_down: down,
                swing: up - down,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::win_prob::PredictionMethod;

    #[test]
    fn test_team_delta_direction() {
        let registry = Registry::big_east_2025();
        let predictor = Predictor::new(PredictionMethod::RatingDifferential);

        let (positive, negative) = team_delta(&registry, &predictor, "Villanova", 2.0).unwrap();
        assert!(title_pct(&positive, "Villanova") > title_pct(&negative, "Villanova"));
        assert!(team_delta(&registry, &predictor, "Kansas", 2.0).is_none());
    }

    #[test]
    fn test_non_finite_shift_yields_nothing() {
        let registry = Registry::big_east_2025();
        let predictor = Predictor::new(PredictionMethod::RatingDifferential);

        assert!(team_delta(&registry, &predictor, "Villanova", f64::NAN).is_none());
        assert!(all_team_deltas(&registry, &predictor, f64::NAN).is_empty());
    }

    #[test]
    fn test_pairwise_deltas_conserve_probability() {
        let registry = Registry::big_east_2025();
        let predictor = Predictor::new(PredictionMethod::CalibratedRatingDifferential);

        let deltas = pairwise_deltas(&registry, &predictor, "Creighton", 1.0).unwrap();
        assert_eq!(deltas.len(), 11);

        // Odds gained by Creighton come out of everyone else
        let net: f64 = deltas.iter().map(|(_, d)| d).sum();
        assert!(net.abs() < 1e-9);
        let creighton = deltas.iter().find(|(n, _)| n == "Creighton").unwrap().1;
        assert!(creighton > 0.0);
    }

    #[test]
    fn test_all_team_deltas() {
        let registry = Registry::big_east_2025();
        let predictor = Predictor::new(PredictionMethod::RatingDifferential);

        let deltas = all_team_deltas(&registry, &predictor, 1.0);
        assert_eq!(deltas.len(), 11);

        let order: Vec<&str> = deltas.iter().map(|d| d.team.as_str()).collect();
        let expected: Vec<&str> = registry.teams().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(order, expected);

        for d in &deltas {
            assert!(d.swing.is_finite());
            assert!(d.swing > 0.0, "{} should gain from a better rating", d.team);
            assert!(d.championship_pct_down <= d.championship_pct);
            assert!(d.championship_pct <= d.championship_pct_up);
        }
    }

    #[test]
    fn test_record_based_ignores_rating_shift() {
        let registry = Registry::big_east_2025();
        let predictor = Predictor::new(PredictionMethod::RecordBased);

        for d in all_team_deltas(&registry, &predictor, 3.0) {
            assert!(d.swing.abs() < 1e-12, "{}", d.team);
        }
    }
}
