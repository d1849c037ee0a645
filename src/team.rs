use serde::{Deserialize, Serialize};

/// Tournament entrant with efficiency ratings, records and venue flags.
///
/// Ratings are raw adjusted efficiencies in points per 100 possessions
/// (e.g. 115.0 offense, 95.0 defense). Teams are never mutated once a
/// registry is built; `with_adjustment` returns a shifted copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Team {
    pub name: String,

    /// Adjusted offensive efficiency (points scored per 100 possessions)
    #[serde(rename = "adj_oe")]
    pub adjusted_offensive_rating: f64,

    /// Adjusted defensive efficiency (points allowed per 100 possessions, lower is better)
    #[serde(rename = "adj_de")]
    pub adjusted_defensive_rating: f64,

    pub seed: u32,

    #[serde(default)]
    pub conference_wins: u32,
    #[serde(default)]
    pub conference_losses: u32,
    #[serde(default)]
    pub overall_wins: u32,
    #[serde(default)]
    pub overall_losses: u32,

    /// Expected possessions per 40 minutes
    #[serde(default = "default_tempo")]
    pub adjusted_tempo: f64,

    /// Tournament host; at most one team in a registry may set this
    #[serde(default)]
    pub home_court: bool,

    #[serde(default)]
    pub travel_advantage: bool,
}

fn default_tempo() -> f64 {
    67.7
}

impl Team {
    /// Create a team with ratings and seed only; records default to 0-0.
    pub fn new(name: impl Into<String>, offense: f64, defense: f64, seed: u32) -> Self {
        Team {
            name: name.into(),
            adjusted_offensive_rating: offense,
            adjusted_defensive_rating: defense,
            seed,
            conference_wins: 0,
            conference_losses: 0,
            overall_wins: 0,
            overall_losses: 0,
            adjusted_tempo: default_tempo(),
            home_court: false,
            travel_advantage: false,
        }
    }

    pub fn with_conference_record(mut self, wins: u32, losses: u32) -> Self {
        self.conference_wins = wins;
        self.conference_losses = losses;
        self
    }

    pub fn with_overall_record(mut self, wins: u32, losses: u32) -> Self {
        self.overall_wins = wins;
        self.overall_losses = losses;
        self
    }

    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.adjusted_tempo = tempo;
        self
    }

    pub fn with_home_court(mut self, home_court: bool) -> Self {
        self.home_court = home_court;
        self
    }

    pub fn with_travel_advantage(mut self, travel_advantage: bool) -> Self {
        self.travel_advantage = travel_advantage;
        self
    }

    /// Copy of this team that scores `points` more and allows `points` fewer
    /// per 100 possessions. Negative values weaken the team.
    pub fn with_adjustment(&self, points: f64) -> Self {
        Team {
            adjusted_offensive_rating: self.adjusted_offensive_rating + points,
            adjusted_defensive_rating: self.adjusted_defensive_rating - points,
            ..self.clone()
        }
    }

    /// Raw conference win fraction, 0.5 when no conference games were played.
    pub fn conference_win_pct(&self) -> f64 {
        let games = self.conference_wins + self.conference_losses;
        if games == 0 {
            0.5
        } else {
            self.conference_wins as f64 / games as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_leaves_original_untouched() {
        let team = Team::new("Butler", 116.6, 105.7, 8);
        let better = team.with_adjustment(1.5);

        assert!((better.adjusted_offensive_rating - 118.1).abs() < 1e-9);
        assert!((better.adjusted_defensive_rating - 104.2).abs() < 1e-9);
        assert!((team.adjusted_offensive_rating - 116.6).abs() < 1e-9);
        assert_eq!(better.name, team.name);
    }

    #[test]
    fn test_conference_win_pct() {
        let team = Team::new("Xavier", 115.4, 98.2, 5).with_conference_record(13, 7);
        assert!((team.conference_win_pct() - 0.65).abs() < 1e-12);

        let unplayed = Team::new("Nobody", 100.0, 100.0, 11);
        assert_eq!(unplayed.conference_win_pct(), 0.5);
    }
}
