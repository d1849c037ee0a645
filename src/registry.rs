use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::constants::BRACKET_SIZE;
use crate::error::{ConfigError, RegistryError, Result};
use crate::team::Team;

/// Validated, ordered tournament field.
///
/// Registry order is the presentation order used to break ties in reports.
/// Every seed in `1..=BRACKET_SIZE` maps to exactly one team.
#[derive(Clone, Debug)]
pub struct Registry {
    teams: Vec<Team>,
    /// Index into `teams` for each seed, offset by one
    seed_index: Vec<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFile {
    teams: Vec<Team>,
}

impl Registry {
    /// Validate a field and build the registry.
    pub fn from_teams(teams: Vec<Team>) -> std::result::Result<Self, RegistryError> {
        if teams.is_empty() {
            return Err(RegistryError::Empty);
        }
        if teams.len() != BRACKET_SIZE {
            return Err(RegistryError::WrongSize {
                expected: BRACKET_SIZE,
                found: teams.len(),
            });
        }

        let mut names = HashSet::new();
        let mut seed_index = vec![usize::MAX; BRACKET_SIZE];
        let mut host: Option<&str> = None;

        for (i, team) in teams.iter().enumerate() {
            if !names.insert(team.name.as_str()) {
                return Err(RegistryError::DuplicateName(team.name.clone()));
            }
            if !team.adjusted_offensive_rating.is_finite()
                || !team.adjusted_defensive_rating.is_finite()
            {
                return Err(RegistryError::BadRating {
                    name: team.name.clone(),
                });
            }

            let seed = team.seed as usize;
            if seed == 0 || seed > BRACKET_SIZE {
                return Err(RegistryError::BadSeed {
                    name: team.name.clone(),
                    seed: team.seed,
                    max: BRACKET_SIZE,
                });
            }
            if seed_index[seed - 1] != usize::MAX {
                return Err(RegistryError::DuplicateSeed(team.seed));
            }
            seed_index[seed - 1] = i;

            if team.home_court {
                if let Some(other) = host {
                    return Err(RegistryError::MultipleHosts(
                        other.to_string(),
                        team.name.clone(),
                    ));
                }
                host = Some(team.name.as_str());
            }
        }

        Ok(Registry { teams, seed_index })
    }

    /// Parse a `[[teams]]` TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Load a registry from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::parse(&content, path)?;
        debug!(path = %path.display(), teams = registry.len(), "loaded team registry");
        Ok(registry)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_teams(file.teams)?)
    }

    /// 2025 Big East tournament field (Madison Square Garden).
    pub fn big_east_2025() -> Self {
        let teams = vec![
            Team::new("St. John's", 113.7, 89.0, 1)
                .with_conference_record(18, 2)
                .with_overall_record(27, 4)
                .with_tempo(70.1)
                .with_home_court(true),
            Team::new("Creighton", 116.5, 97.9, 2)
                .with_conference_record(15, 5)
                .with_overall_record(22, 9)
                .with_tempo(66.8),
            Team::new("Marquette", 117.9, 95.6, 3)
                .with_conference_record(13, 7)
                .with_overall_record(22, 9)
                .with_tempo(68.9),
            Team::new("Connecticut", 122.3, 103.7, 4)
                .with_conference_record(14, 6)
                .with_overall_record(22, 9)
                .with_tempo(64.6),
            Team::new("Xavier", 115.4, 98.2, 5)
                .with_conference_record(13, 7)
                .with_overall_record(21, 10)
                .with_tempo(68.3),
            Team::new("Villanova", 119.9, 104.8, 6)
                .with_conference_record(11, 9)
                .with_overall_record(19, 13)
                .with_tempo(63.2),
            Team::new("Georgetown", 108.7, 99.1, 7)
                .with_conference_record(8, 12)
                .with_overall_record(17, 14)
                .with_tempo(67.5),
            Team::new("Butler", 116.6, 105.7, 8)
                .with_conference_record(6, 14)
                .with_overall_record(14, 18)
                .with_tempo(65.9),
            Team::new("Providence", 112.9, 105.8, 9)
                .with_conference_record(6, 14)
                .with_overall_record(12, 19)
                .with_tempo(64.4),
            Team::new("DePaul", 109.4, 106.1, 10)
                .with_conference_record(2, 18)
                .with_overall_record(13, 19)
                .with_tempo(66.1),
            Team::new("Seton Hall", 100.0, 102.9, 11)
                .with_conference_record(2, 18)
                .with_overall_record(7, 24)
                .with_tempo(63.7)
                .with_travel_advantage(true),
        ];

        match Self::from_teams(teams) {
            Ok(registry) => registry,
            Err(e) => unreachable!("built-in field is valid: {e}"),
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team holding `seed`. Seeds are guaranteed present by validation.
    pub fn by_seed(&self, seed: u32) -> &Team {
        &self.teams[self.seed_index[seed as usize - 1]]
    }

    /// Registry position of the team holding `seed`.
    pub fn index_of_seed(&self, seed: u32) -> usize {
        self.seed_index[seed as usize - 1]
    }

    pub fn by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    /// Registry position of a team name, used for stable report ordering.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.name == name)
    }

    /// Copy of the registry with the named team's ratings shifted by `points`.
    ///
    /// Returns `None` if no team has that name or `points` is not finite.
    /// Seeds and flags are unchanged so the copy stays valid.
    pub fn with_team_adjustment(&self, name: &str, points: f64) -> Option<Self> {
        if !points.is_finite() {
            return None;
        }
        let idx = self.position(name)?;
        let mut adjusted = self.clone();
        adjusted.teams[idx] = self.teams[idx].with_adjustment(points);
        Some(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn field() -> Vec<Team> {
        Registry::big_east_2025().teams().to_vec()
    }

    #[test]
    fn test_big_east_field() {
        let registry = Registry::big_east_2025();
        assert_eq!(registry.len(), BRACKET_SIZE);
        assert_eq!(registry.by_seed(1).name, "St. John's");
        assert_eq!(registry.by_seed(11).name, "Seton Hall");
        assert_eq!(registry.teams().iter().filter(|t| t.home_court).count(), 1);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Registry::from_teams(vec![]), Err(RegistryError::Empty)));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let mut teams = field();
        teams.pop();
        assert!(matches!(
            Registry::from_teams(teams),
            Err(RegistryError::WrongSize { expected: 11, found: 10 })
        ));
    }

    #[test]
    fn test_duplicate_seed_rejected() {
        let mut teams = field();
        teams[10].seed = 10;
        assert!(matches!(
            Registry::from_teams(teams),
            Err(RegistryError::DuplicateSeed(10))
        ));
    }

    #[test]
    fn test_seed_out_of_range_rejected() {
        let mut teams = field();
        teams[0].seed = 12;
        assert!(matches!(
            Registry::from_teams(teams),
            Err(RegistryError::BadSeed { seed: 12, .. })
        ));
    }

    #[test]
    fn test_two_hosts_rejected() {
        let mut teams = field();
        teams[3].home_court = true;
        assert!(matches!(
            Registry::from_teams(teams),
            Err(RegistryError::MultipleHosts(_, _))
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut teams = field();
        teams[2].name = "Creighton".to_string();
        assert!(matches!(
            Registry::from_teams(teams),
            Err(RegistryError::DuplicateName(name)) if name == "Creighton"
        ));
    }

    #[test]
    fn test_registry_order_independent_of_seed() {
        let mut teams = field();
        teams.reverse();
        let registry = Registry::from_teams(teams).unwrap();
        assert_eq!(registry.teams()[0].name, "Seton Hall");
        assert_eq!(registry.by_seed(1).name, "St. John's");
    }

    #[test]
    fn test_from_toml_str() {
        let mut doc = String::new();
        for seed in 1..=11 {
            doc.push_str(&format!(
                "[[teams]]\nname = \"Team{seed}\"\nadj_oe = {}.0\nadj_de = 100.0\nseed = {seed}\nconference_wins = 10\nconference_losses = 10\n\n",
                120 - seed
            ));
        }
        let registry = Registry::from_toml_str(&doc).unwrap();
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.by_seed(3).name, "Team3");
        assert!((registry.by_seed(3).adjusted_tempo - 67.7).abs() < 1e-9);
        assert!(!registry.by_seed(3).home_court);
    }

    #[test]
    fn test_from_toml_str_invalid_field() {
        let doc = "[[teams]]\nname = \"Solo\"\nadj_oe = 110.0\nadj_de = 100.0\nseed = 1\n";
        let err = Registry::from_toml_str(doc).unwrap_err();
        assert!(matches!(
            err,
            SimError::Registry(RegistryError::WrongSize { found: 1, .. })
        ));
    }

    #[test]
    fn test_bundled_file_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("teams/big_east_2025.toml");
        let loaded = Registry::load(&path).unwrap();
        assert_eq!(loaded.teams(), Registry::big_east_2025().teams());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Registry::load(Path::new("/nonexistent/teams.toml")).unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::Read { .. })));
    }

    #[test]
    fn test_with_team_adjustment() {
        let registry = Registry::big_east_2025();
        let adjusted = registry.with_team_adjustment("DePaul", 2.0).unwrap();
        assert!(
            (adjusted.by_seed(10).adjusted_offensive_rating - 111.4).abs() < 1e-9
        );
        assert!((registry.by_seed(10).adjusted_offensive_rating - 109.4).abs() < 1e-9);
        assert!(registry.with_team_adjustment("Gonzaga", 1.0).is_none());
    }

    #[test]
    fn test_non_finite_adjustment_rejected() {
        let registry = Registry::big_east_2025();
        assert!(registry.with_team_adjustment("DePaul", f64::NAN).is_none());
        assert!(registry.with_team_adjustment("DePaul", f64::INFINITY).is_none());
    }

    fn eleven_team_doc(extra: &str) -> String {
        let mut doc = String::new();
        for seed in 1..=11 {
            doc.push_str(&format!(
                "[[teams]]\nname = \"Team{seed}\"\nadj_oe = 110.0\nadj_de = 100.0\nseed = {seed}\n"
            ));
            if seed == 4 {
                doc.push_str(extra);
            }
            doc.push('\n');
        }
        doc
    }

    #[test]
    fn test_misspelled_team_key_rejected() {
        assert!(Registry::from_toml_str(&eleven_team_doc("conference_wins = 12\n")).is_ok());

        for typo in ["home_cout = true\n", "conference_win = 12\n"] {
            let err = Registry::from_toml_str(&eleven_team_doc(typo)).unwrap_err();
            assert!(
                matches!(err, SimError::Config(ConfigError::Parse { .. })),
                "{typo:?} should not parse"
            );
        }
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let doc = format!("season = 2025\n\n{}", eleven_team_doc(""));
        let err = Registry::from_toml_str(&doc).unwrap_err();
        assert!(matches!(err, SimError::Config(ConfigError::Parse { .. })));
    }
}
