use crate::constants::LAST_BYE_SEED;
use crate::registry::Registry;
use crate::team::Team;

/// One game slot. A side is `None` until the round feeding it is decided.
#[derive(Clone, Copy, Debug, Default)]
pub struct Matchup<'r> {
    pub team_a: Option<&'r Team>,
    pub team_b: Option<&'r Team>,
    pub winner: Option<&'r Team>,
}

impl<'r> Matchup<'r> {
    pub fn new(team_a: Option<&'r Team>, team_b: Option<&'r Team>) -> Self {
        Matchup {
            team_a,
            team_b,
            winner: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.team_a.is_some() && self.team_b.is_some()
    }
}

/// First-round game index for each quarterfinal's open slot, or `None` when
/// both quarterfinal sides are byes.
///
/// Quarterfinals in bracket order: 1 v 8/9, 4 v 5, 3 v 6/11, 2 v 7/10.
pub const QUARTERFINAL_FEEDS: [Option<usize>; 4] = [Some(0), None, Some(2), Some(1)];

/// Bye seeds occupying side A of each quarterfinal.
pub const QUARTERFINAL_BYES: [u32; 4] = [1, 4, 3, 2];

/// First-round pairings by seed: 8 v 9, 7 v 10, 6 v 11.
pub const FIRST_ROUND_SEEDS: [(u32, u32); 3] = [(8, 9), (7, 10), (6, 11)];

/// Fixed-topology 11-team bracket.
///
/// Seeds 1-5 receive byes into the quarterfinals. Semifinal `i` is fed by
/// quarterfinals `2i` and `2i + 1`.
#[derive(Clone, Debug)]
pub struct Bracket<'r> {
    pub first_round: [Matchup<'r>; 3],
    pub quarterfinals: [Matchup<'r>; 4],
    pub semifinals: [Matchup<'r>; 2],
    pub final_game: Matchup<'r>,
}

/// Build a fresh, unplayed bracket from the registry.
pub fn build_bracket(registry: &Registry) -> Bracket<'_> {
    let seed = |s: u32| Some(registry.by_seed(s));

    let first_round = FIRST_ROUND_SEEDS.map(|(a, b)| Matchup::new(seed(a), seed(b)));

    // 4 v 5 is the only quarterfinal with both sides known up front
    let quarterfinals = [
        Matchup::new(seed(QUARTERFINAL_BYES[0]), None),
        Matchup::new(seed(QUARTERFINAL_BYES[1]), seed(LAST_BYE_SEED)),
        Matchup::new(seed(QUARTERFINAL_BYES[2]), None),
        Matchup::new(seed(QUARTERFINAL_BYES[3]), None),
    ];

    Bracket {
        first_round,
        quarterfinals,
        semifinals: [Matchup::default(); 2],
        final_game: Matchup::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeds(m: &Matchup) -> (Option<u32>, Option<u32>) {
        (m.team_a.map(|t| t.seed), m.team_b.map(|t| t.seed))
    }

    #[test]
    fn test_first_round_pairings() {
        let registry = Registry::big_east_2025();
        let bracket = build_bracket(&registry);

        assert_eq!(seeds(&bracket.first_round[0]), (Some(8), Some(9)));
        assert_eq!(seeds(&bracket.first_round[1]), (Some(7), Some(10)));
        assert_eq!(seeds(&bracket.first_round[2]), (Some(6), Some(11)));
        assert!(bracket.first_round.iter().all(|m| m.winner.is_none()));
    }

    #[test]
    fn test_byes_seeded_into_quarterfinals() {
        let registry = Registry::big_east_2025();
        let bracket = build_bracket(&registry);

        assert_eq!(seeds(&bracket.quarterfinals[0]), (Some(1), None));
        assert_eq!(seeds(&bracket.quarterfinals[1]), (Some(4), Some(5)));
        assert_eq!(seeds(&bracket.quarterfinals[2]), (Some(3), None));
        assert_eq!(seeds(&bracket.quarterfinals[3]), (Some(2), None));
        assert!(bracket.quarterfinals[1].is_ready());
        assert!(!bracket.quarterfinals[0].is_ready());
    }

    #[test]
    fn test_later_rounds_start_empty() {
        let registry = Registry::big_east_2025();
        let bracket = build_bracket(&registry);

        for m in bracket.semifinals.iter().chain(std::iter::once(&bracket.final_game)) {
            assert!(m.team_a.is_none() && m.team_b.is_none() && m.winner.is_none());
        }
    }

    #[test]
    fn test_every_seed_placed_once() {
        let registry = Registry::big_east_2025();
        let bracket = build_bracket(&registry);

        let mut placed: Vec<u32> = bracket
            .first_round
            .iter()
            .chain(bracket.quarterfinals.iter())
            .flat_map(|m| [m.team_a, m.team_b])
            .flatten()
            .map(|t| t.seed)
            .collect();
        placed.sort_unstable();
        assert_eq!(placed, (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_feed_tables_consistent() {
        let mut fed: Vec<usize> = QUARTERFINAL_FEEDS.iter().flatten().copied().collect();
        fed.sort_unstable();
        assert_eq!(fed, vec![0, 1, 2]);
        // The quarterfinal without a feed is the 4 v 5 game
        assert_eq!(QUARTERFINAL_BYES[1], 4);
        assert!(QUARTERFINAL_FEEDS[1].is_none());
    }
}
