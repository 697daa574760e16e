use crate::grid::Grid;

/// Rangs de gain du Lotto 6/45.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Lost,
}

impl Rank {
    /// Table des rangs : 6 numéros = 1er, 5 + bonus = 2e, 5 = 3e,
    /// 4 = 4e, 3 = 5e, sinon perdu.
    pub fn from_matches(matches: u8, bonus_hit: bool) -> Rank {
        match (matches, bonus_hit) {
            (6, _) => Rank::First,
            (5, true) => Rank::Second,
            (5, false) => Rank::Third,
            (4, _) => Rank::Fourth,
            (3, _) => Rank::Fifth,
            _ => Rank::Lost,
        }
    }

    pub fn is_winning(self) -> bool {
        self != Rank::Lost
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::First => write!(f, "1er rang"),
            Rank::Second => write!(f, "2e rang"),
            Rank::Third => write!(f, "3e rang"),
            Rank::Fourth => write!(f, "4e rang"),
            Rank::Fifth => write!(f, "5e rang"),
            Rank::Lost => write!(f, "perdu"),
        }
    }
}

pub fn match_count(grid: &Grid, winning: &Grid) -> u8 {
    grid.iter().filter(|n| winning.contains(n)).count() as u8
}

pub fn determine_rank(grid: &Grid, winning: &Grid, bonus: u8) -> Rank {
    let matches = match_count(grid, winning);
    let bonus_hit = grid.contains(&bonus);
    Rank::from_matches(matches, bonus_hit)
}
