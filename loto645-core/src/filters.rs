use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, PICK_COUNT, low_count, max_consecutive, odd_count, sum};

/// Les quatre filtres scalaires appliqués à une grille candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Somme des 6 numéros : (min, max) inclus.
    pub sum_range: (u16, u16),
    /// Nombres d'impairs acceptés (0-6).
    pub odd_counts: Vec<u8>,
    /// Longueur maximale d'une suite de consécutifs.
    pub max_consecutive: u8,
    /// Nombres de numéros bas (1-22) acceptés (0-6).
    pub low_counts: Vec<u8>,
}

impl FilterSettings {
    /// Vérifie qu'un fichier de réglages édité à la main reste satisfiable.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = self.sum_range;
        if min > max {
            bail!("Plage de somme invalide : {} > {}", min, max);
        }
        // Sommes atteignables avec 6 numéros de 1-45 : 21 à 255
        if max < 21 || min > 255 {
            bail!("Plage de somme inatteignable : {}~{}", min, max);
        }
        if self.odd_counts.is_empty() {
            bail!("Aucun nombre d'impairs accepté");
        }
        if self.odd_counts.iter().any(|&c| c > PICK_COUNT as u8) {
            bail!("Nombre d'impairs hors limites (0-{})", PICK_COUNT);
        }
        if self.low_counts.is_empty() {
            bail!("Aucun nombre de numéros bas accepté");
        }
        if self.low_counts.iter().any(|&c| c > PICK_COUNT as u8) {
            bail!("Nombre de numéros bas hors limites (0-{})", PICK_COUNT);
        }
        if self.max_consecutive < 1 || self.max_consecutive > PICK_COUNT as u8 {
            bail!("Consécutifs maximum hors limites (1-{})", PICK_COUNT);
        }
        Ok(())
    }

    pub fn sum_ok(&self, grid: &Grid) -> bool {
        let s = sum(grid);
        self.sum_range.0 <= s && s <= self.sum_range.1
    }

    pub fn odds_ok(&self, grid: &Grid) -> bool {
        self.odd_counts.contains(&odd_count(grid))
    }

    pub fn consecutive_ok(&self, grid: &Grid) -> bool {
        max_consecutive(grid) <= self.max_consecutive
    }

    pub fn lows_ok(&self, grid: &Grid) -> bool {
        self.low_counts.contains(&low_count(grid))
    }

    pub fn accepts(&self, grid: &Grid) -> bool {
        self.sum_ok(grid) && self.odds_ok(grid) && self.consecutive_ok(grid) && self.lows_ok(grid)
    }
}

/// Les trois stratégies prédéfinies, de la plus restrictive à la plus large.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Prudent,
    Equilibre,
    Agressif,
}

impl Strategy {
    pub fn settings(self) -> FilterSettings {
        match self {
            Strategy::Prudent => FilterSettings {
                sum_range: (120, 160),
                odd_counts: vec![3],
                max_consecutive: 1,
                low_counts: vec![3],
            },
            Strategy::Equilibre => FilterSettings {
                sum_range: (100, 175),
                odd_counts: vec![2, 3, 4],
                max_consecutive: 2,
                low_counts: vec![2, 3, 4],
            },
            Strategy::Agressif => FilterSettings {
                sum_range: (80, 200),
                odd_counts: vec![1, 2, 3, 4, 5],
                max_consecutive: 4,
                low_counts: vec![1, 2, 3, 4, 5],
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Prudent => "prudent",
            Strategy::Equilibre => "équilibré",
            Strategy::Agressif => "agressif",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "prudent" => Ok(Strategy::Prudent),
            "equilibre" | "équilibré" | "equilibré" => Ok(Strategy::Equilibre),
            "agressif" => Ok(Strategy::Agressif),
            other => bail!("Stratégie inconnue : '{}'", other),
        }
    }
}

pub fn save_settings(settings: &FilterSettings, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_settings(path: &Path) -> Result<FilterSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let settings: FilterSettings = serde_json::from_str(&json)
        .with_context(|| format!("Fichier de réglages invalide : {:?}", path))?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for strategy in [Strategy::Prudent, Strategy::Equilibre, Strategy::Agressif] {
            assert!(strategy.settings().validate().is_ok(), "préréglage invalide : {}", strategy);
        }
    }

    #[test]
    fn test_sum_filter() {
        let settings = Strategy::Prudent.settings();
        // Somme 21, bien en dessous de 120
        assert!(!settings.sum_ok(&[1, 2, 3, 4, 5, 6]));
        // Somme 135
        assert!(settings.sum_ok(&[10, 15, 20, 25, 30, 35]));
    }

    #[test]
    fn test_odds_filter() {
        let settings = Strategy::Prudent.settings();
        // 3 impairs sur 6
        assert!(settings.odds_ok(&[1, 2, 3, 4, 5, 6]));
        // 6 impairs
        assert!(!settings.odds_ok(&[1, 3, 5, 7, 9, 11]));
    }

    #[test]
    fn test_consecutive_filter() {
        let settings = Strategy::Prudent.settings();
        assert!(settings.consecutive_ok(&[1, 5, 10, 20, 30, 40]));
        assert!(!settings.consecutive_ok(&[1, 2, 10, 20, 30, 40]));

        let settings = Strategy::Equilibre.settings();
        assert!(settings.consecutive_ok(&[1, 2, 10, 20, 30, 40]));
        assert!(!settings.consecutive_ok(&[1, 2, 3, 20, 30, 40]));
    }

    #[test]
    fn test_lows_filter() {
        let settings = Strategy::Prudent.settings();
        // 3 numéros dans 1-22
        assert!(settings.lows_ok(&[1, 10, 22, 23, 30, 45]));
        // 6 numéros bas
        assert!(!settings.lows_ok(&[1, 2, 3, 4, 5, 22]));
    }

    #[test]
    fn test_accepts_requires_all_four() {
        let settings = Strategy::Prudent.settings();
        // Somme 141, 3 impairs, pas de consécutifs, 3 bas
        let grid = [5, 13, 22, 28, 33, 40];
        assert!(settings.accepts(&grid));

        // Même grille avec un 4e impair
        let grid = [5, 13, 22, 28, 33, 41];
        assert!(!settings.accepts(&grid));
    }

    #[test]
    fn test_validate_rejects_empty_sets() {
        let mut settings = Strategy::Equilibre.settings();
        settings.odd_counts.clear();
        assert!(settings.validate().is_err());

        let mut settings = Strategy::Equilibre.settings();
        settings.low_counts.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_sum_range() {
        let mut settings = Strategy::Equilibre.settings();
        settings.sum_range = (200, 100);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unreachable_sum() {
        let mut settings = Strategy::Equilibre.settings();
        settings.sum_range = (5, 15);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_counts() {
        let mut settings = Strategy::Equilibre.settings();
        settings.odd_counts = vec![7];
        assert!(settings.validate().is_err());

        let mut settings = Strategy::Equilibre.settings();
        settings.max_consecutive = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("prudent".parse::<Strategy>().unwrap(), Strategy::Prudent);
        assert_eq!("équilibré".parse::<Strategy>().unwrap(), Strategy::Equilibre);
        assert_eq!("EQUILIBRE".parse::<Strategy>().unwrap(), Strategy::Equilibre);
        assert_eq!("Agressif".parse::<Strategy>().unwrap(), Strategy::Agressif);
        assert!("foo".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let dir = std::env::temp_dir().join("loto645-test-settings");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("filtres.json");

        let settings = Strategy::Equilibre.settings();
        save_settings(&settings, &path).unwrap();
        let loaded = load_settings(&path).unwrap();
        assert_eq!(settings, loaded);

        std::fs::remove_file(&path).ok();
    }
}
