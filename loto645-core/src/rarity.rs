use rand::rngs::StdRng;

use crate::filters::FilterSettings;
use crate::generator::draw_uniform;

/// Comptages Monte-Carlo : taux d'acceptation conjoint et par filtre.
#[derive(Debug, Clone, Default)]
pub struct RarityEstimate {
    pub samples: u32,
    pub accepted: u32,
    pub sum_pass: u32,
    pub odds_pass: u32,
    pub consecutive_pass: u32,
    pub lows_pass: u32,
}

impl RarityEstimate {
    pub fn rate(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.samples as f64
    }

    /// Nombre de tirages attendus par grille acceptée (1 / taux).
    pub fn expected_attempts(&self) -> Option<f64> {
        if self.accepted == 0 {
            return None;
        }
        Some(self.samples as f64 / self.accepted as f64)
    }

    pub fn merge(&mut self, other: &RarityEstimate) {
        self.samples += other.samples;
        self.accepted += other.accepted;
        self.sum_pass += other.sum_pass;
        self.odds_pass += other.odds_pass;
        self.consecutive_pass += other.consecutive_pass;
        self.lows_pass += other.lows_pass;
    }
}

/// Tire `samples` grilles uniformes et compte les passages de chaque
/// filtre. Appelable par lots pour alimenter une barre de progression.
pub fn sample_acceptance(
    settings: &FilterSettings,
    samples: u32,
    rng: &mut StdRng,
) -> RarityEstimate {
    let mut estimate = RarityEstimate {
        samples,
        ..Default::default()
    };

    for _ in 0..samples {
        let grid = draw_uniform(rng);
        let sum_ok = settings.sum_ok(&grid);
        let odds_ok = settings.odds_ok(&grid);
        let consecutive_ok = settings.consecutive_ok(&grid);
        let lows_ok = settings.lows_ok(&grid);

        if sum_ok {
            estimate.sum_pass += 1;
        }
        if odds_ok {
            estimate.odds_pass += 1;
        }
        if consecutive_ok {
            estimate.consecutive_pass += 1;
        }
        if lows_ok {
            estimate.lows_pass += 1;
        }
        if sum_ok && odds_ok && consecutive_ok && lows_ok {
            estimate.accepted += 1;
        }
    }

    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterSettings, Strategy};
    use rand::SeedableRng;

    fn accept_all() -> FilterSettings {
        FilterSettings {
            sum_range: (21, 255),
            odd_counts: vec![0, 1, 2, 3, 4, 5, 6],
            max_consecutive: 6,
            low_counts: vec![0, 1, 2, 3, 4, 5, 6],
        }
    }

    #[test]
    fn test_accept_all_rate_is_one() {
        let mut rng = StdRng::seed_from_u64(42);
        let estimate = sample_acceptance(&accept_all(), 1_000, &mut rng);
        assert_eq!(estimate.accepted, 1_000);
        assert!((estimate.rate() - 1.0).abs() < 1e-12);
        assert_eq!(estimate.expected_attempts(), Some(1.0));
    }

    #[test]
    fn test_joint_rate_below_individual_rates() {
        let mut rng = StdRng::seed_from_u64(42);
        let estimate = sample_acceptance(&Strategy::Prudent.settings(), 20_000, &mut rng);
        assert!(estimate.accepted <= estimate.sum_pass);
        assert!(estimate.accepted <= estimate.odds_pass);
        assert!(estimate.accepted <= estimate.consecutive_pass);
        assert!(estimate.accepted <= estimate.lows_pass);
    }

    #[test]
    fn test_prudent_rarer_than_agressif() {
        let mut rng = StdRng::seed_from_u64(42);
        let prudent = sample_acceptance(&Strategy::Prudent.settings(), 20_000, &mut rng);
        let mut rng = StdRng::seed_from_u64(42);
        let agressif = sample_acceptance(&Strategy::Agressif.settings(), 20_000, &mut rng);
        assert!(
            prudent.rate() < agressif.rate(),
            "prudent {} devrait être plus rare qu'agressif {}",
            prudent.rate(),
            agressif.rate()
        );
    }

    #[test]
    fn test_merge_accumulates() {
        let mut rng = StdRng::seed_from_u64(42);
        let settings = Strategy::Equilibre.settings();
        let mut total = RarityEstimate::default();
        for _ in 0..4 {
            let batch = sample_acceptance(&settings, 5_000, &mut rng);
            total.merge(&batch);
        }
        assert_eq!(total.samples, 20_000);
        assert!(total.accepted > 0, "équilibré devrait accepter des grilles");
    }

    #[test]
    fn test_empty_estimate() {
        let estimate = RarityEstimate::default();
        assert_eq!(estimate.rate(), 0.0);
        assert_eq!(estimate.expected_attempts(), None);
    }
}
