use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Une exécution du générateur : horodatage, stratégie, grilles produites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunEntry {
    pub timestamp: String,
    pub strategy: String,
    pub grids: Vec<Grid>,
}

/// Journal en mémoire des générations d'une session, la plus récente en
/// tête. Vit le temps du processus, rien n'est persisté.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunHistory {
    entries: Vec<RunEntry>,
}

impl RunHistory {
    pub fn record(&mut self, strategy: &str, grids: Vec<Grid>) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.entries.insert(
            0,
            RunEntry {
                timestamp,
                strategy: strategy.to_string(),
                grids,
            },
        );
    }

    pub fn entries(&self) -> &[RunEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&RunEntry> {
        self.entries.first()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let history = RunHistory::default();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert!(history.latest().is_none());
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = RunHistory::default();
        history.record("prudent", vec![[1, 2, 3, 4, 5, 6]]);
        history.record("agressif", vec![[7, 8, 9, 10, 11, 12]]);

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().strategy, "agressif");
        assert_eq!(history.entries()[1].strategy, "prudent");
    }

    #[test]
    fn test_record_keeps_grids() {
        let mut history = RunHistory::default();
        let grids = vec![[1, 2, 3, 4, 5, 6], [10, 20, 30, 40, 44, 45]];
        history.record("équilibré", grids.clone());
        assert_eq!(history.latest().unwrap().grids, grids);
    }
}
