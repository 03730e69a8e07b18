//! Fastest-stabilization leaderboard
//!
//! Persisted to LocalStorage, tracks the 5 fastest completion times.
//! Ranking is by elapsed time alone; difficulty and shape ride along as
//! metadata, so a quick easy run can outrank a slow hard one.

use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, Shape};

/// Maximum number of records to keep
pub const MAX_SCORES: usize = 5;

/// A single completed stabilization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Hold duration in seconds
    pub elapsed_seconds: f64,
    /// Tier the hold was completed on
    pub difficulty: Difficulty,
    /// Field shape at the time
    pub shape: Shape,
    /// ISO 8601 completion time
    pub timestamp: String,
}

/// Score leaderboard, ascending by elapsed time (fastest first)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreLedger {
    pub entries: Vec<ScoreRecord>,
}

impl ScoreLedger {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "reactor_scores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a record at its rank, evicting the slowest past the cap.
    /// Returns the rank achieved (1-indexed) or None if the record was
    /// evicted immediately.
    pub fn record(&mut self, entry: ScoreRecord) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|e| entry.elapsed_seconds < e.elapsed_seconds)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_SCORES);

        if pos < MAX_SCORES { Some(pos + 1) } else { None }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fastest recorded time (if any)
    pub fn best_time(&self) -> Option<f64> {
        self.entries.first().map(|e| e.elapsed_seconds)
    }

    /// Load the ledger from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(ledger) = serde_json::from_str::<ScoreLedger>(&json) {
                    log::info!("Loaded {} scores", ledger.entries.len());
                    return ledger;
                }
                log::warn!("Stored scores failed to parse, starting fresh");
            }
        }

        log::info!("No scores found, starting fresh");
        Self::new()
    }

    /// Save the ledger to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(elapsed: f64) -> ScoreRecord {
        ScoreRecord {
            elapsed_seconds: elapsed,
            difficulty: Difficulty::Easy,
            shape: Shape::Orb,
            timestamp: "2025-06-01T12:00:00Z".to_string(),
        }
    }

    fn times(ledger: &ScoreLedger) -> Vec<f64> {
        ledger.entries.iter().map(|e| e.elapsed_seconds).collect()
    }

    #[test]
    fn test_record_keeps_ascending_order() {
        let mut ledger = ScoreLedger::new();
        for t in [2.1, 3.4, 1.9, 5.0, 1.2, 4.4] {
            let _ = ledger.record(rec(t));
        }
        assert_eq!(times(&ledger), vec![1.2, 1.9, 2.1, 3.4, 4.4]);
    }

    #[test]
    fn test_record_returns_rank() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.record(rec(3.0)), Some(1));
        assert_eq!(ledger.record(rec(2.0)), Some(1));
        assert_eq!(ledger.record(rec(4.0)), Some(3));
    }

    #[test]
    fn test_slow_record_evicted_when_full() {
        let mut ledger = ScoreLedger::new();
        for t in [1.0, 2.0, 3.0, 4.0, 5.0] {
            let _ = ledger.record(rec(t));
        }
        assert_eq!(ledger.record(rec(9.0)), None);
        assert_eq!(ledger.entries.len(), MAX_SCORES);
        assert_eq!(ledger.best_time(), Some(1.0));
    }

    #[test]
    fn test_difficulty_not_part_of_sort_key() {
        let mut ledger = ScoreLedger::new();
        let _ = ledger.record(ScoreRecord {
            difficulty: Difficulty::Hard,
            ..rec(8.5)
        });
        let _ = ledger.record(rec(2.0)); // easy, but faster
        assert_eq!(ledger.entries[0].difficulty, Difficulty::Easy);
        assert_eq!(ledger.entries[1].difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_corrupt_json_degrades_to_empty() {
        // Mirrors the wasm load() fallback path: bad payloads parse to None
        let parsed = serde_json::from_str::<ScoreLedger>("{not json");
        assert!(parsed.is_err());
        let ledger = ScoreLedger::new();
        assert!(ledger.is_empty());
    }
}
