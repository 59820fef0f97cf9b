//! High score table
//!
//! One best score per difficulty. A score replaces the stored one only when
//! it is strictly greater.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// A single best-score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Difficulty key the score was set on
    pub difficulty: String,
    pub score: u64,
    /// Rings spawned in the run that set the score
    pub rings: u32,
}

/// Best scores keyed by difficulty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Stored best for a difficulty (0 when none)
    pub fn best(&self, difficulty: Difficulty) -> u64 {
        self.entry(difficulty).map(|e| e.score).unwrap_or(0)
    }

    fn entry(&self, difficulty: Difficulty) -> Option<&HighScoreEntry> {
        self.entries
            .iter()
            .find(|e| e.difficulty == difficulty.key())
    }

    /// Whether a score would replace the stored best
    pub fn qualifies(&self, difficulty: Difficulty, score: u64) -> bool {
        score > self.best(difficulty)
    }

    /// Record a score. Returns true when it became the new best.
    pub fn submit(&mut self, difficulty: Difficulty, score: u64, rings: u32) -> bool {
        if !self.qualifies(difficulty, score) {
            return false;
        }
        match self
            .entries
            .iter_mut()
            .find(|e| e.difficulty == difficulty.key())
        {
            Some(entry) => {
                entry.score = score;
                entry.rings = rings;
            }
            None => self.entries.push(HighScoreEntry {
                difficulty: difficulty.key().to_string(),
                score,
                rings,
            }),
        }
        log::info!("New {} high score: {}", difficulty.key(), score);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_positive_score_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(Difficulty::Normal, 0));
        assert!(scores.submit(Difficulty::Normal, 3, 10));
        assert_eq!(scores.best(Difficulty::Normal), 3);
    }

    #[test]
    fn test_equal_score_does_not_update() {
        let mut scores = HighScores::new();
        scores.submit(Difficulty::Hard, 12, 30);
        assert!(!scores.submit(Difficulty::Hard, 12, 40));
        assert_eq!(scores.entries[0].rings, 30);
        assert!(scores.submit(Difficulty::Hard, 13, 41));
        assert_eq!(scores.best(Difficulty::Hard), 13);
    }

    #[test]
    fn test_difficulties_tracked_separately() {
        let mut scores = HighScores::new();
        scores.submit(Difficulty::Easy, 50, 60);
        assert_eq!(scores.best(Difficulty::Extreme), 0);
        assert!(scores.submit(Difficulty::Extreme, 1, 2));
        assert_eq!(scores.entries.len(), 2);
    }
}
