use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many scores the board keeps.
const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u32,
    pub at: DateTime<Utc>,
}

/// Cross-session speed-drill high-score board.
///
/// Single-writer discipline: submissions take the write lock and replace
/// the sorted list atomically; readers only ever see a complete board.
/// Concurrent writers must serialize outside the engine.
#[derive(Debug)]
pub struct HighScores {
    entries: RwLock<Vec<ScoreEntry>>,
    capacity: usize,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HighScores {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Records a score. Returns true when it made the board.
    pub fn submit(&self, score: u32) -> bool {
        let mut guard = match self.entries.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = guard.clone();
        next.push(ScoreEntry {
            score,
            at: Utc::now(),
        });
        next.sort_by(|a, b| b.score.cmp(&a.score));
        next.truncate(self.capacity);
        let placed = next.iter().any(|e| e.score == score);
        *guard = next;
        placed
    }

    pub fn top(&self) -> Vec<ScoreEntry> {
        match self.entries.read() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn best(&self) -> Option<u32> {
        self.top().first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_keeps_the_top_scores_sorted() {
        let board = HighScores::new(3);
        for score in [100, 900, 500, 300, 700] {
            board.submit(score);
        }
        let scores: Vec<u32> = board.top().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
        assert_eq!(board.best(), Some(900));
    }

    #[test]
    fn low_scores_fall_off_a_full_board() {
        let board = HighScores::new(2);
        assert!(board.submit(10));
        assert!(board.submit(20));
        assert!(!board.submit(5));
        assert_eq!(board.top().len(), 2);
    }
}
