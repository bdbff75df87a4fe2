//! Level completion store
//!
//! The simulation only asks two questions of it: is a level complete, and
//! mark one complete. The default store is a small JSON file that also keeps
//! the endless level's leaderboard.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::highscores::HighScores;
use crate::sim::state::LevelState;
use crate::tuning::LevelId;

/// Boolean-per-level completion store
pub trait ProgressStore {
    fn is_level_complete(&self, level: u32) -> bool;
    fn set_level_complete(&mut self, level: u32);
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Indices of completed levels
    pub completed: BTreeSet<u32>,
    #[serde(default)]
    pub high_scores: HighScores,
}

impl ProgressStore for Progress {
    fn is_level_complete(&self, level: u32) -> bool {
        self.completed.contains(&level)
    }

    fn set_level_complete(&mut self, level: u32) {
        if self.completed.insert(level) {
            log::info!("Level {} marked complete", level);
        }
    }
}

impl Progress {
    /// Read a progress file; a missing file is a fresh start
    pub fn load_from(path: &Path) -> Result<Self, ProgressError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `load_from`, but a broken file is logged and replaced by defaults
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(progress) => {
                log::info!(
                    "Loaded progress: {} levels complete, {} high scores",
                    progress.completed.len(),
                    progress.high_scores.entries.len()
                );
                progress
            }
            Err(e) => {
                log::warn!("Ignoring progress file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write through a temp file so a crash never leaves half a file behind
    pub fn save_to(&self, path: &Path) -> Result<(), ProgressError> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        log::info!("Progress saved to {}", path.display());
        Ok(())
    }

    /// Mark the level complete if its final part was reached
    pub fn record_level_end(&mut self, state: &LevelState) -> bool {
        if state.level_complete {
            self.set_level_complete(state.tuning.level.index());
        }
        state.level_complete
    }

    /// Offer an ended attempt to the leaderboard; only the endless level ranks
    pub fn record_attempt(&mut self, level: LevelId, score: u32, attempt: u32) -> Option<usize> {
        if level != LevelId::Legacy {
            return None;
        }
        let rank = self.high_scores.add_score(score, attempt)?;
        log::info!("New high score {} (rank {})", score, rank);
        Some(rank)
    }
}
