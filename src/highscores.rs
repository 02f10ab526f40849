//! Best-score persistence
//!
//! The simulation only talks to the [`HighScoreStore`] trait: a single
//! persisted integer read once at startup and written at most once per
//! completed run. Storage failures degrade to a best of 0 on read and are
//! logged and ignored on write; a run never fails because persistence did.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Two-call contract between the session and whatever persists the best score.
pub trait HighScoreStore {
    /// Stored best score, 0 when absent.
    fn read(&self) -> u32;

    /// Persist `candidate` if it beats the stored best. Returns whether a new
    /// best was recorded (persistence itself is best-effort).
    fn write_if_greater(&mut self, candidate: u32) -> bool;
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    best: u32,
}

impl MemoryHighScores {
    pub fn with_best(best: u32) -> Self {
        Self { best }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn read(&self) -> u32 {
        self.best
    }

    fn write_if_greater(&mut self, candidate: u32) -> bool {
        if candidate <= self.best {
            return false;
        }
        self.best = candidate;
        true
    }
}

/// JSON file on disk holding the single best-score integer.
#[derive(Debug)]
pub struct FileHighScores {
    path: PathBuf,
    best: u32,
}

/// On-disk envelope, so the format stays extensible
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredBest {
    best: u32,
}

impl FileHighScores {
    /// File name under the platform data directory
    const STORE_FILE: &'static str = "highscore.json";

    /// Open the store at the platform-appropriate data directory.
    pub fn open_default() -> Self {
        let dir = ProjectDirs::from("", "", "dune-dash")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                log::warn!("no data directory available, keeping the high score locally");
                PathBuf::from(".")
            });
        Self::at_path(dir.join(Self::STORE_FILE))
    }

    /// Open the store at an explicit path. The file is read once, here; an
    /// absent or unreadable file means a best of 0.
    pub fn at_path(path: PathBuf) -> Self {
        let best = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<StoredBest>(&json) {
                Ok(stored) => stored.best,
                Err(err) => {
                    log::warn!("unreadable high score file {}: {err}", path.display());
                    0
                }
            },
            // Absent is the normal first-run case
            Err(_) => 0,
        };
        Self { path, best }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl HighScoreStore for FileHighScores {
    fn read(&self) -> u32 {
        self.best
    }

    fn write_if_greater(&mut self, candidate: u32) -> bool {
        if candidate <= self.best {
            return false;
        }
        self.best = candidate;

        if let Some(dir) = self.path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        if let Ok(json) = serde_json::to_string(&StoredBest { best: candidate }) {
            match fs::write(&self.path, json) {
                Ok(()) => log::info!("high score saved: {candidate}"),
                Err(err) => log::warn!(
                    "failed to persist high score to {}: {err}",
                    self.path.display()
                ),
            }
        }
        true
    }
}
