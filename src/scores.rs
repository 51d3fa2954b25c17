use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// The persisted high score: one non-negative integer as decimal text.
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        HighScoreStore { path: path.into() }
    }

    /// A missing file means no score has been saved yet. A file that exists
    /// but does not hold a number is an error; the file is left untouched.
    pub fn load(&self) -> Result<u32> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("could not read {}", self.path.display()))
            }
        };

        raw.trim()
            .parse()
            .with_context(|| format!("{} does not contain a valid score", self.path.display()))
    }

    pub fn save(&self, score: u32) -> Result<()> {
        fs::write(&self.path, score.to_string())
            .with_context(|| format!("could not write {}", self.path.display()))
    }
}
