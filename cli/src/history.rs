//! Shell history persistence
//!
//! Keeps the commands typed into the `fms` shell in `~/.fms/history` so the
//! up-arrow works across sessions.

use std::path::{Path, PathBuf};

use crate::error::{CLIError, Result};

/// Command history manager
pub struct CommandHistory {
    path: PathBuf,
    max_size: usize,
}

impl CommandHistory {
    /// History at `~/.fms/history`
    pub fn new(max_size: usize) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: home.join(".fms").join("history"),
            max_size,
        }
    }

    pub fn with_path<P: AsRef<Path>>(path: P, max_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_size,
        }
    }

    /// Load the newest `max_size` entries, oldest first
    pub fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| CLIError::HistoryError(format!("Failed to read history file: {}", e)))?;

        let lines: Vec<String> = contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        let skip = lines.len().saturating_sub(self.max_size);
        Ok(lines.into_iter().skip(skip).collect())
    }

    /// Overwrite the file with the newest `max_size` entries of `history`
    pub fn save(&self, history: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let skip = history.len().saturating_sub(self.max_size);
        let mut contents = history[skip..].join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }

        std::fs::write(&self.path, contents)
            .map_err(|e| CLIError::HistoryError(format!("Failed to write history file: {}", e)))
    }

    /// Append one command; blank lines and immediate repeats are skipped
    pub fn append(&self, command: &str) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return Ok(());
        }

        let mut history = self.load()?;
        if history.last().map(String::as_str) == Some(command) {
            return Ok(());
        }

        history.push(command.to_string());
        self.save(&history)
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
