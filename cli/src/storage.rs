//! File-backed session storage for the CLI
//!
//! Persists session slots (the logged-in user under `fms_user`) in a TOML file
//! with owner-only permissions on Unix.
//!
//! # File Location
//!
//! - Windows: `~/.fms/session.toml`
//! - Linux/macOS: `~/.config/fms/session.toml`
//!
//! # File Format
//!
//! ```toml
//! [slots]
//! fms_user = '{"username":"asha","name":"Asha Rao","allowedPages":["lifting"]}'
//! ```
//!
//! A file that cannot be parsed is treated as empty; the next write replaces it.

use fms_link::{FmsLinkError, Result, SessionStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Session store persisted to a TOML file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    file_path: PathBuf,
    cache: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    slots: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Default session file path
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            match dirs::home_dir() {
                Some(home_dir) => home_dir.join(".fms").join("session.toml"),
                None => PathBuf::from(".fms").join("session.toml"),
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("fms").join("session.toml")
            } else if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("fms").join("session.toml")
            } else {
                PathBuf::from(".fms").join("session.toml")
            }
        }
    }

    /// Open the store at the default location
    pub fn new() -> Result<Self> {
        Self::with_path(Self::default_path())
    }

    /// Open the store at a custom location
    pub fn with_path(file_path: PathBuf) -> Result<Self> {
        let mut store = Self {
            file_path,
            cache: BTreeMap::new(),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    fn load_from_disk(&mut self) -> Result<()> {
        self.cache.clear();
        if !self.file_path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(&self.file_path).map_err(|e| {
            FmsLinkError::StorageError(format!(
                "Cannot read session file '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        match toml::from_str::<SessionFile>(&contents) {
            Ok(file) => self.cache = file.slots,
            Err(e) => {
                log::warn!(
                    "[STORE] Ignoring unreadable session file {}: {}",
                    self.file_path.display(),
                    e.message()
                );
            }
        }
        Ok(())
    }

    fn save_to_disk(&self) -> Result<()> {
        let file = SessionFile {
            slots: self.cache.clone(),
        };
        let contents = toml::to_string_pretty(&file).map_err(|e| {
            FmsLinkError::StorageError(format!("Failed to serialize session: {}", e))
        })?;

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FmsLinkError::StorageError(format!(
                    "Failed to create session directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        fs::write(&self.file_path, contents).map_err(|e| {
            FmsLinkError::StorageError(format!(
                "Failed to write session file '{}': {}",
                self.file_path.display(),
                e
            ))
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600)).map_err(
                |e| {
                    FmsLinkError::StorageError(format!(
                        "Failed to set permissions on '{}': {}",
                        self.file_path.display(),
                        e
                    ))
                },
            )?;
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SessionStore for FileSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.cache.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.cache.insert(key.to_string(), value.to_string());
        self.save_to_disk()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.cache.remove(key).is_some() || self.file_path.exists() {
            self.save_to_disk()?;
        }
        Ok(())
    }
}
