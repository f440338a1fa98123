//! Session storage abstraction for FMS clients.
//!
//! The persisted login lives under a single key in a small key/value store.
//! Backends decide where the slots go: a file for the terminal client, memory
//! for tests.

use crate::error::Result;
use std::collections::HashMap;

/// Key under which the serialized [`crate::User`] is persisted.
pub const SESSION_KEY: &str = "fms_user";

/// Trait for durable key/value session storage.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use fms_link::storage::SessionStore;
///
/// struct MySessionStore;
///
/// impl SessionStore for MySessionStore {
///     fn get_item(&self, key: &str) -> Result<Option<String>> {
///         Ok(None)
///     }
///
///     fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
///         Ok(())
///     }
///
///     fn remove_item(&mut self, key: &str) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait SessionStore {
    /// Read the value stored under `key`, `Ok(None)` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns `Ok(())` when nothing was stored.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    fn has_item(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

/// In-memory session store. Nothing survives a restart.
///
/// # Example
///
/// ```rust
/// use fms_link::storage::{MemorySessionStore, SessionStore, SESSION_KEY};
///
/// let mut store = MemorySessionStore::new();
/// store.set_item(SESSION_KEY, r#"{"username":"alice"}"#).unwrap();
/// assert!(store.has_item(SESSION_KEY).unwrap());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    items: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}
