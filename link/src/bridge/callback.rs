//! Pending callback registry.
//!
//! Each in-flight request owns exactly one slot, keyed by its generated
//! callback name. The response task delivers into the slot by name; the slot
//! is removed when the owning [`PendingCallback`] guard is dropped, whatever
//! the outcome of the call.

use rand::{distr::Alphanumeric, Rng};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::oneshot;

/// Prefix of every generated callback name.
pub const CALLBACK_PREFIX: &str = "jsonp_callback_";

const SUFFIX_LEN: usize = 9;

/// Generate a callback name of the form `jsonp_callback_<unix millis>_<9 alnum>`.
pub fn generate_callback_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}_{}", CALLBACK_PREFIX, millis, suffix)
}

/// Registry of one-shot handlers for in-flight requests.
#[derive(Debug, Default)]
pub struct CallbackRegistry {
    slots: Mutex<HashMap<String, oneshot::Sender<Value>>>,
    late_deliveries: AtomicU64,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, oneshot::Sender<Value>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a fresh, unused callback name.
    ///
    /// Returns the guard owning the slot and the receiver the payload will be
    /// delivered on.
    pub fn register_unique(self: &Arc<Self>) -> (PendingCallback, oneshot::Receiver<Value>) {
        let (tx, rx) = oneshot::channel();
        let mut slots = self.slots();
        let mut name = generate_callback_name();
        while slots.contains_key(&name) {
            name = generate_callback_name();
        }
        slots.insert(name.clone(), tx);
        drop(slots);

        log::debug!("[BRIDGE] Registered callback {}", name);
        (
            PendingCallback {
                name,
                registry: Arc::clone(self),
            },
            rx,
        )
    }

    /// Deliver a payload to the handler registered under `name`.
    ///
    /// Returns `false` when no handler is registered (the call already
    /// finished) or the waiting side has gone away; the payload is dropped.
    pub fn deliver(&self, name: &str, payload: Value) -> bool {
        let sender = self.slots().remove(name);
        let delivered = match sender {
            Some(tx) => tx.send(payload).is_ok(),
            None => false,
        };
        if !delivered {
            self.late_deliveries.fetch_add(1, Ordering::Relaxed);
            log::debug!("[BRIDGE] Dropping late response for callback {}", name);
        }
        delivered
    }

    /// Whether a handler is currently registered under `name`.
    pub fn is_pending(&self, name: &str) -> bool {
        self.slots().contains_key(name)
    }

    /// Number of handlers currently registered.
    pub fn pending_count(&self) -> usize {
        self.slots().len()
    }

    /// Number of payloads that arrived with no handler to receive them.
    pub fn late_deliveries(&self) -> u64 {
        self.late_deliveries.load(Ordering::Relaxed)
    }

    fn release(&self, name: &str) {
        if self.slots().remove(name).is_some() {
            log::debug!("[BRIDGE] Released callback {}", name);
        }
    }
}

/// Ownership of one registry slot. Dropping it removes the slot.
#[derive(Debug)]
pub struct PendingCallback {
    name: String,
    registry: Arc<CallbackRegistry>,
}

impl PendingCallback {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for PendingCallback {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}
