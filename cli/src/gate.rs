//! Session gate
//!
//! Owns the logged-in user and decides whether the login prompt or the
//! authenticated shell is shown. The user is mirrored to the session store
//! under [`SESSION_KEY`] so a restart lands back in the shell.

use fms_link::models::NO_PAGE_ACCESS;
use fms_link::{FmsLinkError, Result, SessionStore, User, SESSION_KEY};

/// What the root of the terminal client shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateView<'a> {
    Login,
    Shell(&'a User),
}

/// Holds the current user and its persisted copy.
#[derive(Debug)]
pub struct SessionGate<S: SessionStore> {
    store: S,
    user: Option<User>,
}

impl<S: SessionStore> SessionGate<S> {
    /// Gate with no user. Call [`SessionGate::restore`] to pick up a stored one.
    pub fn new(store: S) -> Self {
        Self { store, user: None }
    }

    /// Load the persisted user.
    ///
    /// A record that is not an object with a string-array `allowedPages` is
    /// deleted and the session stays empty. Store failures also mean "no
    /// session".
    pub fn restore(&mut self) -> Option<&User> {
        self.user = None;

        let raw = match self.store.get_item(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("[GATE] Could not read stored session: {}", e);
                return None;
            }
        };

        match User::from_stored(&raw) {
            Some(user) => {
                log::debug!("[GATE] Restored session for '{}'", user.username);
                self.user = Some(user);
            }
            None => {
                log::warn!("[GATE] Discarding malformed session record");
                if let Err(e) = self.store.remove_item(SESSION_KEY) {
                    log::warn!("[GATE] Could not remove malformed session record: {}", e);
                }
            }
        }

        self.user.as_ref()
    }

    /// Accept a user returned by the login action.
    ///
    /// Users without pages are rejected and nothing is stored. A failed write
    /// keeps the session in memory for this run only.
    pub fn login(&mut self, user: User) -> Result<&User> {
        if user.allowed_pages.is_empty() {
            log::warn!("[GATE] Rejecting login for '{}': no pages", user.username);
            return Err(FmsLinkError::AuthenticationError(NO_PAGE_ACCESS.into()));
        }

        match user.to_stored() {
            Ok(raw) => {
                if let Err(e) = self.store.set_item(SESSION_KEY, &raw) {
                    log::warn!("[GATE] Session not persisted: {}", e);
                }
            }
            Err(e) => log::warn!("[GATE] Session not serialized: {}", e),
        }

        log::debug!(
            "[GATE] Logged in '{}' with pages {:?}",
            user.username,
            user.allowed_pages
        );
        Ok(&*self.user.insert(user))
    }

    /// Forget the user in memory and in the store.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            log::debug!("[GATE] Logged out '{}'", user.username);
        }
        if let Err(e) = self.store.remove_item(SESSION_KEY) {
            log::warn!("[GATE] Could not remove stored session: {}", e);
        }
    }

    pub fn view(&self) -> GateView<'_> {
        match &self.user {
            Some(user) => GateView::Shell(user),
            None => GateView::Login,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Summary of a user for `whoami`.
pub fn describe_user(user: &User) -> String {
    let mut text = format!("Logged in as {}", user.display_name());
    if user.display_name() != user.username {
        text.push_str(&format!(" ({})", user.username));
    }
    if let Some(role) = user.role.as_deref().filter(|r| !r.is_empty()) {
        text.push_str(&format!(", role {}", role));
    }
    text.push_str(&format!("\nPages: {}", user.allowed_pages.join(", ")));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use fms_link::MemorySessionStore;

    fn user(pages: &[&str]) -> User {
        User::new("asha", "Asha Rao", pages.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_starts_at_login() {
        let mut gate = SessionGate::new(MemorySessionStore::new());
        assert_eq!(gate.view(), GateView::Login);
        assert!(gate.restore().is_none());
        assert_eq!(gate.view(), GateView::Login);
    }

    #[test]
    fn test_login_persists_and_restores() {
        let mut gate = SessionGate::new(MemorySessionStore::new());
        gate.login(user(&["lifting", "store-in"])).unwrap();
        assert!(gate.store().has_item(SESSION_KEY).unwrap());

        let store = gate.store().clone();
        let mut restarted = SessionGate::new(store);
        let restored = restarted.restore().unwrap();
        assert_eq!(restored.allowed_pages, vec!["lifting", "store-in"]);
        assert!(matches!(restarted.view(), GateView::Shell(u) if u.username == "asha"));
    }

    #[test]
    fn test_login_without_pages_is_rejected() {
        let mut gate = SessionGate::new(MemorySessionStore::new());

        match gate.login(user(&[])) {
            Err(FmsLinkError::AuthenticationError(msg)) => assert_eq!(msg, NO_PAGE_ACCESS),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!gate.is_logged_in());
        assert!(gate.store().is_empty());
    }

    #[test]
    fn test_malformed_records_are_discarded() {
        let records = [
            "not json",
            "[]",
            r#"{"username":"asha"}"#,
            r#"{"username":"asha","allowedPages":"dashboard"}"#,
            r#"{"username":"asha","allowedPages":["dashboard",3]}"#,
        ];

        for record in records {
            let mut store = MemorySessionStore::new();
            store.set_item(SESSION_KEY, record).unwrap();

            let mut gate = SessionGate::new(store);
            assert!(gate.restore().is_none(), "accepted {}", record);
            assert_eq!(gate.view(), GateView::Login);
            assert!(!gate.store().has_item(SESSION_KEY).unwrap(), "kept {}", record);
        }
    }

    #[test]
    fn test_logout_clears_memory_and_store() {
        let mut gate = SessionGate::new(MemorySessionStore::new());
        gate.login(user(&["dashboard"])).unwrap();

        gate.logout();
        assert_eq!(gate.view(), GateView::Login);
        assert!(!gate.store().has_item(SESSION_KEY).unwrap());
    }

    #[test]
    fn test_describe_user() {
        let user = User::new("asha", "Asha Rao", vec!["dashboard".into(), "lifting".into()])
            .with_role("stores");
        assert_eq!(
            describe_user(&user),
            "Logged in as Asha Rao (asha), role stores\nPages: dashboard, lifting"
        );

        let bare = User::new("ops", "", vec!["license".into()]);
        assert_eq!(describe_user(&bare), "Logged in as ops\nPages: license");
    }
}
