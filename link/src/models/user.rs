use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::utils::{lenient_opt_string, lenient_string};
use crate::error::{FmsLinkError, Result};

/// Message shown when a user has no pages assigned.
pub const NO_PAGE_ACCESS: &str = "No page access configured. Contact administrator.";

/// Authenticated user as returned by the login action and persisted in the
/// session store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// Page ids this user may open, in the order the server assigned them.
    #[serde(rename = "allowedPages", default)]
    pub allowed_pages: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    /// Fields the server sends that the client does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(username: impl Into<String>, name: impl Into<String>, allowed_pages: Vec<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            allowed_pages,
            role: None,
            extra: Map::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Build a user from the `user` object of a login response.
    ///
    /// `allowedPages` entries that are not non-blank strings are dropped and
    /// the rest trimmed. A user left without pages is rejected.
    pub fn from_login_payload(raw: &Value) -> Result<User> {
        let object = raw.as_object().ok_or_else(|| {
            FmsLinkError::AuthenticationError("Invalid response from server".into())
        })?;

        let pages: Vec<Value> = object
            .get("allowedPages")
            .and_then(Value::as_array)
            .map(|pages| {
                pages
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|page| !page.is_empty())
                    .map(|page| Value::String(page.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        if pages.is_empty() {
            log::warn!("[CLIENT] Login returned no allowed pages");
            return Err(FmsLinkError::AuthenticationError(NO_PAGE_ACCESS.into()));
        }

        let mut object = object.clone();
        object.insert("allowedPages".into(), Value::Array(pages));
        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// Parse a persisted session record.
    ///
    /// Accepts only a JSON object whose `allowedPages` is an array of strings.
    pub fn from_stored(raw: &str) -> Option<User> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let pages = value.as_object()?.get("allowedPages")?.as_array()?;
        if !pages.iter().all(Value::is_string) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Serialized form written to the session store.
    pub fn to_stored(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn can_access(&self, page: &str) -> bool {
        self.allowed_pages.iter().any(|p| p == page)
    }

    /// First allowed page; `dashboard` when the list is empty.
    pub fn landing_page(&self) -> &str {
        self.allowed_pages.first().map(String::as_str).unwrap_or("dashboard")
    }

    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}
