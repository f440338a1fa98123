use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{FmsLinkError, Result};

/// The `{success, error?, ...data}` convention every action answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ApiEnvelope {
    pub fn from_payload(payload: Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(FmsLinkError::ProtocolError(format!(
                "expected an object, got {}",
                payload
            )));
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Turn `success: false` into a remote error, using `default_error` when
    /// the server sent no message.
    pub fn into_result(self, default_error: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let message = self
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| default_error.to_string());
        Err(FmsLinkError::RemoteError(message))
    }

    /// Data field decoded as `T`; missing or `null` yields `T::default()`.
    pub fn field<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        match self.data.get(name) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => Ok(serde_json::from_value(value.clone())?),
        }
    }

    pub fn raw_field(&self, name: &str) -> Option<&Value> {
        self.data.get(name).filter(|v| !v.is_null())
    }
}
