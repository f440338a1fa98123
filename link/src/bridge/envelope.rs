//! Parsing of callback-wrapped responses.
//!
//! The endpoint answers `name(payload)`, optionally prefixed with `/**/` and
//! terminated with `;`. Bare JSON is accepted as well.

use crate::error::{FmsLinkError, Result};
use serde_json::Value;

const COMMENT_PREFIX: &str = "/**/";

/// Extract the payload of a script response addressed to `expected`.
pub fn parse_script(body: &str, expected: &str) -> Result<Value> {
    let trimmed = body.trim();
    let trimmed = trimmed.strip_prefix(COMMENT_PREFIX).unwrap_or(trimmed).trim_start();

    if let Some((callee, args)) = split_invocation(trimmed) {
        if callee != expected {
            return Err(FmsLinkError::ProtocolError(format!(
                "response addressed to callback '{}', expected '{}'",
                callee, expected
            )));
        }
        let args = args.trim_end();
        let args = args.strip_suffix(';').unwrap_or(args).trim_end();
        let inner = args.strip_suffix(')').ok_or_else(|| {
            FmsLinkError::ProtocolError("unterminated callback invocation".into())
        })?;
        return parse_json(inner);
    }

    parse_json(trimmed)
}

/// Interpret the body of a multipart upload response.
///
/// A JSON body is returned as-is; anything else (an HTML acknowledgement page,
/// an empty body) counts as a plain success.
pub fn parse_upload_response(body: &str) -> Value {
    match serde_json::from_str::<Value>(body.trim()) {
        Ok(value) if value.is_object() => value,
        _ => {
            log::debug!("[BRIDGE] Upload answered with non-JSON body ({} bytes)", body.len());
            serde_json::json!({ "success": true })
        }
    }
}

fn split_invocation(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let callee = text[..open].trim();
    if callee.is_empty() || !callee.chars().all(is_identifier_char) {
        return None;
    }
    Some((callee, &text[open + 1..]))
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text.trim())
        .map_err(|e| FmsLinkError::ProtocolError(format!("payload is not JSON: {}", e)))
}
