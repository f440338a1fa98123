//! Request bridge to the script endpoint.
//!
//! A call registers a uniquely named one-shot callback, issues
//! `GET <base>?<params>&callback=<name>` and waits for the payload to be
//! delivered under that name. Deadline and teardown are fixed per call:
//! the registration is released on success, load failure and timeout alike,
//! and anything delivered afterwards is dropped.

pub mod callback;
pub mod envelope;

pub use callback::{generate_callback_name, CallbackRegistry, PendingCallback, CALLBACK_PREFIX};

use crate::{
    actions::{ACTION_PARAM, CALLBACK_PARAM},
    error::{FmsLinkError, Result},
    models::Attachment,
    timeouts::FmsLinkTimeouts,
};
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Query or form parameters, in the order they are sent.
pub type Params = Vec<(&'static str, String)>;

/// Issues script requests and multipart uploads against one endpoint.
#[derive(Debug, Clone)]
pub struct RequestBridge {
    base_url: Url,
    http_client: reqwest::Client,
    registry: Arc<CallbackRegistry>,
    timeouts: FmsLinkTimeouts,
}

impl RequestBridge {
    pub fn new(base_url: Url, http_client: reqwest::Client, timeouts: FmsLinkTimeouts) -> Self {
        Self {
            base_url,
            http_client,
            registry: Arc::new(CallbackRegistry::new()),
            timeouts,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Registry of in-flight callbacks, shared by every clone of this bridge.
    pub fn registry(&self) -> &Arc<CallbackRegistry> {
        &self.registry
    }

    pub fn timeouts(&self) -> &FmsLinkTimeouts {
        &self.timeouts
    }

    /// Full request URL for `params` addressed to `callback`.
    pub fn request_url(&self, params: &[(&str, String)], callback: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair(CALLBACK_PARAM, callback);
        }
        url
    }

    /// Perform one script request and return the delivered payload.
    pub async fn call(&self, params: &[(&str, String)]) -> Result<Value> {
        let action = action_of(params);
        let (pending, mut receiver) = self.registry.register_unique();
        let url = self.request_url(params, pending.name());
        debug!("[BRIDGE] GET action={} callback={}", action, pending.name());

        let start = Instant::now();
        let mut task = tokio::spawn(fetch_and_deliver(
            self.http_client.clone(),
            url,
            pending.name().to_string(),
            Arc::clone(&self.registry),
        ));

        let outcome = self.with_deadline(&mut task).await;
        match outcome {
            None => {
                warn!(
                    "[BRIDGE] action={} timed out after {:?} (callback={})",
                    action,
                    start.elapsed(),
                    pending.name()
                );
                drop(pending);
                Err(FmsLinkError::TimeoutError(format!(
                    "no response within {:?}",
                    self.timeouts.request_timeout
                )))
            }
            Some(Err(join_err)) => Err(FmsLinkError::NetworkError(join_err.to_string())),
            Some(Ok(Err(e))) => {
                debug!("[BRIDGE] action={} failed in {:?}: {}", action, start.elapsed(), e);
                Err(e)
            }
            Some(Ok(Ok(()))) => {
                debug!("[BRIDGE] action={} answered in {:?}", action, start.elapsed());
                receiver.try_recv().map_err(|_| {
                    FmsLinkError::ProtocolError("callback was never invoked".into())
                })
            }
        }
    }

    /// Send `fields` plus an optional file part as a `multipart/form-data` POST.
    ///
    /// The response is read as JSON when possible; a non-JSON 2xx body counts
    /// as `{"success": true}`.
    pub async fn post_form(
        &self,
        fields: &[(&str, String)],
        file: Option<(&'static str, &Attachment)>,
    ) -> Result<Value> {
        let action = action_of(fields);
        let mut form = Form::new();
        for (key, value) in fields {
            form = form.text(key.to_string(), value.clone());
        }
        if let Some((field, attachment)) = file {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)
                .map_err(|e| {
                    FmsLinkError::ValidationError(format!(
                        "Invalid content type '{}': {}",
                        attachment.content_type, e
                    ))
                })?;
            form = form.part(field, part);
            debug!(
                "[BRIDGE] POST action={} with {} ({} bytes)",
                action,
                attachment.file_name,
                attachment.bytes.len()
            );
        } else {
            debug!("[BRIDGE] POST action={} without attachment", action);
        }

        let request = self.http_client.post(self.base_url.clone()).multipart(form);
        let start = Instant::now();
        let upload = async move {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FmsLinkError::ServerError {
                    status_code: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("upload rejected").to_string(),
                });
            }
            let body = response.text().await?;
            Ok::<Value, FmsLinkError>(envelope::parse_upload_response(&body))
        };

        match self.with_deadline(upload).await {
            Some(result) => {
                debug!("[BRIDGE] POST action={} finished in {:?}", action, start.elapsed());
                result
            }
            None => {
                warn!("[BRIDGE] POST action={} timed out after {:?}", action, start.elapsed());
                Err(FmsLinkError::TimeoutError(format!(
                    "no response within {:?}",
                    self.timeouts.request_timeout
                )))
            }
        }
    }

    async fn with_deadline<F: Future>(&self, fut: F) -> Option<F::Output> {
        let deadline = self.timeouts.request_timeout;
        if FmsLinkTimeouts::is_no_timeout(deadline) {
            return Some(fut.await);
        }
        tokio::time::timeout(deadline, fut).await.ok()
    }
}

async fn fetch_and_deliver(
    http_client: reqwest::Client,
    url: Url,
    callback: String,
    registry: Arc<CallbackRegistry>,
) -> Result<()> {
    let response = http_client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FmsLinkError::NetworkError(format!("HTTP {}", status)));
    }
    let body = response.text().await?;
    let payload = envelope::parse_script(&body, &callback)?;
    if !registry.deliver(&callback, payload) {
        debug!("[BRIDGE] Response for {} arrived after the call finished", callback);
    }
    Ok(())
}

fn action_of<'a>(params: &'a [(&str, String)]) -> &'a str {
    params
        .iter()
        .find(|(key, _)| *key == ACTION_PARAM)
        .map(|(_, value)| value.as_str())
        .unwrap_or("-")
}
