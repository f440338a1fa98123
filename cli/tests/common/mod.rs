#![allow(dead_code)]
//! Shared helpers for CLI integration tests
//!
//! A local stand-in for the FMS script endpoint: each action answers with a
//! scripted payload, wrapped in the requested callback for GET requests and
//! as plain JSON for multipart uploads. Requests are recorded per action.

use axum::{
    extract::{Multipart, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use fms_cli::{CLIConfiguration, CLISession, OutputFormat};
use fms_link::{FmsClient, FmsLinkTimeouts, SessionStore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct MockState {
    replies: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<(String, HashMap<String, String>)>>,
}

pub struct MockEndpoint {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    _handle: JoinHandle<()>,
}

impl MockEndpoint {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/exec", get(handle_script).post(handle_upload))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let server = axum::serve(listener, app.into_make_service());
        let handle = tokio::spawn(async move {
            let _ = server.await;
        });

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/exec", self.addr)
    }

    pub fn reply(&self, action: &str, payload: Value) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(action.to_string(), payload);
        self
    }

    /// Parameters of every request made for `action`, oldest first.
    pub fn requests_for(&self, action: &str) -> Vec<HashMap<String, String>> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a == action)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn client(&self) -> FmsClient {
        FmsClient::builder()
            .base_url(self.url())
            .timeouts(
                FmsLinkTimeouts::builder()
                    .connection_timeout(Duration::from_secs(2))
                    .request_timeout(Duration::from_secs(5))
                    .build(),
            )
            .build()
            .expect("client")
    }

    /// Shell session against this endpoint with plain output and no spinners.
    pub fn session<S: SessionStore>(&self, store: S) -> CLISession<S> {
        CLISession::new(
            self.client(),
            store,
            CLIConfiguration::default(),
            OutputFormat::Table,
            false,
        )
        .with_animations(false)
    }
}

fn record(state: &MockState, params: HashMap<String, String>) -> Value {
    let action = params.get("action").cloned().unwrap_or_default();
    let reply = state
        .replies
        .lock()
        .unwrap()
        .get(&action)
        .cloned()
        .unwrap_or_else(|| json!({"success": false, "error": "Unknown action"}));
    state.requests.lock().unwrap().push((action, params));
    reply
}

async fn handle_script(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let callback = params.get("callback").cloned().unwrap_or_default();
    let payload = record(&state, params);
    format!("{}({})", callback, payload).into_response()
}

async fn handle_upload(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    let mut params = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            let size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            params.insert(name, format!("<{} bytes>", size));
        } else {
            let value = field.text().await.unwrap_or_default();
            params.insert(name, value);
        }
    }
    record(&state, params).to_string().into_response()
}

/// Login reply for a user with `pages`.
pub fn login_reply(pages: &[&str]) -> Value {
    json!({
        "success": true,
        "user": {"username": "asha", "name": "Asha Rao", "role": "stores", "allowedPages": pages}
    })
}

/// Indent rows as the pending-list actions return them.
pub fn indents(rows: &[(u64, &str)]) -> Value {
    let indents: Vec<Value> = rows
        .iter()
        .map(|(row, indent_no)| {
            json!({
                "rowNumber": row,
                "Indent No.": indent_no,
                "Indentor Name": "Ravi",
                "Product Name": "Bearing 6205"
            })
        })
        .collect();
    json!({"success": true, "indents": indents})
}
