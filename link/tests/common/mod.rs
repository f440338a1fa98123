#![allow(dead_code)]
//! Local stand-in for the FMS script endpoint.
//!
//! Answers `GET /exec?action=..&callback=..` with a scripted reply per action
//! and accepts multipart `POST /exec` uploads. Every request is recorded.

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use fms_link::{FmsClient, FmsLinkTimeouts};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the endpoint answers one action.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `callback(payload)`
    Script(Value),
    /// `/**/callback(payload);`
    Commented(Value),
    /// Bare JSON without a callback wrapper.
    Bare(Value),
    /// Invocation addressed to a callback nobody registered.
    WrongCallback(Value),
    /// Scripted reply sent after a delay.
    Delayed(Duration, Value),
    /// Plain body, used for upload acknowledgements.
    Raw(String),
    /// Empty body with the given HTTP status.
    Status(u16),
    /// Never answers.
    Hang,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub params: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct MockState {
    replies: Mutex<HashMap<String, MockReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
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

    pub fn reply(&self, action: &str, reply: MockReply) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .insert(action.to_string(), reply);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, action: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.param("action") == Some(action))
            .collect()
    }

    pub fn client(&self) -> FmsClient {
        self.client_with_deadline(Duration::from_secs(5))
    }

    pub fn client_with_deadline(&self, deadline: Duration) -> FmsClient {
        FmsClient::builder()
            .base_url(self.url())
            .timeouts(
                FmsLinkTimeouts::builder()
                    .connection_timeout(Duration::from_secs(2))
                    .request_timeout(deadline)
                    .build(),
            )
            .build()
            .expect("client")
    }
}

fn reply_for(state: &MockState, action: &str) -> MockReply {
    state
        .replies
        .lock()
        .unwrap()
        .get(action)
        .cloned()
        .unwrap_or_else(|| {
            MockReply::Script(serde_json::json!({"success": false, "error": "Unknown action"}))
        })
}

async fn handle_script(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let action = params.get("action").cloned().unwrap_or_default();
    let callback = params.get("callback").cloned().unwrap_or_default();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: "GET",
        params,
        file: None,
    });

    match reply_for(&state, &action) {
        MockReply::Script(payload) => format!("{}({})", callback, payload).into_response(),
        MockReply::Commented(payload) => format!("/**/ {}({});", callback, payload).into_response(),
        MockReply::Bare(payload) => payload.to_string().into_response(),
        MockReply::WrongCallback(payload) => {
            format!("jsonp_callback_0_someoneelse({})", payload).into_response()
        }
        MockReply::Delayed(delay, payload) => {
            tokio::time::sleep(delay).await;
            format!("{}({})", callback, payload).into_response()
        }
        MockReply::Raw(body) => body.into_response(),
        MockReply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        MockReply::Hang => {
            std::future::pending::<()>().await;
            StatusCode::OK.into_response()
        }
    }
}

async fn handle_upload(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    let mut params = HashMap::new();
    let mut file = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.unwrap_or_default();
                file = Some(UploadedFile {
                    field: name,
                    file_name,
                    content_type,
                    size: bytes.len(),
                });
            }
            None => {
                let value = field.text().await.unwrap_or_default();
                params.insert(name, value);
            }
        }
    }

    let action = params.get("action").cloned().unwrap_or_default();
    state.requests.lock().unwrap().push(RecordedRequest {
        method: "POST",
        params,
        file,
    });

    match reply_for(&state, &action) {
        MockReply::Script(payload)
        | MockReply::Commented(payload)
        | MockReply::Bare(payload)
        | MockReply::WrongCallback(payload) => payload.to_string().into_response(),
        MockReply::Delayed(delay, payload) => {
            tokio::time::sleep(delay).await;
            payload.to_string().into_response()
        }
        MockReply::Raw(body) => body.into_response(),
        MockReply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        MockReply::Hang => {
            std::future::pending::<()>().await;
            StatusCode::OK.into_response()
        }
    }
}
