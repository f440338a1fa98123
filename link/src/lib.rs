//! # fms-link: Office FMS Client Library
//!
//! Typed client for the spreadsheet-backed FMS endpoint. Every workflow
//! action (login, indents, approvals, lifting, store-in, tally, payments) is a
//! call against a single script URL that answers with a callback-wrapped JSON
//! payload.
//!
//! ## Features
//!
//! - **Request Bridge**: one-shot callback registration per request, a fixed
//!   deadline, and deterministic teardown (late responses are dropped)
//! - **Typed actions**: one method per remote action with the
//!   `success` / `error` response convention applied
//! - **Multipart uploads**: bill and product photos sent as `multipart/form-data`
//! - **Session storage**: a small key/value [`SessionStore`] trait for the
//!   persisted login record
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fms_link::FmsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmsClient::builder()
//!         .base_url("https://script.example.com/macros/s/deployment/exec")
//!         .timeout(std::time::Duration::from_secs(30))
//!         .build()?;
//!
//!     let user = client.login("alice", "secret").await?;
//!     println!("Welcome, {}!", user.name);
//!
//!     let pending = client.get_pending_approvals().await?;
//!     println!("{} indents waiting for approval", pending.len());
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod bridge;
pub mod client;
pub mod error;
pub mod models;
pub mod storage;
pub mod timeouts;

pub use bridge::{CallbackRegistry, RequestBridge};
pub use client::{FmsClient, FmsClientBuilder};
pub use error::{FmsLinkError, Result};
pub use models::{
    ApiEnvelope, ApprovalDecision, Attachment, IndentForm, IndentReceipt, LiftingForm, MasterData,
    PageId, StoreInForm, TallyForm, TallyStatus, User, WorkflowRecord,
};
pub use storage::{MemorySessionStore, SessionStore, SESSION_KEY};
pub use timeouts::FmsLinkTimeouts;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
