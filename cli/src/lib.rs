//! Library entry point for fms-cli components.
//!
//! Exposes the shell pieces (session gate, router, pages, formatter, config)
//! so integration tests can drive them without going through the binary.

pub mod completer;
pub mod config;
pub mod error;
pub mod formatter;
pub mod gate;
pub mod history;
pub mod pages;
pub mod parser;
pub mod router;
pub mod session;
pub mod sidebar;
pub mod storage;

pub use config::CLIConfiguration;
pub use error::{CLIError, Result};
pub use formatter::{OutputFormat, OutputFormatter};
pub use gate::{GateView, SessionGate};
pub use router::{AuthorizationRouter, RouteView};
pub use session::CLISession;
pub use storage::FileSessionStore;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
