//! SondeHub tools - agent tool service for radiosonde recovery reports
//!
//! This library exposes the SondeHub client, the recovery report formatter
//! and the HTTP tool surface, enabling integration tests and embedding the
//! formatter in other agent hosts.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod report;
pub mod state;
pub mod tools;

// Re-export key types for convenience
pub use client::{FetchError, SondeHubClient};
pub use config::Config;
pub use error::{AppError, Result};
pub use handlers::{call_tool_handler, health_handler, list_tools_handler};
pub use report::{format_api_response, format_recoveries, FormatError, Report};
pub use state::AppState;
pub use tools::{get_recoveries, ToolOutcome};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Tool and health routes, without metrics or middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tools", get(list_tools_handler))
        .route("/tools/call", post(call_tool_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
