//! MCP transports for the ffmcp tool server.
//!
//! This crate provides:
//! - JSON-RPC dispatch onto the media tools and resources
//! - A local transport over stdin/stdout
//! - A hosted HTTP transport behind a shared-secret gate
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod stdio;

pub use auth::{CredentialCheck, SharedSecret, API_KEY_HEADER};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use mcp::McpServer;
pub use routes::create_router;
pub use state::AppState;
pub use stdio::serve_stdio;
