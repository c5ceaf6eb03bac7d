//! HTTP handlers.

pub mod health;
pub mod mcp;

pub use health::health;
pub use mcp::mcp_endpoint;
