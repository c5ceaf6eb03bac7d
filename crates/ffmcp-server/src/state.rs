//! Application state.

use std::sync::Arc;

use ffmcp_media::MediaDirs;

use crate::auth::{credential_check, CredentialCheck};
use crate::config::ServerConfig;
use crate::error::ApiResult;
use crate::mcp::McpServer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub mcp: Arc<McpServer>,
    pub credentials: Arc<dyn CredentialCheck>,
}

impl AppState {
    /// Create new application state rooted at the configured work directory.
    pub fn new(config: ServerConfig) -> ApiResult<Self> {
        let dirs = match &config.work_dir {
            Some(root) => MediaDirs::new(root),
            None => MediaDirs::from_current_dir()?,
        };
        let mcp = McpServer::from_dirs(Arc::new(dirs))?;
        Ok(Self::with_server(config, Arc::new(mcp)))
    }

    /// State around an existing MCP server.
    pub fn with_server(config: ServerConfig, mcp: Arc<McpServer>) -> Self {
        let credentials = credential_check(config.api_key.as_deref());
        Self {
            config,
            mcp,
            credentials,
        }
    }
}
