//! Server configuration.

use std::path::PathBuf;

/// Default listen address for the HTTP transport.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default listen port for the HTTP transport.
pub const DEFAULT_PORT: u16 = 9000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Shared secret for the `X-API-Key` header; `None` disables the gate
    pub api_key: Option<String>,
    /// Root of the scratch and output areas; defaults to the working directory
    pub work_dir: Option<PathBuf>,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Max request body size
    pub max_body_size: usize,
    /// Expose Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            work_dir: None,
            cors_origins: vec!["*".to_string()],
            max_body_size: 10 * 1024 * 1024, // 10MB
            metrics_enabled: true,
        }
    }
}

impl ServerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("FFMCP_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: std::env::var("FFMCP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            api_key: normalize_secret(std::env::var("FFMCP_API_KEY").ok()),
            work_dir: std::env::var("FFMCP_WORK_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    /// Override the shared secret. Empty strings disable the gate.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = normalize_secret(api_key);
        self
    }

    /// Whether the access gate is active.
    pub fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_secret(secret: Option<String>) -> Option<String> {
    secret.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert!(!config.auth_enabled());
    }

    #[test]
    fn test_empty_secret_disables_gate() {
        let config = ServerConfig::default().with_api_key(Some(String::new()));
        assert!(!config.auth_enabled());

        let config = ServerConfig::default().with_api_key(Some("s3cret".into()));
        assert!(config.auth_enabled());
    }
}
