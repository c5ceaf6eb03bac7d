//! Access gate for the HTTP transport.
//!
//! Every request must present the configured shared secret in the
//! `X-API-Key` header. The check sits behind [`CredentialCheck`] so other
//! schemes can replace it without touching tool code.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;
use crate::metrics;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Decides whether a presented credential is acceptable.
pub trait CredentialCheck: Send + Sync {
    /// `presented` is the raw header value, `None` when absent.
    fn verify(&self, presented: Option<&str>) -> bool;
}

/// Accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl CredentialCheck for AllowAll {
    fn verify(&self, _presented: Option<&str>) -> bool {
        true
    }
}

/// A single static shared secret, compared exactly.
#[derive(Clone)]
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret").finish_non_exhaustive()
    }
}

impl CredentialCheck for SharedSecret {
    fn verify(&self, presented: Option<&str>) -> bool {
        presented == Some(self.secret.as_str())
    }
}

/// Credential check for an optional secret: gate disabled when `None`.
pub fn credential_check(api_key: Option<&str>) -> Arc<dyn CredentialCheck> {
    match api_key {
        Some(secret) if !secret.is_empty() => Arc::new(SharedSecret::new(secret)),
        _ => Arc::new(AllowAll),
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

/// Reject requests without a valid key before they reach any handler.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.credentials.verify(presented_key(request.headers())) {
        warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
        metrics::record_auth_rejection(request.uri().path());
        return ApiError::unauthorized("Missing or invalid API key").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_secret_exact_match() {
        let check = SharedSecret::new("s3cret");
        assert!(check.verify(Some("s3cret")));
        assert!(!check.verify(Some("S3CRET")));
        assert!(!check.verify(Some("s3cret ")));
        assert!(!check.verify(Some("")));
        assert!(!check.verify(None));
    }

    #[test]
    fn test_empty_secret_disables_gate() {
        assert!(credential_check(None).verify(None));
        assert!(credential_check(Some("")).verify(None));
        assert!(!credential_check(Some("k")).verify(None));
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", SharedSecret::new("s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
