//! Resource retrieval descriptors.

use serde::{Deserialize, Serialize};

/// Result of looking up an artifact in the output area.
///
/// Every lookup yields one of these; missing files, unknown types and read
/// errors are descriptors, not faults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceResult {
    /// No name given: describes the output area itself.
    Directory { path: String },
    /// Encoded artifact content.
    Content {
        name: String,
        mime_type: String,
        /// Base64-encoded file bytes
        blob: String,
    },
    NotFound { name: String, error: String },
    UnsupportedType { name: String, error: String },
    Error { name: String, error: String },
}

impl ResourceResult {
    pub fn not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        let error = format!("Resource not found: {}", name);
        Self::NotFound { name, error }
    }

    pub fn unsupported_type(name: impl Into<String>) -> Self {
        let name = name.into();
        let error = format!("Unsupported resource type: {}", name);
        Self::UnsupportedType { name, error }
    }

    pub fn error(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            name: name.into(),
            error: error.into(),
        }
    }
}

/// One artifact listed from the output area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}
