//! Error types for media operations.

use std::path::PathBuf;

use ffmcp_models::FailureKind;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while preparing or running a media operation.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg is not installed or not on PATH")]
    FfmpegNotFound,

    #[error("FFprobe is not installed or not on PATH")]
    FfprobeNotFound,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Download failed: {message}")]
    DownloadFailed { message: String },

    #[error("Download failed: {url} returned HTTP {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Failed to parse ffprobe output: {0}")]
    ProbeParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a download failure error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            message: message.into(),
        }
    }

    /// Create an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Map onto the caller-facing failure taxonomy.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            MediaError::FfmpegNotFound | MediaError::FfprobeNotFound => FailureKind::NotInstalled,
            MediaError::FileNotFound(_)
            | MediaError::DownloadFailed { .. }
            | MediaError::DownloadStatus { .. } => FailureKind::Resolution,
            MediaError::InvalidArguments(_) | MediaError::UnknownTool(_) => FailureKind::Validation,
            MediaError::ProbeParse(_) | MediaError::JsonParse(_) => FailureKind::Parsing,
            MediaError::Io(_) => FailureKind::Execution,
        }
    }
}
