//! Normalized invocation outcomes and caller-facing tool results.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::video::VideoInfo;

/// Category of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Caller-supplied arguments violate a precondition.
    Validation,
    /// A remote fetch failed or a local reference does not exist.
    Resolution,
    /// The external engine exited non-zero or could not be run.
    Execution,
    /// The external engine is not installed or not on the search path.
    NotInstalled,
    /// Engine output could not be parsed.
    Parsing,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::Resolution => "resolution",
            FailureKind::Execution => "execution",
            FailureKind::NotInstalled => "not_installed",
            FailureKind::Parsing => "parsing",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a media reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    /// A path on the local filesystem.
    Local,
    /// An HTTP(S) URL downloaded into the scratch area.
    Remote,
}

/// Normalized result of running an external command.
///
/// Success is decided solely by the exit status; an exit code of zero with
/// empty output is still a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        message: String,
        stdout: String,
        stderr: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output_path: Option<PathBuf>,
    },
    Failure {
        kind: FailureKind,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stdout: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stderr: Option<String>,
    },
}

impl Outcome {
    /// Successful run with captured output streams.
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Success {
            message: "Command completed successfully".to_string(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            output_path: None,
        }
    }

    /// Failure without captured output (validation, resolution, spawn errors).
    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            error: error.into(),
            stdout: None,
            stderr: None,
        }
    }

    /// Non-zero exit of `program`: the message embeds the captured standard error.
    pub fn exit_failure(
        program: &str,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        let stderr = stderr.into();
        Self::Failure {
            kind: FailureKind::Execution,
            error: format!("{} command failed: {}", program, stderr.trim_end()),
            stdout: Some(stdout.into()),
            stderr: Some(stderr),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Captured standard output, if any.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Outcome::Success { stdout, .. } => Some(stdout),
            Outcome::Failure { stdout, .. } => stdout.as_deref(),
        }
    }

    /// Captured standard error, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Outcome::Success { stderr, .. } => Some(stderr),
            Outcome::Failure { stderr, .. } => stderr.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            Outcome::Success { output_path, .. } => output_path.as_deref(),
            Outcome::Failure { .. } => None,
        }
    }

    /// Attach the produced artifact. No-op on failures.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        if let Outcome::Success { output_path, .. } = &mut self {
            *output_path = Some(path.into());
        }
        self
    }

    /// Replace the human-readable message. No-op on failures.
    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        if let Outcome::Success { message, .. } = &mut self {
            *message = text.into();
        }
        self
    }

    /// Report a missing executable as a plain execution failure.
    ///
    /// Only the version query surfaces "not installed" as its own kind.
    pub fn as_execution_failure(mut self) -> Self {
        if let Outcome::Failure { kind, .. } = &mut self {
            if *kind == FailureKind::NotInstalled {
                *kind = FailureKind::Execution;
            }
        }
        self
    }

    /// Prefix a failure message with an operation label. No-op on success.
    pub fn prefixed(mut self, label: &str) -> Self {
        if let Outcome::Failure { error, .. } = &mut self {
            *error = format!("{}: {}", label, error);
        }
        self
    }
}

/// Caller-facing result of a tool invocation.
///
/// Always carries `success`; successful results carry `message` and usually
/// `output_path`, failed results carry `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    /// Whether the input was a local file or a downloaded URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MediaSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<VideoInfo>,
    /// Name under which the artifact can be fetched from the output area.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_formatted: Option<String>,
}

impl ToolResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            error_kind: Some(kind),
            ..Default::default()
        }
    }

    /// Convert an outcome verbatim: message and artifact on success, error
    /// and diagnostics on failure.
    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success {
                message,
                output_path,
                ..
            } => Self {
                success: true,
                message: Some(message),
                output_path: output_path.map(|p| p.to_string_lossy().into_owned()),
                ..Default::default()
            },
            Outcome::Failure {
                kind,
                error,
                stdout,
                stderr,
            } => Self {
                success: false,
                error: Some(error),
                error_kind: Some(kind),
                stdout,
                stderr,
                ..Default::default()
            },
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output_path = Some(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn with_source(mut self, source: MediaSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    pub fn with_duration(mut self, seconds: f64, formatted: impl Into<String>) -> Self {
        self.duration = Some(seconds);
        self.duration_formatted = Some(formatted.into());
        self
    }
}

impl From<Outcome> for ToolResult {
    fn from(outcome: Outcome) -> Self {
        Self::from_outcome(outcome)
    }
}
