//! Engine version query.

use ffmcp_models::{FailureKind, ToolResult};

use super::{ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::error::MediaError;

impl ToolExecutor {
    /// Report the first line of `ffmpeg -version`.
    pub async fn version(&self) -> ToolResult {
        let outcome = self
            .runner
            .execute(&FfmpegCommand::ffmpeg().arg("-version"))
            .await;

        match outcome.failure_kind() {
            None => {
                let version = outcome
                    .stdout()
                    .and_then(|out| out.lines().next())
                    .unwrap_or_default()
                    .trim()
                    .to_string();
                let mut result = ToolResult::ok("FFmpeg is available");
                result.version = Some(version);
                result
            }
            Some(FailureKind::NotInstalled) => ToolResult::failure(
                FailureKind::NotInstalled,
                MediaError::FfmpegNotFound.to_string(),
            ),
            Some(_) => outcome.prefixed(ToolName::Version.failure_label()).into(),
        }
    }
}
