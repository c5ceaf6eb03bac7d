//! Format conversion.

use ffmcp_models::{ConvertVideoParams, ToolResult};
use tracing::info;

use super::{extension_token, failure, requested_path, ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::dirs::ensure_parent_exists;

const TOOL: ToolName = ToolName::ConvertVideo;

impl ToolExecutor {
    /// Convert a video, inferring the container from the output extension
    /// unless `format` is given.
    pub async fn convert_video(&self, params: ConvertVideoParams) -> ToolResult {
        let format = match params
            .format
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(extension_token)
            .transpose()
        {
            Ok(format) => format,
            Err(e) => return failure(TOOL, e),
        };

        let input = match self.resolve(&params.input_path).await {
            Ok(input) => input,
            Err(e) => return failure(TOOL, e),
        };

        let output = match requested_path(params.output_path.as_deref()) {
            Some(path) => path,
            None => match self.dirs.artifact_path(&input.path, "converted", format).await {
                Ok(path) => path,
                Err(e) => return failure(TOOL, e),
            },
        };
        if let Err(e) = ensure_parent_exists(&output).await {
            return failure(TOOL, e);
        }

        let mut command = FfmpegCommand::ffmpeg().input(&input.path).overwrite();
        if let Some(format) = format {
            command = command.format(format);
        }
        let command = command.path(&output);

        let outcome = self
            .run(TOOL, command, &output)
            .await
            .with_message(format!("Video converted: {}", output.display()));
        if !outcome.is_success() {
            return outcome.into();
        }

        info!(input = %input.path.display(), output = %output.display(), "Video converted");

        let mut result = ToolResult::from(outcome).with_source(input.source);
        if let Some(name) = self.publish(&output).await {
            result = result.with_resource_name(name);
        }
        self.with_duration(result, &output).await
    }
}
