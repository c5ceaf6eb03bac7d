//! Watermark removal with the delogo filter.

use std::path::PathBuf;

use ffmcp_models::{RemoveWatermarkParams, ToolResult};

use super::{failure, requested_path, ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::dirs::{artifact_name, ensure_parent_exists};

const TOOL: ToolName = ToolName::RemoveWatermark;

/// `delogo` filter covering the given rectangle.
pub(crate) fn delogo_filter(x: i64, y: i64, width: i64, height: i64) -> String {
    format!("delogo=x={}:y={}:w={}:h={}:show=0", x, y, width, height)
}

impl ToolExecutor {
    /// Interpolate over a rectangular region, copying audio unchanged.
    ///
    /// The result keeps the source extension and goes to `output_dir` when
    /// given, otherwise to the output area.
    pub async fn remove_watermark(&self, params: RemoveWatermarkParams) -> ToolResult {
        let input = match self.resolve(&params.video_path).await {
            Ok(input) => input,
            Err(e) => return failure(TOOL, e),
        };

        let output: PathBuf = match requested_path(params.output_dir.as_deref()) {
            Some(dir) => dir.join(artifact_name(&input.path, "nowatermark", None)),
            None => match self.dirs.artifact_path(&input.path, "nowatermark", None).await {
                Ok(path) => path,
                Err(e) => return failure(TOOL, e),
            },
        };
        if let Err(e) = ensure_parent_exists(&output).await {
            return failure(TOOL, e);
        }

        let command = FfmpegCommand::ffmpeg()
            .input(&input.path)
            .video_filter(delogo_filter(params.x, params.y, params.width, params.height))
            .audio_codec("copy")
            .overwrite()
            .path(&output);

        let outcome = self
            .run(TOOL, command, &output)
            .await
            .with_message(format!("Watermark removed: {}", output.display()));
        if !outcome.is_success() {
            return outcome.into();
        }

        let mut result = ToolResult::from(outcome).with_source(input.source);
        if let Some(name) = self.publish(&output).await {
            result = result.with_resource_name(name);
        }
        result
    }
}
