//! Single-frame thumbnail extraction.

use ffmcp_models::{CreateThumbnailParams, ToolResult};

use super::{failure, ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::dirs::ensure_parent_exists;

const TOOL: ToolName = ToolName::CreateThumbnail;

impl ToolExecutor {
    /// Grab one frame at `time_position` as a JPEG.
    ///
    /// The timestamp is handed to ffmpeg as-is; a malformed one surfaces as
    /// an engine failure.
    pub async fn create_thumbnail(&self, params: CreateThumbnailParams) -> ToolResult {
        let input = match self.resolve(&params.video_path).await {
            Ok(input) => input,
            Err(e) => return failure(TOOL, e),
        };

        let output = match self
            .dirs
            .artifact_path(&input.path, "thumbnail", Some("jpg"))
            .await
        {
            Ok(path) => path,
            Err(e) => return failure(TOOL, e),
        };
        if let Err(e) = ensure_parent_exists(&output).await {
            return failure(TOOL, e);
        }

        let command = FfmpegCommand::ffmpeg()
            .input(&input.path)
            .seek(params.time_position)
            .single_frame()
            .overwrite()
            .path(&output);

        let outcome = self
            .run(TOOL, command, &output)
            .await
            .with_message(format!("Thumbnail created: {}", output.display()));

        ToolResult::from(outcome).with_source(input.source)
    }
}

#[cfg(test)]
mod tests {
    use ffmcp_models::CreateThumbnailParams;

    use crate::tools::testing::{Harness, RecordingRunner};

    #[tokio::test]
    async fn test_thumbnail_argv_and_name() {
        let harness = Harness::new();
        let input = harness.input("holiday.mov");

        let result = harness
            .executor
            .create_thumbnail(CreateThumbnailParams {
                video_path: input.clone(),
                time_position: "00:01:30".to_string(),
            })
            .await;

        assert!(result.success);
        let output = result.output_path.unwrap();
        assert!(output.contains("holiday_thumbnail_"));
        assert!(output.ends_with(".jpg"));
        assert!(std::path::Path::new(&output).starts_with(harness.public()));
        assert_eq!(
            harness.runner.ffmpeg_calls(),
            vec![vec![
                "ffmpeg",
                "-i",
                input.as_str(),
                "-ss",
                "00:01:30",
                "-vframes",
                "1",
                "-y",
                output.as_str()
            ]]
        );
    }

    #[tokio::test]
    async fn test_timestamp_is_not_validated() {
        let harness = Harness::with_runner(RecordingRunner::failing("Invalid duration specification"));
        let input = harness.input("holiday.mov");

        let result = harness
            .executor
            .create_thumbnail(CreateThumbnailParams {
                video_path: input,
                time_position: "five seconds".to_string(),
            })
            .await;

        assert!(!result.success);
        assert_eq!(harness.runner.ffmpeg_calls()[0][4], "five seconds");
        assert!(result
            .error
            .unwrap()
            .starts_with("Thumbnail extraction failed: ffmpeg command failed"));
    }
}
