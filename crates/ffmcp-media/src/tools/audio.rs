//! Audio extraction.

use ffmcp_models::params::DEFAULT_AUDIO_FORMAT;
use ffmcp_models::{ExtractAudioParams, ToolResult};

use super::{extension_token, failure, ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::dirs::ensure_parent_exists;

const TOOL: ToolName = ToolName::ExtractAudio;

/// Codec for an audio container: AAC is stream-copied, everything else is
/// encoded as MP3.
pub(crate) fn audio_codec_for(format: &str) -> &'static str {
    if format == "aac" {
        "copy"
    } else {
        "libmp3lame"
    }
}

impl ToolExecutor {
    /// Strip the video stream and write the audio into the output area.
    pub async fn extract_audio(&self, params: ExtractAudioParams) -> ToolResult {
        let format = match params.audio_format.trim() {
            "" => DEFAULT_AUDIO_FORMAT,
            format => format,
        };
        let format = match extension_token(format) {
            Ok(format) => format,
            Err(e) => return failure(TOOL, e),
        };

        let input = match self.resolve(&params.video_path).await {
            Ok(input) => input,
            Err(e) => return failure(TOOL, e),
        };

        let output = match self.dirs.artifact_path(&input.path, "audio", Some(format)).await {
            Ok(path) => path,
            Err(e) => return failure(TOOL, e),
        };
        if let Err(e) = ensure_parent_exists(&output).await {
            return failure(TOOL, e);
        }

        let command = FfmpegCommand::ffmpeg()
            .input(&input.path)
            .no_video()
            .arg("-acodec")
            .arg(audio_codec_for(format))
            .overwrite()
            .path(&output);

        let outcome = self
            .run(TOOL, command, &output)
            .await
            .with_message(format!("Audio extracted: {}", output.display()));

        ToolResult::from(outcome).with_source(input.source)
    }
}

#[cfg(test)]
mod tests {
    use ffmcp_models::{ExtractAudioParams, FailureKind, MediaSource};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tools::testing::Harness;

    #[test]
    fn test_codec_choice() {
        assert_eq!(audio_codec_for("aac"), "copy");
        assert_eq!(audio_codec_for("mp3"), "libmp3lame");
        assert_eq!(audio_codec_for("wav"), "libmp3lame");
    }

    #[tokio::test]
    async fn test_default_mp3_argv() {
        let harness = Harness::new();
        let input = harness.input("talk.mp4");

        let result = harness
            .executor
            .extract_audio(ExtractAudioParams {
                video_path: input.clone(),
                audio_format: "mp3".to_string(),
            })
            .await;

        assert!(result.success);
        assert_eq!(result.source, Some(MediaSource::Local));
        let output = result.output_path.unwrap();
        assert!(output.contains("talk_audio_") && output.ends_with(".mp3"));
        assert_eq!(
            harness.runner.ffmpeg_calls(),
            vec![vec![
                "ffmpeg",
                "-i",
                input.as_str(),
                "-vn",
                "-acodec",
                "libmp3lame",
                "-y",
                output.as_str()
            ]]
        );
    }

    #[tokio::test]
    async fn test_aac_is_copied() {
        let harness = Harness::new();
        let input = harness.input("talk.mp4");

        let result = harness
            .executor
            .extract_audio(ExtractAudioParams {
                video_path: input,
                audio_format: "aac".to_string(),
            })
            .await;

        assert!(result.output_path.unwrap().ends_with(".aac"));
        assert_eq!(harness.runner.ffmpeg_calls()[0][5], "copy");
    }

    #[tokio::test]
    async fn test_format_with_path_parts_is_rejected() {
        let harness = Harness::new();
        let input = harness.input("talk.mp4");

        for format in ["mp3/../../escaped.mp3", "../mp3", ".mp3", "a\\b", "m p3"] {
            let result = harness
                .executor
                .extract_audio(ExtractAudioParams {
                    video_path: input.clone(),
                    audio_format: format.to_string(),
                })
                .await;

            assert!(!result.success, "accepted {:?}", format);
            assert_eq!(result.error_kind, Some(FailureKind::Validation));
        }

        assert!(harness.runner.calls().is_empty());
        assert!(!harness.root.path().join("escaped.mp3").exists());
    }

    #[tokio::test]
    async fn test_remote_source_is_echoed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"remote".to_vec()))
            .mount(&server)
            .await;

        let harness = Harness::new();
        let result = harness
            .executor
            .extract_audio(ExtractAudioParams {
                video_path: format!("{}/talk.mp4", server.uri()),
                audio_format: "mp3".to_string(),
            })
            .await;

        assert!(result.success);
        assert_eq!(result.source, Some(MediaSource::Remote));
        let input = &harness.runner.ffmpeg_calls()[0][2];
        assert!(input.contains("/temp/video_"));
    }

    #[tokio::test]
    async fn test_failed_download_never_runs_engine() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let harness = Harness::new();
        let result = harness
            .executor
            .extract_audio(ExtractAudioParams {
                video_path: format!("{}/talk.mp4", server.uri()),
                audio_format: "mp3".to_string(),
            })
            .await;

        assert!(!result.success);
        assert_eq!(result.error_kind, Some(FailureKind::Resolution));
        assert!(result.error.unwrap().starts_with("Audio extraction failed: "));
        assert!(harness.runner.calls().is_empty());
    }
}
