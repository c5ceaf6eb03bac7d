//! Concatenation through the concat demuxer.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use ffmcp_models::{derived_file_name, ConcatVideosParams, FailureKind, ToolResult};

use super::{failure, requested_path, ToolExecutor, ToolName};
use crate::command::FfmpegCommand;
use crate::dirs::ensure_parent_exists;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::remove_file_best_effort;

const TOOL: ToolName = ToolName::ConcatVideos;

/// Concat demuxer manifest: one `file '<path>'` line per input.
///
/// Single quotes inside paths are closed, escaped and reopened as the
/// demuxer expects.
pub fn concat_manifest<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref().to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", path)
        })
        .collect()
}

impl ToolExecutor {
    /// Join two or more videos into one MP4, re-encoding with libx264/aac.
    ///
    /// `transition_duration` is accepted and ignored.
    pub async fn concat_videos(&self, params: ConcatVideosParams) -> ToolResult {
        if params.video_paths.len() < 2 {
            return ToolResult::failure(
                FailureKind::Validation,
                format!(
                    "{}: At least two videos are required for concatenation",
                    TOOL.failure_label()
                ),
            );
        }

        let mut inputs = Vec::with_capacity(params.video_paths.len());
        for reference in &params.video_paths {
            match self.resolve(reference).await {
                Ok(input) => inputs.push(input.path),
                Err(e) => return failure(TOOL, e),
            }
        }

        let output = match requested_path(params.output_path.as_deref()) {
            Some(path) => path,
            None => match self.dirs.output_dir().await {
                Ok(dir) => dir.join(derived_file_name("concat", None, Some("mp4"))),
                Err(e) => return failure(TOOL, e),
            },
        };
        if let Err(e) = ensure_parent_exists(&output).await {
            return failure(TOOL, e);
        }

        let manifest = match write_manifest(&inputs).await {
            Ok(path) => path,
            Err(e) => return failure(TOOL, e),
        };

        let command = FfmpegCommand::ffmpeg()
            .format("concat")
            .push_args(["-safe", "0"])
            .input(&manifest)
            .video_codec("libx264")
            .preset("medium")
            .audio_codec("aac")
            .overwrite()
            .path(&output);

        let outcome = self.run(TOOL, command, &output).await;
        remove_file_best_effort(&manifest).await;

        let outcome = outcome.with_message(format!("Videos concatenated: {}", output.display()));
        if !outcome.is_success() {
            return outcome.into();
        }

        info!(inputs = inputs.len(), output = %output.display(), "Videos concatenated");

        let mut result = ToolResult::from(outcome);
        if let Some(name) = self.publish(&output).await {
            result = result.with_resource_name(name);
        }
        self.with_duration(result, &output).await
    }
}

/// Write the manifest to a throwaway file and return its path.
///
/// The caller owns deletion.
async fn write_manifest(inputs: &[PathBuf]) -> MediaResult<PathBuf> {
    let mut absolute = Vec::with_capacity(inputs.len());
    for input in inputs {
        absolute.push(fs::canonicalize(input).await?);
    }

    let file = tempfile::Builder::new()
        .prefix("ffmcp_concat_")
        .suffix(".txt")
        .tempfile()?;
    let (_, path) = file.keep().map_err(|e| MediaError::Io(e.error))?;

    if let Err(e) = fs::write(&path, concat_manifest(&absolute)).await {
        remove_file_best_effort(&path).await;
        return Err(e.into());
    }
    Ok(path)
}
