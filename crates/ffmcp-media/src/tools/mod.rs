//! Tool operations.
//!
//! Every operation follows the same template: validate, resolve inputs,
//! pick an output location, make sure its directory exists, run the engine
//! and convert the outcome into a [`ToolResult`]. Operations never return
//! errors; failures are results labelled with the operation.

mod audio;
mod concat;
mod convert;
mod info;
mod registry;
mod thumbnail;
mod version;
mod watermark;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use ffmcp_models::{Outcome, ToolResult};

use crate::command::{CommandRunner, FfmpegCommand, ProcessRunner};
use crate::dirs::MediaDirs;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::{copy_to_output, is_in_output_dir};
use crate::probe::{format_time, get_video_duration};
use crate::resolve::{PathResolver, ResolvedMedia};
use crate::resource::mime_type_for;

pub use concat::concat_manifest;
pub use registry::{descriptors, ToolDescriptor, ToolName};

/// Runs tool operations against shared directories and a command runner.
#[derive(Clone)]
pub struct ToolExecutor {
    dirs: Arc<MediaDirs>,
    resolver: PathResolver,
    runner: Arc<dyn CommandRunner>,
}

impl ToolExecutor {
    /// Executor spawning real engine processes.
    pub fn new(dirs: Arc<MediaDirs>) -> MediaResult<Self> {
        let resolver = PathResolver::new(Arc::clone(&dirs))?;
        Ok(Self::with_runner(dirs, resolver, Arc::new(ProcessRunner::new())))
    }

    /// Executor with an injected resolver and runner.
    pub fn with_runner(
        dirs: Arc<MediaDirs>,
        resolver: PathResolver,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            dirs,
            resolver,
            runner,
        }
    }

    /// Invoke a tool by name with JSON arguments.
    ///
    /// Errors only for an unknown tool or arguments that do not match the
    /// tool's parameters; everything past that is reported in the result.
    pub async fn invoke(&self, name: &str, arguments: Value) -> MediaResult<ToolResult> {
        let tool: ToolName = name.parse()?;
        let start = Instant::now();

        let result = match tool {
            ToolName::Version => self.version().await,
            ToolName::ConvertVideo => self.convert_video(parse_arguments(arguments)?).await,
            ToolName::ExtractAudio => self.extract_audio(parse_arguments(arguments)?).await,
            ToolName::CreateThumbnail => self.create_thumbnail(parse_arguments(arguments)?).await,
            ToolName::RemoveWatermark => self.remove_watermark(parse_arguments(arguments)?).await,
            ToolName::GetVideoInfo => self.get_video_info(parse_arguments(arguments)?).await,
            ToolName::ConcatVideos => self.concat_videos(parse_arguments(arguments)?).await,
        };

        let status = if result.success { "success" } else { "failure" };
        let labels = [
            ("tool", tool.as_str().to_string()),
            ("status", status.to_string()),
        ];
        counter!("ffmcp_tool_invocations_total", &labels).increment(1);
        histogram!("ffmcp_tool_duration_seconds", &labels).record(start.elapsed().as_secs_f64());

        info!(
            tool = tool.as_str(),
            success = result.success,
            duration_ms = start.elapsed().as_millis() as u64,
            "Tool invocation finished"
        );
        Ok(result)
    }

    async fn resolve(&self, reference: &str) -> MediaResult<ResolvedMedia> {
        self.resolver.resolve(reference).await
    }

    /// Run an engine command producing `output`.
    ///
    /// Failures come back labelled; successes carry the artifact path.
    async fn run(&self, tool: ToolName, command: FfmpegCommand, output: &Path) -> Outcome {
        self.runner
            .execute(&command)
            .await
            .as_execution_failure()
            .with_output_path(output)
            .prefixed(tool.failure_label())
    }

    /// Make an artifact retrievable through the resource surface.
    ///
    /// Artifacts already in the output area are addressed by file name;
    /// servable artifacts elsewhere are copied in. Returns `None` for
    /// artifacts the resource surface cannot serve or when copying fails.
    async fn publish(&self, output: &Path) -> Option<String> {
        mime_type_for(output)?;

        if is_in_output_dir(&self.dirs, output) {
            return file_name(output);
        }

        match copy_to_output(&self.dirs, output).await {
            Ok(copy) => file_name(&copy),
            Err(e) => {
                warn!(path = %output.display(), error = %e, "Failed to publish artifact to output area");
                None
            }
        }
    }

    /// Attach the artifact's duration when ffprobe can read it.
    async fn with_duration(&self, result: ToolResult, output: &Path) -> ToolResult {
        match get_video_duration(self.runner.as_ref(), output).await {
            Some(seconds) => result.with_duration(seconds, format_time(seconds)),
            None => result,
        }
    }
}

/// Failure result for an error raised before the engine ran.
fn failure(tool: ToolName, err: MediaError) -> ToolResult {
    warn!(tool = tool.as_str(), error = %err, "Tool invocation rejected");
    ToolResult::failure(
        err.failure_kind(),
        format!("{}: {}", tool.failure_label(), err),
    )
}

fn parse_arguments<P: DeserializeOwned>(arguments: Value) -> MediaResult<P> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(arguments)?)
}

/// Caller-supplied container extension; must be a bare token so it can't
/// steer a generated name out of the output area.
fn extension_token(format: &str) -> MediaResult<&str> {
    let valid = !format.is_empty()
        && format
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(format)
    } else {
        Err(MediaError::invalid_arguments(format!(
            "format must be a plain extension such as mp4, got {:?}",
            format
        )))
    }
}

/// Caller-supplied path, ignoring empty strings.
fn requested_path(path: Option<&str>) -> Option<PathBuf> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
