//! FFmpeg command builder and runner.
//!
//! Commands are argument vectors handed to the OS as discrete tokens; no
//! shell is involved, so paths and filter strings are never re-interpreted.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use tokio::process::Command;
use tracing::{debug, warn};

use ffmcp_models::{FailureKind, Outcome};

use crate::error::{MediaError, MediaResult};

/// Media processing executable.
pub const FFMPEG: &str = "ffmpeg";

/// Companion probing executable.
pub const FFPROBE: &str = "ffprobe";

/// Builder for an engine invocation.
///
/// Arguments are kept in insertion order; ffmpeg is position-sensitive
/// (options before `-i` apply to the input, options after it to the output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegCommand {
    program: String,
    args: Vec<String>,
}

impl FfmpegCommand {
    /// Command for an arbitrary program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// `ffmpeg` command.
    pub fn ffmpeg() -> Self {
        Self::new(FFMPEG)
    }

    /// `ffprobe` command.
    pub fn ffprobe() -> Self {
        Self::new(FFPROBE)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Add one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn push_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a path argument.
    pub fn path(self, path: impl AsRef<Path>) -> Self {
        self.arg(path.as_ref().to_string_lossy().into_owned())
    }

    /// Input file (`-i <path>`).
    pub fn input(self, path: impl AsRef<Path>) -> Self {
        self.arg("-i").path(path)
    }

    /// Overwrite output without asking.
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Force container format.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.arg("-f").arg(format)
    }

    /// Seek to a timestamp, passed through verbatim.
    pub fn seek(self, position: impl Into<String>) -> Self {
        self.arg("-ss").arg(position)
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.arg("-vf").arg(filter)
    }

    /// Drop the video stream.
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.arg("-c:v").arg(codec)
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.arg("-c:a").arg(codec)
    }

    /// Set preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.arg("-preset").arg(preset)
    }

    /// Extract single frame.
    pub fn single_frame(self) -> Self {
        self.arg("-vframes").arg("1")
    }

    /// Full argument vector including the program name.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Runs engine commands.
///
/// Implementations never fail: every problem, including a missing
/// executable, is reported through the returned [`Outcome`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn execute(&self, command: &FfmpegCommand) -> Outcome;
}

/// Runs commands as child processes.
///
/// The child is awaited on the calling task, so concurrent invocations
/// never block each other. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn execute(&self, command: &FfmpegCommand) -> Outcome {
        debug!("Running: {}", command.argv().join(" "));
        let start = Instant::now();

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                warn!(program = command.program(), error = %e, "Failed to run command");
                let kind = if e.kind() == std::io::ErrorKind::NotFound {
                    FailureKind::NotInstalled
                } else {
                    FailureKind::Execution
                };
                return Outcome::failure(
                    kind,
                    format!("Exception while running {}: {}", command.program(), e),
                );
            }
        };

        let elapsed = start.elapsed().as_secs_f64();
        let labels = [("program", command.program().to_string())];
        histogram!("ffmcp_engine_duration_seconds", &labels).record(elapsed);

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Outcome::success(stdout, stderr)
        } else {
            debug!(
                program = command.program(),
                code = ?output.status.code(),
                "Command exited with non-zero status"
            );
            Outcome::exit_failure(command.program(), stdout, stderr)
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which(FFMPEG).map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which(FFPROBE).map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_keeps_order() {
        let cmd = FfmpegCommand::ffmpeg()
            .input("in.mp4")
            .seek("00:00:05")
            .single_frame()
            .overwrite()
            .path("out.jpg");

        assert_eq!(
            cmd.argv(),
            vec!["ffmpeg", "-i", "in.mp4", "-ss", "00:00:05", "-vframes", "1", "-y", "out.jpg"]
        );
    }

    #[test]
    fn test_paths_with_spaces_stay_single_tokens() {
        let cmd = FfmpegCommand::ffmpeg().input("my clip; rm -rf.mp4");
        assert_eq!(cmd.args(), &["-i".to_string(), "my clip; rm -rf.mp4".to_string()]);
    }

    #[tokio::test]
    async fn test_execute_success_captures_stdout() {
        let outcome = ProcessRunner
            .execute(&FfmpegCommand::new("echo").arg("hello"))
            .await;

        assert!(outcome.is_success());
        assert!(outcome.stdout().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn test_execute_nonzero_exit_is_failure() {
        let outcome = ProcessRunner
            .execute(&FfmpegCommand::new("sh").arg("-c").arg("echo broken >&2; exit 3"))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Execution));
        assert!(outcome.error().unwrap().contains("broken"));
        assert_eq!(outcome.stderr(), Some("broken\n"));
    }

    #[tokio::test]
    async fn test_execute_missing_program_is_not_installed() {
        let outcome = ProcessRunner
            .execute(&FfmpegCommand::new("nonexistent_tool_xyz_12345"))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::NotInstalled));
        assert!(outcome.error().unwrap().contains("nonexistent_tool_xyz_12345"));
    }

    #[tokio::test]
    async fn test_real_ffmpeg_version() {
        if check_ffmpeg().is_err() {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }

        let outcome = ProcessRunner
            .execute(&FfmpegCommand::ffmpeg().arg("-version"))
            .await;

        assert!(outcome.is_success());
        assert!(outcome.stdout().unwrap().starts_with("ffmpeg version"));
    }
}
