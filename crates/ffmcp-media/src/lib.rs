//! FFmpeg CLI wrapper behind the ffmcp tool surface.
//!
//! This crate provides:
//! - Scratch and output directory management
//! - Media reference resolution (local paths and streamed downloads)
//! - Shell-free FFmpeg command building and execution
//! - ffprobe normalization
//! - The tool operations and artifact retrieval

#![deny(unreachable_patterns)]

pub mod command;
pub mod dirs;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod resolve;
pub mod resource;
pub mod tools;

pub use command::{check_ffmpeg, check_ffprobe, CommandRunner, FfmpegCommand, ProcessRunner};
pub use dirs::{ensure_parent_exists, MediaDirs};
pub use error::{MediaError, MediaResult};
pub use probe::{format_time, get_video_duration, parse_frame_rate, parse_probe_output};
pub use resolve::{check_file_exists, is_url, PathResolver, ResolvedMedia};
pub use resource::{ResourceExposer, RESOURCE_URI_PREFIX, RESOURCE_URI_TEMPLATE};
pub use tools::{ToolDescriptor, ToolExecutor, ToolName};
