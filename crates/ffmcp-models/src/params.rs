//! Tool parameter types.
//!
//! Parameter names and defaults form the tool contract exposed to callers;
//! the JSON schemas advertised in tool discovery are generated from these
//! structs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default audio container for extraction.
pub const DEFAULT_AUDIO_FORMAT: &str = "mp3";

/// Default thumbnail timestamp.
pub const DEFAULT_TIME_POSITION: &str = "00:00:05";

/// Default watermark region, tuned for one known watermark placement.
pub const DEFAULT_WATERMARK_X: i64 = 590;
pub const DEFAULT_WATERMARK_Y: i64 = 1200;
pub const DEFAULT_WATERMARK_WIDTH: i64 = 100;
pub const DEFAULT_WATERMARK_HEIGHT: i64 = 40;

/// Default transition duration for concatenation (accepted, unused).
pub const DEFAULT_TRANSITION_DURATION: f64 = 0.5;

fn default_audio_format() -> String {
    DEFAULT_AUDIO_FORMAT.to_string()
}

fn default_time_position() -> String {
    DEFAULT_TIME_POSITION.to_string()
}

fn default_x() -> i64 {
    DEFAULT_WATERMARK_X
}

fn default_y() -> i64 {
    DEFAULT_WATERMARK_Y
}

fn default_width() -> i64 {
    DEFAULT_WATERMARK_WIDTH
}

fn default_height() -> i64 {
    DEFAULT_WATERMARK_HEIGHT
}

fn default_transition_duration() -> f64 {
    DEFAULT_TRANSITION_DURATION
}

/// `ffmpeg_version` takes no parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct VersionParams {}

/// Parameters for `ffmpeg_convert_video`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConvertVideoParams {
    /// Input video file path or URL
    pub input_path: String,
    /// Output file path. When omitted or empty, a unique file is created in the output area.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Output container format (mp4, avi, mkv, ...). Inferred from the output extension when omitted.
    #[serde(default)]
    pub format: Option<String>,
}

/// Parameters for `ffmpeg_extract_audio`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractAudioParams {
    /// Video file path or URL
    pub video_path: String,
    /// Audio format; `aac` copies the source stream, anything else is encoded with libmp3lame
    #[serde(default = "default_audio_format")]
    pub audio_format: String,
}

/// Parameters for `ffmpeg_create_thumbnail`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateThumbnailParams {
    /// Video file path or URL
    pub video_path: String,
    /// Timestamp in HH:MM:SS form, passed to ffmpeg as-is
    #[serde(default = "default_time_position")]
    pub time_position: String,
}

/// Parameters for `ffmpeg_remove_watermark`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveWatermarkParams {
    /// Video file path or URL
    pub video_path: String,
    /// Left edge of the watermark region
    #[serde(default = "default_x")]
    pub x: i64,
    /// Top edge of the watermark region
    #[serde(default = "default_y")]
    pub y: i64,
    /// Width of the watermark region
    #[serde(default = "default_width")]
    pub width: i64,
    /// Height of the watermark region
    #[serde(default = "default_height")]
    pub height: i64,
    /// Directory for the result. Defaults to the output area.
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// Parameters for `ffmpeg_get_video_info`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetVideoInfoParams {
    /// Video file path or URL
    pub video_path: String,
}

/// Parameters for `ffmpeg_concat_videos`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConcatVideosParams {
    /// Two or more video file paths or URLs, in playback order
    pub video_paths: Vec<String>,
    /// Output file path. When omitted or empty, a unique file is created in the output area.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Transition duration in seconds (accepted for compatibility, not applied)
    #[serde(default = "default_transition_duration")]
    pub transition_duration: f64,
}
