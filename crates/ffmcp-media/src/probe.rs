//! FFprobe output normalization.
//!
//! ffprobe reports most numbers as strings and omits fields freely, so the
//! JSON is read leniently: missing strings become `"unknown"`, missing or
//! unparseable numbers become zero. Only output that is not JSON at all is
//! an error.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use ffmcp_models::video::UNKNOWN;
use ffmcp_models::{
    AudioStreamDetails, Outcome, StreamDetails, StreamInfo, VideoInfo, VideoStreamDetails,
};

use crate::command::{CommandRunner, FfmpegCommand};
use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output format.
#[derive(Debug, Default, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<Value>,
    #[serde(default)]
    streams: Vec<Value>,
}

/// ffprobe invocation listing container and streams as JSON.
pub fn probe_command(path: impl AsRef<Path>) -> FfmpegCommand {
    FfmpegCommand::ffprobe()
        .push_args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .path(path)
}

/// Parse ffprobe JSON into the normalized shape.
pub fn parse_probe_output(filename: &str, json: &str) -> MediaResult<VideoInfo> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| MediaError::ProbeParse(e.to_string()))?;

    let format = probe.format.unwrap_or(Value::Null);

    let streams = probe.streams.iter().map(normalize_stream).collect();

    Ok(VideoInfo {
        filename: filename.to_string(),
        format: string_field(&format, "format_name"),
        duration: float_field(&format, "duration"),
        size: int_field(&format, "size"),
        bit_rate: int_field(&format, "bit_rate"),
        streams,
    })
}

fn normalize_stream(stream: &Value) -> StreamInfo {
    let kind = string_field(stream, "codec_type");

    let details = match kind.as_str() {
        "video" => Some(StreamDetails::Video(VideoStreamDetails {
            width: int_field(stream, "width"),
            height: int_field(stream, "height"),
            fps: stream
                .get("r_frame_rate")
                .and_then(Value::as_str)
                .map(parse_frame_rate)
                .unwrap_or(0.0),
            bit_depth: string_field(stream, "bits_per_raw_sample"),
            pix_fmt: string_field(stream, "pix_fmt"),
        })),
        "audio" => Some(StreamDetails::Audio(AudioStreamDetails {
            sample_rate: string_field(stream, "sample_rate"),
            channels: int_field(stream, "channels"),
            channel_layout: string_field(stream, "channel_layout"),
        })),
        _ => None,
    };

    StreamInfo {
        codec: string_field(stream, "codec_name"),
        codec_long_name: string_field(stream, "codec_long_name"),
        kind,
        details,
    }
}

/// String field, stringifying numbers; `"unknown"` when absent.
fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Float from a number or numeric string; 0 otherwise.
fn float_field(value: &Value, key: &str) -> f64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Integer from a number or numeric string; 0 otherwise.
fn int_field(value: &Value, key: &str) -> i64 {
    match value.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Parse an `"num/den"` frame rate.
///
/// A zero denominator or anything that is not a fraction of two numbers
/// yields 0.
pub fn parse_frame_rate(s: &str) -> f64 {
    let Some((num, den)) = s.split_once('/') else {
        return 0.0;
    };
    match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
        (Ok(num), Ok(den)) if den != 0.0 => num / den,
        _ => 0.0,
    }
}

/// Format seconds as `HH:MM:SS.mmm`.
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = seconds % 60.0;
    format!("{:02}:{:02}:{:06.3}", hours, minutes, secs)
}

/// Probe a file and normalize the result.
///
/// Returns the engine outcome on failure so callers can report stderr.
pub async fn probe_video(
    runner: &dyn CommandRunner,
    path: &Path,
) -> Result<VideoInfo, Outcome> {
    let outcome = runner.execute(&probe_command(path)).await;
    if !outcome.is_success() {
        return Err(outcome);
    }

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    parse_probe_output(&filename, outcome.stdout().unwrap_or_default())
        .map_err(|e| Outcome::failure(e.failure_kind(), e.to_string()))
}

/// Best-effort duration lookup in seconds.
///
/// `None` when the file is missing, ffprobe fails, or the output has no
/// usable duration.
pub async fn get_video_duration(runner: &dyn CommandRunner, path: &Path) -> Option<f64> {
    if !path.is_file() {
        return None;
    }

    let command = FfmpegCommand::ffprobe()
        .push_args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .path(path);
    let outcome = runner.execute(&command).await;
    if !outcome.is_success() {
        return None;
    }

    let value: Value = serde_json::from_str(outcome.stdout()?).ok()?;
    let format = value.get("format")?;
    match format.get("duration") {
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => Some(0.0),
    }
}
