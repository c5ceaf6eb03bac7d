//! Normalized video metadata.

use serde::{Deserialize, Serialize};

/// Placeholder for string fields ffprobe did not report.
pub const UNKNOWN: &str = "unknown";

/// Container-level information for an inspected file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Base name of the inspected file
    pub filename: String,
    /// Container format name (e.g. `mov,mp4,m4a,3gp,3g2,mj2`)
    pub format: String,
    /// Duration in seconds
    pub duration: f64,
    /// File size in bytes
    pub size: i64,
    /// Overall bit rate in bits/second
    pub bit_rate: i64,
    pub streams: Vec<StreamInfo>,
}

/// One elementary stream.
///
/// Video-only and audio-only fields are flattened in next to the common
/// fields; other stream types carry only the common fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub codec: String,
    pub codec_long_name: String,
    #[serde(flatten)]
    pub details: Option<StreamDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamDetails {
    Video(VideoStreamDetails),
    Audio(AudioStreamDetails),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamDetails {
    pub width: i64,
    pub height: i64,
    /// Frame rate from `r_frame_rate`; 0 when unparseable
    pub fps: f64,
    pub bit_depth: String,
    pub pix_fmt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStreamDetails {
    pub sample_rate: String,
    pub channels: i64,
    pub channel_layout: String,
}

impl StreamInfo {
    pub fn is_video(&self) -> bool {
        matches!(self.details, Some(StreamDetails::Video(_)))
    }

    pub fn is_audio(&self) -> bool {
        matches!(self.details, Some(StreamDetails::Audio(_)))
    }

    pub fn video(&self) -> Option<&VideoStreamDetails> {
        match &self.details {
            Some(StreamDetails::Video(v)) => Some(v),
            _ => None,
        }
    }

    pub fn audio(&self) -> Option<&AudioStreamDetails> {
        match &self.details {
            Some(StreamDetails::Audio(a)) => Some(a),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_stream_serializes_without_video_fields() {
        let stream = StreamInfo {
            kind: "audio".to_string(),
            codec: "aac".to_string(),
            codec_long_name: "AAC (Advanced Audio Coding)".to_string(),
            details: Some(StreamDetails::Audio(AudioStreamDetails {
                sample_rate: "48000".to_string(),
                channels: 2,
                channel_layout: "stereo".to_string(),
            })),
        };

        let value = serde_json::to_value(&stream).unwrap();
        assert_eq!(value["type"], "audio");
        assert_eq!(value["channels"], 2);
        assert!(value.get("fps").is_none());
        assert!(value.get("width").is_none());
    }

    #[test]
    fn test_other_stream_has_only_common_fields() {
        let stream = StreamInfo {
            kind: "subtitle".to_string(),
            codec: "mov_text".to_string(),
            codec_long_name: UNKNOWN.to_string(),
            details: None,
        };

        let value = serde_json::to_value(&stream).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
    }
}
