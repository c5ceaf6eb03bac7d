//! Tool names, descriptions and advertised input schemas.

use std::fmt;
use std::str::FromStr;

use schemars::schema_for;
use serde::Serialize;
use serde_json::Value;

use ffmcp_models::{
    ConcatVideosParams, ConvertVideoParams, CreateThumbnailParams, ExtractAudioParams,
    GetVideoInfoParams, RemoveWatermarkParams, VersionParams,
};

use crate::error::MediaError;

/// The fixed set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Version,
    ConvertVideo,
    ExtractAudio,
    CreateThumbnail,
    RemoveWatermark,
    GetVideoInfo,
    ConcatVideos,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::Version,
        ToolName::ConvertVideo,
        ToolName::ExtractAudio,
        ToolName::CreateThumbnail,
        ToolName::RemoveWatermark,
        ToolName::GetVideoInfo,
        ToolName::ConcatVideos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Version => "ffmpeg_version",
            ToolName::ConvertVideo => "ffmpeg_convert_video",
            ToolName::ExtractAudio => "ffmpeg_extract_audio",
            ToolName::CreateThumbnail => "ffmpeg_create_thumbnail",
            ToolName::RemoveWatermark => "ffmpeg_remove_watermark",
            ToolName::GetVideoInfo => "ffmpeg_get_video_info",
            ToolName::ConcatVideos => "ffmpeg_concat_videos",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::Version => "Get the installed FFmpeg version.",
            ToolName::ConvertVideo => {
                "Convert a video to another format. The format is inferred from the \
                 output file extension unless given explicitly."
            }
            ToolName::ExtractAudio => {
                "Extract the audio track of a local or remote video into the output area."
            }
            ToolName::CreateThumbnail => {
                "Grab a single JPEG frame at a timestamp (HH:MM:SS) into the output area."
            }
            ToolName::RemoveWatermark => {
                "Remove a rectangular watermark with the delogo filter. Audio is copied unchanged."
            }
            ToolName::GetVideoInfo => {
                "Inspect container and stream details: duration, resolution, codecs and more."
            }
            ToolName::ConcatVideos => "Concatenate two or more videos into a single MP4.",
        }
    }

    /// JSON schema of the tool's arguments.
    pub fn input_schema(&self) -> Value {
        let schema = match self {
            ToolName::Version => schema_for!(VersionParams),
            ToolName::ConvertVideo => schema_for!(ConvertVideoParams),
            ToolName::ExtractAudio => schema_for!(ExtractAudioParams),
            ToolName::CreateThumbnail => schema_for!(CreateThumbnailParams),
            ToolName::RemoveWatermark => schema_for!(RemoveWatermarkParams),
            ToolName::GetVideoInfo => schema_for!(GetVideoInfoParams),
            ToolName::ConcatVideos => schema_for!(ConcatVideosParams),
        };
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Label prefixed to failure messages.
    pub fn failure_label(&self) -> &'static str {
        match self {
            ToolName::Version => "FFmpeg invocation failed",
            ToolName::ConvertVideo => "Conversion failed",
            ToolName::ExtractAudio => "Audio extraction failed",
            ToolName::CreateThumbnail => "Thumbnail extraction failed",
            ToolName::RemoveWatermark => "Watermark removal failed",
            ToolName::GetVideoInfo => "Failed to get video info",
            ToolName::ConcatVideos => "Concatenation failed",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| MediaError::UnknownTool(s.to_string()))
    }
}

/// Tool entry as advertised in discovery.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl From<ToolName> for ToolDescriptor {
    fn from(tool: ToolName) -> Self {
        Self {
            name: tool.as_str(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        }
    }
}

/// Descriptors for every tool, in a stable order.
pub fn descriptors() -> Vec<ToolDescriptor> {
    ToolName::ALL.into_iter().map(ToolDescriptor::from).collect()
}
