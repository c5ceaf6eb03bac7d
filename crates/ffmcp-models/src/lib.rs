//! Shared data models for the ffmcp tool server.
//!
//! This crate provides Serde-serializable types for:
//! - Normalized command outcomes and tool results
//! - Tool parameters (with JSON schemas for tool discovery)
//! - Normalized ffprobe metadata
//! - Resource retrieval descriptors
//! - JSON-RPC 2.0 message envelopes

pub mod naming;
pub mod outcome;
pub mod params;
pub mod resource;
pub mod rpc;
pub mod video;

// Re-export common types
pub use naming::{derived_file_name, unique_suffix};
pub use outcome::{FailureKind, MediaSource, Outcome, ToolResult};
pub use params::{
    ConcatVideosParams, ConvertVideoParams, CreateThumbnailParams, ExtractAudioParams,
    GetVideoInfoParams, RemoveWatermarkParams, VersionParams,
};
pub use resource::{ResourceEntry, ResourceResult};
pub use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use video::{AudioStreamDetails, StreamDetails, StreamInfo, VideoInfo, VideoStreamDetails};
