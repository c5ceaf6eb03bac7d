//! Artifact retrieval from the output area.

use std::path::{Component, Path};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;
use tracing::{debug, warn};

use ffmcp_models::{ResourceEntry, ResourceResult};

use crate::dirs::MediaDirs;
use crate::error::MediaResult;

/// URI prefix under which artifacts are addressed.
pub const RESOURCE_URI_PREFIX: &str = "ffmpeg://resources/";

/// URI template advertised to clients.
pub const RESOURCE_URI_TEMPLATE: &str = "ffmpeg://resources/{name}";

/// Known video containers and their media types.
const VIDEO_MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("avi", "video/x-msvideo"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("flv", "video/x-flv"),
    ("wmv", "video/x-ms-wmv"),
    ("m4v", "video/x-m4v"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("ts", "video/mp2t"),
];

/// Media type for a path, matched case-insensitively on its extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    VIDEO_MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Artifact name from a `ffmpeg://resources/<name>` URI.
pub fn name_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(RESOURCE_URI_PREFIX)
}

/// URI for an artifact name.
pub fn uri_for(name: &str) -> String {
    format!("{}{}", RESOURCE_URI_PREFIX, name)
}

/// Only bare file names address the output area.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Serves artifacts out of the output area.
#[derive(Debug, Clone)]
pub struct ResourceExposer {
    dirs: Arc<MediaDirs>,
}

impl ResourceExposer {
    pub fn new(dirs: Arc<MediaDirs>) -> Self {
        Self { dirs }
    }

    /// Look up an artifact by file name.
    ///
    /// Never fails: every outcome, including read errors, is a descriptor.
    pub async fn fetch(&self, name: Option<&str>) -> ResourceResult {
        let name = name.map(str::trim).unwrap_or_default();

        let output = match self.dirs.output_dir().await {
            Ok(dir) => dir,
            Err(e) => return ResourceResult::error(name, e.to_string()),
        };

        if name.is_empty() {
            return ResourceResult::Directory {
                path: output.to_string_lossy().into_owned(),
            };
        }

        if !is_plain_name(name) {
            warn!(name, "Rejected resource name outside the output area");
            return ResourceResult::not_found(name);
        }

        let path = output.join(name);
        if !path.is_file() {
            return ResourceResult::not_found(name);
        }

        let Some(mime_type) = mime_type_for(&path) else {
            return ResourceResult::unsupported_type(name);
        };

        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(name, bytes = bytes.len(), "Serving resource");
                ResourceResult::Content {
                    name: name.to_string(),
                    mime_type: mime_type.to_string(),
                    blob: STANDARD.encode(bytes),
                }
            }
            Err(e) => {
                warn!(name, error = %e, "Failed to read resource");
                ResourceResult::error(name, format!("Failed to read resource: {}", e))
            }
        }
    }

    /// Servable artifacts currently in the output area, sorted by name.
    pub async fn list(&self) -> MediaResult<Vec<ResourceEntry>> {
        let output = self.dirs.output_dir().await?;
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(output).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            let Some(mime_type) = mime_type_for(&path) else {
                continue;
            };
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(ResourceEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                mime_type: mime_type.to_string(),
                size: metadata.len(),
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}
