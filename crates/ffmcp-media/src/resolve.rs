//! Media reference resolution.
//!
//! A media reference is either a local path or an HTTP(S) URL. Local paths
//! are used in place; URLs are streamed into a fresh file in the scratch
//! area.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use metrics::histogram;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};
use uuid::Uuid;

use ffmcp_models::MediaSource;

use crate::dirs::MediaDirs;
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::remove_file_best_effort;

/// Write buffer size for downloads.
pub const DOWNLOAD_CHUNK_SIZE: usize = 8192;

/// Connect timeout for remote fetches.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extension given to every downloaded file.
const DOWNLOAD_EXTENSION: &str = "mp4";

/// Whether `reference` is an HTTP(S) URL. Purely syntactic.
pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Whether `reference` names an existing local file.
///
/// URLs are never local, even if a file with the same name exists.
pub fn check_file_exists(reference: &str) -> bool {
    if is_url(reference) {
        return false;
    }
    Path::new(reference).is_file()
}

/// A media reference backed by a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub path: PathBuf,
    pub source: MediaSource,
}

/// Turns media references into local files.
#[derive(Debug, Clone)]
pub struct PathResolver {
    dirs: Arc<MediaDirs>,
    client: reqwest::Client,
}

impl PathResolver {
    /// Create a resolver with a default HTTP client.
    pub fn new(dirs: Arc<MediaDirs>) -> MediaResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| MediaError::download_failed(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(dirs, client))
    }

    /// Create a resolver with a caller-supplied HTTP client.
    pub fn with_client(dirs: Arc<MediaDirs>, client: reqwest::Client) -> Self {
        Self { dirs, client }
    }

    /// Resolve a reference to a local file.
    ///
    /// Local paths are returned unchanged (no copy). URLs are downloaded
    /// into a new scratch file.
    pub async fn resolve(&self, reference: &str) -> MediaResult<ResolvedMedia> {
        if reference.trim().is_empty() {
            return Err(MediaError::invalid_arguments("media reference must not be empty"));
        }

        if is_url(reference) {
            let path = self.download(reference).await?;
            info!(url = reference, path = %path.display(), "Downloaded remote video to scratch area");
            return Ok(ResolvedMedia {
                path,
                source: MediaSource::Remote,
            });
        }

        if !check_file_exists(reference) {
            return Err(MediaError::FileNotFound(PathBuf::from(reference)));
        }

        Ok(ResolvedMedia {
            path: PathBuf::from(reference),
            source: MediaSource::Local,
        })
    }

    /// Stream `url` into `scratch/video_<uuid>.mp4`.
    ///
    /// A partially written file is removed on any failure.
    pub async fn download(&self, url: &str) -> MediaResult<PathBuf> {
        let scratch = self.dirs.scratch_dir().await?;
        let file_name = format!("video_{}.{}", Uuid::new_v4().simple(), DOWNLOAD_EXTENSION);
        let target = scratch.join(file_name);

        let start = Instant::now();
        match self.fetch_to(url, &target).await {
            Ok(bytes) => {
                histogram!("ffmcp_download_duration_seconds").record(start.elapsed().as_secs_f64());
                debug!(url, bytes, path = %target.display(), "Download complete");
                Ok(target)
            }
            Err(e) => {
                warn!(url, error = %e, "Download failed, removing partial file");
                if target.exists() {
                    remove_file_best_effort(&target).await;
                }
                Err(e)
            }
        }
    }

    async fn fetch_to(&self, url: &str, target: &Path) -> MediaResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::download_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::DownloadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let file = File::create(target).await?;
        let mut writer = BufWriter::with_capacity(DOWNLOAD_CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| MediaError::download_failed(e.to_string()))?;
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        writer.flush().await?;
        Ok(written)
    }
}
