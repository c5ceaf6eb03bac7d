//! Scratch and output directory management.
//!
//! Two process-wide locations are owned here: the scratch area holding
//! downloaded inputs and the output area holding derived artifacts that
//! callers can fetch later. Both are created on first use and are plain
//! lookups afterwards.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::OnceCell;
use tracing::debug;

use ffmcp_models::derived_file_name;

use crate::error::MediaResult;

/// Scratch area directory name under the root.
pub const SCRATCH_DIR_NAME: &str = "temp";

/// Output area directory name under the root.
pub const OUTPUT_DIR_NAME: &str = "public";

/// Scratch and output locations for one server process.
///
/// Constructed once and shared by every component, so tests can point the
/// whole stack at a temporary root.
#[derive(Debug)]
pub struct MediaDirs {
    scratch: PathBuf,
    output: PathBuf,
    scratch_ready: OnceCell<()>,
    output_ready: OnceCell<()>,
}

impl MediaDirs {
    /// Use `<root>/temp` and `<root>/public`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::with_paths(root.join(SCRATCH_DIR_NAME), root.join(OUTPUT_DIR_NAME))
    }

    /// Use explicit scratch and output locations.
    pub fn with_paths(scratch: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            scratch: scratch.into(),
            output: output.into(),
            scratch_ready: OnceCell::new(),
            output_ready: OnceCell::new(),
        }
    }

    /// Root the directories at the current working directory.
    pub fn from_current_dir() -> MediaResult<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Scratch area, created on first call.
    pub async fn scratch_dir(&self) -> MediaResult<&Path> {
        self.scratch_ready
            .get_or_try_init(|| create_dir(&self.scratch))
            .await?;
        Ok(&self.scratch)
    }

    /// Output area, created on first call.
    pub async fn output_dir(&self) -> MediaResult<&Path> {
        self.output_ready
            .get_or_try_init(|| create_dir(&self.output))
            .await?;
        Ok(&self.output)
    }

    /// Output area location without touching the filesystem.
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Scratch area location without touching the filesystem.
    pub fn scratch_path(&self) -> &Path {
        &self.scratch
    }

    /// Generated artifact path inside the output area.
    ///
    /// See [`artifact_name`] for the naming scheme.
    pub async fn artifact_path(
        &self,
        source: &Path,
        infix: &str,
        extension: Option<&str>,
    ) -> MediaResult<PathBuf> {
        let dir = self.output_dir().await?;
        Ok(dir.join(artifact_name(source, infix, extension)))
    }
}

async fn create_dir(path: &Path) -> MediaResult<()> {
    // create_dir_all tolerates concurrent creation of the same directory
    fs::create_dir_all(path).await?;
    debug!(path = %path.display(), "Directory ready");
    Ok(())
}

/// Derived name `<stem>_<infix>_<8 hex>.<ext>` for an artifact produced
/// from `source`.
///
/// `extension` of `None` keeps the source's own extension.
pub fn artifact_name(source: &Path, infix: &str, extension: Option<&str>) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let source_ext = source.extension().map(|e| e.to_string_lossy().into_owned());
    let ext = extension.map(str::to_string).or(source_ext);
    derived_file_name(&stem, Some(infix), ext.as_deref())
}

/// Make sure the directory for `path` exists.
///
/// A path with an extension is treated as a file and its parent is
/// created; a path without one is treated as a directory and created
/// itself. A directory named like `clips.d` is therefore misread as a file.
pub async fn ensure_parent_exists(path: impl AsRef<Path>) -> MediaResult<()> {
    let path = path.as_ref();
    let directory = if path.extension().is_some() {
        path.parent()
    } else {
        Some(path)
    };

    if let Some(dir) = directory.filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir).await?;
        }
    }
    Ok(())
}
