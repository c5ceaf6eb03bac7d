//! Filesystem helpers for artifact publishing and cleanup.

use std::path::{Path, PathBuf};

use tokio::fs;

use ffmcp_models::derived_file_name;

use crate::dirs::MediaDirs;
use crate::error::MediaResult;

/// Remove a file, logging instead of failing.
///
/// Used for throwaway files (partial downloads, concat manifests) whose
/// removal must never fail the surrounding operation.
pub async fn remove_file_best_effort(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        tracing::warn!(
            "Failed to remove temporary file {}: {}",
            path.display(),
            e
        );
    }
}

/// Whether `path` lives directly inside the output area.
pub fn is_in_output_dir(dirs: &MediaDirs, path: &Path) -> bool {
    path.parent()
        .map(|parent| parent == dirs.output_path())
        .unwrap_or(false)
}

/// Copy `src` into the output area as `<stem>_<8 hex><ext>` and return the
/// new path.
///
/// The original file is left in place.
pub async fn copy_to_output(dirs: &MediaDirs, src: impl AsRef<Path>) -> MediaResult<PathBuf> {
    let src = src.as_ref();
    let output = dirs.output_dir().await?;

    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    let ext = src.extension().map(|e| e.to_string_lossy().into_owned());
    let dst = output.join(derived_file_name(&stem, None, ext.as_deref()));

    fs::copy(src, &dst).await.map_err(|e| {
        tracing::error!(
            "Failed to copy {} into output area {}: {}",
            src.display(),
            dst.display(),
            e
        );
        e
    })?;

    tracing::debug!("Published {} as {}", src.display(), dst.display());
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copy_to_output_keeps_source() {
        let root = TempDir::new().unwrap();
        let dirs = MediaDirs::new(root.path());
        let src = root.path().join("render.mkv");
        fs::write(&src, b"matroska").await.unwrap();

        let dst = copy_to_output(&dirs, &src).await.unwrap();

        assert!(src.exists(), "Source file should remain");
        assert!(is_in_output_dir(&dirs, &dst));
        let name = dst.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("render_"));
        assert!(name.ends_with(".mkv"));
        assert_eq!(fs::read(&dst).await.unwrap(), b"matroska");
    }

    #[tokio::test]
    async fn test_copy_missing_source_fails() {
        let root = TempDir::new().unwrap();
        let dirs = MediaDirs::new(root.path());

        let result = copy_to_output(&dirs, root.path().join("missing.mp4")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_swallowed() {
        let root = TempDir::new().unwrap();
        remove_file_best_effort(&root.path().join("never-existed.txt")).await;
    }

    #[test]
    fn test_is_in_output_dir() {
        let dirs = MediaDirs::new("/srv/ffmcp");
        assert!(is_in_output_dir(&dirs, Path::new("/srv/ffmcp/public/a.mp4")));
        assert!(!is_in_output_dir(&dirs, Path::new("/srv/ffmcp/public/sub/a.mp4")));
        assert!(!is_in_output_dir(&dirs, Path::new("/elsewhere/a.mp4")));
    }
}
