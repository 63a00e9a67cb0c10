//! Small filesystem helpers shared by the dropin and options writers

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tokio::task;

/// Replace `path` with `bytes` so readers see either the old or the new
/// contents, never a partial write.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let path = path.to_path_buf();
    let bytes = bytes.to_vec();
    task::spawn_blocking(move || write_atomic_blocking(&path, &bytes))
        .await
        .map_err(io::Error::other)?
}

fn write_atomic_blocking(path: &Path, bytes: &[u8]) -> io::Result<()> {
    // Same directory as the target, so the final rename stays on one filesystem
    let parent = sibling_dir(path);
    let prefix = format!(
        ".{}.",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "memdrop".to_string())
    );

    let mut tmp = Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(&parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn sibling_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
