use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Lists files with the given extension, lexicographically sorted so that
/// zero-padded frame numbers come back in capture order.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == extension))
        .collect();

    files.sort();

    Ok(files)
}
