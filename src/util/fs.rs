//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Join `child` onto every base path and keep the results that exist.
///
/// Order of `bases` is preserved.
pub fn existing_joins<P: AsRef<Path>>(bases: &[P], child: impl AsRef<Path>) -> Vec<PathBuf> {
    let child = child.as_ref();
    bases
        .iter()
        .map(|base| base.as_ref().join(child))
        .filter(|path| path.exists())
        .collect()
}

/// Canonicalize a path, but don't fail if it doesn't exist yet.
/// Returns the path as-is if canonicalization fails.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
