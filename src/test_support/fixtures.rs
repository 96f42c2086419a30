//! Install-prefix fixtures on a real temporary filesystem.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary install prefix with a chosen set of subdirectories.
///
/// The directory is removed when the fixture is dropped.
pub struct PrefixFixture {
    dir: TempDir,
}

impl PrefixFixture {
    /// Create an empty prefix.
    pub fn new() -> Self {
        PrefixFixture {
            dir: TempDir::new().expect("failed to create prefix fixture"),
        }
    }

    /// Create a prefix laid out like a typical library install:
    /// `include`, `lib`, `lib/pkgconfig` and `bin`.
    pub fn standard() -> Self {
        PrefixFixture::new().with_dirs(["include", "lib", "lib/pkgconfig", "bin"])
    }

    /// Create the given relative subdirectories.
    pub fn with_dirs<'a>(self, dirs: impl IntoIterator<Item = &'a str>) -> Self {
        for dir in dirs {
            std::fs::create_dir_all(self.dir.path().join(dir))
                .expect("failed to create fixture directory");
        }
        self
    }

    /// Write a file, creating parent directories.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        let path = self.dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        std::fs::write(&path, content).expect("failed to write fixture file");
        self
    }

    /// Root of the prefix.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// A path inside the prefix.
    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}

impl Default for PrefixFixture {
    fn default() -> Self {
        Self::new()
    }
}
