use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Asset lookup over an ordered list of search paths.
///
/// Relative names are tried against each search path in insertion order; the
/// first existing file wins. Absolute names bypass the search paths.
#[derive(Debug, Default)]
pub struct FileSystem {
    search_paths: Vec<PathBuf>,
}

impl FileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a search path. Duplicates are ignored.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self.search_paths.contains(&path) {
            return;
        }
        log::debug!("file system: search path {}", path.display());
        self.search_paths.push(path);
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Resolves `name` to an existing file.
    pub fn resolve(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
        let name = name.as_ref();
        if name.is_absolute() {
            return name.is_file().then(|| name.to_path_buf());
        }
        self.search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|p| p.is_file())
    }

    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        self.resolve(name).is_some()
    }

    /// Reads the resolved file into memory.
    pub fn read(&self, name: impl AsRef<Path>) -> Result<Vec<u8>> {
        let name = name.as_ref();
        let path = self
            .resolve(name)
            .with_context(|| format!("'{}' not found in any search path", name.display()))?;
        std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))
    }
}
