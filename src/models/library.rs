//! The ordered list of clips for the current directory.

use std::path::{Path, PathBuf};

/// Ordered clip paths for the working directory. Replaced wholesale on a
/// directory change; mutated by removal or path-rewrite when a clip is
/// moved, deleted, or renamed on disk.
#[derive(Debug, Clone, Default)]
pub struct Library {
    paths: Vec<PathBuf>,
}

impl Library {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(|p| p.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(|p| p.as_path())
    }

    /// Removes the entry at `index` after the file left the directory.
    pub fn remove(&mut self, index: usize) {
        if index < self.paths.len() {
            self.paths.remove(index);
        }
    }

    /// Rewrites the entry at `index` after a rename on disk.
    pub fn rewrite(&mut self, index: usize, new_path: PathBuf) {
        if let Some(entry) = self.paths.get_mut(index) {
            *entry = new_path;
        }
    }
}
