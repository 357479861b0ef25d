use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lazy nodeid -> resolved directory cache.
///
/// Populated as nodes are created, read, or discovered during a tree
/// walk, so repeated lookups stay O(1) within a connection lifetime.
/// Owned by the connection and never exposed.
#[derive(Debug, Default)]
pub struct PathIndex {
    paths: HashMap<String, PathBuf>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, nodeid: &str) -> Option<&PathBuf> {
        self.paths.get(nodeid)
    }

    pub fn insert(&mut self, nodeid: &str, path: PathBuf) {
        self.paths.insert(nodeid.to_string(), path);
    }

    /// Drops the entry for `nodeid`, if any.
    pub fn remove(&mut self, nodeid: &str) {
        self.paths.remove(nodeid);
    }

    /// Drops every entry whose resolved path lies at or beneath `dir`.
    ///
    /// Used when a subtree leaves the backing store: the nodes placed
    /// inside it no longer have valid placements.
    pub fn remove_subtree(&mut self, dir: &Path) {
        self.paths.retain(|_, p| !p.starts_with(dir));
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
