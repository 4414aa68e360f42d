//! File discovery for finding images in the input directory.

use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::DiscoveryError;
use crate::types::WorkItem;

/// Discovers image files in a directory.
pub struct FileDiscovery {
    recursive: bool,
    extensions: Vec<String>,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: &InputConfig) -> Self {
        Self {
            recursive: config.recursive,
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Discover every supported image file under `dir`.
    ///
    /// Only the top level is scanned unless recursion is enabled. Entries
    /// that cannot be stat'ed are skipped with a warning; a root directory
    /// that cannot be listed is fatal. A file whose contents are unreadable
    /// is still emitted and fails later, during processing.
    pub fn discover(&self, dir: &Path) -> Result<Vec<WorkItem>, DiscoveryError> {
        Self::check_root(dir)?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut items = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_supported(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) => items.push(WorkItem {
                    id: item_id(dir, entry.path()),
                    source_path: entry.path().to_path_buf(),
                    size_bytes: meta.len(),
                }),
                Err(e) => tracing::warn!("Skipping {:?}: {}", entry.path(), e),
            }
        }

        // Same key the report sorts by
        items.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!("Discovered {} item(s) in {:?}", items.len(), dir);
        Ok(items)
    }

    /// The input must exist, be a directory, and be listable.
    fn check_root(dir: &Path) -> Result<(), DiscoveryError> {
        let meta = std::fs::metadata(dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DiscoveryError::NotFound(dir.to_path_buf()),
            _ => DiscoveryError::Unreadable {
                path: dir.to_path_buf(),
                source: e,
            },
        })?;
        if !meta.is_dir() {
            return Err(DiscoveryError::NotADirectory(dir.to_path_buf()));
        }
        std::fs::read_dir(dir).map_err(|e| DiscoveryError::Unreadable {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext_lower)
            })
            .unwrap_or(false)
    }

    /// Get total size of all discovered items.
    pub fn total_size(items: &[WorkItem]) -> u64 {
        items.iter().map(|i| i.size_bytes).sum()
    }
}

/// `/`-joined path of `path` relative to `root`.
fn item_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
