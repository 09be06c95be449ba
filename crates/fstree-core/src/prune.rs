//! Remove placeholder files from a tree

use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Remove every non-directory entry named `name` below `root`.
///
/// Useful after cloning a checked-in fixture whose empty directories carry a
/// stake file such as `.gitkeep`. Returns how many entries were removed.
pub fn prune_named(root: impl AsRef<Path>, name: &str) -> Result<usize> {
    let root = root.as_ref();
    let mut removed = 0;

    for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| Error::walk(root, e))?;
        if entry.file_type().is_dir() || entry.file_name() != name {
            continue;
        }

        fs::remove_file(entry.path()).map_err(|e| Error::io("remove", entry.path(), e))?;
        removed += 1;
    }

    debug!(root = ?root, name, removed, "Pruned named entries");
    Ok(removed)
}
