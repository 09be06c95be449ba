//! Filesystem walker for collecting entry descriptors

use crate::entry::EntryInfo;
use crate::{Error, Result};
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Collect every directory and regular file strictly beneath `root`.
///
/// Entries come out depth-first in ascending name order per directory: a
/// directory is yielded before its children, and its children before the
/// directory's later siblings. That is ascending order of the path below
/// `root` compared component by component, which each entry carries as
/// `rel_path`. Symlinks are not followed and, like other special files, are
/// skipped.
///
/// Any traversal error aborts the walk; no partial list is returned.
pub fn collect_entries(root: impl AsRef<Path>) -> Result<Vec<EntryInfo>> {
    let root = root.as_ref();
    let mut entries = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| Error::walk(root, e))?;
        let path = entry.path();

        let metadata = entry.metadata().map_err(|e| Error::walk(root, e))?;
        let file_type = metadata.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            debug!(path = ?path, "Skipping entry that is neither a file nor a directory");
            continue;
        }

        trace!(path = ?path, dir = file_type.is_dir(), "Collected entry");
        entries.push(EntryInfo::from_metadata(path, &metadata)?.relative_to(root));
    }

    debug!(root = ?root, count = entries.len(), "Collected tree entries");
    Ok(entries)
}
