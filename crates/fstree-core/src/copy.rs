//! Duplicate an existing tree with its permissions and timestamps

use crate::create::{create_dir, open_new_file};
use crate::node::set_attributes;
use crate::{Error, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};
use walkdir::WalkDir;

struct Pending {
    path: PathBuf,
    mode: u32,
    modified: SystemTime,
}

/// Copy the contents of `src` into the existing directory `dst`.
///
/// Only directories and regular files are copied. Like
/// [`tree_create`](crate::create::tree_create), content is written first with
/// owner-only modes, and the source permissions and modification times are
/// applied afterwards in reverse order.
pub fn tree_copy(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let mut pending = Vec::new();

    let walker = WalkDir::new(src)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| Error::walk(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|_| Error::io("resolve", entry.path(), io::ErrorKind::InvalidInput.into()))?;
        let dest = dst.join(relative);

        let metadata = entry.metadata().map_err(|e| Error::walk(src, e))?;
        if metadata.is_dir() {
            create_dir(&dest)?;
        } else if metadata.is_file() {
            copy_file(entry.path(), &dest)?;
        } else {
            debug!(path = ?entry.path(), "Skipping entry that is neither a file nor a directory");
            continue;
        }
        trace!(from = ?entry.path(), to = ?dest, "Copied entry");

        let modified = metadata
            .modified()
            .map_err(|e| Error::io("read modification time of", entry.path(), e))?;
        pending.push(Pending {
            path: dest,
            mode: source_mode(&metadata),
            modified,
        });
    }

    for item in pending.iter().rev() {
        set_attributes(&item.path, item.mode, item.modified)?;
    }

    debug!(src = ?src, dst = ?dst, count = pending.len(), "Copied tree");
    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let mut reader = File::open(from).map_err(|e| Error::io("open", from, e))?;
    let mut writer = open_new_file(to)?;
    io::copy(&mut reader, &mut writer).map_err(|e| Error::io("copy into", to, e))?;
    writer.sync_all().map_err(|e| Error::io("flush", to, e))
}

#[cfg(unix)]
fn source_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn source_mode(metadata: &std::fs::Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
