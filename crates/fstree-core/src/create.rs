//! Materialize node lists on disk

use crate::node::Node;
use crate::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// Mode used for directories while their contents are written
const BUILD_DIR_MODE: u32 = 0o700;

/// Mode used for files while their contents are written
const BUILD_FILE_MODE: u32 = 0o600;

/// Create the nodes under `root`, which must already exist.
///
/// Runs in two phases. First every node is created in input order:
/// directories with owner-only access, files with their body. Then, walking
/// the input backwards, each node gets its requested permissions and
/// timestamps, so children are finalized before their parents can be locked
/// down. Parents must therefore be listed before their children.
///
/// Node paths must be relative and may not contain `..`; such a node fails
/// the build before anything is created. Any later failure aborts the build
/// and leaves whatever was created in place.
pub fn tree_create(root: impl AsRef<Path>, nodes: &[Node]) -> Result<()> {
    let root = root.as_ref();
    for node in nodes {
        node.relative_path()?;
    }

    for node in nodes {
        let path = root.join(node.path());

        if node.is_dir() {
            create_dir(&path)?;
        } else {
            create_file(&path, node.body.as_bytes())?;
        }
        trace!(path = ?path, dir = node.is_dir(), "Created node");
    }

    for node in nodes.iter().rev() {
        node.save_attributes(root)?;
    }

    debug!(root = ?root, count = nodes.len(), "Created tree");
    Ok(())
}

pub(crate) fn create_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(BUILD_DIR_MODE);
    }
    builder
        .create(path)
        .map_err(|e| Error::io("create directory", path, e))
}

pub(crate) fn open_new_file(path: &Path) -> Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(BUILD_FILE_MODE);
    }
    options
        .open(path)
        .map_err(|e| Error::io("create file", path, e))
}

fn create_file(path: &Path, body: &[u8]) -> Result<()> {
    let mut file = open_new_file(path)?;
    if !body.is_empty() {
        file.write_all(body)
            .map_err(|e| Error::io("write", path, e))?;
    }
    file.sync_all().map_err(|e| Error::io("flush", path, e))
}
