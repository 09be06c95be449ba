//! Scratch trees that clean up after themselves
//!
//! Tests routinely strip permissions from the trees they exercise, which
//! makes a plain recursive delete fail. Release therefore walks the tree
//! first and gives the owner full access to every directory before reading
//! it, then removes everything.

use crate::TestConfig;
use anyhow::{Context, Result};
use fstree_core::{tree_copy, tree_create, Node};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

/// A temporary directory released on drop, even when locked down
#[derive(Debug)]
pub struct TempTree {
    dir: Option<TempDir>,
}

impl TempTree {
    /// Create an empty scratch directory
    pub fn new() -> Result<Self> {
        Self::with_config(&TestConfig::default())
    }

    /// Create an empty scratch directory named after `config.temp_prefix`
    pub fn with_config(config: &TestConfig) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&config.temp_prefix)
            .tempdir()
            .context("Failed to create temporary directory")?;
        debug!(path = ?dir.path(), "Created scratch tree");
        Ok(Self { dir: Some(dir) })
    }

    /// Create a scratch directory holding a copy of `src`
    pub fn clone_from(src: impl AsRef<Path>) -> Result<Self> {
        let src = src.as_ref();
        let tree = Self::new()?;
        tree_copy(src, tree.path())
            .with_context(|| format!("Failed to clone {:?} into scratch tree", src))?;
        Ok(tree)
    }

    /// Create a scratch directory and build `nodes` inside it
    pub fn create(nodes: &[Node]) -> Result<Self> {
        let tree = Self::new()?;
        tree_create(tree.path(), nodes).context("Failed to build scratch tree")?;
        Ok(tree)
    }

    /// Root of the scratch tree
    pub fn path(&self) -> &Path {
        match &self.dir {
            Some(dir) => dir.path(),
            None => Path::new(""),
        }
    }

    /// Release the tree now and report any failure
    pub fn close(mut self) -> Result<()> {
        match self.dir.take() {
            Some(dir) => release(dir),
            None => Ok(()),
        }
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = release(dir) {
                warn!(path = ?path, error = %format!("{:#}", e), "Failed to release scratch tree");
            }
        }
    }
}

fn release(dir: TempDir) -> Result<()> {
    let path = dir.path().to_path_buf();
    open_up(&path).with_context(|| format!("Failed to restore access below {:?}", path))?;
    dir.close()
        .with_context(|| format!("Failed to remove {:?}", path))?;
    debug!(path = ?path, "Released scratch tree");
    Ok(())
}

/// Grant the owner full access to `dir` and every directory below it.
///
/// Access is granted before each directory is listed, so a directory that
/// was made unreadable is opened up before it is entered.
fn open_up(dir: &Path) -> io::Result<()> {
    set_owner_access(dir)?;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            open_up(&entry.path())?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_owner_access(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn set_owner_access(dir: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(dir)?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(dir, perms)
}
