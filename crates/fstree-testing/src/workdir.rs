//! Run a test from inside a scratch tree

use crate::temp::TempTree;
use anyhow::{bail, Context, Result};
use fstree_core::Node;
use std::cell::Cell;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Serializes every change of the process working directory
static WORKDIR_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    /// Whether this thread currently holds `WORKDIR_LOCK`
    static ENTERED: Cell<bool> = const { Cell::new(false) };
}

/// A scratch tree that is also the current working directory.
///
/// While a guard is alive no other guard can be created, so concurrently
/// running tests take turns. Creating a second guard on a thread that already
/// holds one fails instead of waiting for itself. Dropping the guard,
/// including during a panic, changes back to the previous directory and only
/// then releases the tree.
#[derive(Debug)]
pub struct TempWorkdir {
    previous: PathBuf,
    tree: TempTree,
    _lock: MutexGuard<'static, ()>,
}

impl TempWorkdir {
    /// Change into a new empty scratch tree
    pub fn init() -> Result<Self> {
        Self::enter(TempTree::new)
    }

    /// Change into a scratch copy of `src`
    pub fn clone_from(src: impl AsRef<Path>) -> Result<Self> {
        let src = src.as_ref();
        Self::enter(|| TempTree::clone_from(src))
    }

    /// Change into a scratch tree built from `nodes`
    pub fn create(nodes: &[Node]) -> Result<Self> {
        Self::enter(|| TempTree::create(nodes))
    }

    fn enter(build: impl FnOnce() -> Result<TempTree>) -> Result<Self> {
        if ENTERED.with(Cell::get) {
            bail!("A TempWorkdir is already active on this thread");
        }

        // A test that panicked while holding the lock has already been
        // restored by Drop.
        let lock = WORKDIR_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = env::current_dir().context("Failed to read current directory")?;
        let tree = build()?;
        env::set_current_dir(tree.path())
            .with_context(|| format!("Failed to change directory to {:?}", tree.path()))?;
        debug!(from = ?previous, to = ?tree.path(), "Entered scratch working directory");

        ENTERED.with(|entered| entered.set(true));
        Ok(Self {
            previous,
            tree,
            _lock: lock,
        })
    }

    /// Working directory in effect before this guard was created
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Root of the scratch tree, which is the current directory
    pub fn path(&self) -> &Path {
        self.tree.path()
    }
}

impl Drop for TempWorkdir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(path = ?self.previous, error = %e, "Failed to restore working directory");
        }
        ENTERED.with(|entered| entered.set(false));
    }
}
