//! Metadata collected from existing filesystem entries

use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::ffi::OsString;
use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Runtime metadata about one existing file or directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Path the entry was collected from
    pub path: PathBuf,
    /// Base name, as shown to people
    pub name: OsString,
    /// Path below the walk root, the primary match key; just the base name
    /// for entries described on their own
    pub rel_path: PathBuf,
    /// Whether this is a directory
    pub is_dir: bool,
    /// Size in bytes (meaningful for regular files only)
    pub size: u64,
    /// Low twelve bits of the Unix mode
    pub mode: u32,
    /// Last modification time
    pub modified: SystemTime,
}

impl EntryInfo {
    /// Stat a path (without following a final symlink) and describe it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = path
            .symlink_metadata()
            .map_err(|e| Error::io("stat", path, e))?;
        Self::from_metadata(path, &metadata)
    }

    /// Describe a path from already-fetched metadata
    pub fn from_metadata(path: impl AsRef<Path>, metadata: &Metadata) -> Result<Self> {
        let path = path.as_ref();
        let modified = metadata
            .modified()
            .map_err(|e| Error::io("read modification time of", path, e))?;

        let name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| path.as_os_str().to_os_string());

        Ok(Self {
            path: path.to_path_buf(),
            rel_path: PathBuf::from(&name),
            name,
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            mode: mode_bits(metadata),
            modified,
        })
    }

    /// Re-key the entry on its path below `root`.
    ///
    /// Entries that do not live under `root` keep their current key.
    pub fn relative_to(mut self, root: impl AsRef<Path>) -> Self {
        if let Ok(rel) = self.path.strip_prefix(root) {
            self.rel_path = rel.to_path_buf();
        }
        self
    }

    /// Whether this entry is a regular file
    pub fn is_file(&self) -> bool {
        !self.is_dir
    }

    /// `ls`-style rendering of the mode, e.g. `drwxr-x---`
    pub fn mode_string(&self) -> String {
        mode_string(self.is_dir, self.mode)
    }
}

impl fmt::Display for EntryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time: DateTime<Utc> = self.modified.into();
        write!(
            f,
            "dir:{}, sz:{}, mode:{}, time:{}, name:{}",
            self.is_dir,
            self.size,
            self.mode_string(),
            time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            self.path.display()
        )
    }
}

/// Describe each of the given paths, stopping at the first failure
pub fn entries_from_paths<I, P>(paths: I) -> Result<Vec<EntryInfo>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths.into_iter().map(EntryInfo::from_path).collect()
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

/// Render mode bits the way `ls -l` does
pub fn mode_string(is_dir: bool, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(if is_dir { 'd' } else { '-' });

    let specials = [(0o4000, 's', 'S'), (0o2000, 's', 'S'), (0o1000, 't', 'T')];
    for (shift, (special, set_exec, set_noexec)) in [6u32, 3, 0].into_iter().zip(specials) {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        let exec = bits & 0o1 != 0;
        out.push(match (mode & special != 0, exec) {
            (true, true) => set_exec,
            (true, false) => set_noexec,
            (false, true) => 'x',
            (false, false) => '-',
        });
    }

    out
}
