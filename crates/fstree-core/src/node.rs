//! Declarative description of filesystem entries to create

use crate::{Error, Result};
use filetime::FileTime;
use std::path::{Component, Path};
use std::time::SystemTime;

/// Basic attributes of a filesystem item to be created.
///
/// The name is relative to the root the node is materialized under; a
/// trailing `/` marks a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub perm: u32,
    pub time: SystemTime,
    pub name: String,
    pub body: String,
}

impl Node {
    pub fn new(
        perm: u32,
        time: SystemTime,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            perm,
            time,
            name: name.into(),
            body: body.into(),
        }
    }

    /// A node stamped with the current time
    pub fn now(perm: u32, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(perm, SystemTime::now(), name, body)
    }

    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }

    /// The relative path to create, without the directory marker
    pub fn path(&self) -> &Path {
        Path::new(self.name.strip_suffix('/').unwrap_or(&self.name))
    }

    /// [`path`](Self::path), checked to stay below the root it is joined to.
    ///
    /// Absolute paths, `..` components and paths naming only the root itself
    /// are rejected.
    pub fn relative_path(&self) -> Result<&Path> {
        let path = self.path();
        let mut normal = false;
        for component in path.components() {
            match component {
                Component::Normal(_) => normal = true,
                Component::CurDir => {}
                _ => return Err(Error::NodePath(path.to_path_buf())),
            }
        }
        if !normal {
            return Err(Error::NodePath(path.to_path_buf()));
        }
        Ok(path)
    }

    /// Set the permissions and timestamps of `root/path()` to the node's
    pub fn save_attributes(&self, root: impl AsRef<Path>) -> Result<()> {
        let target = root.as_ref().join(self.relative_path()?);
        set_attributes(&target, self.perm, self.time)
    }
}

/// Apply permission bits, then access and modification times, to a path
pub(crate) fn set_attributes(path: &Path, perm: u32, time: SystemTime) -> Result<()> {
    set_mode(path, perm)?;

    let ft = FileTime::from_system_time(time);
    filetime::set_file_times(path, ft, ft).map_err(|e| Error::io("set times on", path, e))?;

    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, perm: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(perm))
        .map_err(|e| Error::io("set permissions on", path, e))
}

#[cfg(not(unix))]
pub(crate) fn set_mode(path: &Path, perm: u32) -> Result<()> {
    let mut permissions = std::fs::metadata(path)
        .map_err(|e| Error::io("stat", path, e))?
        .permissions();
    permissions.set_readonly(perm & 0o200 == 0);
    std::fs::set_permissions(path, permissions)
        .map_err(|e| Error::io("set permissions on", path, e))
}
