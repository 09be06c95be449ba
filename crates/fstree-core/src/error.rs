//! Error types for fstree-core

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Core error types for the fstree library
#[derive(Error, Debug)]
pub enum Error {
    /// A filesystem call failed
    #[error("failed to {op} {path:?}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("failed to walk {root:?}{}: {source}", at_path(.source))]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Malformed line in the tree description format
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Timestamp could not be parsed or represented
    #[error("invalid timestamp: {0}")]
    Time(String),

    /// Configuration-related error
    #[error("configuration error: {0}")]
    Config(String),

    /// A node path that is absolute or climbs out of the tree root
    #[error("node path {0:?} must stay below the tree root")]
    NodePath(PathBuf),

    /// Failure while reading the contents of a file
    #[error("in {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn walk(root: impl AsRef<Path>, source: walkdir::Error) -> Self {
        Error::Walk {
            root: root.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn in_file(path: impl AsRef<Path>, source: Error) -> Self {
        Error::File {
            path: path.as_ref().to_path_buf(),
            source: Box::new(source),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

fn at_path(err: &walkdir::Error) -> String {
    match err.path() {
        Some(path) => format!(" at {:?}", path),
        None => String::new(),
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        let root = err.path().map(Path::to_path_buf).unwrap_or_default();
        Error::Walk { root, source: err }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
