//! File System Types
//!
//! Error taxonomy for the mounted filesystem. `VfsError` is recoverable and
//! ends up as a command's error string; `MountError` is fatal at startup.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::archive::ArchiveError;

/// Per-operation filesystem errors
#[derive(Error, Debug)]
pub enum VfsError {
    #[error("ENOENT: no such file or directory '{path}'")]
    NotFound { path: String },

    #[error("ENOTDIR: not a directory '{path}'")]
    NotDirectory { path: String },

    #[error("EISDIR: not a regular file '{path}'")]
    NotFile { path: String },

    #[error("ENOTEMPTY: directory not empty '{path}'")]
    NotEmpty { path: String },

    #[error("EPERM: path escapes the mount root '{path}'")]
    PathEscape { path: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl VfsError {
    pub(crate) fn io(path: &std::path::Path, source: io::Error) -> Self {
        VfsError::Io { path: path.display().to_string(), source }
    }
}

/// Errors raised while materializing the archive into the mount root
#[derive(Error, Debug)]
pub enum MountError {
    #[error("archive not found: {}", path.display())]
    ArchiveMissing { path: PathBuf },

    #[error("cannot read archive {}: {source}", path.display())]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt archive {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },

    #[error("archive entry '{entry}' points outside the mount root")]
    UnsafeEntry { entry: String },

    #[error("cannot prepare mount directory {}: {source}", path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to extract {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
