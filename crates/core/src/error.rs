use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("failed to open {}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to stat {}", path.display())]
    Stat { path: PathBuf, source: io::Error },
    #[error("failed to create directory {}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("fingerprint length must be between 1 and {max}, got {length}")]
    InvalidLength { length: usize, max: usize },
}

impl FingerprintError {
    /// The path the failing operation was applied to.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::Stat { path, .. }
            | Self::CreateDir { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::InvalidLength { .. } => None,
        }
    }

    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Stat { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Write { source, .. } => Some(source.kind()),
            Self::InvalidLength { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FingerprintError>;
