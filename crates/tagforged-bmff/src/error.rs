//! Error types for tagforged-bmff.

use crate::bmff::AtomType;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for tagforged-bmff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The expected structure is absent; best-effort callers may skip the edit.
    Soft,
    /// The operation cannot proceed.
    Hard,
}

/// Error type for tagforged-bmff operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The source file could not be read into memory.
    #[error("file unreadable: {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An anchor atom on the required chain is absent.
    #[error("structure missing: {0}")]
    StructureMissing(String),

    /// An atom header violates the size/offset invariants.
    #[error("malformed atom at offset {offset}: {reason}")]
    MalformedBox { offset: usize, reason: String },

    /// Creating the temp file or swapping it over the original failed.
    /// The original file is left untouched.
    #[error("write failed: {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Caller-supplied values cannot be encoded.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An atom would no longer fit a 32-bit size field.
    #[error("atom {atom_type} would be {size} bytes, outside the 32-bit size range")]
    SizeOverflow { atom_type: AtomType, size: i64 },
}

impl Error {
    /// Create a structure missing error.
    pub fn structure_missing(what: impl Into<String>) -> Self {
        Self::StructureMissing(what.into())
    }

    /// Create a malformed atom error.
    pub fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBox {
            offset,
            reason: reason.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub(crate) fn unreadable(path: &Path, source: io::Error) -> Self {
        Self::FileUnreadable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write_failed(path: &Path, source: io::Error) -> Self {
        Self::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify the error. Malformed atoms only abort the scan at their
    /// level, so they count as missing structure.
    pub fn severity(&self) -> Severity {
        match self {
            Self::StructureMissing(_) | Self::MalformedBox { .. } => Severity::Soft,
            _ => Severity::Hard,
        }
    }

    /// Whether a best-effort caller may treat this as a no-op.
    pub fn is_soft(&self) -> bool {
        self.severity() == Severity::Soft
    }
}
