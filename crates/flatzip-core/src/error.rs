//! Error types for archive creation.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Underlying cause of a failed archive creation.
///
/// Callers are not expected to branch on this; it is carried for
/// diagnostics through [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum ErrorCause {
    /// The temporary output file could not be allocated.
    #[error("failed to allocate temporary archive file: {0}")]
    TempFile(#[source] std::io::Error),

    /// An input file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The input file being read.
        path: PathBuf,
        /// The I/O error reported by the filesystem.
        #[source]
        source: std::io::Error,
    },

    /// The archive output could not be written.
    #[error("failed to write archive: {0}")]
    Write(#[source] std::io::Error),

    /// An input path has no base name to use as the entry name.
    #[error("{path} has no file name to use as an entry name")]
    InvalidName {
        /// The offending input path.
        path: PathBuf,
    },

    /// The archive configuration was rejected before any file was created.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration is invalid.
        reason: String,
    },
}

/// Archive creation failed.
///
/// This is the only failure surfaced by the crate. The underlying cause is
/// preserved as the error source, and if an output file had already been
/// allocated its path is available through
/// [`partial_archive`](Self::partial_archive) so the caller can delete it.
///
/// # Examples
///
/// ```
/// use flatzip_core::ArchiveError;
/// use flatzip_core::ErrorCause;
///
/// let err = ArchiveError::new(ErrorCause::InvalidConfig {
///     reason: "buffer size must be non-zero".to_string(),
/// });
/// assert!(err.to_string().starts_with("archive creation failed"));
/// assert!(err.partial_archive().is_none());
/// ```
#[derive(Error, Debug)]
#[error("archive creation failed: {cause}")]
pub struct ArchiveError {
    #[source]
    cause: ErrorCause,
    partial_archive: Option<PathBuf>,
}

impl ArchiveError {
    /// Creates an error that left no file behind.
    #[must_use]
    pub fn new(cause: ErrorCause) -> Self {
        Self {
            cause,
            partial_archive: None,
        }
    }

    /// Attaches the path of the partially written archive.
    #[must_use]
    pub fn with_partial_archive(mut self, path: impl Into<PathBuf>) -> Self {
        self.partial_archive = Some(path.into());
        self
    }

    /// Returns the underlying cause.
    #[must_use]
    pub const fn cause(&self) -> &ErrorCause {
        &self.cause
    }

    /// Returns the path of the file left on disk by the failed call, if any.
    ///
    /// The file is never removed by this crate.
    #[must_use]
    pub fn partial_archive(&self) -> Option<&Path> {
        self.partial_archive.as_deref()
    }

    /// Consumes the error and returns the underlying cause.
    #[must_use]
    pub fn into_cause(self) -> ErrorCause {
        self.cause
    }
}

impl From<ErrorCause> for ArchiveError {
    fn from(cause: ErrorCause) -> Self {
        Self::new(cause)
    }
}
