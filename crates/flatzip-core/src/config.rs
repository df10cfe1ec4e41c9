//! Configuration for archive creation.

use crate::error::ErrorCause;
use crate::error::Result;
use crate::stream::UnicodeExtraFieldPolicy;
use std::path::PathBuf;

/// Default size of the intermediate copy buffer (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Configuration for archive creation.
///
/// The compression setting is fixed to the fastest deflate level and is not
/// part of the configuration.
///
/// # Examples
///
/// ```
/// use flatzip_core::ArchiveConfig;
/// use flatzip_core::UnicodeExtraFieldPolicy;
///
/// let config = ArchiveConfig::default()
///     .with_buffer_size(8 * 1024)
///     .with_unicode_extra_field(UnicodeExtraFieldPolicy::Never);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Size of the buffer each input file is streamed through.
    ///
    /// Default: 64 KiB. Must be non-zero.
    pub buffer_size: usize,

    /// When to attach the Info-ZIP Unicode Path extra field to entries.
    ///
    /// Default: [`UnicodeExtraFieldPolicy::Always`].
    pub unicode_extra_field: UnicodeExtraFieldPolicy,

    /// Directory in which the output archive is allocated.
    ///
    /// `None` uses the system temporary directory.
    ///
    /// Default: `None`.
    pub temp_dir: Option<PathBuf>,

    /// File name prefix of the allocated archive.
    ///
    /// Default: `"zip"`.
    pub temp_prefix: String,

    /// File name suffix of the allocated archive.
    ///
    /// Default: `".zip"`.
    pub temp_suffix: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            unicode_extra_field: UnicodeExtraFieldPolicy::Always,
            temp_dir: None,
            temp_prefix: "zip".to_string(),
            temp_suffix: ".zip".to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Creates a new `ArchiveConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the copy buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the Unicode Path extra field policy.
    #[must_use]
    pub fn with_unicode_extra_field(mut self, policy: UnicodeExtraFieldPolicy) -> Self {
        self.unicode_extra_field = policy;
        self
    }

    /// Sets the directory the archive is allocated in.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    /// Sets the archive file name prefix.
    #[must_use]
    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    /// Sets the archive file name suffix.
    #[must_use]
    pub fn with_temp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.temp_suffix = suffix.into();
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The buffer size is zero
    /// - The prefix or suffix contains a path separator
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(invalid("buffer size must be non-zero"));
        }
        if contains_separator(&self.temp_prefix) {
            return Err(invalid("temp prefix must not contain a path separator"));
        }
        if contains_separator(&self.temp_suffix) {
            return Err(invalid("temp suffix must not contain a path separator"));
        }
        Ok(())
    }
}

fn contains_separator(s: &str) -> bool {
    s.chars().any(std::path::is_separator)
}

fn invalid(reason: &str) -> crate::ArchiveError {
    ErrorCause::InvalidConfig {
        reason: reason.to_string(),
    }
    .into()
}
