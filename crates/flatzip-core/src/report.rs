//! Archive creation reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive creation operation.
///
/// # Examples
///
/// ```
/// use flatzip_core::ArchiveReport;
///
/// let mut report = ArchiveReport::default();
/// report.entries_added = 2;
/// report.bytes_read = 1024;
/// report.bytes_written = 256;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.files_skipped(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveReport {
    /// Number of entries written to the archive.
    pub entries_added: usize,

    /// Inputs that were not regular files and were left out.
    pub skipped: Vec<PathBuf>,

    /// Total bytes read from input files (uncompressed).
    pub bytes_read: u64,

    /// Total size of the finished archive in bytes.
    pub bytes_written: u64,

    /// Duration of the creation operation.
    pub duration: Duration,
}

impl ArchiveReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an input that was left out of the archive.
    pub fn record_skipped(&mut self, path: impl Into<PathBuf>) {
        self.skipped.push(path.into());
    }

    /// Returns the number of inputs left out of the archive.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Returns the ratio of input bytes to archive bytes.
    ///
    /// Returns 0.0 if nothing was written.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.bytes_written as f64
    }
}
