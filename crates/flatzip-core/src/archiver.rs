//! Flat ZIP archive creation from a list of files.
//!
//! Every input that is a regular file becomes one top-level entry named by
//! its base name. Directories and paths that do not exist are left out
//! without error.

use crate::config::ArchiveConfig;
use crate::copy::CopyBuffer;
use crate::copy::CopyError;
use crate::copy::copy_with_buffer;
use crate::error::ArchiveError;
use crate::error::ErrorCause;
use crate::error::Result;
use crate::report::ArchiveReport;
use crate::stream::EntrySummary;
use crate::stream::UnicodeExtraFieldPolicy;
use crate::stream::ZipStreamWriter;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Creates a ZIP archive in the system temporary directory.
///
/// Returns the path of the new archive. The caller owns the file and is
/// responsible for deleting it.
///
/// # Examples
///
/// ```no_run
/// use flatzip_core::create_archive;
///
/// let archive = create_archive(&["report.pdf", "data/café.csv"])?;
/// println!("wrote {}", archive.display());
/// # Ok::<(), flatzip_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the archive file cannot be allocated, an input file
/// cannot be read, or the archive cannot be written. The partially written
/// file, if any, is named by [`ArchiveError::partial_archive`].
pub fn create_archive<P: AsRef<Path>>(paths: &[P]) -> Result<PathBuf> {
    Archiver::new()
        .paths(paths)
        .create()
        .map(|created| created.path)
}

/// Creates a ZIP archive from path strings.
///
/// Converts each string to a path and delegates to [`create_archive`].
///
/// # Errors
///
/// Same as [`create_archive`].
pub fn create_archive_from_strs<S: AsRef<str>>(paths: &[S]) -> Result<PathBuf> {
    let paths: Vec<PathBuf> = paths
        .iter()
        .map(|path| PathBuf::from(path.as_ref()))
        .collect();
    create_archive(&paths)
}

/// An archive created on disk.
#[derive(Debug, Clone)]
pub struct CreatedArchive {
    /// Path of the archive file. Owned by the caller.
    pub path: PathBuf,
    /// Statistics of the creation.
    pub report: ArchiveReport,
}

/// Builder for creating flat ZIP archives.
///
/// # Examples
///
/// ```no_run
/// use flatzip_core::Archiver;
///
/// let created = Archiver::new()
///     .add_path("notes.txt")
///     .add_path("photos/日本語.jpg")
///     .buffer_size(16 * 1024)
///     .temp_dir("/var/tmp")
///     .create()?;
///
/// println!(
///     "{} entries in {}",
///     created.report.entries_added,
///     created.path.display()
/// );
/// # Ok::<(), flatzip_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Archiver {
    inputs: Vec<PathBuf>,
    config: ArchiveConfig,
}

impl Archiver {
    /// Creates an `Archiver` with no inputs and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one input path.
    #[must_use]
    pub fn add_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    /// Appends several input paths, keeping their order.
    #[must_use]
    pub fn paths<P: AsRef<Path>>(mut self, paths: &[P]) -> Self {
        self.inputs
            .extend(paths.iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Replaces the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ArchiveConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the copy buffer size.
    #[must_use]
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Sets the directory the archive file is allocated in.
    #[must_use]
    pub fn temp_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.config.temp_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Sets the Unicode Path extra field policy.
    #[must_use]
    pub fn unicode_extra_field(mut self, policy: UnicodeExtraFieldPolicy) -> Self {
        self.config.unicode_extra_field = policy;
        self
    }

    /// Returns the configured inputs.
    #[must_use]
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// Allocates a fresh archive file and writes every regular input file to
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the archive file
    /// cannot be allocated, an input cannot be read or the archive cannot be
    /// written.
    pub fn create(&self) -> Result<CreatedArchive> {
        create_with_config(&self.inputs, &self.config)
    }
}

#[tracing::instrument(skip_all, fields(inputs = paths.len()))]
fn create_with_config<P: AsRef<Path>>(
    paths: &[P],
    config: &ArchiveConfig,
) -> Result<CreatedArchive> {
    config.validate()?;

    let (file, path) = allocate_output(config)?;
    tracing::debug!(archive = %path.display(), "allocated archive file");

    let result = write_archive(BufWriter::new(file), paths, config).and_then(|(out, report)| {
        // Surfaces a failed final flush; the file is closed when `_file` drops.
        let _file = out
            .into_inner()
            .map_err(|e| ArchiveError::new(ErrorCause::Write(e.into_error())))?;
        Ok(report)
    });

    match result {
        Ok(report) => Ok(CreatedArchive { path, report }),
        Err(err) => {
            tracing::debug!(archive = %path.display(), error = %err, "archive creation failed");
            Err(err.with_partial_archive(path))
        }
    }
}

/// Writes a flat ZIP archive of `paths` to `writer`.
///
/// This is the streaming core of [`create_archive`], usable with any sink.
/// The writer is returned after the central directory has been written and
/// flushed.
///
/// # Examples
///
/// ```
/// use flatzip_core::ArchiveConfig;
/// use flatzip_core::write_archive;
///
/// let empty: [&str; 0] = [];
/// let (bytes, report) = write_archive(Vec::new(), &empty, &ArchiveConfig::default())?;
/// assert_eq!(report.entries_added, 0);
/// assert_eq!(&bytes[0..4], b"PK\x05\x06");
/// # Ok::<(), flatzip_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be
/// read or the writer fails.
pub fn write_archive<W: Write, P: AsRef<Path>>(
    writer: W,
    paths: &[P],
    config: &ArchiveConfig,
) -> Result<(W, ArchiveReport)> {
    config.validate()?;

    let start = Instant::now();
    let mut zip = ZipStreamWriter::with_unicode_extra_field(writer, config.unicode_extra_field);
    let mut report = ArchiveReport::new();
    let mut buffer = CopyBuffer::with_size(config.buffer_size);

    for source in paths {
        let path = source.as_ref();

        let Some(len) = regular_file_len(path) else {
            tracing::debug!(path = %path.display(), "skipping input that is not a regular file");
            report.record_skipped(path);
            continue;
        };

        let summary = add_file(&mut zip, path, len, &mut buffer)?;
        report.entries_added += 1;
        report.bytes_read += summary.uncompressed_size;
    }

    let (writer, archive_len) = zip.finish_counted().map_err(write_error)?;
    report.bytes_written = archive_len;
    report.duration = start.elapsed();

    tracing::debug!(
        entries = report.entries_added,
        skipped = report.files_skipped(),
        bytes = archive_len,
        "archive finished"
    );
    Ok((writer, report))
}

/// Streams one file into a new entry named by its base name.
fn add_file<W: Write>(
    zip: &mut ZipStreamWriter<W>,
    path: &Path,
    len: u64,
    buffer: &mut CopyBuffer,
) -> Result<EntrySummary> {
    let name = entry_name(path)?;
    let mut file = File::open(path).map_err(|source| read_error(path, source))?;

    let mut entry = zip.start_entry(&name, len).map_err(write_error)?;
    copy_with_buffer(&mut file, &mut entry, buffer).map_err(|err| match err {
        CopyError::Read(source) => read_error(path, source),
        CopyError::Write(source) => write_error(source),
    })?;
    let summary = entry.finish().map_err(write_error)?;

    tracing::debug!(
        name = %name,
        path = %path.display(),
        size = summary.uncompressed_size,
        compressed = summary.compressed_size,
        "added entry"
    );
    Ok(summary)
}

/// Returns the size of `path` if it is a regular file, following symlinks.
fn regular_file_len(path: &Path) -> Option<u64> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Some(metadata.len()),
        Ok(_) => None,
        Err(err) => {
            tracing::trace!(path = %path.display(), error = %err, "cannot stat input");
            None
        }
    }
}

/// Base name of `path`, used as the entry name.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
fn entry_name(path: &Path) -> Result<Cow<'_, str>> {
    path.file_name()
        .map(OsStr::to_string_lossy)
        .ok_or_else(|| {
            ErrorCause::InvalidName {
                path: path.to_path_buf(),
            }
            .into()
        })
}

fn allocate_output(config: &ArchiveConfig) -> Result<(File, PathBuf)> {
    let mut builder = tempfile::Builder::new();
    builder
        .prefix(&config.temp_prefix)
        .suffix(&config.temp_suffix);

    let temp = match &config.temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| ArchiveError::new(ErrorCause::TempFile(e)))?;

    // Detach from tempfile's delete-on-drop; the caller owns the archive.
    temp.keep()
        .map_err(|e| ArchiveError::new(ErrorCause::TempFile(e.error)))
}

fn read_error(path: &Path, source: io::Error) -> ArchiveError {
    ErrorCause::Read {
        path: path.to_path_buf(),
        source,
    }
    .into()
}

fn write_error(source: io::Error) -> ArchiveError {
    ErrorCause::Write(source).into()
}
