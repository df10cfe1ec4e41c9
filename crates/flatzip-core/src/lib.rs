//! Flat ZIP archive creation.
//!
//! `flatzip-core` bundles a list of files into a single ZIP archive written
//! to a fresh temporary file. Each regular file becomes one top-level,
//! deflate-compressed entry named by its base name. Directories and missing
//! paths are left out, entry names are stored as UTF-8, and ZIP64 records
//! are emitted when an entry or the archive outgrows the classic format.
//!
//! # Examples
//!
//! ```no_run
//! use flatzip_core::create_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let archive = create_archive(&["notes.txt", "photos/café.jpg"])?;
//! println!("archive written to {}", archive.display());
//! std::fs::remove_file(archive)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod copy;
pub mod error;
pub mod report;
pub mod stream;

// Re-export main API types
pub use archiver::Archiver;
pub use archiver::CreatedArchive;
pub use archiver::create_archive;
pub use archiver::create_archive_from_strs;
pub use archiver::write_archive;
pub use config::ArchiveConfig;
pub use error::ArchiveError;
pub use error::ErrorCause;
pub use error::Result;
pub use report::ArchiveReport;
pub use stream::UnicodeExtraFieldPolicy;
