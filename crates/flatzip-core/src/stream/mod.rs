//! Streaming ZIP writer.
//!
//! Writes deflated entries with UTF-8 names, the Info-ZIP Unicode Path extra
//! field and ZIP64 records where sizes or offsets require them.

pub(crate) mod consts;
mod counting;
mod extra_field;
mod writer;

pub use extra_field::UnicodeExtraFieldPolicy;
pub use writer::EntrySummary;
pub use writer::EntryWriter;
pub use writer::ZipStreamWriter;
