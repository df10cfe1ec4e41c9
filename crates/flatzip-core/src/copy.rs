//! Buffered copy from an input file into an archive entry.
//!
//! The buffer is allocated once per archive and reused for every entry.

use std::io;
use std::io::Read;
use std::io::Write;

use crate::config::DEFAULT_BUFFER_SIZE;

/// Reusable fixed-size buffer for streaming entry data.
///
/// # Examples
///
/// ```
/// use flatzip_core::copy::CopyBuffer;
///
/// let buffer = CopyBuffer::with_size(4096);
/// assert_eq!(buffer.size(), 4096);
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a buffer of the default size (64 KiB).
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a buffer of `size` bytes.
    ///
    /// A zero size is bumped to one byte so copying always makes progress.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            buf: vec![0u8; size.max(1)].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Which side of a copy failed.
#[derive(Debug)]
pub enum CopyError {
    /// Reading from the source failed.
    Read(io::Error),
    /// Writing to the destination failed.
    Write(io::Error),
}

/// Copies `reader` into `writer` through `buffer`, returning the bytes copied.
///
/// Interrupted reads are retried.
///
/// # Errors
///
/// Returns [`CopyError::Read`] or [`CopyError::Write`] depending on which
/// side failed. Nothing is retried besides `Interrupted` reads.
///
/// # Examples
///
/// ```
/// use flatzip_core::copy::CopyBuffer;
/// use flatzip_core::copy::copy_with_buffer;
/// use std::io::Cursor;
///
/// let mut buffer = CopyBuffer::with_size(4);
/// let mut input = Cursor::new(b"hello world".to_vec());
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 11);
/// assert_eq!(output, b"hello world");
/// ```
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total += bytes_read as u64;
    }

    Ok(total)
}
