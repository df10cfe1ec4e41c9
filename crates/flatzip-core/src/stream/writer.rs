//! Forward-only ZIP writer.
//!
//! Every entry is deflated at the fastest level and followed by a data
//! descriptor, so the sink never has to seek. Names are written as UTF-8
//! with the language encoding flag set. Duplicate names are written as-is.

use super::consts::CENTRAL_DIRECTORY_HEADER_LEN;
use super::consts::CENTRAL_DIRECTORY_HEADER_SIGNATURE;
use super::consts::DATA_DESCRIPTOR_SIGNATURE;
use super::consts::DOS_EPOCH_DATE;
use super::consts::DOS_EPOCH_TIME;
use super::consts::END_OF_CENTRAL_DIRECTORY_SIGNATURE;
use super::consts::FLAG_DATA_DESCRIPTOR;
use super::consts::FLAG_UTF8;
use super::consts::LOCAL_FILE_HEADER_LEN;
use super::consts::LOCAL_FILE_HEADER_SIGNATURE;
use super::consts::METHOD_DEFLATE;
use super::consts::U16_SENTINEL;
use super::consts::U32_SENTINEL;
use super::consts::VERSION_DEFLATE;
use super::consts::VERSION_MADE_BY;
use super::consts::VERSION_ZIP64;
use super::consts::ZIP64_END_OF_CENTRAL_DIRECTORY_LEN;
use super::consts::ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE;
use super::consts::ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE;
use super::consts::ZIP64_THRESHOLD;
use super::counting::CountingWriter;
use super::extra_field;
use super::extra_field::ExtraField;
use super::extra_field::UnicodeExtraFieldPolicy;
use byteorder::LittleEndian;
use byteorder::WriteBytesExt;
use crc32fast::Hasher;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io;
use std::io::Write;

/// Metadata kept per entry until the central directory is written.
#[derive(Debug, Clone)]
struct CentralRecord {
    name: String,
    crc32: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    header_offset: u64,
    zip64_local: bool,
    unicode_path: bool,
}

/// Summary of an entry returned by [`EntryWriter::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    /// Entry name as stored in the archive.
    pub name: String,
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Size of the deflated data in bytes.
    pub compressed_size: u64,
    /// Size of the uncompressed data in bytes.
    pub uncompressed_size: u64,
}

/// Streaming ZIP archive writer over any [`Write`] sink.
///
/// # Examples
///
/// ```
/// use flatzip_core::stream::ZipStreamWriter;
/// use std::io::Write;
///
/// let mut zip = ZipStreamWriter::new(Vec::new());
///
/// let mut entry = zip.start_entry("hello.txt", 5)?;
/// entry.write_all(b"hello")?;
/// let summary = entry.finish()?;
/// assert_eq!(summary.uncompressed_size, 5);
///
/// let bytes = zip.finish()?;
/// assert_eq!(&bytes[0..4], b"PK\x03\x04");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ZipStreamWriter<W: Write> {
    out: CountingWriter<W>,
    records: Vec<CentralRecord>,
    unicode_extra_field: UnicodeExtraFieldPolicy,
}

impl<W: Write> ZipStreamWriter<W> {
    /// Creates a writer that attaches the Unicode Path extra field to every
    /// entry.
    pub fn new(inner: W) -> Self {
        Self::with_unicode_extra_field(inner, UnicodeExtraFieldPolicy::Always)
    }

    /// Creates a writer with an explicit Unicode Path extra field policy.
    pub fn with_unicode_extra_field(inner: W, policy: UnicodeExtraFieldPolicy) -> Self {
        Self {
            out: CountingWriter::new(inner),
            records: Vec::new(),
            unicode_extra_field: policy,
        }
    }

    /// Number of entries finished so far.
    pub fn entry_count(&self) -> usize {
        self.records.len()
    }

    /// Number of bytes written to the sink so far.
    pub fn position(&self) -> u64 {
        self.out.position()
    }

    /// Writes the local header of a new entry and returns a writer for its
    /// data.
    ///
    /// `size_hint` is the expected uncompressed size. It decides whether the
    /// entry is written with ZIP64 headers; it does not have to be exact, but
    /// an entry that passes 4 GiB without ZIP64 headers fails in
    /// [`EntryWriter::finish`].
    ///
    /// An entry writer dropped without [`EntryWriter::finish`] leaves its
    /// data in the sink but is not listed in the central directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long for a ZIP header or the sink
    /// fails.
    pub fn start_entry(&mut self, name: &str, size_hint: u64) -> io::Result<EntryWriter<'_, W>> {
        let zip64 = needs_zip64(size_hint);
        let unicode_path = self.unicode_extra_field.emits_field();

        let mut extra = Vec::with_capacity(2);
        if zip64 {
            extra.push(ExtraField::zip64_local());
        }
        if unicode_path {
            extra.push(ExtraField::unicode_path(name.as_bytes()));
        }

        let header_offset = self.out.position();
        let header = local_file_header(name.as_bytes(), &extra, zip64)?;
        self.out.write_all(&header)?;
        tracing::trace!(name, header_offset, zip64, "local file header written");

        Ok(EntryWriter {
            data_start: self.out.position(),
            encoder: DeflateEncoder::new(&mut self.out, Compression::fast()),
            records: &mut self.records,
            hasher: Hasher::new(),
            uncompressed_size: 0,
            pending: CentralRecord {
                name: name.to_owned(),
                crc32: 0,
                compressed_size: 0,
                uncompressed_size: 0,
                header_offset,
                zip64_local: zip64,
                unicode_path,
            },
        })
    }

    /// Writes the central directory and end records and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing the sink fails.
    pub fn finish(self) -> io::Result<W> {
        self.finish_counted().map(|(inner, _)| inner)
    }

    /// Like [`finish`](Self::finish), also returning the total archive size.
    pub(crate) fn finish_counted(mut self) -> io::Result<(W, u64)> {
        let cd_offset = self.out.position();
        for record in &self.records {
            let header = central_directory_header(record)?;
            self.out.write_all(&header)?;
        }
        let cd_size = self.out.position() - cd_offset;

        let entries = self.records.len() as u64;
        let trailer = end_of_central_directory(entries, cd_size, cd_offset)?;
        self.out.write_all(&trailer)?;
        self.out.flush()?;

        tracing::trace!(entries, cd_offset, cd_size, "central directory written");
        let archive_len = self.out.position();
        Ok((self.out.into_inner(), archive_len))
    }
}

/// Writer for the data of a single entry.
///
/// Data is hashed and deflated as it is written.
pub struct EntryWriter<'a, W: Write> {
    encoder: DeflateEncoder<&'a mut CountingWriter<W>>,
    records: &'a mut Vec<CentralRecord>,
    hasher: Hasher,
    uncompressed_size: u64,
    data_start: u64,
    pending: CentralRecord,
}

impl<W: Write> EntryWriter<'_, W> {
    /// Flushes the deflate stream, writes the data descriptor and records
    /// the entry for the central directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails or the entry outgrew 4 GiB without
    /// having been started with ZIP64 headers.
    pub fn finish(self) -> io::Result<EntrySummary> {
        let Self {
            encoder,
            records,
            hasher,
            uncompressed_size,
            data_start,
            mut pending,
        } = self;

        let out = encoder.finish()?;
        let compressed_size = out.position() - data_start;
        let crc32 = hasher.finalize();

        if !pending.zip64_local
            && (compressed_size >= ZIP64_THRESHOLD || uncompressed_size >= ZIP64_THRESHOLD)
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "entry {} grew past 4 GiB after its header was written",
                    pending.name
                ),
            ));
        }

        let descriptor = data_descriptor(
            crc32,
            compressed_size,
            uncompressed_size,
            pending.zip64_local,
        )?;
        out.write_all(&descriptor)?;

        pending.crc32 = crc32;
        pending.compressed_size = compressed_size;
        pending.uncompressed_size = uncompressed_size;

        let summary = EntrySummary {
            name: pending.name.clone(),
            crc32,
            compressed_size,
            uncompressed_size,
        };
        records.push(pending);

        tracing::trace!(
            name = %summary.name,
            compressed_size,
            uncompressed_size,
            "entry finished"
        );
        Ok(summary)
    }
}

impl<W: Write> Write for EntryWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.encoder.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.uncompressed_size += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.encoder.flush()
    }
}

/// Worst-case deflate output for `len` input bytes, after zlib's
/// `deflateBound`.
fn deflate_bound(len: u64) -> u64 {
    len.saturating_add(len >> 12)
        .saturating_add(len >> 14)
        .saturating_add(len >> 25)
        .saturating_add(13)
}

fn needs_zip64(size_hint: u64) -> bool {
    deflate_bound(size_hint) >= ZIP64_THRESHOLD
}

const fn version_needed(zip64: bool) -> u16 {
    if zip64 { VERSION_ZIP64 } else { VERSION_DEFLATE }
}

fn header_len(len: usize, what: &str) -> io::Result<u16> {
    u16::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} too long for a ZIP header ({len} bytes)"),
        )
    })
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(U32_SENTINEL)
}

fn clamp_u16(value: u64) -> u16 {
    u16::try_from(value).unwrap_or(U16_SENTINEL)
}

fn write_extra_fields(out: &mut Vec<u8>, fields: &[ExtraField]) -> io::Result<()> {
    for field in fields {
        field.write_to(out)?;
    }
    Ok(())
}

fn local_file_header(name: &[u8], extra: &[ExtraField], zip64: bool) -> io::Result<Vec<u8>> {
    let extra_len = extra_field::total_len(extra);
    let size_placeholder = if zip64 { U32_SENTINEL } else { 0 };

    let mut header = Vec::with_capacity(LOCAL_FILE_HEADER_LEN + name.len() + extra_len);
    header.write_u32::<LittleEndian>(LOCAL_FILE_HEADER_SIGNATURE)?;
    header.write_u16::<LittleEndian>(version_needed(zip64))?;
    header.write_u16::<LittleEndian>(FLAG_DATA_DESCRIPTOR | FLAG_UTF8)?;
    header.write_u16::<LittleEndian>(METHOD_DEFLATE)?;
    header.write_u16::<LittleEndian>(DOS_EPOCH_TIME)?;
    header.write_u16::<LittleEndian>(DOS_EPOCH_DATE)?;
    header.write_u32::<LittleEndian>(0)?; // crc-32, in data descriptor
    header.write_u32::<LittleEndian>(size_placeholder)?; // compressed size
    header.write_u32::<LittleEndian>(size_placeholder)?; // uncompressed size
    header.write_u16::<LittleEndian>(header_len(name.len(), "entry name")?)?;
    header.write_u16::<LittleEndian>(header_len(extra_len, "extra field")?)?;
    header.extend_from_slice(name);
    write_extra_fields(&mut header, extra)?;
    Ok(header)
}

fn data_descriptor(
    crc32: u32,
    compressed_size: u64,
    uncompressed_size: u64,
    zip64: bool,
) -> io::Result<Vec<u8>> {
    let mut descriptor = Vec::with_capacity(24);
    descriptor.write_u32::<LittleEndian>(DATA_DESCRIPTOR_SIGNATURE)?;
    descriptor.write_u32::<LittleEndian>(crc32)?;
    if zip64 {
        descriptor.write_u64::<LittleEndian>(compressed_size)?;
        descriptor.write_u64::<LittleEndian>(uncompressed_size)?;
    } else {
        descriptor.write_u32::<LittleEndian>(clamp_u32(compressed_size))?;
        descriptor.write_u32::<LittleEndian>(clamp_u32(uncompressed_size))?;
    }
    Ok(descriptor)
}

fn central_directory_header(record: &CentralRecord) -> io::Result<Vec<u8>> {
    let overflow = |value: u64| (value >= ZIP64_THRESHOLD).then_some(value);
    let uncompressed_size = overflow(record.uncompressed_size);
    let compressed_size = overflow(record.compressed_size);
    let header_offset = overflow(record.header_offset);
    let zip64_extra =
        uncompressed_size.is_some() || compressed_size.is_some() || header_offset.is_some();

    let mut extra = Vec::with_capacity(2);
    if zip64_extra {
        extra.push(ExtraField::Zip64 {
            uncompressed_size,
            compressed_size,
            header_offset,
        });
    }
    if record.unicode_path {
        extra.push(ExtraField::unicode_path(record.name.as_bytes()));
    }
    let extra_len = extra_field::total_len(&extra);
    let name = record.name.as_bytes();

    let mut header = Vec::with_capacity(CENTRAL_DIRECTORY_HEADER_LEN + name.len() + extra_len);
    header.write_u32::<LittleEndian>(CENTRAL_DIRECTORY_HEADER_SIGNATURE)?;
    header.write_u16::<LittleEndian>(VERSION_MADE_BY)?;
    header.write_u16::<LittleEndian>(version_needed(record.zip64_local || zip64_extra))?;
    header.write_u16::<LittleEndian>(FLAG_DATA_DESCRIPTOR | FLAG_UTF8)?;
    header.write_u16::<LittleEndian>(METHOD_DEFLATE)?;
    header.write_u16::<LittleEndian>(DOS_EPOCH_TIME)?;
    header.write_u16::<LittleEndian>(DOS_EPOCH_DATE)?;
    header.write_u32::<LittleEndian>(record.crc32)?;
    header.write_u32::<LittleEndian>(clamp_u32(record.compressed_size))?;
    header.write_u32::<LittleEndian>(clamp_u32(record.uncompressed_size))?;
    header.write_u16::<LittleEndian>(header_len(name.len(), "entry name")?)?;
    header.write_u16::<LittleEndian>(header_len(extra_len, "extra field")?)?;
    header.write_u16::<LittleEndian>(0)?; // file comment length
    header.write_u16::<LittleEndian>(0)?; // disk number start
    header.write_u16::<LittleEndian>(0)?; // internal file attributes
    header.write_u32::<LittleEndian>(0)?; // external file attributes
    header.write_u32::<LittleEndian>(clamp_u32(record.header_offset))?;
    header.extend_from_slice(name);
    write_extra_fields(&mut header, &extra)?;
    Ok(header)
}

/// Builds the end records. The ZIP64 record, if any, starts right after the
/// central directory.
fn end_of_central_directory(entries: u64, cd_size: u64, cd_offset: u64) -> io::Result<Vec<u8>> {
    let mut trailer = Vec::with_capacity(98);

    let zip64 = entries >= u64::from(U16_SENTINEL)
        || cd_size >= ZIP64_THRESHOLD
        || cd_offset >= ZIP64_THRESHOLD;

    if zip64 {
        let zip64_record_offset = cd_offset + cd_size;

        trailer.write_u32::<LittleEndian>(ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
        // size of the remaining record
        trailer.write_u64::<LittleEndian>(ZIP64_END_OF_CENTRAL_DIRECTORY_LEN - 12)?;
        trailer.write_u16::<LittleEndian>(VERSION_MADE_BY)?;
        trailer.write_u16::<LittleEndian>(VERSION_ZIP64)?;
        trailer.write_u32::<LittleEndian>(0)?; // number of this disk
        trailer.write_u32::<LittleEndian>(0)?; // disk with central directory
        trailer.write_u64::<LittleEndian>(entries)?; // entries on this disk
        trailer.write_u64::<LittleEndian>(entries)?; // total entries
        trailer.write_u64::<LittleEndian>(cd_size)?;
        trailer.write_u64::<LittleEndian>(cd_offset)?;

        trailer.write_u32::<LittleEndian>(ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE)?;
        trailer.write_u32::<LittleEndian>(0)?; // disk with zip64 end record
        trailer.write_u64::<LittleEndian>(zip64_record_offset)?;
        trailer.write_u32::<LittleEndian>(1)?; // total disks
    }

    trailer.write_u32::<LittleEndian>(END_OF_CENTRAL_DIRECTORY_SIGNATURE)?;
    trailer.write_u16::<LittleEndian>(0)?; // number of this disk
    trailer.write_u16::<LittleEndian>(0)?; // disk with central directory
    trailer.write_u16::<LittleEndian>(clamp_u16(entries))?; // entries on this disk
    trailer.write_u16::<LittleEndian>(clamp_u16(entries))?; // total entries
    trailer.write_u32::<LittleEndian>(clamp_u32(cd_size))?;
    trailer.write_u32::<LittleEndian>(clamp_u32(cd_offset))?;
    trailer.write_u16::<LittleEndian>(0)?; // comment length
    Ok(trailer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stream::consts::ZIP64_EXTRA_FIELD_ID;
    use std::io::Cursor;
    use std::io::Read;

    fn u16_at(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn write_entries(entries: &[(&str, &[u8])], policy: UnicodeExtraFieldPolicy) -> Vec<u8> {
        let mut zip = ZipStreamWriter::with_unicode_extra_field(Vec::new(), policy);
        for (name, data) in entries {
            let mut entry = zip.start_entry(name, data.len() as u64).unwrap();
            entry.write_all(data).unwrap();
            entry.finish().unwrap();
        }
        zip.finish().unwrap()
    }

    #[test]
    fn test_empty_archive_is_bare_end_record() {
        let bytes = ZipStreamWriter::new(Vec::new()).finish().unwrap();

        assert_eq!(bytes.len(), 22);
        assert_eq!(u32_at(&bytes, 0), END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        assert!(bytes[4..].iter().all(|&b| b == 0));

        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_local_header_layout() {
        let bytes = write_entries(&[("a.txt", b"abc")], UnicodeExtraFieldPolicy::Never);

        assert_eq!(u32_at(&bytes, 0), LOCAL_FILE_HEADER_SIGNATURE);
        assert_eq!(u16_at(&bytes, 4), VERSION_DEFLATE);
        assert_eq!(u16_at(&bytes, 6), FLAG_DATA_DESCRIPTOR | FLAG_UTF8);
        assert_eq!(u16_at(&bytes, 8), METHOD_DEFLATE);
        assert_eq!(u16_at(&bytes, 12), DOS_EPOCH_DATE);
        assert_eq!(u16_at(&bytes, 26), 5);
        assert_eq!(u16_at(&bytes, 28), 0);
        assert_eq!(&bytes[30..35], b"a.txt");
    }

    #[test]
    fn test_unicode_path_field_in_local_header() {
        let name = "日本語.txt";
        let bytes = write_entries(&[(name, b"x")], UnicodeExtraFieldPolicy::Always);

        let name_len = usize::from(u16_at(&bytes, 26));
        let extra_len = usize::from(u16_at(&bytes, 28));
        assert_eq!(name_len, name.len());
        assert_eq!(extra_len, 4 + 1 + 4 + name.len());

        let extra = &bytes[30 + name_len..30 + name_len + extra_len];
        assert_eq!(u16_at(extra, 0), 0x7075);
        assert_eq!(extra[4], 1);
        assert_eq!(u32_at(extra, 5), crc32fast::hash(name.as_bytes()));
        assert_eq!(&extra[9..], name.as_bytes());
    }

    #[test]
    fn test_roundtrip_with_zip_reader() {
        let big: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let bytes = write_entries(
            &[("café.txt", b"bonjour"), ("empty", b""), ("big.bin", &big)],
            UnicodeExtraFieldPolicy::Always,
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 3);

        let mut content = Vec::new();
        archive
            .by_name("café.txt")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"bonjour");

        content.clear();
        archive.by_name("empty").unwrap().read_to_end(&mut content).unwrap();
        assert!(content.is_empty());

        content.clear();
        archive
            .by_name("big.bin")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, big);
    }

    #[test]
    fn test_duplicate_names_are_kept() {
        let bytes = write_entries(
            &[("same.txt", b"one"), ("same.txt", b"two")],
            UnicodeExtraFieldPolicy::Always,
        );

        let eocd = bytes.len() - 22;
        assert_eq!(u32_at(&bytes, eocd), END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        assert_eq!(u16_at(&bytes, eocd + 8), 2);
        assert_eq!(u16_at(&bytes, eocd + 10), 2);
    }

    #[test]
    fn test_entry_summary() {
        let mut zip = ZipStreamWriter::new(Vec::new());
        let mut entry = zip.start_entry("data", 11).unwrap();
        entry.write_all(b"hello world").unwrap();
        let summary = entry.finish().unwrap();

        assert_eq!(summary.name, "data");
        assert_eq!(summary.uncompressed_size, 11);
        assert_eq!(summary.crc32, crc32fast::hash(b"hello world"));
        assert!(summary.compressed_size > 0);
        assert_eq!(zip.entry_count(), 1);
    }

    #[test]
    fn test_data_descriptor_follows_data() {
        let mut zip = ZipStreamWriter::with_unicode_extra_field(
            Vec::new(),
            UnicodeExtraFieldPolicy::Never,
        );
        let mut entry = zip.start_entry("d", 3).unwrap();
        entry.write_all(b"xyz").unwrap();
        let summary = entry.finish().unwrap();
        let end_of_entry = zip.position();
        let bytes = zip.finish().unwrap();

        let dd = usize::try_from(end_of_entry).unwrap() - 16;
        assert_eq!(u32_at(&bytes, dd), DATA_DESCRIPTOR_SIGNATURE);
        assert_eq!(u32_at(&bytes, dd + 4), summary.crc32);
        assert_eq!(
            u64::from(u32_at(&bytes, dd + 8)),
            summary.compressed_size
        );
        assert_eq!(u32_at(&bytes, dd + 12), 3);
    }

    #[test]
    fn test_zip64_entry_from_size_hint() {
        let mut zip = ZipStreamWriter::with_unicode_extra_field(
            Vec::new(),
            UnicodeExtraFieldPolicy::Never,
        );
        let mut entry = zip.start_entry("huge", 5 * 1024 * 1024 * 1024).unwrap();
        entry.write_all(b"actually small").unwrap();
        entry.finish().unwrap();
        let end_of_entry = zip.position();
        let bytes = zip.finish().unwrap();

        assert_eq!(u16_at(&bytes, 4), VERSION_ZIP64);
        assert_eq!(u32_at(&bytes, 18), U32_SENTINEL);
        assert_eq!(u32_at(&bytes, 22), U32_SENTINEL);
        assert_eq!(u16_at(&bytes, 28), 20);
        assert_eq!(u16_at(&bytes, 30 + 4), ZIP64_EXTRA_FIELD_ID);

        let dd = usize::try_from(end_of_entry).unwrap() - 24;
        assert_eq!(u32_at(&bytes, dd), DATA_DESCRIPTOR_SIGNATURE);

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "actually small");
    }

    #[test]
    fn test_needs_zip64_threshold() {
        assert!(!needs_zip64(0));
        assert!(!needs_zip64(1024 * 1024 * 1024));
        assert!(needs_zip64(u64::from(u32::MAX)));
        assert!(needs_zip64(u64::from(u32::MAX) - 1024));
        assert!(needs_zip64(u64::MAX));
    }

    #[test]
    fn test_zip64_end_records() {
        let trailer = end_of_central_directory(70_000, 100, 200).unwrap();

        assert_eq!(trailer.len(), 56 + 20 + 22);
        assert_eq!(u32_at(&trailer, 0), ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        assert_eq!(u32_at(&trailer, 56), ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE);
        assert_eq!(u32_at(&trailer, 64), 300);

        let eocd = 76;
        assert_eq!(u32_at(&trailer, eocd), END_OF_CENTRAL_DIRECTORY_SIGNATURE);
        assert_eq!(u16_at(&trailer, eocd + 10), U16_SENTINEL);
        assert_eq!(u32_at(&trailer, eocd + 12), 100);
    }

    #[test]
    fn test_central_directory_zip64_offset() {
        let record = CentralRecord {
            name: "far".to_string(),
            crc32: 1,
            compressed_size: 10,
            uncompressed_size: 10,
            header_offset: 0x1_0000_0000,
            zip64_local: false,
            unicode_path: false,
        };
        let header = central_directory_header(&record).unwrap();

        assert_eq!(u16_at(&header, 6), VERSION_ZIP64);
        assert_eq!(u32_at(&header, 20), 10);
        assert_eq!(u32_at(&header, 42), U32_SENTINEL);
        assert_eq!(u16_at(&header, 30), 12);
        let extra = &header[46 + 3..];
        assert_eq!(u16_at(extra, 0), 0x0001);
        assert_eq!(u16_at(extra, 2), 8);
        assert_eq!(&extra[4..12], &0x1_0000_0000u64.to_le_bytes());
    }

    #[test]
    fn test_sink_failure_surfaces() {
        let mut storage = [0u8; 10];
        let mut zip = ZipStreamWriter::new(&mut storage[..]);
        assert!(zip.start_entry("too-long-for-the-sink.txt", 0).is_err());
    }
}
