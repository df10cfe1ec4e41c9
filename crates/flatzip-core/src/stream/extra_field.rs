//! Extra fields attached to local and central directory headers.

use super::consts::UNICODE_PATH_EXTRA_FIELD_ID;
use super::consts::UNICODE_PATH_VERSION;
use super::consts::ZIP64_EXTRA_FIELD_ID;
use byteorder::LittleEndian;
use byteorder::WriteBytesExt;
use std::io;

/// When to attach the Info-ZIP Unicode Path extra field (`0x7075`).
///
/// Entry names are always written as UTF-8 with the language encoding flag
/// set. The extra field repeats the name for readers that ignore that flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeExtraFieldPolicy {
    /// Attach the field to every entry.
    #[default]
    Always,
    /// Never attach the field.
    Never,
    /// Attach the field only when the name cannot be represented in the
    /// header encoding.
    ///
    /// Header names are always UTF-8, so this behaves exactly like
    /// [`Never`](Self::Never). It is accepted so configurations that name
    /// this mode keep working.
    NotEncodeable,
}

impl UnicodeExtraFieldPolicy {
    /// Returns whether entries get the extra field under this policy.
    #[must_use]
    pub const fn emits_field(self) -> bool {
        matches!(self, Self::Always)
    }
}

/// A single extra field record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExtraField {
    /// Info-ZIP Unicode Path: version, CRC-32 of the header name, UTF-8 name.
    UnicodePath { name_crc32: u32, name: Vec<u8> },
    /// ZIP64 extended information. Only the fields whose classic header
    /// counterpart holds the sentinel are present, in APPNOTE order.
    Zip64 {
        uncompressed_size: Option<u64>,
        compressed_size: Option<u64>,
        header_offset: Option<u64>,
    },
}

impl ExtraField {
    pub(crate) fn unicode_path(header_name: &[u8]) -> Self {
        Self::UnicodePath {
            name_crc32: crc32fast::hash(header_name),
            name: header_name.to_vec(),
        }
    }

    /// Placeholder sizes for a local header whose real sizes follow in a
    /// data descriptor.
    pub(crate) fn zip64_local() -> Self {
        Self::Zip64 {
            uncompressed_size: Some(0),
            compressed_size: Some(0),
            header_offset: None,
        }
    }

    fn data_size(&self) -> usize {
        match self {
            Self::UnicodePath { name, .. } => 1 + 4 + name.len(),
            Self::Zip64 {
                uncompressed_size,
                compressed_size,
                header_offset,
            } => [uncompressed_size, compressed_size, header_offset]
                .iter()
                .filter(|field| field.is_some())
                .count()
                * 8,
        }
    }

    pub(crate) fn count_bytes(&self) -> usize {
        4 + self.data_size()
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> io::Result<()> {
        let data_size = u16::try_from(self.data_size())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "extra field too large"))?;

        match self {
            Self::UnicodePath { name_crc32, name } => {
                out.write_u16::<LittleEndian>(UNICODE_PATH_EXTRA_FIELD_ID)?;
                out.write_u16::<LittleEndian>(data_size)?;
                out.write_u8(UNICODE_PATH_VERSION)?;
                out.write_u32::<LittleEndian>(*name_crc32)?;
                out.extend_from_slice(name);
            }
            Self::Zip64 {
                uncompressed_size,
                compressed_size,
                header_offset,
            } => {
                out.write_u16::<LittleEndian>(ZIP64_EXTRA_FIELD_ID)?;
                out.write_u16::<LittleEndian>(data_size)?;
                for value in [uncompressed_size, compressed_size, header_offset]
                    .into_iter()
                    .flatten()
                {
                    out.write_u64::<LittleEndian>(*value)?;
                }
            }
        }
        Ok(())
    }
}

/// Total encoded length of `fields`.
pub(crate) fn total_len(fields: &[ExtraField]) -> usize {
    fields.iter().map(ExtraField::count_bytes).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_emits_field() {
        assert!(UnicodeExtraFieldPolicy::Always.emits_field());
        assert!(!UnicodeExtraFieldPolicy::Never.emits_field());
        assert!(!UnicodeExtraFieldPolicy::NotEncodeable.emits_field());
        assert_eq!(
            UnicodeExtraFieldPolicy::default(),
            UnicodeExtraFieldPolicy::Always
        );
    }

    #[test]
    fn test_unicode_path_layout() {
        let name = "café.txt".as_bytes();
        let field = ExtraField::unicode_path(name);

        let mut out = Vec::new();
        field.write_to(&mut out).unwrap();

        assert_eq!(out.len(), field.count_bytes());
        assert_eq!(&out[0..2], &[0x75, 0x70]);
        assert_eq!(
            u16::from_le_bytes([out[2], out[3]]) as usize,
            1 + 4 + name.len()
        );
        assert_eq!(out[4], 1);
        assert_eq!(
            u32::from_le_bytes([out[5], out[6], out[7], out[8]]),
            crc32fast::hash(name)
        );
        assert_eq!(&out[9..], name);
    }

    #[test]
    fn test_zip64_only_present_fields() {
        let field = ExtraField::Zip64 {
            uncompressed_size: None,
            compressed_size: Some(0x1_0000_0000),
            header_offset: Some(7),
        };

        let mut out = Vec::new();
        field.write_to(&mut out).unwrap();

        assert_eq!(out.len(), 4 + 16);
        assert_eq!(&out[0..4], &[0x01, 0x00, 16, 0]);
        assert_eq!(&out[4..12], &0x1_0000_0000u64.to_le_bytes());
        assert_eq!(&out[12..20], &7u64.to_le_bytes());
    }

    #[test]
    fn test_zip64_local_placeholder() {
        let field = ExtraField::zip64_local();
        let mut out = Vec::new();
        field.write_to(&mut out).unwrap();
        assert_eq!(out.len(), 20);
        assert!(out[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_total_len() {
        let fields = [
            ExtraField::zip64_local(),
            ExtraField::unicode_path(b"abc"),
        ];
        assert_eq!(total_len(&fields), 20 + 12);
        assert_eq!(total_len(&[]), 0);
    }
}
