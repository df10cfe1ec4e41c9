//! Constants from the PKWARE APPNOTE used by the stream writer.

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4b50;
pub const DATA_DESCRIPTOR_SIGNATURE: u32 = 0x0807_4b50;
pub const CENTRAL_DIRECTORY_HEADER_SIGNATURE: u32 = 0x0201_4b50;
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0605_4b50;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_SIGNATURE: u32 = 0x0606_4b50;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_LOCATOR_SIGNATURE: u32 = 0x0706_4b50;

/// Version 2.0: deflate.
pub const VERSION_DEFLATE: u16 = 20;
/// Version 4.5: ZIP64 format extensions.
pub const VERSION_ZIP64: u16 = 45;
/// MS-DOS host, highest feature version this writer emits.
pub const VERSION_MADE_BY: u16 = VERSION_ZIP64;

/// Bit 3: crc and sizes follow the data in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;
/// Bit 11: language encoding flag, name and comment are UTF-8.
pub const FLAG_UTF8: u16 = 1 << 11;

pub const METHOD_DEFLATE: u16 = 8;

/// 1980-01-01 00:00:00, the earliest MS-DOS timestamp.
pub const DOS_EPOCH_TIME: u16 = 0;
pub const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;

pub const ZIP64_EXTRA_FIELD_ID: u16 = 0x0001;
pub const UNICODE_PATH_EXTRA_FIELD_ID: u16 = 0x7075;
pub const UNICODE_PATH_VERSION: u8 = 1;

pub const U16_SENTINEL: u16 = 0xFFFF;
pub const U32_SENTINEL: u32 = 0xFFFF_FFFF;
/// Values at or above this do not fit a classic 32-bit field.
pub const ZIP64_THRESHOLD: u64 = U32_SENTINEL as u64;

pub const LOCAL_FILE_HEADER_LEN: usize = 30;
pub const CENTRAL_DIRECTORY_HEADER_LEN: usize = 46;
pub const ZIP64_END_OF_CENTRAL_DIRECTORY_LEN: u64 = 56;
