//! Store header and schema version detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DecodeError, Result};
use crate::reader::Reader;

/// Length of the start pattern at offset 0.
pub const MAGIC_LEN: usize = 16;

/// Size of [`StoreHeader`] on flash: magic plus a `u32` entry count.
pub const STORE_HEADER_SIZE: usize = MAGIC_LEN + 4;

/// Start pattern written by 19.4.x firmware.
pub const MAGIC_V0: [u8; MAGIC_LEN] = [
    0x01, 0xF1, 0x02, 0xF2, 0x03, 0xF3, 0x04, 0xF4, 0x05, 0xF5, 0x06, 0xF6, 0x07, 0xF7, 0x08, 0xF8,
];

/// Start pattern written by 19.5.x firmware.
pub const MAGIC_V1: [u8; MAGIC_LEN] = [
    0x11, 0xF1, 0x12, 0xF2, 0x13, 0xF3, 0x14, 0xF4, 0x15, 0xF5, 0x16, 0xF6, 0x17, 0xF7, 0x18, 0xF8,
];

/// Contents of an erased, never-programmed flash sector.
pub const MAGIC_ERASED: [u8; MAGIC_LEN] = [0xFF; MAGIC_LEN];

/// On-flash layout variant, selected by the start pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVersion {
    V0,
    V1,
    /// Neither pattern matched. The entry count is still readable but no
    /// entry can be walked.
    Unrecognized,
}

impl SchemaVersion {
    /// Match a start pattern exactly. V0 is tried first.
    pub fn from_magic(magic: &[u8; MAGIC_LEN]) -> Self {
        if *magic == MAGIC_V0 {
            Self::V0
        } else if *magic == MAGIC_V1 {
            Self::V1
        } else {
            Self::Unrecognized
        }
    }

    /// Firmware line that writes this layout.
    pub fn firmware(&self) -> Option<&'static str> {
        match self {
            Self::V0 => Some("19.4.x"),
            Self::V1 => Some("19.5.x"),
            Self::Unrecognized => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V0 => write!(f, "version 0"),
            Self::V1 => write!(f, "version 1"),
            Self::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Fixed header at the start of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHeader {
    pub magic: [u8; MAGIC_LEN],
    pub entry_count: u32,
}

impl StoreHeader {
    /// Parse the first [`STORE_HEADER_SIZE`] bytes of `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < STORE_HEADER_SIZE {
            return Err(DecodeError::TooShort { len: buffer.len() });
        }
        let r = Reader::new(buffer);
        Ok(Self {
            magic: *r.array::<MAGIC_LEN>(0)?,
            entry_count: r.u32_le(MAGIC_LEN)?,
        })
    }

    pub fn schema(&self) -> SchemaVersion {
        SchemaVersion::from_magic(&self.magic)
    }

    /// True when the magic is the erased-flash pattern, i.e. no store was
    /// ever written.
    pub fn is_erased(&self) -> bool {
        self.magic == MAGIC_ERASED
    }
}

/// Detect the schema version of a store buffer.
///
/// An unknown pattern is `Ok(SchemaVersion::Unrecognized)`, not an error;
/// only a buffer too short to hold the header fails.
pub fn detect_schema(buffer: &[u8]) -> Result<SchemaVersion> {
    let schema = StoreHeader::parse(buffer)?.schema();
    log::trace!("detected root certificate store schema: {}", schema);
    Ok(schema)
}
