//! Version-independent view of a single entry.

use crate::entry::{EntryHeader, KeyFields, SystemTime, LEGACY_DATE_LEN, NAME_HASH_LEN};
use crate::error::Result;
use crate::reader::Reader;
use crate::schema::SchemaVersion;
use crate::walker::entry_header;

/// Validity bound of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryDate<'a> {
    /// V0 date: 21 bytes with no known field layout, kept as stored.
    Legacy(&'a [u8; LEGACY_DATE_LEN]),
    /// V1 date.
    Calendar(SystemTime),
}

impl EntryDate<'_> {
    pub fn as_calendar(&self) -> Option<&SystemTime> {
        match self {
            Self::Calendar(t) => Some(t),
            Self::Legacy(_) => None,
        }
    }
}

/// Public key material, borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey<'a> {
    /// Big-endian modulus and exponent, uninterpreted.
    Rsa { modulus: &'a [u8], exponent: &'a [u8] },
    /// Concatenated X and Y coordinates; `curve_id` is passed through as
    /// stored.
    Ecdsa { curve_id: u16, point: &'a [u8] },
}

impl PublicKey<'_> {
    /// RSA exponent as an integer, for diagnostics.
    ///
    /// `None` for ECDSA keys, empty exponents, and exponents longer than
    /// eight bytes.
    pub fn exponent_value(&self) -> Option<u64> {
        match self {
            Self::Rsa { exponent, .. } if !exponent.is_empty() && exponent.len() <= 8 => {
                Some(exponent.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rsa { .. } => "RSA",
            Self::Ecdsa { .. } => "ECDSA",
        }
    }
}

/// One decoded certificate entry. All byte fields point into the store
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedEntry<'a> {
    /// Position in the store, counting from zero.
    pub index: u32,
    /// Byte offset of the entry header.
    pub offset: usize,
    /// Bytes up to the next entry, including trailing padding.
    pub len: usize,
    /// SHA-1 of the certificate subject name.
    pub name_hash: &'a [u8; NAME_HASH_LEN],
    pub not_before: EntryDate<'a>,
    pub not_after: EntryDate<'a>,
    pub public_key: PublicKey<'a>,
}

impl DecodedEntry<'_> {
    /// Offset at which the following entry would start.
    pub fn next_offset(&self) -> usize {
        self.offset + self.len
    }
}

/// Decode entry `index` whose header starts at `offset`.
///
/// Reads the header and then the key fields laid out by
/// [`EntryHeader::layout`]. Trailing padding after the last key field is
/// not required to be present.
pub fn decode_entry(buffer: &[u8], version: SchemaVersion, index: u32, offset: usize) -> Result<DecodedEntry<'_>> {
    let header = entry_header(buffer, version, offset)?;
    let layout = header.layout(offset)?;
    let len = layout.len();
    let r = Reader::new(buffer);

    let public_key = match layout.fields {
        KeyFields::Rsa { modulus, exponent } => PublicKey::Rsa {
            modulus: r.bytes(modulus.start, modulus.len())?,
            exponent: r.bytes(exponent.start, exponent.len())?,
        },
        KeyFields::Ecdsa { curve_id, point } => PublicKey::Ecdsa {
            curve_id,
            point: r.bytes(point.start, point.len())?,
        },
    };

    let (not_before, not_after) = match header {
        EntryHeader::V0(h) => (EntryDate::Legacy(h.start_date), EntryDate::Legacy(h.expiry_date)),
        EntryHeader::V1(h) => (EntryDate::Calendar(h.start_date), EntryDate::Calendar(h.expiry_date)),
    };

    Ok(DecodedEntry {
        index,
        offset,
        len,
        name_hash: header.name_hash(),
        not_before,
        not_after,
        public_key,
    })
}
