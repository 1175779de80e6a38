//! Entry headers and key layout.
//!
//! An entry is a fixed header followed by variable-length key material. The
//! two schema versions disagree on where padding goes:
//!
//! * V0 pads the whole entry (header + modulus + exponent) once at the end.
//! * V1 pads each key field on its own and never pads the entry as a whole.
//!
//! [`KeyLayout`] is the only place that turns a header into offsets, so the
//! walker and the decoder always agree on how long an entry is.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::align::checked_align_up4;
use crate::error::{DecodeError, Result};
use crate::reader::{add, Reader};
use crate::schema::SchemaVersion;

/// SHA-1 digest length of the subject name hash.
pub const NAME_HASH_LEN: usize = 20;

/// Length of a V0 date. Its internal layout is undocumented.
pub const LEGACY_DATE_LEN: usize = 21;

/// `name_hash[20] modulus_len:u16 exponent_len:u16 start[21] expiry[21]`
pub const ENTRY_HEADER_V0_SIZE: usize = NAME_HASH_LEN + 2 + 2 + LEGACY_DATE_LEN * 2;

/// Packed size of [`SystemTime`].
pub const SYSTEM_TIME_SIZE: usize = 8;

/// Packed size of [`PubKeyInfo`]: type tag plus two `u16`s.
pub const PUB_KEY_INFO_SIZE: usize = 8;

/// `name_hash[20] start:SystemTime expiry:SystemTime pub_key:PubKeyInfo`
pub const ENTRY_HEADER_V1_SIZE: usize = NAME_HASH_LEN + SYSTEM_TIME_SIZE * 2 + PUB_KEY_INFO_SIZE;

/// Type tag of an RSA key in a V1 header.
pub const PUBKEY_TYPE_RSA: u32 = 1;

/// Type tag of an ECDSA key in a V1 header.
pub const PUBKEY_TYPE_ECDSA: u32 = 2;

/// Fixed header size for a schema version.
pub fn header_size(version: SchemaVersion) -> Option<usize> {
    match version {
        SchemaVersion::V0 => Some(ENTRY_HEADER_V0_SIZE),
        SchemaVersion::V1 => Some(ENTRY_HEADER_V1_SIZE),
        SchemaVersion::Unrecognized => None,
    }
}

/// Calendar time as stored by the module (`year:u16 month day hour minute
/// second`, one pad byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl SystemTime {
    fn read(r: &Reader<'_>, at: usize) -> Result<Self> {
        r.require(at, SYSTEM_TIME_SIZE)?;
        Ok(Self {
            year: r.u16_le(at)?,
            month: r.u8(at + 2)?,
            day: r.u8(at + 3)?,
            hour: r.u8(at + 4)?,
            minute: r.u8(at + 5)?,
            second: r.u8(at + 6)?,
        })
    }

    /// `None` if the stored fields are not a valid calendar time.
    pub fn to_naive_datetime(&self) -> Option<chrono::NaiveDateTime> {
        chrono::NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?
            .and_hms_opt(self.hour.into(), self.minute.into(), self.second.into())
    }
}

/// V1 public key descriptor, discriminated by its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PubKeyInfo {
    Rsa { n_size: u16, e_size: u16 },
    Ecdsa { curve_id: u16, key_size: u16 },
}

impl PubKeyInfo {
    /// `entry` is the offset of the owning entry, used in error reports.
    fn read(r: &Reader<'_>, at: usize, entry: usize) -> Result<Self> {
        let tag = r.u32_le(at)?;
        let a = r.u16_le(at + 4)?;
        let b = r.u16_le(at + 6)?;
        match tag {
            PUBKEY_TYPE_RSA => Ok(Self::Rsa { n_size: a, e_size: b }),
            PUBKEY_TYPE_ECDSA => Ok(Self::Ecdsa { curve_id: a, key_size: b }),
            tag => Err(DecodeError::UnknownKeyType { tag, at: entry }),
        }
    }
}

/// Header of a 19.4.x entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeaderV0<'a> {
    pub name_hash: &'a [u8; NAME_HASH_LEN],
    pub modulus_len: u16,
    pub exponent_len: u16,
    pub start_date: &'a [u8; LEGACY_DATE_LEN],
    pub expiry_date: &'a [u8; LEGACY_DATE_LEN],
}

/// Header of a 19.5.x entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeaderV1<'a> {
    pub name_hash: &'a [u8; NAME_HASH_LEN],
    pub start_date: SystemTime,
    pub expiry_date: SystemTime,
    pub pub_key: PubKeyInfo,
}

/// Entry header of either schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryHeader<'a> {
    V0(EntryHeaderV0<'a>),
    V1(EntryHeaderV1<'a>),
}

impl<'a> EntryHeader<'a> {
    /// Parse the fixed header at `offset`.
    ///
    /// The whole header must fit before any field is read. `version` must be
    /// a recognized schema; callers map `Unrecognized` to an error first.
    pub(crate) fn read(r: &Reader<'a>, version: SchemaVersion, offset: usize) -> Result<Self> {
        let size = header_size(version).ok_or(DecodeError::Truncated { at: offset })?;
        r.require(offset, size)?;

        match version {
            SchemaVersion::V0 => Ok(Self::V0(EntryHeaderV0 {
                name_hash: r.array(offset)?,
                modulus_len: r.u16_le(offset + 20)?,
                exponent_len: r.u16_le(offset + 22)?,
                start_date: r.array(offset + 24)?,
                expiry_date: r.array(offset + 24 + LEGACY_DATE_LEN)?,
            })),
            SchemaVersion::V1 => Ok(Self::V1(EntryHeaderV1 {
                name_hash: r.array(offset)?,
                start_date: SystemTime::read(r, offset + 20)?,
                expiry_date: SystemTime::read(r, offset + 20 + SYSTEM_TIME_SIZE)?,
                pub_key: PubKeyInfo::read(r, offset + 20 + SYSTEM_TIME_SIZE * 2, offset)?,
            })),
            SchemaVersion::Unrecognized => Err(DecodeError::Truncated { at: offset }),
        }
    }

    pub fn name_hash(&self) -> &'a [u8; NAME_HASH_LEN] {
        match self {
            Self::V0(h) => h.name_hash,
            Self::V1(h) => h.name_hash,
        }
    }

    fn size(&self) -> usize {
        match self {
            Self::V0(_) => ENTRY_HEADER_V0_SIZE,
            Self::V1(_) => ENTRY_HEADER_V1_SIZE,
        }
    }

    /// Lay out the key material of the entry whose header starts at
    /// `offset`. Nothing past the header is read.
    pub fn layout(&self, offset: usize) -> Result<KeyLayout> {
        let key_start = add(offset, self.size(), offset)?;
        let aligned = |len: u16| checked_align_up4(len.into()).ok_or(DecodeError::Truncated { at: offset });

        let (fields, end) = match *self {
            Self::V0(h) => {
                let modulus = key_start..add(key_start, h.modulus_len.into(), offset)?;
                let exponent = modulus.end..add(modulus.end, h.exponent_len.into(), offset)?;
                let end = checked_align_up4(exponent.end).ok_or(DecodeError::Truncated { at: offset })?;
                (KeyFields::Rsa { modulus, exponent }, end)
            }
            Self::V1(EntryHeaderV1 { pub_key: PubKeyInfo::Rsa { n_size, e_size }, .. }) => {
                let modulus = key_start..add(key_start, n_size.into(), offset)?;
                let exp_start = add(key_start, aligned(n_size)?, offset)?;
                let exponent = exp_start..add(exp_start, e_size.into(), offset)?;
                let end = add(exp_start, aligned(e_size)?, offset)?;
                (KeyFields::Rsa { modulus, exponent }, end)
            }
            Self::V1(EntryHeaderV1 { pub_key: PubKeyInfo::Ecdsa { curve_id, key_size }, .. }) => {
                let point_len = usize::from(key_size) * 2;
                let point = key_start..add(key_start, point_len, offset)?;
                let padded = aligned(key_size)?
                    .checked_mul(2)
                    .ok_or(DecodeError::Truncated { at: offset })?;
                let end = add(key_start, padded, offset)?;
                (KeyFields::Ecdsa { curve_id, point }, end)
            }
        };

        Ok(KeyLayout { offset, fields, end })
    }
}

/// Absolute byte ranges of an entry's key fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFields {
    Rsa { modulus: Range<usize>, exponent: Range<usize> },
    Ecdsa { curve_id: u16, point: Range<usize> },
}

/// Where an entry's key material lives and where the next entry begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLayout {
    /// Offset of the entry header.
    pub offset: usize,
    pub fields: KeyFields,
    /// Offset of the next entry, padding included.
    pub end: usize,
}

impl KeyLayout {
    /// Bytes from the start of this entry to the start of the next.
    pub fn len(&self) -> usize {
        self.end - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.offset
    }
}
