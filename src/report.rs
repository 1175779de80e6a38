//! Store report (JSON)
//!
//! Owned, serializable summary of a decoded store. Byte fields are lowercase
//! hex; structured dates also carry an ISO-8601 rendering when they form a
//! valid calendar time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rootcert_format::{
    decode_store, DecodeError, DecodedEntry, EntryDate, PublicKey, SchemaVersion, SystemTime,
};

/// Schema version for the report
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Schema identifier for the report
pub const REPORT_SCHEMA_ID: &str = "winc-rootcert/store_report@1";

/// Errors producing a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to decode store: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Validity bound as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DateReport {
    /// Undocumented 19.4.x encoding, raw bytes as hex
    Legacy { raw: String },
    /// 19.5.x calendar time
    Calendar {
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        /// `None` when the fields are not a valid date
        #[serde(skip_serializing_if = "Option::is_none")]
        iso8601: Option<String>,
    },
}

impl DateReport {
    fn from_date(date: &EntryDate<'_>) -> Self {
        match date {
            EntryDate::Legacy(raw) => Self::Legacy { raw: hex::encode(raw) },
            EntryDate::Calendar(t) => Self::from_time(t),
        }
    }

    fn from_time(t: &SystemTime) -> Self {
        Self::Calendar {
            year: t.year,
            month: t.month,
            day: t.day,
            hour: t.hour,
            minute: t.minute,
            second: t.second,
            iso8601: t
                .to_naive_datetime()
                .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

/// Public key as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KeyReport {
    Rsa {
        modulus_len: usize,
        exponent_len: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        modulus: Option<String>,
        exponent: String,
        /// Exponent as an integer, when it fits in 64 bits
        #[serde(skip_serializing_if = "Option::is_none")]
        exponent_value: Option<u64>,
    },
    Ecdsa {
        curve_id: u16,
        point_len: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        point: Option<String>,
    },
}

impl KeyReport {
    fn from_key(key: &PublicKey<'_>, show_key_material: bool) -> Self {
        match *key {
            PublicKey::Rsa { modulus, exponent } => Self::Rsa {
                modulus_len: modulus.len(),
                exponent_len: exponent.len(),
                modulus: show_key_material.then(|| hex::encode(modulus)),
                exponent: hex::encode(exponent),
                exponent_value: key.exponent_value(),
            },
            PublicKey::Ecdsa { curve_id, point } => Self::Ecdsa {
                curve_id,
                point_len: point.len(),
                point: show_key_material.then(|| hex::encode(point)),
            },
        }
    }
}

/// One entry as reported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReport {
    pub index: u32,
    pub offset: usize,
    /// Bytes up to the next entry, padding included
    pub length: usize,
    /// SHA-1 of the subject name, hex
    pub name_hash: String,
    pub not_before: DateReport,
    pub not_after: DateReport,
    pub public_key: KeyReport,
}

impl EntryReport {
    pub fn from_entry(entry: &DecodedEntry<'_>, show_key_material: bool) -> Self {
        Self {
            index: entry.index,
            offset: entry.offset,
            length: entry.len,
            name_hash: hex::encode(entry.name_hash),
            not_before: DateReport::from_date(&entry.not_before),
            not_after: DateReport::from_date(&entry.not_after),
            public_key: KeyReport::from_key(&entry.public_key, show_key_material),
        }
    }
}

/// Whole-store report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreReport {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When the report was created
    pub created_at: DateTime<Utc>,

    /// Image the store was read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Image size in bytes
    pub image_bytes: usize,

    /// Detected store layout
    pub store_schema: SchemaVersion,

    /// Firmware line that writes this layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,

    /// Magic bytes, hex
    pub magic: String,

    /// True when the magic is erased flash
    pub erased: bool,

    /// Entry count declared in the header
    pub entry_count: u32,

    /// Entries decoded before the first error or the limit
    pub entries: Vec<EntryReport>,

    /// True when every declared entry decoded
    pub complete: bool,

    /// Decode failure that ended the sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip)]
    failure: Option<DecodeError>,
}

impl StoreReport {
    /// Decode `buffer` into a report.
    ///
    /// Fails only when the buffer cannot hold a store header; later decode
    /// failures are recorded in `error` alongside the entries that decoded.
    pub fn from_buffer(buffer: &[u8], limit: Option<u32>, show_key_material: bool) -> Result<Self, ReportError> {
        let mut store = decode_store(buffer)?;
        let header = *store.header();

        let mut entries = Vec::new();
        let mut failure = None;
        for item in store.by_ref() {
            match item {
                Ok(entry) => entries.push(EntryReport::from_entry(&entry, show_key_material)),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
            if limit.is_some_and(|limit| entries.len() as u64 >= u64::from(limit)) {
                break;
            }
        }

        let schema = header.schema();
        Ok(Self {
            schema_version: REPORT_SCHEMA_VERSION,
            schema_id: REPORT_SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            image: None,
            image_bytes: buffer.len(),
            store_schema: schema,
            firmware: schema.firmware().map(str::to_string),
            magic: hex::encode(header.magic),
            erased: header.is_erased(),
            entry_count: header.entry_count,
            complete: failure.is_none() && entries.len() as u64 == u64::from(header.entry_count),
            entries,
            error: failure.map(|e| e.to_string()),
            failure,
        })
    }

    /// Decode failure that ended the sequence, if any
    pub fn failure(&self) -> Option<&DecodeError> {
        self.failure.as_ref()
    }

    /// Record the image path
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rootcert_format::{MAGIC_V0, MAGIC_V1};

    fn v1_ecdsa_store() -> Vec<u8> {
        let mut buf = MAGIC_V1.to_vec();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0xAB; 20]);
        buf.extend_from_slice(&[0xE8, 0x07, 2, 29, 8, 0, 1, 0]);
        buf.extend_from_slice(&[0xE8, 0x07, 2, 30, 0, 0, 0, 0]);
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&23u16.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        buf
    }

    #[test]
    fn test_report_v1_ecdsa() {
        let report = StoreReport::from_buffer(&v1_ecdsa_store(), None, true).unwrap();
        assert_eq!(report.store_schema, SchemaVersion::V1);
        assert_eq!(report.firmware.as_deref(), Some("19.5.x"));
        assert!(report.complete);
        assert_eq!(report.entries.len(), 1);

        let entry = &report.entries[0];
        assert_eq!(entry.name_hash, "ab".repeat(20));
        assert_eq!(
            entry.public_key,
            KeyReport::Ecdsa { curve_id: 23, point_len: 8, point: Some("0102030405060708".to_string()) }
        );
        match &entry.not_before {
            DateReport::Calendar { iso8601, .. } => {
                assert_eq!(iso8601.as_deref(), Some("2024-02-29T08:00:01"));
            }
            other => panic!("expected calendar date, got {:?}", other),
        }
        // Feb 30 is kept as stored but has no ISO rendering.
        match &entry.not_after {
            DateReport::Calendar { day, iso8601, .. } => {
                assert_eq!(*day, 30);
                assert!(iso8601.is_none());
            }
            other => panic!("expected calendar date, got {:?}", other),
        }
    }

    #[test]
    fn test_report_json_shape() {
        let report = StoreReport::from_buffer(&v1_ecdsa_store(), None, false)
            .unwrap()
            .with_image("flash.bin");
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["schema_id"], REPORT_SCHEMA_ID);
        assert_eq!(json["store_schema"], "v1");
        assert_eq!(json["image"], "flash.bin");
        assert_eq!(json["entries"][0]["public_key"]["type"], "ecdsa");
        assert!(json["entries"][0]["public_key"].get("point").is_none());
        assert_eq!(json["entries"][0]["not_before"]["kind"], "calendar");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_report_unrecognized() {
        let mut buf = vec![0x42; 16];
        buf.extend_from_slice(&7u32.to_le_bytes());
        let report = StoreReport::from_buffer(&buf, None, true).unwrap();
        assert_eq!(report.store_schema, SchemaVersion::Unrecognized);
        assert_eq!(report.entry_count, 7);
        assert!(report.entries.is_empty());
        assert!(!report.complete);
        assert!(matches!(report.failure(), Some(DecodeError::Unrecognized { .. })));
        assert!(report.error.unwrap().contains("unrecognized store magic"));
    }

    #[test]
    fn test_report_v0_legacy_dates_and_exponent() {
        let mut buf = MAGIC_V0.to_vec();
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&[0x01; 20]);
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&[0x30; 21]);
        buf.extend_from_slice(&[0x31; 21]);
        buf.extend_from_slice(&[0xC3, 0x5A, 0x01, 0x00, 0x01]);

        let report = StoreReport::from_buffer(&buf, None, true).unwrap();
        let entry = &report.entries[0];
        assert_eq!(entry.not_before, DateReport::Legacy { raw: "30".repeat(21) });
        assert_eq!(
            entry.public_key,
            KeyReport::Rsa {
                modulus_len: 2,
                exponent_len: 3,
                modulus: Some("c35a".to_string()),
                exponent: "010001".to_string(),
                exponent_value: Some(65537),
            }
        );
    }

    #[test]
    fn test_report_limit() {
        let mut buf = MAGIC_V1.to_vec();
        buf.extend_from_slice(&3u32.to_le_bytes());
        for _ in 0..3 {
            buf.extend_from_slice(&[0u8; 36]);
            buf.extend_from_slice(&1u32.to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes());
        }
        let report = StoreReport::from_buffer(&buf, Some(2), true).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert!(!report.complete);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_report_too_short() {
        let result = StoreReport::from_buffer(&[0u8; 10], None, true);
        assert!(matches!(result, Err(ReportError::Decode(DecodeError::TooShort { len: 10 }))));
    }
}
