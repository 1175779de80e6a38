//! Header summary and random entry access
//!
//! Backs the `info` and `entry` subcommands.

use serde::{Deserialize, Serialize};

use rootcert_format::{
    decode_entry, entry_offset, DecodeError, DecodedEntry, SchemaVersion, StoreHeader,
};

/// Errors from random entry lookup
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("Entry {index} out of range: store declares {count} entries")]
    IndexOutOfRange { index: u32, count: u32 },
}

/// Facts readable from the store header alone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub store_schema: SchemaVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    pub magic: String,
    pub erased: bool,
    pub entry_count: u32,
    pub image_bytes: usize,
}

impl HeaderInfo {
    pub fn from_buffer(buffer: &[u8]) -> Result<Self, DecodeError> {
        let header = StoreHeader::parse(buffer)?;
        let schema = header.schema();
        Ok(Self {
            store_schema: schema,
            firmware: schema.firmware().map(str::to_string),
            magic: hex::encode(header.magic),
            erased: header.is_erased(),
            entry_count: header.entry_count,
            image_bytes: buffer.len(),
        })
    }

    /// Multi-line text form
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let schema = match (&self.store_schema, &self.firmware) {
            (SchemaVersion::Unrecognized, _) if self.erased => "erased flash".to_string(),
            (schema, Some(fw)) => format!("{} ({} firmware)", schema, fw),
            (schema, None) => schema.to_string(),
        };
        out.push_str(&format!("Schema:       {}\n", schema));
        out.push_str(&format!("Magic:        {}\n", self.magic));
        out.push_str(&format!("Entries:      {}\n", self.entry_count));
        out.push_str(&format!("Image size:   {} bytes", self.image_bytes));
        out
    }
}

/// Decode entry `index` by walking the entries before it.
pub fn lookup_entry(buffer: &[u8], index: u32) -> Result<DecodedEntry<'_>, InspectError> {
    let header = StoreHeader::parse(buffer)?;
    if index >= header.entry_count {
        return Err(InspectError::IndexOutOfRange {
            index,
            count: header.entry_count,
        });
    }

    let schema = header.schema();
    let offset = entry_offset(buffer, schema, index)?;
    log::debug!("entry {} at offset {:#x}", index, offset);
    Ok(decode_entry(buffer, schema, index, offset)?)
}
