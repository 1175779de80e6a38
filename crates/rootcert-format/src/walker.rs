//! Random access to entries by index.

use crate::entry::EntryHeader;
use crate::error::{DecodeError, Result};
use crate::reader::Reader;
use crate::schema::{SchemaVersion, StoreHeader, STORE_HEADER_SIZE};

/// Error for an attempt to walk a store of unknown layout.
pub(crate) fn unrecognized(buffer: &[u8]) -> DecodeError {
    match StoreHeader::parse(buffer) {
        Ok(header) => DecodeError::Unrecognized { magic: header.magic },
        Err(e) => e,
    }
}

/// Parse the header of the entry at `offset` without touching its key
/// material.
pub fn entry_header(buffer: &[u8], version: SchemaVersion, offset: usize) -> Result<EntryHeader<'_>> {
    if version == SchemaVersion::Unrecognized {
        return Err(unrecognized(buffer));
    }
    EntryHeader::read(&Reader::new(buffer), version, offset)
}

/// Offset of the entry following the one at `offset`.
pub(crate) fn next_entry_offset(buffer: &[u8], version: SchemaVersion, offset: usize) -> Result<usize> {
    Ok(entry_header(buffer, version, offset)?.layout(offset)?.end)
}

/// Byte offset of entry `index`.
///
/// Walks every preceding entry header from the start of the store, so this
/// is O(index). Iterate with [`crate::decode_store`] to visit all entries in
/// O(n). The entry at `index` itself is not checked; only the headers before
/// it must be present. `index` is not compared against the declared entry
/// count.
pub fn entry_offset(buffer: &[u8], version: SchemaVersion, index: u32) -> Result<usize> {
    if buffer.len() < STORE_HEADER_SIZE {
        return Err(DecodeError::TooShort { len: buffer.len() });
    }
    if version == SchemaVersion::Unrecognized {
        return Err(unrecognized(buffer));
    }

    let mut offset = STORE_HEADER_SIZE;
    for i in 0..index {
        let next = next_entry_offset(buffer, version, offset)?;
        log::trace!("entry {} at {:#x}, next at {:#x}", i, offset, next);
        offset = next;
    }
    Ok(offset)
}
