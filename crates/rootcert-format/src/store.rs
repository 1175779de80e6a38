//! Sequential decoding of a whole store.

use std::iter::FusedIterator;

use crate::decode::{decode_entry, DecodedEntry};
use crate::error::{DecodeError, Result};
use crate::schema::{SchemaVersion, StoreHeader, STORE_HEADER_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Error to report on the next call, after which the sequence ends.
    Failed(DecodeError),
    Iterating { index: u32, offset: usize },
    Done,
}

/// Forward-only, fused sequence of decoded entries.
///
/// Created by [`decode_store`]. Keeps the running offset between calls, so a
/// full pass is linear in the number of entries. Decoding the same buffer
/// again means calling [`decode_store`] again; nothing is copied.
#[derive(Debug, Clone)]
pub struct DecodedStore<'a> {
    buffer: &'a [u8],
    header: StoreHeader,
    schema: SchemaVersion,
    state: State,
}

/// Parse the store header and prepare to iterate its entries.
///
/// Fails only when `buffer` cannot hold the header. An unrecognized magic
/// yields a handle whose first item is `Err(DecodeError::Unrecognized)`, so
/// an undecodable store never looks like an empty one.
pub fn decode_store(buffer: &[u8]) -> Result<DecodedStore<'_>> {
    let header = StoreHeader::parse(buffer)?;
    let schema = header.schema();

    let state = if schema == SchemaVersion::Unrecognized {
        log::debug!("root certificate store magic not recognized");
        State::Failed(DecodeError::Unrecognized { magic: header.magic })
    } else if header.entry_count == 0 {
        State::Done
    } else {
        State::Iterating { index: 0, offset: STORE_HEADER_SIZE }
    };

    log::debug!(
        "root certificate store: schema {}, {} entries, {} bytes",
        schema,
        header.entry_count,
        buffer.len()
    );

    Ok(DecodedStore { buffer, header, schema, state })
}

impl DecodedStore<'_> {
    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Number of entries declared in the header.
    pub fn entry_count(&self) -> u32 {
        self.header.entry_count
    }

    /// Index and offset of the next entry, while entries remain.
    pub fn position(&self) -> Option<(u32, usize)> {
        match self.state {
            State::Iterating { index, offset } => Some((index, offset)),
            _ => None,
        }
    }

    /// True once the sequence has ended, successfully or not.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }
}

impl<'a> Iterator for DecodedStore<'a> {
    type Item = Result<DecodedEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Failed(err) => {
                self.state = State::Done;
                Some(Err(err))
            }
            State::Iterating { index, offset } => {
                log::trace!("decoding entry {} at {:#x}", index, offset);
                match decode_entry(self.buffer, self.schema, index, offset) {
                    Ok(entry) => {
                        let next = index + 1;
                        self.state = if next == self.header.entry_count {
                            State::Done
                        } else {
                            State::Iterating { index: next, offset: entry.next_offset() }
                        };
                        Some(Ok(entry))
                    }
                    Err(err) => {
                        log::debug!("entry {} at {:#x} failed to decode: {}", index, offset, err);
                        self.state = State::Done;
                        Some(Err(err))
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.state {
            State::Done => (0, Some(0)),
            State::Failed(_) => (1, Some(1)),
            State::Iterating { index, .. } => {
                let remaining = (self.header.entry_count - index) as usize;
                (1, Some(remaining))
            }
        }
    }
}

impl FusedIterator for DecodedStore<'_> {}
