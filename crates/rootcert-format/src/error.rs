//! Error types for store decoding.

use std::fmt;

use crate::schema::MAGIC_LEN;

/// Structural failure while decoding a root certificate store.
///
/// Every variant is terminal for the store or for the entry sequence: offsets
/// are computed strictly in order, so nothing after a bad length can be
/// trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Buffer is smaller than the fixed store header.
    #[error("store is {len} bytes, shorter than the {} byte header", crate::STORE_HEADER_SIZE)]
    TooShort { len: usize },

    /// Magic pattern matches neither known schema.
    #[error("unrecognized store magic {}", Magic(magic))]
    Unrecognized { magic: [u8; MAGIC_LEN] },

    /// A field starting at `at` extends past the end of the buffer.
    #[error("store truncated at offset {at}")]
    Truncated { at: usize },

    /// V1 public key type tag outside {RSA, ECDSA}.
    #[error("unknown public key type {tag} in entry at offset {at}")]
    UnknownKeyType { tag: u32, at: usize },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DecodeError>;

struct Magic<'a>(&'a [u8; MAGIC_LEN]);

impl fmt::Display for Magic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
