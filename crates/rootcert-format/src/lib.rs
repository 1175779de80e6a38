//! WINC Root Certificate Store Format
//!
//! Zero-copy decoding of the root certificate store that WINC Wi-Fi modules
//! keep in flash. The store is a 20 byte header (`magic[16]`, `u32` entry
//! count) followed by variable-length entries in one of two layouts, chosen
//! by the magic:
//!
//! ```text
//! offset 0:  StoreHeader { magic[16], entry_count: u32 (LE) }
//! offset 20: Entry[0]
//!            Entry[1]
//!            ...
//! ```
//!
//! Nothing here performs I/O or validates certificates; decoded entries
//! borrow the caller's buffer.

pub mod align;
pub mod decode;
pub mod entry;
pub mod error;
mod reader;
pub mod schema;
pub mod store;
pub mod walker;

pub use align::align_up4;
pub use decode::{decode_entry, DecodedEntry, EntryDate, PublicKey};
pub use entry::{EntryHeader, EntryHeaderV0, EntryHeaderV1, KeyFields, KeyLayout, PubKeyInfo, SystemTime};
pub use error::DecodeError;
pub use schema::{detect_schema, SchemaVersion, StoreHeader, MAGIC_V0, MAGIC_V1, STORE_HEADER_SIZE};
pub use store::{decode_store, DecodedStore};
pub use walker::{entry_header, entry_offset};
