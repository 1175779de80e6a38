//! Human-readable store dump
//!
//! Mirrors the module's serial-console dump: a schema banner, the declared
//! entry count, then each entry's name hash, validity and key material as
//! `0000XXXX: aabb ccdd ...` hex rows.

use std::io::{self, Write};

use rootcert_format::{
    DecodeError, DecodedEntry, DecodedStore, EntryDate, PublicKey, SchemaVersion, StoreHeader,
};

/// Bytes per hex dump row.
const ROW: usize = 16;

/// Format `bytes` as hex rows: an 8 digit offset, then bytes in pairs.
pub fn hex_rows(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(ROW)
        .enumerate()
        .map(|(row, chunk)| {
            let mut line = format!("{:08x}:", row * ROW);
            for pair in chunk.chunks(2) {
                line.push(' ');
                line.push_str(&hex::encode(pair));
            }
            line
        })
        .collect()
}

fn write_hex<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    for line in hex_rows(bytes) {
        writeln!(w, "{}", line)?;
    }
    Ok(())
}

fn write_date<W: Write>(w: &mut W, label: &str, date: &EntryDate<'_>) -> io::Result<()> {
    match date {
        EntryDate::Calendar(t) => writeln!(w, "  {}: {} {} {}", label, t.month, t.day, t.year),
        EntryDate::Legacy(raw) => {
            writeln!(w, "  {}:", label)?;
            writeln!(w, "---begin date")?;
            write_hex(w, &raw[..])?;
            writeln!(w, "---end")
        }
    }
}

/// Print the schema banner and entry count.
pub fn write_header<W: Write>(w: &mut W, header: &StoreHeader) -> io::Result<()> {
    match header.schema() {
        SchemaVersion::Unrecognized if header.is_erased() => {
            writeln!(w, "Root Certificate store is erased (no header written)")?
        }
        SchemaVersion::Unrecognized => writeln!(w, "Unrecognized Root Certification header version")?,
        schema => writeln!(w, "Root Certificate header {} detected", schema)?,
    }
    writeln!(w)?;
    writeln!(w, "There are {} Root Certificates", header.entry_count)
}

/// Print one decoded entry.
pub fn write_entry<W: Write>(w: &mut W, entry: &DecodedEntry<'_>, show_key_material: bool) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "certificate #{} (offset {:#x}, {} bytes)", entry.index, entry.offset, entry.len)?;
    writeln!(w, "Name Hash:")?;
    write_hex(w, entry.name_hash)?;
    writeln!(w)?;

    writeln!(w, "Validity")?;
    write_date(w, "Not Before", &entry.not_before)?;
    write_date(w, "Not After", &entry.not_after)?;
    writeln!(w)?;

    writeln!(w, "pubKey type is {}", entry.public_key.kind())?;
    match entry.public_key {
        PublicKey::Rsa { modulus, exponent } => {
            writeln!(w, "nSz: {}", modulus.len())?;
            writeln!(w, "eSz: {}", exponent.len())?;
            if show_key_material {
                writeln!(w, "---begin pubkey")?;
                write_hex(w, modulus)?;
                writeln!(w, "---end")?;
            }
            match entry.public_key.exponent_value() {
                Some(e) => writeln!(w, "PubKey Exponent: {}", e)?,
                None => writeln!(w, "PubKey Exponent: 0x{}", hex::encode(exponent))?,
            }
        }
        PublicKey::Ecdsa { curve_id, point } => {
            writeln!(w, "CurveID: {}", curve_id)?;
            writeln!(w, "keySz: {}", point.len() / 2)?;
            if show_key_material {
                writeln!(w, "---begin key")?;
                write_hex(w, point)?;
                writeln!(w, "---end")?;
            }
        }
    }
    Ok(())
}

/// How a dump ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOutcome {
    /// Entries printed.
    pub printed: u32,
    /// Decode failure that stopped the dump, if any.
    pub error: Option<DecodeError>,
}

/// Print the header and up to `limit` entries of `store`.
///
/// The first decode error is printed and stops the dump; it is also returned
/// in the outcome so the caller can pick an exit status.
pub fn write_store<W: Write>(
    w: &mut W,
    mut store: DecodedStore<'_>,
    limit: Option<u32>,
    show_key_material: bool,
) -> io::Result<DumpOutcome> {
    write_header(w, store.header())?;

    let mut outcome = DumpOutcome { printed: 0, error: None };
    for item in store.by_ref() {
        match item {
            Ok(entry) => {
                write_entry(w, &entry, show_key_material)?;
                outcome.printed += 1;
            }
            Err(err) => {
                writeln!(w)?;
                writeln!(w, "Decoding stopped: {}", err)?;
                outcome.error = Some(err);
                break;
            }
        }
        if limit.is_some_and(|limit| outcome.printed >= limit) {
            break;
        }
    }

    writeln!(w)?;
    if outcome.error.is_some() {
        writeln!(w, "Decoded {} of {} entries", outcome.printed, store.entry_count())?;
    } else if store.is_done() {
        writeln!(w, "Done dumping")?;
    } else {
        writeln!(w, "Stopped after {} of {} entries", outcome.printed, store.entry_count())?;
    }
    Ok(outcome)
}
