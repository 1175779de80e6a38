//! Synthetic store images for integration tests.

#![allow(dead_code)]

use winc_rootcert::format::{MAGIC_V0, MAGIC_V1};

fn pad4(buf: &mut Vec<u8>, fill: u8) {
    while buf.len() % 4 != 0 {
        buf.push(fill);
    }
}

/// Builds a store byte by byte, recording where each entry starts.
pub struct StoreBuilder {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl StoreBuilder {
    pub fn new(magic: [u8; 16], entry_count: u32) -> Self {
        let mut buf = magic.to_vec();
        buf.extend_from_slice(&entry_count.to_le_bytes());
        Self { buf, offsets: Vec::new() }
    }

    pub fn v0(entry_count: u32) -> Self {
        Self::new(MAGIC_V0, entry_count)
    }

    pub fn v1(entry_count: u32) -> Self {
        Self::new(MAGIC_V1, entry_count)
    }

    /// 19.4.x entry; the whole entry is padded to 4 bytes with 0xFF.
    pub fn push_v0(mut self, name_hash: [u8; 20], modulus: &[u8], exponent: &[u8]) -> Self {
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(&name_hash);
        self.buf.extend_from_slice(&(modulus.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(&(exponent.len() as u16).to_le_bytes());
        self.buf.extend((0..21).map(|i| 0x40 + i as u8));
        self.buf.extend((0..21).map(|i| 0x60 + i as u8));
        self.buf.extend_from_slice(modulus);
        self.buf.extend_from_slice(exponent);
        pad4(&mut self.buf, 0xFF);
        self
    }

    fn push_v1_header(&mut self, name_hash: [u8; 20], tag: u32, a: u16, b: u16) {
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(&name_hash);
        // 2020-01-01 00:00:00 .. 2040-12-31 23:59:59
        self.buf.extend_from_slice(&[0xE4, 0x07, 1, 1, 0, 0, 0, 0]);
        self.buf.extend_from_slice(&[0xF8, 0x07, 12, 31, 23, 59, 59, 0]);
        self.buf.extend_from_slice(&tag.to_le_bytes());
        self.buf.extend_from_slice(&a.to_le_bytes());
        self.buf.extend_from_slice(&b.to_le_bytes());
    }

    /// 19.5.x RSA entry; modulus and exponent are each padded to 4 bytes.
    pub fn push_v1_rsa(mut self, name_hash: [u8; 20], modulus: &[u8], exponent: &[u8]) -> Self {
        self.push_v1_header(name_hash, 1, modulus.len() as u16, exponent.len() as u16);
        self.buf.extend_from_slice(modulus);
        pad4(&mut self.buf, 0xFF);
        self.buf.extend_from_slice(exponent);
        pad4(&mut self.buf, 0xFF);
        self
    }

    /// 19.5.x ECDSA entry with each coordinate padded to 4 bytes.
    pub fn push_v1_ecdsa(mut self, name_hash: [u8; 20], curve_id: u16, x: &[u8], y: &[u8]) -> Self {
        assert_eq!(x.len(), y.len());
        self.push_v1_header(name_hash, 2, curve_id, x.len() as u16);
        self.buf.extend_from_slice(x);
        self.buf.extend_from_slice(y);
        let padded = (x.len() + 3) / 4 * 4 * 2;
        let start = self.buf.len() - x.len() * 2;
        self.buf.resize(start + padded, 0xFF);
        self
    }

    /// Entry with an arbitrary V1 key type tag and no key material.
    pub fn push_v1_raw(mut self, name_hash: [u8; 20], tag: u32) -> Self {
        self.push_v1_header(name_hash, tag, 0, 0);
        self
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    pub fn build_with_offsets(self) -> (Vec<u8>, Vec<usize>) {
        (self.buf, self.offsets)
    }
}
