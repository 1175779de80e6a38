//! Bounds-checked field access over the raw store buffer.
//!
//! All multi-byte fields in the store are little-endian (the module is an
//! ARM Cortex-M0 part). Every accessor takes an absolute offset and reports
//! `Truncated { at }` with that offset when the field does not fit.

use crate::error::{DecodeError, Result};

/// Read-only view of the store buffer.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// `len` bytes starting at `at`.
    pub(crate) fn bytes(&self, at: usize, len: usize) -> Result<&'a [u8]> {
        let end = at.checked_add(len).ok_or(DecodeError::Truncated { at })?;
        self.buf.get(at..end).ok_or(DecodeError::Truncated { at })
    }

    /// Fixed-size array reference starting at `at`.
    pub(crate) fn array<const N: usize>(&self, at: usize) -> Result<&'a [u8; N]> {
        let slice = self.bytes(at, N)?;
        // Length was checked by `bytes`.
        slice.try_into().map_err(|_| DecodeError::Truncated { at })
    }

    pub(crate) fn u8(&self, at: usize) -> Result<u8> {
        self.buf.get(at).copied().ok_or(DecodeError::Truncated { at })
    }

    pub(crate) fn u16_le(&self, at: usize) -> Result<u16> {
        self.array::<2>(at).map(|b| u16::from_le_bytes(*b))
    }

    pub(crate) fn u32_le(&self, at: usize) -> Result<u32> {
        self.array::<4>(at).map(|b| u32::from_le_bytes(*b))
    }

    /// Check that `len` bytes are available at `at` without reading them.
    pub(crate) fn require(&self, at: usize, len: usize) -> Result<()> {
        self.bytes(at, len).map(|_| ())
    }
}

/// Checked `a + b` for offset arithmetic; overflow is reported at `at`.
pub(crate) fn add(a: usize, b: usize, at: usize) -> Result<usize> {
    a.checked_add(b).ok_or(DecodeError::Truncated { at })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let r = Reader::new(&[0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
        assert_eq!(r.u16_le(0), Ok(0x1234));
        assert_eq!(r.u32_le(2), Ok(0x1234_5678));
        assert_eq!(r.u8(5), Ok(0x12));
    }

    #[test]
    fn test_out_of_bounds_reports_field_start() {
        let r = Reader::new(&[0u8; 8]);
        assert_eq!(r.u32_le(6), Err(DecodeError::Truncated { at: 6 }));
        assert_eq!(r.bytes(9, 0), Err(DecodeError::Truncated { at: 9 }));
        assert_eq!(r.u8(8), Err(DecodeError::Truncated { at: 8 }));
    }

    #[test]
    fn test_empty_slice_at_end_is_ok() {
        let r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.bytes(3, 0), Ok(&[][..]));
        assert!(r.require(0, 3).is_ok());
        assert!(r.require(1, 3).is_err());
    }

    #[test]
    fn test_huge_length_does_not_overflow() {
        let r = Reader::new(&[0u8; 4]);
        assert_eq!(r.bytes(2, usize::MAX), Err(DecodeError::Truncated { at: 2 }));
        assert_eq!(add(usize::MAX, 1, 7), Err(DecodeError::Truncated { at: 7 }));
    }
}
