//! Word alignment of store offsets.

/// Flash word size; every entry (V0) or key field (V1) is padded to it.
pub const WORD: usize = 4;

/// Round `offset` up to the next multiple of four.
///
/// Panics on overflow in debug builds only for offsets within three of
/// `usize::MAX`; use [`checked_align_up4`] for lengths read from the store.
pub const fn align_up4(offset: usize) -> usize {
    (offset + (WORD - 1)) & !(WORD - 1)
}

/// Like [`align_up4`], but `None` instead of wrapping.
pub const fn checked_align_up4(offset: usize) -> Option<usize> {
    match offset.checked_add(WORD - 1) {
        Some(v) => Some(v & !(WORD - 1)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_zero() {
        assert_eq!(align_up4(0), 0);
    }

    #[test]
    fn test_align_values() {
        assert_eq!(align_up4(1), 4);
        assert_eq!(align_up4(3), 4);
        assert_eq!(align_up4(4), 4);
        assert_eq!(align_up4(5), 8);
        assert_eq!(align_up4(66), 68);
    }

    #[test]
    fn test_align_laws() {
        for x in 0..4096usize {
            let a = align_up4(x);
            assert!(a >= x);
            assert_eq!(a % 4, 0);
            assert_eq!(align_up4(a), a);
            assert!(a - x < WORD);
        }
    }

    #[test]
    fn test_checked_align_overflow() {
        assert_eq!(checked_align_up4(usize::MAX), None);
        assert_eq!(checked_align_up4(usize::MAX - 3), Some(usize::MAX - 3));
        assert_eq!(checked_align_up4(7), Some(8));
    }
}
