//! Link indices with a reserved terminator.
//!
//! A link is a bare unsigned integer naming an arena slot. The top value of
//! the integer type never names a slot: it terminates a chain or marks a
//! missing child. The width of the index type therefore caps how many nodes
//! one container can hold (`u8` links address 255 slots).

/// Integer type used for node links.
///
/// # Example
///
/// ```
/// use nexus_chain::Index;
///
/// assert_eq!(u8::SLOTS, 255);
/// assert_eq!(u16::from_slot(7), Some(7));
/// assert_eq!(u8::from_slot(255), None);
///
/// let link: u32 = 5;
/// assert_eq!(link.to_option(), Some(5));
/// assert_eq!(u32::NONE.to_option(), None);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// The terminator: links to nothing.
    const NONE: Self;

    /// Number of slots this type can name (every value except `NONE`).
    const SLOTS: usize;

    /// Slot named by this link. Meaningless for `NONE`.
    fn slot(self) -> usize;

    /// Link naming `slot`, or `None` if the type is too narrow for it.
    fn from_slot(slot: usize) -> Option<Self>;

    /// `true` for the terminator.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// `true` for a link that names a slot.
    #[inline]
    fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// `Some(self)`, or `None` for the terminator.
    #[inline]
    fn to_option(self) -> Option<Self> {
        (self != Self::NONE).then_some(self)
    }
}

macro_rules! link_index {
    ($($ty:ty),* $(,)?) => {$(
        impl Index for $ty {
            const NONE: Self = <$ty>::MAX;

            // Saturates for u64 on 32-bit targets, where usize is narrower.
            const SLOTS: usize = if (<$ty>::MAX as u128) < (usize::MAX as u128) {
                <$ty>::MAX as usize
            } else {
                usize::MAX
            };

            #[inline]
            fn slot(self) -> usize {
                self as usize
            }

            #[inline]
            fn from_slot(slot: usize) -> Option<Self> {
                <$ty>::try_from(slot).ok().filter(|link| *link != Self::NONE)
            }
        }
    )*};
}

link_index!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    fn terminator_behaves<I: Index>(first: I) {
        assert!(I::NONE.is_none());
        assert!(!I::NONE.is_some());
        assert_eq!(I::NONE.to_option(), None);

        assert!(first.is_some());
        assert_eq!(first.to_option(), Some(first));
        assert_eq!(first.slot(), 0);
    }

    #[test]
    fn terminator_for_every_width() {
        terminator_behaves(0u8);
        terminator_behaves(0u16);
        terminator_behaves(0u32);
        terminator_behaves(0u64);
        terminator_behaves(0usize);
    }

    #[test]
    fn slot_counts() {
        assert_eq!(u8::SLOTS, 255);
        assert_eq!(u16::SLOTS, 65_535);
        assert_eq!(u32::SLOTS, u32::MAX as usize);
        assert_eq!(usize::SLOTS, usize::MAX);
    }

    #[test]
    fn from_slot_rejects_terminator_and_overflow() {
        assert_eq!(u8::from_slot(254), Some(254));
        assert_eq!(u8::from_slot(255), None);
        assert_eq!(u8::from_slot(1_000), None);
        assert_eq!(u16::from_slot(65_535), None);
        assert_eq!(usize::from_slot(usize::MAX), None);
    }

    #[test]
    fn slot_and_from_slot_agree() {
        for slot in [0usize, 1, 100, 65_534] {
            let link = u32::from_slot(slot).unwrap();
            assert_eq!(link.slot(), slot);
        }
    }
}
