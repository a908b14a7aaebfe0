//! Node links.
//!
//! A queue node names its successor by slot position. The integer type is
//! chosen by the storage; its `MAX` is reserved as the end-of-chain marker, so
//! a `u8` queue addresses 255 nodes and `NONE` never names a real slot.

/// Slot position of a queue node, with `MAX` reserved as "no node".
///
/// # Example
///
/// ```
/// use nexus_strqueue::Index;
///
/// assert!(u32::NONE.is_none());
/// assert_eq!(u8::try_from_usize(254), Some(254));
/// assert_eq!(u8::try_from_usize(255), None);
/// assert_eq!(u16::try_from_usize(9).map(Index::as_usize), Some(9));
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// End-of-chain marker.
    const NONE: Self;

    /// Returns `true` for the end-of-chain marker.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this names a slot.
    #[inline]
    fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// Slot position in storage.
    fn as_usize(self) -> usize;

    /// Link for slot position `pos`.
    ///
    /// Returns `None` when `pos` does not fit or would collide with
    /// [`Index::NONE`]; storage reports that as running out of index space.
    fn try_from_usize(pos: usize) -> Option<Self>;
}

macro_rules! unsigned_link {
    ($($ty:ty),*) => {$(
        impl Index for $ty {
            const NONE: Self = <$ty>::MAX;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn as_usize(self) -> usize {
                self as usize
            }

            #[inline]
            fn try_from_usize(pos: usize) -> Option<Self> {
                <$ty>::try_from(pos).ok().filter(|link| link.is_some())
            }
        }
    )*};
}

unsigned_link!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_not_a_slot() {
        assert!(u8::NONE.is_none());
        assert!(u16::NONE.is_none());
        assert!(!u32::NONE.is_some());
        assert!(0u64.is_some());
        assert!((usize::MAX - 1).is_some());
    }

    #[test]
    fn conversion_stops_below_marker() {
        assert_eq!(u8::try_from_usize(0), Some(0));
        assert_eq!(u8::try_from_usize(254), Some(254));
        assert_eq!(u8::try_from_usize(255), None);
        assert_eq!(u8::try_from_usize(256), None);

        assert_eq!(u16::try_from_usize(u16::MAX as usize - 1), Some(u16::MAX - 1));
        assert_eq!(u16::try_from_usize(u16::MAX as usize), None);
        assert_eq!(u16::try_from_usize(70_000), None);

        assert_eq!(usize::try_from_usize(usize::MAX), None);
    }

    #[test]
    fn slot_positions_survive_conversion() {
        for pos in [0usize, 1, 254, 1000, u16::MAX as usize - 1] {
            assert_eq!(u32::try_from_usize(pos).map(Index::as_usize), Some(pos));
        }
    }
}
