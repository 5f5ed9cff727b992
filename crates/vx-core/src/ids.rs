use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Create an Id from a `usize` index, failing when it does not fit.
    pub fn try_from_usize(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .filter(|i| *i < u32::MAX)
            .map(Self::from_index)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as `usize`.
    pub fn as_usize(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Momentum-transfer index of a point along the dispersion path (0-based,
/// as reported by the diagonalization databases).
pub type QIndex = Id;

/// Identifier handed out by [`crate::Bus::subscribe`].
pub type SubscriptionId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }

    #[test]
    fn usize_conversion_rejects_overflow() {
        assert_eq!(Id::try_from_usize(7).map(Id::as_usize), Some(7));
        assert!(Id::try_from_usize(u32::MAX as usize).is_none());
    }
}
