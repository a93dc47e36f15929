//! Typed identifiers for network nodes and segments.
//!
//! Both ids are dense indices assigned by the snapshot builder, so they
//! double as `Vec` indices into the snapshot's column arrays.  Ordering is
//! numeric, which the path search relies on for deterministic tie-breaking.

use std::fmt;

/// Generate a `u32`-backed id newtype with index helpers.
macro_rules! dense_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub u32);

        impl $name {
            /// Marker for "no id"; used for unreached entries in search arrays.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

dense_id! {
    /// Index of a road-network node (junction or shape point).
    pub struct NodeId;
}

dense_id! {
    /// Index of a directed road segment.
    pub struct SegmentId;
}
