//! Dense identifier wrappers.
//!
//! Road nodes arrive with opaque string identifiers (OSM ids, typically).
//! The network interns each distinct string to a `NodeId` so that search
//! state can live in flat `Vec`s indexed by `id.index()` instead of hash maps.

use std::fmt;

/// Generate a typed index wrapper around `u32`.
macro_rules! dense_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "no such element"; never handed out by a builder.
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
    /// Index of an interned road-network node.
    pub struct NodeId;
}

dense_id! {
    /// Index of a directed edge in the network's forward CSR order.
    pub struct EdgeId;
}
