//! Dense typed identifiers for problem entities.
//!
//! Identifiers index into the vectors owned by [`crate::RoadGraph`] and
//! [`crate::Problem`]; they are only meaningful for the problem that issued
//! them.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(usize);

        impl $name {
            /// Wrap a raw index.
            #[must_use]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Return the raw index.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a [`crate::Location`] within a road graph.
    LocationId,
    "location"
);
define_id!(
    /// Identifier of a [`crate::Road`] within a road graph.
    RoadId,
    "road"
);
define_id!(
    /// Identifier of a [`crate::Vehicle`] within a problem.
    VehicleId,
    "vehicle"
);
define_id!(
    /// Identifier of a [`crate::Package`] within a problem.
    PackageId,
    "package"
);
