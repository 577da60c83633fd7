//! Packages awaiting delivery.

use std::sync::Arc;

use super::{LocationId, PackageId};

/// A package that must reach its target location.
///
/// A package is either at a location or inside exactly one vehicle; while
/// carried its `location` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub(crate) id: PackageId,
    pub(crate) name: Arc<str>,
    pub(crate) location: Option<LocationId>,
    pub(crate) target: LocationId,
    pub(crate) size: u32,
}

impl Package {
    /// Identifier within the owning problem.
    #[must_use]
    pub const fn id(&self) -> PackageId {
        self.id
    }

    /// Human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current location; `None` while carried.
    #[must_use]
    pub const fn location(&self) -> Option<LocationId> {
        self.location
    }

    /// Delivery target.
    #[must_use]
    pub const fn target(&self) -> LocationId {
        self.target
    }

    /// Capacity units the package occupies.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// True once the package rests at its target.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.location == Some(self.target)
    }

    /// A copy resting at `location`, or carried when `None`.
    #[must_use]
    pub fn with_location(&self, location: Option<LocationId>) -> Self {
        Self {
            location,
            ..self.clone()
        }
    }
}
