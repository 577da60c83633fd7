//! Goal-distance estimates guiding the A* family.
//!
//! Every heuristic sums the handling actions still owed (a drop for each
//! carried package, a pick-up and a drop for each package lying elsewhere)
//! and adds a drive estimate. The variants differ only in how they bound the
//! drive. Only [`HeuristicKind::AdmissibleLeg`] never overestimates; the
//! others trade accuracy for guidance and make A* a greedy best-first search.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use transport_core::{ActionCosts, Domain, Problem, ShortestPathIndex};

mod distance;
mod spanning_tree;

pub use distance::{AdmissibleLeg, NearestObject, NearestVehicle, PackageDistance};
pub use spanning_tree::SpanningTree;

/// Estimates the remaining cost from a problem snapshot to the goal.
pub trait Heuristic: fmt::Debug + Send + Sync {
    /// Estimated cost to reach the goal from `problem`.
    ///
    /// Returns `None` when the snapshot is a dead end, for example when a
    /// package target cannot be reached from where the package lies.
    fn estimate(&self, problem: &Problem, paths: &ShortestPathIndex) -> Option<u64>;
}

/// Selects one of the available heuristics by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeuristicKind {
    /// Package-to-target shortest-path distances.
    PackageDistance,
    /// Package-to-target paths through a minimum spanning forest, counting
    /// each tree edge once.
    SpanningTree,
    /// Package distances plus the distance to the nearest vehicle or other
    /// waiting package.
    NearestObject,
    /// The longest single leg any vehicle must still drive.
    #[default]
    AdmissibleLeg,
    /// Longest carried leg per vehicle plus the nearest vehicle for each
    /// waiting package.
    NearestVehicle,
}

impl HeuristicKind {
    /// Every heuristic in declaration order.
    pub const ALL: [Self; 5] = [
        Self::PackageDistance,
        Self::SpanningTree,
        Self::NearestObject,
        Self::AdmissibleLeg,
        Self::NearestVehicle,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PackageDistance => "package-distance",
            Self::SpanningTree => "spanning-tree",
            Self::NearestObject => "nearest-object",
            Self::AdmissibleLeg => "admissible-leg",
            Self::NearestVehicle => "nearest-vehicle",
        }
    }

    /// True when the estimate never exceeds the optimal remaining cost.
    #[must_use]
    pub const fn is_admissible(self) -> bool {
        matches!(self, Self::AdmissibleLeg)
    }

    /// Build the heuristic for `problem`, precomputing whatever it needs.
    #[must_use]
    pub fn instantiate(self, problem: &Problem, domain: &Domain) -> Box<dyn Heuristic> {
        let costs = domain.costs();
        match self {
            Self::PackageDistance => Box::new(PackageDistance::new(costs)),
            Self::SpanningTree => Box::new(SpanningTree::new(problem.graph(), costs)),
            Self::NearestObject => Box::new(NearestObject::new(costs)),
            Self::AdmissibleLeg => Box::new(AdmissibleLeg::new(costs)),
            Self::NearestVehicle => Box::new(NearestVehicle::new(costs)),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown heuristic name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown heuristic `{name}`; expected one of package-distance, spanning-tree, nearest-object, admissible-leg, nearest-vehicle")]
pub struct UnknownHeuristicError {
    /// The rejected name.
    pub name: String,
}

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristicError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownHeuristicError {
                name: value.to_owned(),
            })
    }
}

/// Handling cost still owed by unfinished packages.
fn handling_cost(problem: &Problem, costs: ActionCosts) -> u64 {
    let drop = u64::from(costs.drop);
    let pick_up_and_drop = u64::from(costs.pick_up) + drop;
    problem
        .unfinished_packages()
        .map(|package| {
            if package.location().is_some() {
                pick_up_and_drop
            } else {
                drop
            }
        })
        .sum()
}
