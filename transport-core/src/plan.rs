//! Sequential plans.

use crate::Action;

/// An ordered list of actions with its accumulated cost.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    actions: Vec<Action>,
    total_cost: u64,
}

/// An action placed on the sequential timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAction {
    /// Time the action starts.
    pub start: u64,
    /// Time the action finishes.
    pub end: u64,
    /// The action itself.
    pub action: Action,
}

impl Plan {
    /// Wrap `actions`, summing their costs.
    #[must_use]
    pub fn new(actions: Vec<Action>) -> Self {
        let total_cost = actions.iter().map(|action| u64::from(action.cost())).sum();
        Self {
            actions,
            total_cost,
        }
    }

    /// Actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Sum of action costs.
    #[must_use]
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Finish time of the last action. Equals the total cost for sequential plans.
    #[must_use]
    pub fn makespan(&self) -> u64 {
        self.timeline().last().map_or(0, |scheduled| scheduled.end)
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True for the empty plan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Each action with its start and end time, one after another.
    #[must_use]
    pub fn timeline(&self) -> Vec<ScheduledAction> {
        let mut clock = 0_u64;
        self.actions
            .iter()
            .map(|action| {
                let start = clock;
                clock = clock.saturating_add(u64::from(action.duration()));
                ScheduledAction {
                    start,
                    end: clock,
                    action: *action,
                }
            })
            .collect()
    }
}
