//! Best-plan bookkeeping for anytime planners.

use crate::{Plan, PlanState};

/// Keeps the cheapest goal-reaching plan seen so far.
#[derive(Debug, Clone, Default)]
pub struct BestPlanTracker {
    best: Option<Plan>,
}

impl BestPlanTracker {
    /// An empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self { best: None }
    }

    /// Cost any new plan must beat; `u64::MAX` while empty.
    #[must_use]
    pub fn bound(&self) -> u64 {
        self.best.as_ref().map_or(u64::MAX, Plan::total_cost)
    }

    /// True when a plan costing `cost` would replace the current best.
    #[must_use]
    pub fn improves(&self, cost: u64) -> bool {
        cost < self.bound()
    }

    /// Keep `plan` if it is strictly cheaper. Returns whether it was kept.
    pub fn offer(&mut self, plan: Plan) -> bool {
        if !self.improves(plan.total_cost()) {
            return false;
        }
        match &self.best {
            Some(previous) => log::info!(
                "found new best plan {} -> {}",
                previous.total_cost(),
                plan.total_cost()
            ),
            None => log::info!("found first plan with cost {}", plan.total_cost()),
        }
        self.best = Some(plan);
        true
    }

    /// Keep the history of a goal `state` if it is strictly cheaper.
    pub fn offer_state(&mut self, state: &PlanState) -> bool {
        self.improves(state.total_cost()) && self.offer(state.to_plan())
    }

    /// Current best plan.
    #[must_use]
    pub const fn best(&self) -> Option<&Plan> {
        self.best.as_ref()
    }

    /// Consume the tracker, yielding the best plan.
    #[must_use]
    pub fn into_best(self) -> Option<Plan> {
        self.best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Domain, LocationId, VehicleId};
    use rstest::rstest;

    fn plan_of_cost(refuels: usize) -> Plan {
        let domain = Domain::sequential();
        Plan::new(vec![
            domain.build_refuel(VehicleId::new(0), LocationId::new(0));
            refuels
        ])
    }

    #[rstest]
    fn only_strictly_cheaper_plans_replace_the_best() {
        let mut tracker = BestPlanTracker::new();
        assert_eq!(tracker.bound(), u64::MAX);
        assert!(tracker.offer(plan_of_cost(3)));
        assert!(!tracker.offer(plan_of_cost(3)));
        assert!(!tracker.offer(plan_of_cost(4)));
        assert!(tracker.offer(plan_of_cost(2)));
        assert_eq!(tracker.bound(), 20);
        assert_eq!(tracker.into_best().map(|plan| plan.len()), Some(2));
    }
}
