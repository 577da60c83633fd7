//! Best-first search shared by the A* planners.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use transport_core::{
    ActionGenerator, BestPlanTracker, CancellationToken, Domain, PlanError, PlanState, Problem,
    ShortestPathIndex,
};

use crate::heuristic::Heuristic;
use crate::key::SearchKey;

/// How a single search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// The open set ran dry or no open state could beat the best plan.
    Exhausted,
    /// A plan was found and the search was asked to stop there.
    Stopped,
    /// The cancellation token was raised.
    Cancelled,
}

/// Everything a search run reads but never modifies.
pub(crate) struct SearchContext<'a> {
    pub(crate) domain: &'a Domain,
    pub(crate) problem: &'a Problem,
    pub(crate) paths: &'a ShortestPathIndex,
    pub(crate) heuristic: &'a dyn Heuristic,
    pub(crate) token: &'a CancellationToken,
    pub(crate) log_interval: u64,
}

/// Per-run knobs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchParams {
    pub(crate) weight: u64,
    pub(crate) stop_at_first: bool,
}

struct Node {
    f: u64,
    g: u64,
    state: PlanState,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    // Reversed so the max-heap pops the lowest f first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
    }
}

/// Run one A* search, offering every goal reached to `tracker`.
///
/// Goal states are recorded when generated rather than pushed, so the
/// tracker always holds the best complete plan seen. The search ends when
/// the cheapest open state cannot improve on that plan, when the open set is
/// empty, after the first plan if `params.stop_at_first` is set, or on
/// cancellation, which is also checked right after a plan is kept so no
/// later plan can replace it. Neighbours whose cost already reaches the tracker's bound
/// are discarded, which lets repeated searches share one tracker.
pub(crate) fn search(
    context: &SearchContext<'_>,
    params: SearchParams,
    tracker: &mut BestPlanTracker,
) -> Result<SearchOutcome, PlanError> {
    let generator = ActionGenerator::new(context.domain, context.paths, context.problem);
    let start = PlanState::new(context.problem.clone());
    if start.is_goal() {
        tracker.offer_state(&start);
        return Ok(SearchOutcome::Stopped);
    }
    let Some(h) = context.heuristic.estimate(start.problem(), context.paths) else {
        log::debug!("initial state is a dead end");
        return Ok(SearchOutcome::Exhausted);
    };

    let mut open = BinaryHeap::new();
    let mut best_g: HashMap<SearchKey, u64> = HashMap::new();
    let mut closed: HashSet<SearchKey> = HashSet::new();
    best_g.insert(SearchKey::of(&start), 0);
    open.push(Node {
        f: h.saturating_mul(params.weight),
        g: 0,
        state: start,
    });

    let mut expanded = 0_u64;
    while let Some(node) = open.pop() {
        if context.token.is_cancelled() {
            log::info!("search cancelled after {expanded} expansions");
            return Ok(SearchOutcome::Cancelled);
        }
        if node.f >= tracker.bound() {
            break;
        }
        let key = SearchKey::of(&node.state);
        if best_g.get(&key).is_some_and(|&known| known < node.g) || !closed.insert(key) {
            continue;
        }
        expanded += 1;
        if context.log_interval > 0 && expanded.is_multiple_of(context.log_interval) {
            log::debug!(
                "expanded {expanded} states, {} open, best bound {}",
                open.len(),
                tracker.bound()
            );
        }

        for action in generator.generate(&node.state) {
            let next = node
                .state
                .apply(&action)
                .map_err(|source| PlanError::InvalidTransition { action, source })?;
            let g = next.total_cost();
            if g >= tracker.bound() {
                continue;
            }
            if next.is_goal() {
                tracker.offer_state(&next);
                if params.stop_at_first {
                    return Ok(SearchOutcome::Stopped);
                }
                if context.token.is_cancelled() {
                    log::info!("search cancelled after {expanded} expansions");
                    return Ok(SearchOutcome::Cancelled);
                }
                continue;
            }
            let next_key = SearchKey::of(&next);
            if closed.contains(&next_key)
                || best_g.get(&next_key).is_some_and(|&known| known <= g)
            {
                continue;
            }
            let Some(estimate) = context.heuristic.estimate(next.problem(), context.paths) else {
                continue;
            };
            best_g.insert(next_key, g);
            open.push(Node {
                f: g.saturating_add(estimate.saturating_mul(params.weight)),
                g,
                state: next,
            });
        }
    }
    log::debug!("search exhausted after {expanded} expansions");
    Ok(SearchOutcome::Exhausted)
}
