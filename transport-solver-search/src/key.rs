//! Closed-set keys for systematic search.

use transport_core::{ActionKind, PlanState, StateFingerprint, VehicleId};

/// Which successors the generator allows after the last action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Restriction {
    Open,
    Driving(VehicleId),
    AfterPickUp,
}

/// Fingerprint of a state plus the generator restriction its last action
/// imposes.
///
/// Two states with equal fingerprints can still have different successor
/// sets when one was reached by a drive and the other by a pick-up; merging
/// them could hide the cheaper continuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SearchKey {
    fingerprint: StateFingerprint,
    restriction: Restriction,
}

impl SearchKey {
    pub(crate) fn of(state: &PlanState) -> Self {
        let restriction = state
            .last_action()
            .map_or(Restriction::Open, |action| match action.kind() {
                ActionKind::Drive { .. } => Restriction::Driving(action.vehicle()),
                ActionKind::PickUp { .. } => Restriction::AfterPickUp,
                ActionKind::Drop { .. } | ActionKind::Refuel { .. } => Restriction::Open,
            });
        Self {
            fingerprint: state.fingerprint(),
            restriction,
        }
    }
}
