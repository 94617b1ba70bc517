//! Wiring of a `GestureBridge` to a `Document`.

use crate::bridge::{DoubleActivation, GestureBridge, PointerRelease};
use crate::dom::{DispatchReport, Document};

/// What happened to one pointer release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerOutcome {
    pub default_prevented: bool,
    pub double_activation: Option<DoubleActivation>,
    pub dispatch: DispatchReport,
}

/// Feed one pointer release through `bridge` and, when it completes a double
/// activation, dispatch the synthetic event at the release's target.
pub fn dispatch_pointer_release(
    bridge: &mut GestureBridge,
    document: &mut Document,
    mut event: PointerRelease,
) -> PointerOutcome {
    let double_activation = bridge.observe(&mut event);
    let dispatch = match &double_activation {
        Some(fired) => document.dispatch_double_activation(fired),
        None => DispatchReport::default(),
    };
    PointerOutcome {
        default_prevented: event.default_prevented,
        double_activation,
        dispatch,
    }
}
