//! journal-gesture: double-activation detection for the journal page.
//!
//! - `GestureBridge` turns a stream of pointer releases into synthetic
//!   double-activation events.
//! - `Document` is the element tree the events travel through; listeners on
//!   the target or any ancestor observe them (bubbling).
//! - `dispatch_pointer_release` wires one bridge to one document.

pub mod bridge;
pub mod dom;
pub mod hub;

pub use bridge::{BridgeState, DoubleActivation, GestureBridge, PointerRelease};
pub use dom::{Document, ElementId, Propagation};
pub use hub::{dispatch_pointer_release, PointerOutcome};

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "journal-gesture"
}
