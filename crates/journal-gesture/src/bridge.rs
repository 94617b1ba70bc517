//! Double-activation detector.
//!
//! The bridge keeps a single `last_activation` timestamp. Each pointer
//! release is compared against it lazily; there is no timer. A release that
//! lands strictly inside `(0, threshold_ms)` of the previous one is a double
//! activation: its default action is suppressed and the detector returns to
//! idle so the same release never opens a second pair.

use journal_core::config::GestureConfig;

use crate::dom::ElementId;

/// A low-level pointer release on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerRelease {
    pub timestamp_ms: i64,
    pub target: ElementId,
    pub default_prevented: bool,
}

impl PointerRelease {
    pub fn new(timestamp_ms: i64, target: ElementId) -> Self {
        Self {
            timestamp_ms,
            target,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// Synthetic event: the same element was activated twice within the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleActivation {
    pub target: ElementId,
    pub gap_ms: i64,
    /// The release that completed the pair.
    pub original: PointerRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    Armed { since_ms: i64 },
}

/// Converts pointer releases into double activations.
///
/// One bridge serves one event stream; feed it sequentially.
#[derive(Debug, Clone)]
pub struct GestureBridge {
    threshold_ms: i64,
    last_activation: Option<i64>,
}

impl GestureBridge {
    pub fn new(threshold_ms: i64) -> Self {
        Self {
            threshold_ms,
            last_activation: None,
        }
    }

    pub fn from_config(config: &GestureConfig) -> Self {
        Self::new(config.threshold_ms)
    }

    pub fn threshold_ms(&self) -> i64 {
        self.threshold_ms
    }

    /// Whether this bridge can ever report a double activation.
    pub fn is_enabled(&self) -> bool {
        self.threshold_ms > 0
    }

    pub fn state(&self) -> BridgeState {
        match self.last_activation {
            Some(since_ms) => BridgeState::Armed { since_ms },
            None => BridgeState::Idle,
        }
    }

    /// Observe one pointer release.
    ///
    /// Returns the double activation it completes, if any. In that case the
    /// release has its default action prevented.
    pub fn observe(&mut self, event: &mut PointerRelease) -> Option<DoubleActivation> {
        let now = event.timestamp_ms;
        if let Some(last) = self.last_activation {
            let gap = now.saturating_sub(last);
            if gap > 0 && gap < self.threshold_ms {
                event.prevent_default();
                self.last_activation = None;
                tracing::debug!(
                    target_element = event.target.index(),
                    gap_ms = gap,
                    "double activation detected"
                );
                return Some(DoubleActivation {
                    target: event.target,
                    gap_ms: gap,
                    original: event.clone(),
                });
            }
        }
        self.last_activation = Some(now);
        None
    }

    /// Forget any recorded activation.
    pub fn reset(&mut self) {
        self.last_activation = None;
    }
}

impl Default for GestureBridge {
    fn default() -> Self {
        Self::from_config(&GestureConfig::default())
    }
}
