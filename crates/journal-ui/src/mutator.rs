//! Speculative mutation bookkeeping.
//!
//! A target moves `Idle -> Pending` when the user commits to an action and
//! the page already shows the speculative state. The server's answer then
//! settles it exactly once: `Committed` on success, and on failure either
//! `Failed` (the pending marker stays visible) or back to `Idle` (the marker
//! is reverted), depending on the failure policy. A target that is `Pending`
//! rejects new actions until it settles.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use journal_core::config::FailurePolicy;
use journal_core::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationState {
    Idle,
    Pending,
    Committed,
    Failed,
}

impl fmt::Display for MutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    pub from: MutationState,
    pub to: MutationState,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid mutation transition {} -> {}", self.from, self.to)
    }
}

pub fn is_valid_transition(from: MutationState, to: MutationState) -> bool {
    matches!(
        (from, to),
        (MutationState::Idle, MutationState::Pending)
            | (MutationState::Pending, MutationState::Committed)
            | (MutationState::Pending, MutationState::Failed)
            | (MutationState::Pending, MutationState::Idle)
            // Manual retry after a failure the page kept visible.
            | (MutationState::Failed, MutationState::Pending)
            // A later action on a target whose previous one landed.
            | (MutationState::Committed, MutationState::Pending)
    )
}

pub fn validate_transition(from: MutationState, to: MutationState) -> Result<(), TransitionError> {
    if is_valid_transition(from, to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// Proof that a target is pending. Settling consumes it, so every pending
/// target is settled at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending mutation must be settled with commit or fail"]
pub struct PendingMutation<K> {
    key: K,
}

impl<K> PendingMutation<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Per-target mutation states under one failure policy.
#[derive(Debug, Clone)]
pub struct OptimisticMutator<K> {
    policy: FailurePolicy,
    states: HashMap<K, MutationState>,
}

impl<K> OptimisticMutator<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            states: HashMap::new(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn state(&self, key: &K) -> MutationState {
        self.states.get(key).copied().unwrap_or(MutationState::Idle)
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.state(key) == MutationState::Pending
    }

    pub fn pending_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| **state == MutationState::Pending)
            .count()
    }

    /// Targets with any recorded state other than `Idle`.
    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }

    /// Mark `key` pending, or reject with `ActionError::Busy` while an
    /// earlier action on it is still in flight.
    pub fn begin(&mut self, key: K) -> Result<PendingMutation<K>, ActionError> {
        let from = self.state(&key);
        if validate_transition(from, MutationState::Pending).is_err() {
            tracing::debug!(target_key = %key, state = %from, "mutation rejected");
            return Err(ActionError::Busy {
                target: key.to_string(),
            });
        }
        self.states.insert(key.clone(), MutationState::Pending);
        Ok(PendingMutation { key })
    }

    /// The server confirmed the mutation.
    pub fn commit(&mut self, pending: PendingMutation<K>) -> MutationState {
        self.settle(pending.key, MutationState::Committed)
    }

    /// The server rejected the mutation, or could not be reached. Returns
    /// the state the target settles into under the current policy.
    pub fn fail(&mut self, pending: PendingMutation<K>) -> MutationState {
        let to = match self.policy {
            FailurePolicy::PersistentPending => MutationState::Failed,
            FailurePolicy::AutoRevert => MutationState::Idle,
        };
        self.settle(pending.key, to)
    }

    /// Give up on a pending mutation before any request was sent.
    pub fn abandon(&mut self, pending: PendingMutation<K>) -> MutationState {
        self.settle(pending.key, MutationState::Idle)
    }

    /// Drop all bookkeeping for `key`.
    pub fn forget(&mut self, key: &K) {
        self.states.remove(key);
    }

    fn settle(&mut self, key: K, to: MutationState) -> MutationState {
        let from = self.state(&key);
        if let Err(err) = validate_transition(from, to) {
            // Only reachable through a ticket whose target was forgotten.
            tracing::warn!(target_key = %key, error = %err, "mutation settled out of order");
        }
        if to == MutationState::Idle {
            self.states.remove(&key);
        } else {
            self.states.insert(key, to);
        }
        to
    }
}
