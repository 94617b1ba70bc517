//! Action event recording for audit and debugging.
//!
//! Each page action emits an event describing what was attempted and how it
//! ended. Sinks can keep them in memory (tests), forward them to `tracing`,
//! or discard them.

use chrono::{DateTime, Utc};

/// The kind of page action that generated an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionEventKind {
    DoubleActivation,
    CopyReference,
    OpenInEditor,
    RemoveTag,
    UploadMedia,
    DeleteMedia,
    RunTask,
}

impl std::fmt::Display for ActionEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DoubleActivation => "double_activation",
            Self::CopyReference => "copy_reference",
            Self::OpenInEditor => "open_in_editor",
            Self::RemoveTag => "remove_tag",
            Self::UploadMedia => "upload_media",
            Self::DeleteMedia => "delete_media",
            Self::RunTask => "run_task",
        };
        f.write_str(s)
    }
}

/// Outcome of a page action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEventOutcome {
    Success,
    Cancelled,
    Error(String),
}

impl std::fmt::Display for ActionEventOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// An event emitted for each page action.
#[derive(Debug, Clone)]
pub struct ActionEvent {
    pub timestamp: DateTime<Utc>,
    pub target: Option<String>,
    pub kind: ActionEventKind,
    pub outcome: ActionEventOutcome,
    pub detail: String,
}

impl ActionEvent {
    pub fn new(
        target: Option<String>,
        kind: ActionEventKind,
        outcome: ActionEventOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            target,
            kind,
            outcome,
            detail: detail.into(),
        }
    }
}

/// Trait for event sinks that receive action events.
pub trait ActionEventSink: Send + Sync {
    fn record(&self, event: ActionEvent);
}

/// In-memory event sink for testing.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: std::sync::Mutex<Vec<ActionEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ActionEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        match self.events.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Events of one kind, in recording order.
    pub fn of_kind(&self, kind: ActionEventKind) -> Vec<ActionEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == kind)
            .collect()
    }
}

impl ActionEventSink for InMemoryEventSink {
    fn record(&self, event: ActionEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Sink that forwards every event to the `tracing` subscriber.
pub struct TracingEventSink;

impl ActionEventSink for TracingEventSink {
    fn record(&self, event: ActionEvent) {
        let on = event.target.as_deref().unwrap_or("-");
        match &event.outcome {
            ActionEventOutcome::Error(message) => tracing::warn!(
                kind = %event.kind,
                on,
                error = %message,
                detail = %event.detail,
                "page action failed"
            ),
            outcome => tracing::info!(
                kind = %event.kind,
                on,
                outcome = %outcome,
                detail = %event.detail,
                "page action finished"
            ),
        }
    }
}

/// No-op event sink that discards all events.
pub struct NullEventSink;

impl ActionEventSink for NullEventSink {
    fn record(&self, _event: ActionEvent) {}
}
