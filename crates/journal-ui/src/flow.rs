//! What every page action runs against.

use journal_client::JournalService;
use journal_core::error::ActionError;
use journal_core::event::{ActionEvent, ActionEventKind, ActionEventOutcome, ActionEventSink};

use crate::host::PageHost;

/// Server, user surface, and audit sink for one page.
#[derive(Clone, Copy)]
pub struct FlowContext<'a> {
    pub service: &'a dyn JournalService,
    pub host: &'a dyn PageHost,
    pub events: &'a dyn ActionEventSink,
}

impl<'a> FlowContext<'a> {
    pub fn new(
        service: &'a dyn JournalService,
        host: &'a dyn PageHost,
        events: &'a dyn ActionEventSink,
    ) -> Self {
        Self {
            service,
            host,
            events,
        }
    }

    pub(crate) fn record_success(
        &self,
        kind: ActionEventKind,
        target: &str,
        detail: impl Into<String>,
    ) {
        self.events.record(ActionEvent::new(
            Some(target.to_string()),
            kind,
            ActionEventOutcome::Success,
            detail,
        ));
    }

    pub(crate) fn record_failure(&self, kind: ActionEventKind, target: &str, err: &ActionError) {
        let outcome = if err.is_silent() {
            ActionEventOutcome::Cancelled
        } else {
            ActionEventOutcome::Error(err.to_string())
        };
        self.events
            .record(ActionEvent::new(Some(target.to_string()), kind, outcome, ""));
    }

    /// Tell the user about a failed action. Server failures are shown as
    /// `"{server_prefix}: {status} {body}"`; transport and parse failures
    /// share the `generic` message.
    pub(crate) fn alert_failure(&self, err: &ActionError, server_prefix: &str, generic: &str) {
        match err {
            ActionError::Cancelled => {}
            ActionError::Busy { target } => {
                tracing::debug!(target_key = %target, "action ignored while pending");
            }
            ActionError::MissingPrecondition { message } => self.host.alert(message),
            ActionError::Server { .. } => self.host.alert(&format!("{server_prefix}: {err}")),
            ActionError::Transport { .. } | ActionError::Parse { .. } => {
                tracing::error!(error = %err, "{generic}");
                self.host.alert(generic);
            }
        }
    }
}
