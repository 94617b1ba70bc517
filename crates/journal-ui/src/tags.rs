//! Tag removal with speculative marking.

use std::fmt;

use journal_client::types::RemoveTagParams;
use journal_client::ClientError;
use journal_core::error::ActionError;
use journal_core::event::ActionEventKind;
use journal_core::types::NO_ADDITIONAL_TAGS;
use journal_gesture::ElementId;

use crate::entries::{counter_id, JournalPage, ATTR_REL_PATH};
use crate::flow::FlowContext;
use crate::mutator::{MutationState, PendingMutation};

pub const PENDING_CLASS: &str = "pending";

const REMOVE_FAILED: &str = "Failed to remove tag";
const REMOVE_ERROR: &str = "Error removing tag.";

/// One tag on one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub entry_id: String,
    pub tag: String,
}

impl TagKey {
    pub fn new(entry_id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entry_id, self.tag)
    }
}

/// How a tag chip looks right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagUiState {
    Displayed,
    PendingRemoval,
    Removed,
}

/// A tag marked pending whose request has not been answered yet.
#[derive(Debug)]
pub struct PendingTagRemoval {
    mutation: PendingMutation<TagKey>,
    chip: ElementId,
    params: RemoveTagParams,
}

impl PendingTagRemoval {
    pub fn key(&self) -> &TagKey {
        self.mutation.key()
    }

    /// The request to send for this removal.
    pub fn params(&self) -> &RemoveTagParams {
        &self.params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRemovalOutcome {
    /// The placeholder tag was activated; nothing was sent.
    Skipped,
    /// The chip is gone. `counter` is the new count when the counter was
    /// present and numeric.
    Removed { counter: Option<i64> },
}

impl JournalPage {
    pub fn tag_state(&self, entry_id: &str, tag: &str) -> TagUiState {
        match self.tag_chip(entry_id, tag) {
            None => TagUiState::Removed,
            Some(chip) if self.document.has_class(chip, PENDING_CLASS) => {
                TagUiState::PendingRemoval
            }
            Some(_) => TagUiState::Displayed,
        }
    }

    pub fn tag_mutation_state(&self, entry_id: &str, tag: &str) -> MutationState {
        self.tag_mutations.state(&TagKey::new(entry_id, tag))
    }

    /// Confirm with the user and mark the chip pending. Returns `None` for
    /// the placeholder tag.
    pub fn begin_tag_removal(
        &mut self,
        ctx: &FlowContext<'_>,
        entry_id: &str,
        tag: &str,
    ) -> Result<Option<PendingTagRemoval>, ActionError> {
        if tag == NO_ADDITIONAL_TAGS {
            return Ok(None);
        }
        let key = TagKey::new(entry_id, tag);
        let result = self.prepare_removal(ctx, &key);
        if let Err(err) = &result {
            ctx.alert_failure(err, REMOVE_FAILED, REMOVE_ERROR);
            ctx.record_failure(ActionEventKind::RemoveTag, &key.to_string(), err);
        }
        result.map(Some)
    }

    fn prepare_removal(
        &mut self,
        ctx: &FlowContext<'_>,
        key: &TagKey,
    ) -> Result<PendingTagRemoval, ActionError> {
        let entry = self
            .entry(&key.entry_id)
            .ok_or_else(|| ActionError::missing("entry not found"))?;
        let chip = self
            .tag_chip(&key.entry_id, &key.tag)
            .ok_or_else(|| ActionError::missing("tag not found on this entry"))?;
        if self.tag_mutations.is_pending(key) {
            return Err(ActionError::Busy {
                target: key.to_string(),
            });
        }
        if !ctx
            .host
            .confirm(&format!("Are you sure you want to remove tag \"{}\"?", key.tag))
        {
            return Err(ActionError::Cancelled);
        }

        let mutation = self.tag_mutations.begin(key.clone())?;
        self.document.add_class(chip, PENDING_CLASS);
        let rel_path = self
            .document
            .attribute(entry, ATTR_REL_PATH)
            .map(str::to_string);
        Ok(PendingTagRemoval {
            mutation,
            chip,
            params: RemoveTagParams {
                entry_id: key.entry_id.clone(),
                tag: key.tag.clone(),
                rel_path,
            },
        })
    }

    /// Settle a pending removal with the server's answer.
    pub fn finish_tag_removal(
        &mut self,
        ctx: &FlowContext<'_>,
        pending: PendingTagRemoval,
        response: Result<(), ClientError>,
    ) -> Result<TagRemovalOutcome, ActionError> {
        let target = pending.key().to_string();
        let tag = pending.params.tag.clone();
        match response {
            Ok(()) => {
                let key = pending.key().clone();
                self.tag_mutations.commit(pending.mutation);
                // The chip is gone, so nothing can target this key again.
                self.tag_mutations.forget(&key);
                self.document.remove(pending.chip);
                let counter = self.decrement_counter(&tag);
                tracing::info!(target_key = %target, counter = ?counter, "tag removed");
                ctx.record_success(ActionEventKind::RemoveTag, &target, "");
                Ok(TagRemovalOutcome::Removed { counter })
            }
            Err(err) => {
                let err = ActionError::from(err);
                if self.tag_mutations.fail(pending.mutation) == MutationState::Idle {
                    self.document.remove_class(pending.chip, PENDING_CLASS);
                }
                ctx.alert_failure(&err, REMOVE_FAILED, REMOVE_ERROR);
                ctx.record_failure(ActionEventKind::RemoveTag, &target, &err);
                Err(err)
            }
        }
    }

    /// Confirm, mark pending, send the request, reconcile.
    pub async fn remove_tag(
        &mut self,
        ctx: &FlowContext<'_>,
        entry_id: &str,
        tag: &str,
    ) -> Result<TagRemovalOutcome, ActionError> {
        let Some(pending) = self.begin_tag_removal(ctx, entry_id, tag)? else {
            return Ok(TagRemovalOutcome::Skipped);
        };
        let response = ctx.service.remove_tag(pending.params().clone()).await;
        self.finish_tag_removal(ctx, pending, response)
    }

    /// Lower the tag's occurrence counter by one if it shows a number.
    fn decrement_counter(&mut self, tag: &str) -> Option<i64> {
        let counter = self.document.element_by_id(&counter_id(tag))?;
        let current: i64 = self.document.text(counter)?.trim().parse().ok()?;
        let next = current - 1;
        self.document.set_text(counter, next.to_string());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntrySpec;
    use crate::host::RecordingHost;
    use journal_client::mock::{server_error, MockJournalService};
    use journal_core::config::{ClientConfig, FailurePolicy};
    use journal_core::event::InMemoryEventSink;

    fn page_with(policy: FailurePolicy) -> JournalPage {
        let mut config = ClientConfig::default();
        config.mutation.failure_policy = policy;
        let mut page = JournalPage::new(&config);
        page.add_entry(
            &EntrySpec::new("e1")
                .with_source("2024/03.md", Some("12"))
                .with_tags(["work", "home"]),
        );
        page.add_tag_counter("work", "7");
        page
    }

    #[test]
    fn begin_marks_pending_after_confirmation() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let pending = page.begin_tag_removal(&ctx, "e1", "work");
        let Ok(Some(pending)) = pending else {
            panic!("expected pending removal");
        };
        assert_eq!(
            pending.params(),
            &RemoveTagParams {
                entry_id: "e1".into(),
                tag: "work".into(),
                rel_path: Some("2024/03.md".into()),
            }
        );
        assert_eq!(page.tag_state("e1", "work"), TagUiState::PendingRemoval);
        assert_eq!(host.prompts(), vec!["Are you sure you want to remove tag \"work\"?"]);
        assert_eq!(service.call_count(), 0);
    }

    #[test]
    fn second_begin_while_pending_is_busy_without_prompt() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let first = page.begin_tag_removal(&ctx, "e1", "work");
        assert!(matches!(first, Ok(Some(_))));
        let second = page.begin_tag_removal(&ctx, "e1", "work");
        assert!(matches!(second, Err(ActionError::Busy { .. })), "{second:?}");
        assert_eq!(host.prompts().len(), 1);
        assert!(host.alerts().is_empty());

        let other = page.begin_tag_removal(&ctx, "e1", "home");
        assert!(matches!(other, Ok(Some(_))));
    }

    #[test]
    fn placeholder_tag_is_silent() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let result = page.begin_tag_removal(&ctx, "e1", NO_ADDITIONAL_TAGS);
        assert!(matches!(result, Ok(None)));
        assert!(host.prompts().is_empty());
        assert_eq!(events.count(), 0);
    }

    #[test]
    fn missing_chip_is_a_precondition_failure() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let result = page.begin_tag_removal(&ctx, "e1", "travel");
        assert!(matches!(result, Err(ActionError::MissingPrecondition { .. })));
        assert_eq!(host.alerts(), vec!["tag not found on this entry"]);
        assert!(host.prompts().is_empty());
    }

    #[test]
    fn auto_revert_clears_pending_marker() {
        let mut page = page_with(FailurePolicy::AutoRevert);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let Ok(Some(pending)) = page.begin_tag_removal(&ctx, "e1", "work") else {
            panic!("expected pending removal");
        };
        let result = page.finish_tag_removal(&ctx, pending, Err(server_error(500, "boom")));
        assert!(result.is_err());
        assert_eq!(page.tag_state("e1", "work"), TagUiState::Displayed);
        assert_eq!(page.tag_mutation_state("e1", "work"), MutationState::Idle);
        assert_eq!(page.tag_counter_text("work"), Some("7"));
    }

    #[test]
    fn non_numeric_counter_is_left_alone() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        page.add_tag_counter("home", "many");
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        let Ok(Some(pending)) = page.begin_tag_removal(&ctx, "e1", "home") else {
            panic!("expected pending removal");
        };
        let outcome = page.finish_tag_removal(&ctx, pending, Ok(()));
        assert_eq!(outcome, Ok(TagRemovalOutcome::Removed { counter: None }));
        assert_eq!(page.tag_counter_text("home"), Some("many"));
        assert_eq!(page.tag_state("e1", "home"), TagUiState::Removed);
    }

    #[test]
    fn committed_removals_leave_no_bookkeeping() {
        let mut page = page_with(FailurePolicy::PersistentPending);
        let service = MockJournalService::new();
        let host = RecordingHost::new();
        let events = InMemoryEventSink::new();
        let ctx = FlowContext::new(&service, &host, &events);

        for tag in ["work", "home"] {
            let Ok(Some(pending)) = page.begin_tag_removal(&ctx, "e1", tag) else {
                panic!("expected pending removal of {tag}");
            };
            assert!(page.finish_tag_removal(&ctx, pending, Ok(())).is_ok());
            assert_eq!(page.tag_mutation_state("e1", tag), MutationState::Idle);
        }
        assert_eq!(page.tag_mutations.tracked_count(), 0);
    }
}
