//! The journal entry list.
//!
//! Entries are `li.entry` elements whose `id` is the entry id and whose data
//! attributes carry the editor coordinates and the copy reference. Each entry
//! listens for double activations on itself and its descendants and queues
//! an editor request; the queue is drained by `handle_pointer_release`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use journal_client::types::OpenInEditorParams;
use journal_core::config::ClientConfig;
use journal_core::error::ActionError;
use journal_core::event::ActionEventKind;
use journal_core::types::{entry_reference, highlight_classes, HIGHLIGHTED_CLASS, INBOX_CLASS};
use journal_gesture::{
    dispatch_pointer_release, Document, DoubleActivation, ElementId, GestureBridge,
    PointerOutcome, PointerRelease, Propagation,
};

use crate::flow::FlowContext;
use crate::mutator::OptimisticMutator;
use crate::tags::TagKey;

pub const ENTRY_CLASS: &str = "entry";
pub const TAG_LIST_CLASS: &str = "tags";
pub const TAG_CLASS: &str = "tag";

pub const ATTR_REL_PATH: &str = "data-rel-path";
pub const ATTR_LINE_NO: &str = "data-line-no";
pub const ATTR_DATESTR: &str = "data-datestr";
pub const ATTR_LOCATION: &str = "data-location";
pub const ATTR_TAGS: &str = "data-tags";
pub const ATTR_TAG: &str = "data-tag";

const OPEN_FAILED: &str = "Failed to open in editor on server";
const OPEN_ERROR: &str = "Error opening in editor on server.";

/// One entry as rendered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntrySpec {
    pub id: String,
    pub datestr: String,
    pub location: String,
    pub rel_path: Option<String>,
    pub line_no: Option<String>,
    pub tags: Vec<String>,
}

impl EntrySpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_reference(
        mut self,
        datestr: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        self.datestr = datestr.into();
        self.location = location.into();
        self
    }

    pub fn with_source(mut self, rel_path: impl Into<String>, line_no: Option<&str>) -> Self {
        self.rel_path = Some(rel_path.into());
        self.line_no = line_no.map(str::to_string);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Entry list page: element tree, gesture detector, and tag mutations.
pub struct JournalPage {
    pub(crate) document: Document,
    list: ElementId,
    bridge: GestureBridge,
    pub(crate) tag_mutations: OptimisticMutator<TagKey>,
    editor_requests: Rc<RefCell<VecDeque<String>>>,
}

impl std::fmt::Debug for JournalPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalPage")
            .field("document", &self.document)
            .field("bridge", &self.bridge)
            .field("pending_tags", &self.tag_mutations.pending_count())
            .finish()
    }
}

impl JournalPage {
    pub fn new(config: &ClientConfig) -> Self {
        let mut document = Document::new();
        let list = document.append(document.root(), "ul");
        document.set_attribute(list, "id", "entries");
        Self {
            document,
            list,
            bridge: GestureBridge::from_config(&config.gesture),
            tag_mutations: OptimisticMutator::new(config.mutation.failure_policy),
            editor_requests: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn bridge(&self) -> &GestureBridge {
        &self.bridge
    }

    /// Render an entry at the end of the list and wire its listener.
    pub fn add_entry(&mut self, spec: &EntrySpec) -> ElementId {
        let doc = &mut self.document;
        let entry = doc.append(self.list, "li");
        doc.add_class(entry, ENTRY_CLASS);
        doc.set_attribute(entry, "id", spec.id.as_str());
        doc.set_attribute(entry, ATTR_DATESTR, spec.datestr.as_str());
        doc.set_attribute(entry, ATTR_LOCATION, spec.location.as_str());
        doc.set_attribute(entry, ATTR_TAGS, spec.tags.join(" "));
        if let Some(rel_path) = &spec.rel_path {
            doc.set_attribute(entry, ATTR_REL_PATH, rel_path.as_str());
        }
        if let Some(line_no) = &spec.line_no {
            doc.set_attribute(entry, ATTR_LINE_NO, line_no.as_str());
        }

        let body = doc.append(entry, "div");
        doc.add_class(body, "body");
        let tag_list = doc.append(entry, "span");
        doc.add_class(tag_list, TAG_LIST_CLASS);
        for tag in &spec.tags {
            let chip = doc.append(tag_list, "span");
            doc.add_class(chip, TAG_CLASS);
            doc.set_attribute(chip, ATTR_TAG, tag.as_str());
            doc.set_text(chip, tag.as_str());
        }

        let queue = Rc::clone(&self.editor_requests);
        let entry_id = spec.id.clone();
        doc.on_double_activation(
            entry,
            Box::new(move |_event: &DoubleActivation, _current: ElementId| {
                queue.borrow_mut().push_back(entry_id.clone());
                Propagation::Continue
            }),
        );
        self.apply_highlights_to(entry);
        entry
    }

    /// Render the occurrence counter for a tag.
    pub fn add_tag_counter(&mut self, tag: &str, count: &str) -> ElementId {
        let doc = &mut self.document;
        let counter = doc.append(doc.root(), "span");
        doc.set_attribute(counter, "id", counter_id(tag));
        doc.set_text(counter, count);
        counter
    }

    pub fn entry(&self, entry_id: &str) -> Option<ElementId> {
        self.document
            .element_by_id(entry_id)
            .filter(|id| self.document.has_class(*id, ENTRY_CLASS))
    }

    /// Attached entries in list order.
    pub fn entry_ids(&self) -> Vec<String> {
        self.document
            .children(self.list)
            .into_iter()
            .filter(|id| self.document.is_attached(*id))
            .filter_map(|id| self.document.attribute(id, "id").map(str::to_string))
            .collect()
    }

    pub fn tag_chip(&self, entry_id: &str, tag: &str) -> Option<ElementId> {
        let entry = self.entry(entry_id)?;
        let tag_list = self
            .document
            .children(entry)
            .into_iter()
            .find(|id| self.document.has_class(*id, TAG_LIST_CLASS))?;
        self.document
            .children(tag_list)
            .into_iter()
            .find(|id| self.document.attribute(*id, ATTR_TAG) == Some(tag))
    }

    /// Tags currently shown on an entry, in display order.
    pub fn tags_of(&self, entry_id: &str) -> Vec<String> {
        let Some(entry) = self.entry(entry_id) else {
            return Vec::new();
        };
        self.document
            .children(entry)
            .into_iter()
            .filter(|id| self.document.has_class(*id, TAG_LIST_CLASS))
            .flat_map(|list| self.document.children(list))
            .filter_map(|chip| self.document.attribute(chip, ATTR_TAG).map(str::to_string))
            .collect()
    }

    pub fn tag_counter_text(&self, tag: &str) -> Option<&str> {
        let counter = self.document.element_by_id(&counter_id(tag))?;
        self.document.text(counter)
    }

    // -----------------------------------------------------------------------
    // Highlighting
    // -----------------------------------------------------------------------

    /// Recompute `highlighted` / `in_inbox` on every entry.
    pub fn apply_highlights(&mut self) {
        for entry in self.document.elements_with_class(ENTRY_CLASS) {
            self.apply_highlights_to(entry);
        }
    }

    fn apply_highlights_to(&mut self, entry: ElementId) {
        let tags = self
            .document
            .attribute(entry, ATTR_TAGS)
            .unwrap_or_default()
            .to_string();
        let classes = highlight_classes(&tags);
        for class in [HIGHLIGHTED_CLASS, INBOX_CLASS] {
            if classes.contains(&class) {
                self.document.add_class(entry, class);
            } else {
                self.document.remove_class(entry, class);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Activation
    // -----------------------------------------------------------------------

    /// Single activation: copy a markdown reference to the entry.
    pub fn copy_entry_reference(
        &self,
        ctx: &FlowContext<'_>,
        entry_id: &str,
    ) -> Result<String, ActionError> {
        let result = self
            .entry(entry_id)
            .ok_or_else(|| ActionError::missing("entry not found"))
            .map(|entry| {
                let datestr = self.document.attribute(entry, ATTR_DATESTR).unwrap_or_default();
                let location = self.document.attribute(entry, ATTR_LOCATION).unwrap_or_default();
                entry_reference(datestr, location)
            });
        match &result {
            Ok(reference) => {
                ctx.host.write_clipboard(reference);
                ctx.record_success(ActionEventKind::CopyReference, entry_id, reference.as_str());
            }
            Err(err) => {
                ctx.alert_failure(err, OPEN_FAILED, OPEN_ERROR);
                ctx.record_failure(ActionEventKind::CopyReference, entry_id, err);
            }
        }
        result
    }

    /// Feed a pointer release through the gesture detector. Entries hit by
    /// a double activation are queued for `take_editor_requests`.
    pub fn pointer_release(&mut self, release: PointerRelease) -> PointerOutcome {
        dispatch_pointer_release(&mut self.bridge, &mut self.document, release)
    }

    /// Entry ids whose double activation has not been handled yet.
    pub fn take_editor_requests(&mut self) -> Vec<String> {
        self.editor_requests.borrow_mut().drain(..).collect()
    }

    /// Feed a pointer release and open every entry it double-activated.
    pub async fn handle_pointer_release(
        &mut self,
        ctx: &FlowContext<'_>,
        release: PointerRelease,
    ) -> PointerOutcome {
        let outcome = self.pointer_release(release);
        if let Some(fired) = &outcome.double_activation {
            ctx.record_success(
                ActionEventKind::DoubleActivation,
                &format!("element-{}", fired.target.index()),
                format!("gap={}ms", fired.gap_ms),
            );
        }
        for entry_id in self.take_editor_requests() {
            // Failures are already alerted and recorded.
            let _ = self.open_entry_in_editor(ctx, &entry_id).await;
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Editor
    // -----------------------------------------------------------------------

    fn editor_params(&self, entry_id: &str) -> Result<OpenInEditorParams, ActionError> {
        let entry = self
            .entry(entry_id)
            .ok_or_else(|| ActionError::missing("entry not found"))?;
        let rel_path = self
            .document
            .attribute(entry, ATTR_REL_PATH)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ActionError::missing("no path available for this entry"))?;
        let line_no = self
            .document
            .attribute(entry, ATTR_LINE_NO)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ActionError::missing("no line number available for this entry"))?;
        Ok(OpenInEditorParams {
            rel_path: rel_path.to_string(),
            line_no: Some(line_no.to_string()),
        })
    }

    /// Ask the server to open an entry at its line.
    pub async fn open_entry_in_editor(
        &self,
        ctx: &FlowContext<'_>,
        entry_id: &str,
    ) -> Result<(), ActionError> {
        let result = match self.editor_params(entry_id) {
            Ok(params) => open_in_editor(ctx, params).await,
            Err(err) => Err(err),
        };
        finish_open(ctx, entry_id, result)
    }
}

/// Ask the server to open a file that is not an entry, without a line.
pub async fn open_file_in_editor(ctx: &FlowContext<'_>, rel_path: &str) -> Result<(), ActionError> {
    let result = if rel_path.trim().is_empty() {
        Err(ActionError::missing("no path available for this file"))
    } else {
        open_in_editor(
            ctx,
            OpenInEditorParams {
                rel_path: rel_path.to_string(),
                line_no: None,
            },
        )
        .await
    };
    finish_open(ctx, rel_path, result)
}

async fn open_in_editor(
    ctx: &FlowContext<'_>,
    params: OpenInEditorParams,
) -> Result<(), ActionError> {
    tracing::info!(rel_path = %params.rel_path, line_no = ?params.line_no, "open in editor");
    ctx.service
        .open_in_editor(params)
        .await
        .map_err(ActionError::from)
}

fn finish_open(
    ctx: &FlowContext<'_>,
    target: &str,
    result: Result<(), ActionError>,
) -> Result<(), ActionError> {
    match &result {
        Ok(()) => ctx.record_success(ActionEventKind::OpenInEditor, target, ""),
        Err(err) => {
            ctx.alert_failure(err, OPEN_FAILED, OPEN_ERROR);
            ctx.record_failure(ActionEventKind::OpenInEditor, target, err);
        }
    }
    result
}

pub fn counter_id(tag: &str) -> String {
    format!("tag-count-{tag}")
}
