//! journal-ui: the journal page flows on top of the element tree.
//!
//! - `JournalPage` holds the entry list: highlighting, copy reference,
//!   double activation to editor, and tag removal.
//! - `MediaPage` holds the upload widgets and the recent-uploads list.
//! - `run_task` triggers server maintenance tasks.
//!
//! Every flow talks to the user through a `PageHost` and to the server
//! through a `JournalService`, bundled in a `FlowContext`.

pub mod entries;
pub mod flow;
pub mod host;
pub mod media;
pub mod mutator;
pub mod tags;
pub mod tasks;

pub use entries::{open_file_in_editor, EntrySpec, JournalPage};
pub use flow::FlowContext;
pub use host::{PageHost, RecordingHost};
pub use media::{ClipboardItem, LabelRestore, MediaPage, RecentUpload};
pub use mutator::{MutationState, OptimisticMutator};
pub use tags::{TagKey, TagRemovalOutcome, TagUiState};
pub use tasks::run_task;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "journal-ui"
}
