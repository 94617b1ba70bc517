//! Journal service trait, the one interface the page flows talk to.
//!
//! Implementations can run against a live journal server or be mocked for
//! testing. Every call issues exactly one request and always completes;
//! there is no cancellation.

use async_trait::async_trait;

use journal_core::types::UploadedFile;

use crate::error::ClientError;
use crate::types::{
    DeleteMediaParams, MediaUpload, OpenInEditorParams, RemoveTagParams, RunTaskParams,
    TaskOutcome,
};

#[async_trait]
pub trait JournalService: Send + Sync {
    /// Run a named maintenance task on the server.
    async fn run_task(&self, params: RunTaskParams) -> Result<TaskOutcome, ClientError>;

    /// Remove a tag from a journal entry.
    async fn remove_tag(&self, params: RemoveTagParams) -> Result<(), ClientError>;

    /// Ask the server to open a file (optionally at a line) in its editor.
    async fn open_in_editor(&self, params: OpenInEditorParams) -> Result<(), ClientError>;

    /// Upload one file. Returns the stored files in server order.
    async fn upload_media(&self, upload: MediaUpload) -> Result<Vec<UploadedFile>, ClientError>;

    /// Submit the delete form for a stored media file.
    async fn delete_media(&self, params: DeleteMediaParams) -> Result<(), ClientError>;
}
