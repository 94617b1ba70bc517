//! Mock journal service for unit testing.
//!
//! Records every call and answers from per-operation response queues. When
//! a queue is empty the call succeeds with a neutral default (uploads echo
//! the file back under `/media/`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use journal_core::types::UploadedFile;

use crate::error::ClientError;
use crate::service::JournalService;
use crate::types::{
    DeleteMediaParams, MediaUpload, OpenInEditorParams, RemoveTagParams, RunTaskParams,
    TaskOutcome,
};

/// A recorded call to the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    RunTask(RunTaskParams),
    RemoveTag(RemoveTagParams),
    OpenInEditor(OpenInEditorParams),
    UploadMedia { file_name: String, size: usize },
    DeleteMedia(DeleteMediaParams),
}

/// Mock implementation of `JournalService` for testing.
#[derive(Default)]
pub struct MockJournalService {
    calls: Mutex<Vec<MockCall>>,
    run_task: Mutex<VecDeque<Result<TaskOutcome, ClientError>>>,
    remove_tag: Mutex<VecDeque<Result<(), ClientError>>>,
    open_in_editor: Mutex<VecDeque<Result<(), ClientError>>>,
    upload_media: Mutex<VecDeque<Result<Vec<UploadedFile>, ClientError>>>,
    delete_media: Mutex<VecDeque<Result<(), ClientError>>>,
}

fn push<T>(queue: &Mutex<VecDeque<T>>, item: T) {
    match queue.lock() {
        Ok(mut guard) => guard.push_back(item),
        Err(poisoned) => poisoned.into_inner().push_back(item),
    }
}

fn pop<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    match queue.lock() {
        Ok(mut guard) => guard.pop_front(),
        Err(poisoned) => poisoned.into_inner().pop_front(),
    }
}

impl MockJournalService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next `run_task` response.
    pub fn with_run_task(self, result: Result<TaskOutcome, ClientError>) -> Self {
        push(&self.run_task, result);
        self
    }

    /// Queue the next `remove_tag` response.
    pub fn with_remove_tag(self, result: Result<(), ClientError>) -> Self {
        push(&self.remove_tag, result);
        self
    }

    /// Queue the next `open_in_editor` response.
    pub fn with_open_in_editor(self, result: Result<(), ClientError>) -> Self {
        push(&self.open_in_editor, result);
        self
    }

    /// Queue the next `upload_media` response.
    pub fn with_upload(self, result: Result<Vec<UploadedFile>, ClientError>) -> Self {
        push(&self.upload_media, result);
        self
    }

    /// Queue the next `delete_media` response.
    pub fn with_delete(self, result: Result<(), ClientError>) -> Self {
        push(&self.delete_media, result);
        self
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        match self.calls.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Return the number of recorded calls.
    pub fn call_count(&self) -> usize {
        match self.calls.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn record(&self, call: MockCall) {
        match self.calls.lock() {
            Ok(mut guard) => guard.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

/// Server-style error helper for tests.
pub fn server_error(status: u16, body: &str) -> ClientError {
    ClientError::Server {
        status,
        body: body.to_string(),
    }
}

#[async_trait]
impl JournalService for MockJournalService {
    async fn run_task(&self, params: RunTaskParams) -> Result<TaskOutcome, ClientError> {
        self.record(MockCall::RunTask(params));
        pop(&self.run_task).unwrap_or_else(|| Ok(TaskOutcome::default()))
    }

    async fn remove_tag(&self, params: RemoveTagParams) -> Result<(), ClientError> {
        self.record(MockCall::RemoveTag(params));
        pop(&self.remove_tag).unwrap_or(Ok(()))
    }

    async fn open_in_editor(&self, params: OpenInEditorParams) -> Result<(), ClientError> {
        self.record(MockCall::OpenInEditor(params));
        pop(&self.open_in_editor).unwrap_or(Ok(()))
    }

    async fn upload_media(&self, upload: MediaUpload) -> Result<Vec<UploadedFile>, ClientError> {
        self.record(MockCall::UploadMedia {
            file_name: upload.file_name.clone(),
            size: upload.bytes.len(),
        });
        pop(&self.upload_media).unwrap_or_else(|| {
            Ok(vec![UploadedFile::new(
                format!("/media/{}", upload.file_name),
                upload.file_name,
            )])
        })
    }

    async fn delete_media(&self, params: DeleteMediaParams) -> Result<(), ClientError> {
        self.record(MockCall::DeleteMedia(params));
        pop(&self.delete_media).unwrap_or(Ok(()))
    }
}
