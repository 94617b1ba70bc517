//! Request and response types for the journal endpoints.

/// Parameters for `POST {prefix}run_task/{task_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTaskParams {
    pub task_id: String,
    pub param: Option<String>,
}

/// What a finished server task reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    pub detail: Option<String>,
}

/// Parameters for `POST {prefix}remove_tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTagParams {
    pub entry_id: String,
    pub tag: String,
    pub rel_path: Option<String>,
}

/// Parameters for `POST {prefix}edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInEditorParams {
    pub rel_path: String,
    pub line_no: Option<String>,
}

/// One file to send to `POST {prefix}upload_media`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Parameters for the delete form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMediaParams {
    pub url: String,
}
