//! Media uploads and the recent-uploads list.
//!
//! Uploads have no element to mark while in flight, so the speculative state
//! lives on the shared status line instead. Completed files are prepended to
//! the recent list one by one in server order, and the whole batch lands on
//! the clipboard in a single write.

use std::time::Duration;

use journal_client::types::{DeleteMediaParams, MediaUpload};
use journal_client::ClientError;
use journal_core::config::{ClientConfig, MediaConfig};
use journal_core::error::ActionError;
use journal_core::event::ActionEventKind;
use journal_core::types::{batch_clipboard_text, markdown_image, PreviewKind, UploadedFile};
use journal_gesture::{Document, ElementId};

use crate::flow::FlowContext;
use crate::mutator::{OptimisticMutator, PendingMutation};

pub const RECENT_ITEM_CLASS: &str = "recent-upload";
pub const COPY_LINK_CLASS: &str = "copy-link";
pub const COPIED_LABEL: &str = "copied";

pub const STATUS_UPLOADING: &str = "Uploading...";
pub const STATUS_UPLOAD_ERROR: &str = "Upload error";

const UPLOAD_KEY: &str = "upload";
const DELETE_FAILED: &str = "Failed to delete file";
const DELETE_ERROR: &str = "Error deleting file.";

/// One item of the platform clipboard, as offered by a paste event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardItem {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// The upload a paste turns into: the first image item, named after its
/// subtype.
pub fn pasted_image(items: &[ClipboardItem]) -> Option<MediaUpload> {
    let item = items.iter().find(|item| item.mime_type.starts_with("image/"))?;
    let subtype = item
        .mime_type
        .split_once('/')
        .map(|(_, subtype)| subtype.split(';').next().unwrap_or_default().trim())
        .filter(|subtype| !subtype.is_empty())
        .unwrap_or("png");
    Some(
        MediaUpload::new(format!("pasted.{subtype}"), item.bytes.clone())
            .with_mime_type(item.mime_type.clone()),
    )
}

/// A recent-list item as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentUpload {
    pub name: String,
    pub url: String,
    pub preview: PreviewKind,
    pub label: String,
}

/// Instruction to put a copy label back once the feedback period is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRestore {
    pub item: ElementId,
    pub label: String,
    pub after: Duration,
}

/// An upload whose status line says `Uploading...`.
#[derive(Debug)]
pub struct PendingUpload {
    mutation: PendingMutation<&'static str>,
}

pub struct MediaPage {
    document: Document,
    list: ElementId,
    uploads: OptimisticMutator<&'static str>,
    config: MediaConfig,
}

impl std::fmt::Debug for MediaPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPage")
            .field("document", &self.document)
            .field("recent", &self.recent_items().len())
            .finish()
    }
}

impl MediaPage {
    pub fn new(config: &ClientConfig) -> Self {
        let mut document = Document::new();
        let list = document.append(document.root(), "ul");
        document.set_attribute(list, "id", "recentList");
        Self {
            document,
            list,
            uploads: OptimisticMutator::new(config.mutation.failure_policy),
            config: config.media.clone(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_pending(&UPLOAD_KEY)
    }

    /// Recent uploads, newest first.
    pub fn recent_items(&self) -> Vec<RecentUpload> {
        self.recent_elements()
            .into_iter()
            .filter_map(|item| self.recent_item(item))
            .collect()
    }

    pub fn recent_elements(&self) -> Vec<ElementId> {
        self.document
            .children(self.list)
            .into_iter()
            .filter(|id| self.document.is_attached(*id))
            .collect()
    }

    /// The newest list item for `url`.
    pub fn find_recent(&self, url: &str) -> Option<ElementId> {
        self.recent_elements()
            .into_iter()
            .find(|id| self.document.attribute(*id, "data-url") == Some(url))
    }

    fn recent_item(&self, item: ElementId) -> Option<RecentUpload> {
        let doc = &self.document;
        let label = doc
            .children(item)
            .into_iter()
            .find(|child| doc.has_class(*child, COPY_LINK_CLASS))
            .and_then(|link| doc.text(link))
            .unwrap_or_default();
        let preview = match doc.attribute(item, "data-preview") {
            Some("image") => PreviewKind::Image,
            _ => PreviewKind::Document,
        };
        Some(RecentUpload {
            name: doc.attribute(item, "data-name")?.to_string(),
            url: doc.attribute(item, "data-url")?.to_string(),
            preview,
            label: label.to_string(),
        })
    }

    fn prepend_recent(&mut self, file: &UploadedFile) -> ElementId {
        let doc = &mut self.document;
        let item = doc.prepend(self.list, "li");
        doc.add_class(item, RECENT_ITEM_CLASS);
        doc.set_attribute(item, "data-name", file.name.as_str());
        doc.set_attribute(item, "data-url", file.url.as_str());
        doc.set_attribute(item, "data-preview", file.preview_kind().as_str());
        let link = doc.append(item, "span");
        doc.add_class(link, COPY_LINK_CLASS);
        doc.set_text(link, file.name.as_str());
        item
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Claim the status line for a new upload.
    pub fn begin_upload(&mut self, ctx: &FlowContext<'_>) -> Result<PendingUpload, ActionError> {
        let mutation = self.uploads.begin(UPLOAD_KEY).inspect_err(|err| {
            ctx.record_failure(ActionEventKind::UploadMedia, UPLOAD_KEY, err);
        })?;
        ctx.host.set_status(STATUS_UPLOADING);
        Ok(PendingUpload { mutation })
    }

    /// Settle an upload with the server's answer.
    pub fn finish_upload(
        &mut self,
        ctx: &FlowContext<'_>,
        pending: PendingUpload,
        file_name: &str,
        response: Result<Vec<UploadedFile>, ClientError>,
    ) -> Result<Vec<UploadedFile>, ActionError> {
        let result = match response {
            Ok(files) => {
                self.uploads.commit(pending.mutation);
                for file in &files {
                    self.prepend_recent(file);
                    ctx.host.set_status(&format!("Uploaded: {}", file.name));
                }
                if !files.is_empty() {
                    ctx.host.write_clipboard(&batch_clipboard_text(&files));
                }
                tracing::info!(file_name, stored = files.len(), "upload finished");
                ctx.record_success(
                    ActionEventKind::UploadMedia,
                    file_name,
                    format!("{} file(s)", files.len()),
                );
                Ok(files)
            }
            Err(err) => {
                let err = ActionError::from(err);
                self.uploads.fail(pending.mutation);
                ctx.host.set_status(&upload_failure_status(&err));
                tracing::error!(file_name, error = %err, "upload failed");
                ctx.record_failure(ActionEventKind::UploadMedia, file_name, &err);
                Err(err)
            }
        };
        ctx.host.clear_status_after(self.config.status_clear_after);
        result
    }

    /// Upload one file and reconcile the page with the stored batch.
    pub async fn upload(
        &mut self,
        ctx: &FlowContext<'_>,
        upload: MediaUpload,
    ) -> Result<Vec<UploadedFile>, ActionError> {
        let pending = self.begin_upload(ctx)?;
        let file_name = upload.file_name.clone();
        let response = ctx.service.upload_media(upload).await;
        self.finish_upload(ctx, pending, &file_name, response)
    }

    /// Upload the first image of a paste. `Ok(None)` when there is none.
    pub async fn upload_pasted(
        &mut self,
        ctx: &FlowContext<'_>,
        items: &[ClipboardItem],
    ) -> Result<Option<Vec<UploadedFile>>, ActionError> {
        match pasted_image(items) {
            Some(upload) => self.upload(ctx, upload).await.map(Some),
            None => Ok(None),
        }
    }

    // -----------------------------------------------------------------------
    // Copy link
    // -----------------------------------------------------------------------

    /// Copy one item's markdown image link and show `copied` on its label.
    pub fn copy_link(
        &mut self,
        ctx: &FlowContext<'_>,
        item: ElementId,
    ) -> Result<LabelRestore, ActionError> {
        let Some(recent) = self
            .document
            .is_attached(item)
            .then(|| self.recent_item(item))
            .flatten()
        else {
            let err = ActionError::missing("upload not found");
            ctx.record_failure(ActionEventKind::CopyReference, "recent-upload", &err);
            return Err(err);
        };
        ctx.host.write_clipboard(&markdown_image(&recent.url));
        self.set_label(item, COPIED_LABEL);
        ctx.record_success(ActionEventKind::CopyReference, &recent.url, recent.name.as_str());
        // The shown label may still be the feedback text of an earlier copy.
        Ok(LabelRestore {
            item,
            label: recent.name,
            after: self.config.copy_feedback_for,
        })
    }

    pub fn restore_label(&mut self, restore: &LabelRestore) {
        self.set_label(restore.item, &restore.label);
    }

    fn set_label(&mut self, item: ElementId, label: &str) {
        let link = self
            .document
            .children(item)
            .into_iter()
            .find(|child| self.document.has_class(*child, COPY_LINK_CLASS));
        if let Some(link) = link {
            self.document.set_text(link, label);
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Confirm and submit the delete form for a stored file. The server
    /// answers with a new page, so nothing is reconciled locally.
    pub async fn delete(&self, ctx: &FlowContext<'_>, url: &str) -> Result<(), ActionError> {
        let result = if ctx
            .host
            .confirm(&format!("Are you sure you want to delete this file?\n{url}"))
        {
            ctx.service
                .delete_media(DeleteMediaParams {
                    url: url.to_string(),
                })
                .await
                .map_err(ActionError::from)
        } else {
            Err(ActionError::Cancelled)
        };
        match &result {
            Ok(()) => ctx.record_success(ActionEventKind::DeleteMedia, url, ""),
            Err(err) => {
                ctx.alert_failure(err, DELETE_FAILED, DELETE_ERROR);
                ctx.record_failure(ActionEventKind::DeleteMedia, url, err);
            }
        }
        result
    }
}

fn upload_failure_status(err: &ActionError) -> String {
    match err {
        ActionError::Server { status, body } if body.trim().is_empty() => {
            format!("Upload failed: {status}")
        }
        ActionError::Server { body, .. } => format!("Upload failed: {body}"),
        ActionError::MissingPrecondition { message } => format!("Upload failed: {message}"),
        _ => STATUS_UPLOAD_ERROR.to_string(),
    }
}
