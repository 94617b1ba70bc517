//! HTTP transport: implements `JournalService` with reqwest multipart posts.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use journal_core::config::ServerConfig;
use journal_core::types::UploadedFile;

use crate::error::ClientError;
use crate::response::{expect_success, parse_task_response, parse_upload_response};
use crate::routes::Routes;
use crate::service::JournalService;
use crate::types::{
    DeleteMediaParams, MediaUpload, OpenInEditorParams, RemoveTagParams, RunTaskParams,
    TaskOutcome,
};

/// Journal service backed by a running journal server.
pub struct HttpJournalService {
    client: reqwest::Client,
    routes: Routes,
}

impl HttpJournalService {
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ClientError::Transport(format!("build http client: {err}")))?;
        Ok(Self {
            client,
            routes: Routes::new(config),
        })
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// POST a multipart form and return status and body text.
    async fn post(&self, url: &str, form: Form) -> Result<(u16, String), ClientError> {
        tracing::debug!(url, "journal request");
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(url, error = %err, "journal request failed");
                ClientError::Transport(err.to_string())
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ClientError::Transport(format!("read response body: {err}")))?;
        tracing::debug!(url, status, "journal response");
        Ok((status, body))
    }
}

#[async_trait]
impl JournalService for HttpJournalService {
    async fn run_task(&self, params: RunTaskParams) -> Result<TaskOutcome, ClientError> {
        let url = self.routes.run_task(&params.task_id)?;
        let mut form = Form::new();
        if let Some(param) = params.param {
            form = form.text("param", param);
        }
        let (status, body) = self.post(&url, form).await?;
        parse_task_response(status, body)
    }

    async fn remove_tag(&self, params: RemoveTagParams) -> Result<(), ClientError> {
        if params.entry_id.trim().is_empty() {
            return Err(ClientError::InvalidArgument("entry id is required".into()));
        }
        let mut form = Form::new();
        if let Some(rel_path) = params.rel_path {
            form = form.text("rel_path", rel_path);
        }
        form = form
            .text("entryId", params.entry_id)
            .text("remove_tag", params.tag);
        let (status, body) = self.post(&self.routes.remove_tag(), form).await?;
        expect_success(status, body).map(|_| ())
    }

    async fn open_in_editor(&self, params: OpenInEditorParams) -> Result<(), ClientError> {
        if params.rel_path.trim().is_empty() {
            return Err(ClientError::InvalidArgument("rel_path is required".into()));
        }
        let mut form = Form::new().text("rel_path", params.rel_path);
        if let Some(line_no) = params.line_no {
            form = form.text("line_no", line_no);
        }
        let (status, body) = self.post(&self.routes.edit(), form).await?;
        expect_success(status, body).map(|_| ())
    }

    async fn upload_media(&self, upload: MediaUpload) -> Result<Vec<UploadedFile>, ClientError> {
        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = upload.mime_type {
            part = part
                .mime_str(&mime)
                .map_err(|err| ClientError::InvalidArgument(format!("mime type {mime:?}: {err}")))?;
        }
        let form = Form::new().part("file", part);
        let (status, body) = self.post(&self.routes.upload_media(), form).await?;
        parse_upload_response(status, &body)
    }

    async fn delete_media(&self, params: DeleteMediaParams) -> Result<(), ClientError> {
        let form = Form::new().text(self.routes.delete_field().to_string(), params.url);
        let (status, body) = self.post(&self.routes.delete_media(), form).await?;
        expect_success(status, body).map(|_| ())
    }
}
