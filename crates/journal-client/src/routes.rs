//! Endpoint layout of the journal server.

use journal_core::config::ServerConfig;

use crate::error::ClientError;

pub const RUN_TASK: &str = "run_task";
pub const REMOVE_TAG: &str = "remove_tag";
pub const EDIT: &str = "edit";
pub const UPLOAD_MEDIA: &str = "upload_media";

/// Absolute endpoint URLs derived from the server config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    base_url: String,
    prefix: String,
    delete_route: String,
    delete_field: String,
}

impl Routes {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            prefix: config.route_prefix.clone(),
            delete_route: config.delete_route.trim_start_matches('/').to_string(),
            delete_field: config.delete_field.clone(),
        }
    }

    /// URL of the named route, e.g. `edit` -> `http://host/_edit`.
    pub fn url(&self, name: &str) -> String {
        format!("{}{}{}", self.base_url, self.prefix, name)
    }

    pub fn run_task(&self, task_id: &str) -> Result<String, ClientError> {
        let task_id = task_id.trim();
        if task_id.is_empty() {
            return Err(ClientError::InvalidArgument("task id is required".into()));
        }
        if task_id.contains(['/', '?', '#']) {
            return Err(ClientError::InvalidArgument(format!(
                "task id {task_id:?} must not contain '/', '?' or '#'"
            )));
        }
        Ok(format!("{}/{task_id}", self.url(RUN_TASK)))
    }

    pub fn remove_tag(&self) -> String {
        self.url(REMOVE_TAG)
    }

    pub fn edit(&self) -> String {
        self.url(EDIT)
    }

    pub fn upload_media(&self) -> String {
        self.url(UPLOAD_MEDIA)
    }

    pub fn delete_media(&self) -> String {
        self.url(&self.delete_route)
    }

    /// Form field the delete route reads the file URL from.
    pub fn delete_field(&self) -> &str {
        &self.delete_field
    }
}
