//! Parsing of journal server responses.
//!
//! Every parser returns an explicit `Result`: a 2xx body that cannot be
//! understood is a `ClientError::Parse`, never a panic.

use serde::Deserialize;

use journal_core::types::UploadedFile;

use crate::error::ClientError;
use crate::types::TaskOutcome;

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Map a non-2xx plain-text response to `ClientError::Server`.
pub fn expect_success(status: u16, body: String) -> Result<String, ClientError> {
    if is_success(status) {
        Ok(body)
    } else {
        Err(ClientError::Server { status, body })
    }
}

#[derive(Debug, Default, Deserialize)]
struct TaskBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Parse the response of a task run: empty body or JSON `{detail}`.
pub fn parse_task_response(status: u16, body: String) -> Result<TaskOutcome, ClientError> {
    let body = expect_success(status, body)?;
    if body.trim().is_empty() {
        return Ok(TaskOutcome::default());
    }
    let parsed: TaskBody = serde_json::from_str(&body)
        .map_err(|err| ClientError::Parse(format!("task response: {err}")))?;
    Ok(TaskOutcome {
        detail: parsed.detail,
    })
}

#[derive(Debug, Default, Deserialize)]
struct UploadBody {
    #[serde(default)]
    uploads: Option<Vec<UploadedFile>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse the response of a media upload.
///
/// Success bodies are either `{uploads: [{url, name}, ...]}` or a single
/// `{url, name}`; the returned files keep server order. Failure bodies carry
/// `{error}`; when it is absent the raw body is reported instead.
pub fn parse_upload_response(status: u16, body: &str) -> Result<Vec<UploadedFile>, ClientError> {
    if !is_success(status) {
        let message = serde_json::from_str::<UploadBody>(body)
            .ok()
            .and_then(|parsed| parsed.error)
            .unwrap_or_else(|| body.to_string());
        return Err(ClientError::Server {
            status,
            body: message,
        });
    }

    let parsed: UploadBody = serde_json::from_str(body)
        .map_err(|err| ClientError::Parse(format!("upload response: {err}")))?;

    if let Some(uploads) = parsed.uploads {
        return Ok(uploads);
    }
    match (parsed.url, parsed.name) {
        (Some(url), Some(name)) if !url.is_empty() && !name.is_empty() => {
            Ok(vec![UploadedFile { url, name }])
        }
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn task_response_empty_body() {
        assert_eq!(
            parse_task_response(200, String::new()).unwrap(),
            TaskOutcome::default()
        );
    }

    #[test]
    fn task_response_with_detail() {
        let out = parse_task_response(200, r#"{"detail":"synced 4 files"}"#.into()).unwrap();
        assert_eq!(out.detail.as_deref(), Some("synced 4 files"));
    }

    #[test]
    fn task_response_json_without_detail() {
        let out = parse_task_response(204, "{}".into()).unwrap();
        assert_eq!(out.detail, None);
    }

    #[test]
    fn task_response_failure_keeps_plain_text() {
        let err = parse_task_response(500, "git pull failed".into()).unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 500,
                body: "git pull failed".into()
            }
        );
    }

    #[test]
    fn task_response_garbage_is_parse_error() {
        let err = parse_task_response(200, "<html>".into()).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)), "{err:?}");
    }

    #[test]
    fn upload_response_batch_keeps_order() {
        let files = parse_upload_response(
            200,
            r#"{"uploads":[{"url":"a.png","name":"a"},{"url":"b.png","name":"b"}]}"#,
        )
        .unwrap();
        assert_eq!(
            files,
            vec![
                UploadedFile::new("a.png", "a"),
                UploadedFile::new("b.png", "b")
            ]
        );
    }

    #[test]
    fn upload_response_single_file() {
        let files =
            parse_upload_response(200, r#"{"url":"/media/x.pdf","name":"x.pdf"}"#).unwrap();
        assert_eq!(files, vec![UploadedFile::new("/media/x.pdf", "x.pdf")]);
    }

    #[test]
    fn upload_response_without_files_is_empty_batch() {
        assert!(parse_upload_response(200, r#"{"ok":true}"#).unwrap().is_empty());
        assert!(parse_upload_response(200, r#"{"url":"/media/x"}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn upload_failure_prefers_error_field() {
        let err = parse_upload_response(400, r#"{"error":"not an image"}"#).unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 400,
                body: "not an image".into()
            }
        );
    }

    #[test]
    fn upload_failure_without_json_reports_body() {
        let err = parse_upload_response(502, "Bad Gateway").unwrap_err();
        assert_eq!(
            err,
            ClientError::Server {
                status: 502,
                body: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn upload_success_with_malformed_json_is_parse_error() {
        let err = parse_upload_response(200, r#"{"uploads":[{"url":"a.png"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)), "{err:?}");
    }

    #[test]
    fn upload_entries_missing_fields_are_parse_errors() {
        let err = parse_upload_response(200, r#"{"uploads":[{"url":"a.png"}]}"#).unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)), "{err:?}");
    }
}
