#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Contract tests for the `JournalService` mock.

use journal_client::mock::{server_error, MockCall, MockJournalService};
use journal_client::types::{
    DeleteMediaParams, MediaUpload, OpenInEditorParams, RemoveTagParams, RunTaskParams,
    TaskOutcome,
};
use journal_client::{ClientError, JournalService};
use journal_core::types::UploadedFile;

fn remove_params(tag: &str) -> RemoveTagParams {
    RemoveTagParams {
        entry_id: "e-20240301".into(),
        tag: tag.into(),
        rel_path: Some("journal/2024.md".into()),
    }
}

#[tokio::test]
async fn defaults_succeed_and_record_calls() {
    let svc = MockJournalService::new();
    svc.remove_tag(remove_params("work")).await.unwrap();
    svc.open_in_editor(OpenInEditorParams {
        rel_path: "journal/2024.md".into(),
        line_no: Some("42".into()),
    })
    .await
    .unwrap();
    let outcome = svc
        .run_task(RunTaskParams {
            task_id: "sync".into(),
            param: None,
        })
        .await
        .unwrap();
    assert_eq!(outcome, TaskOutcome::default());

    assert_eq!(svc.call_count(), 3);
    assert_eq!(svc.calls()[0], MockCall::RemoveTag(remove_params("work")));
}

#[tokio::test]
async fn queued_responses_are_consumed_in_order() {
    let svc = MockJournalService::new()
        .with_remove_tag(Err(server_error(500, "boom")))
        .with_remove_tag(Ok(()));

    let first = svc.remove_tag(remove_params("a")).await.unwrap_err();
    assert_eq!(
        first,
        ClientError::Server {
            status: 500,
            body: "boom".into()
        }
    );
    svc.remove_tag(remove_params("a")).await.unwrap();
    svc.remove_tag(remove_params("a")).await.unwrap();
}

#[tokio::test]
async fn upload_default_echoes_file() {
    let svc = MockJournalService::new();
    let files = svc
        .upload_media(MediaUpload::new("cat.png", vec![1, 2, 3]).with_mime_type("image/png"))
        .await
        .unwrap();
    assert_eq!(files, vec![UploadedFile::new("/media/cat.png", "cat.png")]);
    assert_eq!(
        svc.calls(),
        vec![MockCall::UploadMedia {
            file_name: "cat.png".into(),
            size: 3
        }]
    );
}

#[tokio::test]
async fn upload_queue_overrides_echo() {
    let batch = vec![
        UploadedFile::new("a.png", "a"),
        UploadedFile::new("b.png", "b"),
    ];
    let svc = MockJournalService::new().with_upload(Ok(batch.clone()));
    let files = svc
        .upload_media(MediaUpload::new("both.zip", Vec::new()))
        .await
        .unwrap();
    assert_eq!(files, batch);
}

#[tokio::test]
async fn delete_records_url() {
    let svc = MockJournalService::new().with_delete(Err(ClientError::Transport("refused".into())));
    let err = svc
        .delete_media(DeleteMediaParams {
            url: "/media/cat.png".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::Transport("refused".into()));
    assert_eq!(
        svc.calls(),
        vec![MockCall::DeleteMedia(DeleteMediaParams {
            url: "/media/cat.png".into()
        })]
    );
}
