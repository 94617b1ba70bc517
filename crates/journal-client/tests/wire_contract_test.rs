#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Request shapes and status mapping of `HttpJournalService`, checked
//! against a one-shot loopback server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use journal_client::http::HttpJournalService;
use journal_client::types::{
    DeleteMediaParams, MediaUpload, OpenInEditorParams, RemoveTagParams, RunTaskParams,
};
use journal_client::{ClientError, JournalService};
use journal_core::config::ServerConfig;
use journal_core::types::UploadedFile;

/// What the server saw.
struct Captured {
    request_line: String,
    body: String,
}

impl Captured {
    /// Value of a multipart form field, if it was sent.
    fn field(&self, name: &str) -> Option<String> {
        let marker = format!("name=\"{name}\"");
        let start = self.body.find(&marker)?;
        let rest = &self.body[start..];
        let value = &rest[rest.find("\r\n\r\n")? + 4..];
        let end = value.find("\r\n--")?;
        Some(value[..end].to_string())
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

async fn read_request(stream: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length: usize = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .map(|(_, value)| value.trim().parse().unwrap())
        .unwrap_or(0);
    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }
    Captured {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[body_start..body_start + content_length]).to_string(),
    }
}

/// Accept one request, answer it with `status` and `body`, and hand back
/// what was received.
async fn serve_once(status: u16, body: &'static str) -> (ServerConfig, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let captured = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status} Status\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        captured
    });
    let config = ServerConfig {
        base_url: format!("http://{addr}"),
        ..ServerConfig::default()
    };
    (config, handle)
}

#[tokio::test]
async fn remove_tag_posts_entry_tag_and_path() {
    let (config, server) = serve_once(200, "").await;
    let svc = HttpJournalService::new(&config).unwrap();

    svc.remove_tag(RemoveTagParams {
        entry_id: "20240301-1".into(),
        tag: "work".into(),
        rel_path: Some("2024/03.md".into()),
    })
    .await
    .unwrap();

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /_remove_tag HTTP/1.1");
    assert_eq!(seen.field("entryId").as_deref(), Some("20240301-1"));
    assert_eq!(seen.field("remove_tag").as_deref(), Some("work"));
    assert_eq!(seen.field("rel_path").as_deref(), Some("2024/03.md"));
}

#[tokio::test]
async fn remove_tag_failure_keeps_status_and_plain_body() {
    let (config, server) = serve_once(500, "entry is locked").await;
    let svc = HttpJournalService::new(&config).unwrap();

    let err = svc
        .remove_tag(RemoveTagParams {
            entry_id: "e1".into(),
            tag: "work".into(),
            rel_path: None,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Server {
            status: 500,
            body: "entry is locked".into()
        }
    );
    assert_eq!(server.await.unwrap().field("rel_path"), None);
}

#[tokio::test]
async fn run_task_posts_param_to_task_path() {
    let (config, server) = serve_once(200, r#"{"detail":"pulled 3 commits"}"#).await;
    let svc = HttpJournalService::new(&config).unwrap();

    let outcome = svc
        .run_task(RunTaskParams {
            task_id: "git_pull".into(),
            param: Some("main".into()),
        })
        .await
        .unwrap();

    assert_eq!(outcome.detail.as_deref(), Some("pulled 3 commits"));
    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /_run_task/git_pull HTTP/1.1");
    assert_eq!(seen.field("param").as_deref(), Some("main"));
}

#[tokio::test]
async fn edit_posts_path_and_line() {
    let (config, server) = serve_once(204, "").await;
    let svc = HttpJournalService::new(&config).unwrap();

    svc.open_in_editor(OpenInEditorParams {
        rel_path: "2024/03.md".into(),
        line_no: Some("17".into()),
    })
    .await
    .unwrap();

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /_edit HTTP/1.1");
    assert_eq!(seen.field("rel_path").as_deref(), Some("2024/03.md"));
    assert_eq!(seen.field("line_no").as_deref(), Some("17"));
}

#[tokio::test]
async fn upload_sends_file_part_and_reads_batch() {
    let (config, server) = serve_once(
        200,
        r#"{"uploads":[{"url":"/media/a.png","name":"a.png"},{"url":"/media/b.png","name":"b.png"}]}"#,
    )
    .await;
    let svc = HttpJournalService::new(&config).unwrap();

    let files = svc
        .upload_media(MediaUpload::new("a.png", b"PNGDATA".to_vec()).with_mime_type("image/png"))
        .await
        .unwrap();

    assert_eq!(
        files,
        vec![
            UploadedFile::new("/media/a.png", "a.png"),
            UploadedFile::new("/media/b.png", "b.png"),
        ]
    );
    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /_upload_media HTTP/1.1");
    assert!(seen.body.contains("filename=\"a.png\""), "{}", seen.body);
    assert_eq!(seen.field("file").as_deref(), Some("PNGDATA"));
}

#[tokio::test]
async fn upload_rejection_reports_error_field() {
    let (config, server) = serve_once(400, r#"{"error":"not an image"}"#).await;
    let svc = HttpJournalService::new(&config).unwrap();

    let err = svc
        .upload_media(MediaUpload::new("x.exe", vec![1]))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Server {
            status: 400,
            body: "not an image".into()
        }
    );
    server.await.unwrap();
}

#[tokio::test]
async fn delete_posts_configured_field_to_delete_route() {
    let (mut config, server) = serve_once(200, "").await;
    config.route_prefix = "/".into();
    let svc = HttpJournalService::new(&config).unwrap();

    svc.delete_media(DeleteMediaParams {
        url: "/media/a.png".into(),
    })
    .await
    .unwrap();

    let seen = server.await.unwrap();
    assert_eq!(seen.request_line, "POST /delete_media HTTP/1.1");
    assert_eq!(seen.field("thepath").as_deref(), Some("/media/a.png"));
}
