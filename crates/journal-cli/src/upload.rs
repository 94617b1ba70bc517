//! journal upload command.

use std::path::Path;

use journal_client::types::MediaUpload;
use journal_ui::MediaPage;

use crate::host::CliHost;
use crate::{block_on, finish, CommandOutput, JournalBackend};

/// Run the upload command from test arguments.
pub fn run_upload_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_upload(&owned, backend))
}

fn parse_upload_args(args: &[String]) -> Result<Vec<String>, (i32, String)> {
    let mut files = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => {
                let help = concat!(
                    "Usage: journal upload <file>...\n",
                    "\n",
                    "Upload media files. Markdown image links for every stored\n",
                    "file are printed to stdout.\n",
                );
                return Err((0, help.to_string()));
            }
            v if v.starts_with('-') && v != "-" => {
                return Err((2, format!("unknown flag: {v}")));
            }
            v => files.push(v.to_string()),
        }
    }
    if files.is_empty() {
        return Err((2, "at least one file is required".to_string()));
    }
    Ok(files)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

fn execute_upload(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let files = parse_upload_args(args)?;
    let mut page = MediaPage::new(backend.config());
    let host = CliHost::new(backend, true);
    let ctx = host.context();

    let mut failed = false;
    for path in &files {
        let bytes = match backend.read_file(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                host.eprint(&format!("Error: {err}"));
                failed = true;
                continue;
            }
        };
        let upload = MediaUpload::new(file_name(path), bytes);
        if block_on(page.upload(&ctx, upload))?.is_err() {
            failed = true;
        }
    }
    Ok(host.into_output(i32::from(failed)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tests_common::MockBackend;
    use journal_client::mock::{server_error, MockCall, MockJournalService};

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(file_name("/tmp/shots/a.png"), "a.png");
        assert_eq!(file_name("b.pdf"), "b.pdf");
    }

    #[test]
    fn parse_requires_files() {
        assert_eq!(parse_upload_args(&[]).unwrap_err().0, 2);
        assert_eq!(
            parse_upload_args(&["--force".to_string()]).unwrap_err().0,
            2
        );
    }

    #[test]
    fn uploads_each_file_and_prints_links() {
        let backend = MockBackend::new()
            .with_file("shots/a.png", b"aaaa")
            .with_file("b.pdf", b"bb");
        let out = run_upload_for_test(&["shots/a.png", "b.pdf"], &backend);
        assert_eq!(out.exit_code, 0, "{out:?}");
        assert_eq!(out.stdout, "![](/media/a.png)\n![](/media/b.pdf)\n");
        assert_eq!(
            out.stderr,
            "Uploading...\nUploaded: a.png\nUploading...\nUploaded: b.pdf\n"
        );
        assert_eq!(
            backend.service.calls(),
            vec![
                MockCall::UploadMedia {
                    file_name: "a.png".into(),
                    size: 4
                },
                MockCall::UploadMedia {
                    file_name: "b.pdf".into(),
                    size: 2
                },
            ]
        );
    }

    #[test]
    fn unreadable_file_fails_but_others_continue() {
        let backend = MockBackend::new().with_file("b.pdf", b"bb");
        let out = run_upload_for_test(&["missing.png", "b.pdf"], &backend);
        assert_eq!(out.exit_code, 1);
        assert!(out.stderr.starts_with("Error: read file missing.png: not found\n"));
        assert_eq!(out.stdout, "![](/media/b.pdf)\n");
    }

    #[test]
    fn rejected_upload_exits_1() {
        let backend = MockBackend::new()
            .with_file("x.exe", b"x")
            .with_service(MockJournalService::new().with_upload(Err(server_error(415, ""))));
        let out = run_upload_for_test(&["x.exe"], &backend);
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.stderr, "Uploading...\nUpload failed: 415\n");
    }
}
