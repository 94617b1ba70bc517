//! journal delete command.

use journal_ui::MediaPage;

use crate::host::CliHost;
use crate::{block_on, exit_code, finish, CommandOutput, JournalBackend};

/// Run the delete command from test arguments.
pub fn run_delete_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_delete(&owned, backend))
}

#[derive(Debug)]
struct DeleteArgs {
    url: String,
    yes: bool,
}

fn parse_delete_args(args: &[String]) -> Result<DeleteArgs, (i32, String)> {
    let mut url = None;
    let mut yes = false;
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => {
                let help = concat!(
                    "Usage: journal delete <url> [flags]\n",
                    "\n",
                    "Delete a stored media file\n",
                    "\n",
                    "Flags:\n",
                    "  -y, --yes   do not ask for confirmation\n",
                );
                return Err((0, help.to_string()));
            }
            "--yes" | "-y" => yes = true,
            v if v.starts_with('-') => return Err((2, format!("unknown flag: {v}"))),
            v => {
                if url.is_some() {
                    return Err((2, "expected exactly 1 argument".to_string()));
                }
                url = Some(v.to_string());
            }
        }
    }
    let url = url.ok_or_else(|| (2, "url is required".to_string()))?;
    Ok(DeleteArgs { url, yes })
}

fn execute_delete(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = parse_delete_args(args)?;
    let page = MediaPage::new(backend.config());
    let host = CliHost::new(backend, parsed.yes);
    let ctx = host.context();
    let result = block_on(page.delete(&ctx, &parsed.url))?;
    if result.is_ok() {
        host.print(&format!("deleted {}", parsed.url));
    }
    Ok(host.into_output(exit_code(&result)))
}
