//! journal edit command.

use journal_ui::{open_file_in_editor, EntrySpec, JournalPage};

use crate::host::CliHost;
use crate::{block_on, exit_code, finish, take_value, CommandOutput, JournalBackend};

/// Run the edit command from test arguments.
pub fn run_edit_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_edit(&owned, backend))
}

#[derive(Debug)]
struct EditArgs {
    rel_path: String,
    line: Option<u32>,
}

fn parse_line(value: &str) -> Result<u32, (i32, String)> {
    match value.parse::<u32>() {
        Ok(line) if line > 0 => Ok(line),
        _ => Err((2, format!("invalid --line value: {value}"))),
    }
}

fn parse_edit_args(args: &[String]) -> Result<EditArgs, (i32, String)> {
    let mut rel_path = None;
    let mut line = None;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                let help = concat!(
                    "Usage: journal edit <rel-path> [flags]\n",
                    "\n",
                    "Open a file in the server's editor\n",
                    "\n",
                    "Flags:\n",
                    "  --line int   line to open the file at\n",
                );
                return Err((0, help.to_string()));
            }
            "--line" => line = Some(parse_line(&take_value(args, &mut i, "--line")?)?),
            v if v.starts_with("--line=") => {
                line = Some(parse_line(v.strip_prefix("--line=").unwrap_or(""))?);
            }
            v if v.starts_with('-') => return Err((2, format!("unknown flag: {v}"))),
            v => {
                if rel_path.is_some() {
                    return Err((2, "expected exactly 1 argument".to_string()));
                }
                rel_path = Some(v.to_string());
            }
        }
        i += 1;
    }

    let rel_path = rel_path.ok_or_else(|| (2, "rel-path is required".to_string()))?;
    Ok(EditArgs { rel_path, line })
}

fn execute_edit(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = parse_edit_args(args)?;
    let host = CliHost::new(backend, true);
    let ctx = host.context();

    let result = match parsed.line {
        Some(line) => {
            let mut page = JournalPage::new(backend.config());
            let line = line.to_string();
            page.add_entry(
                &EntrySpec::new("cli").with_source(parsed.rel_path.as_str(), Some(line.as_str())),
            );
            block_on(page.open_entry_in_editor(&ctx, "cli"))?
        }
        None => block_on(open_file_in_editor(&ctx, &parsed.rel_path))?,
    };
    Ok(host.into_output(exit_code(&result)))
}
