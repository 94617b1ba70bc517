//! journal remove-tag command.

use journal_ui::{EntrySpec, JournalPage, TagRemovalOutcome};

use crate::host::CliHost;
use crate::{block_on, exit_code, finish, take_value, CommandOutput, JournalBackend};

/// Run the remove-tag command from test arguments.
pub fn run_remove_tag_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_remove_tag(&owned, backend))
}

#[derive(Debug)]
struct RemoveTagArgs {
    entry_id: String,
    tag: String,
    rel_path: Option<String>,
    yes: bool,
}

fn parse_remove_tag_args(args: &[String]) -> Result<RemoveTagArgs, (i32, String)> {
    let mut positional = Vec::new();
    let mut rel_path = None;
    let mut yes = false;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                let help = concat!(
                    "Usage: journal remove-tag <entry-id> <tag> [flags]\n",
                    "\n",
                    "Remove a tag from a journal entry\n",
                    "\n",
                    "Flags:\n",
                    "  --rel-path string   file that holds the entry\n",
                    "  -y, --yes           do not ask for confirmation\n",
                );
                return Err((0, help.to_string()));
            }
            "--rel-path" => rel_path = Some(take_value(args, &mut i, "--rel-path")?),
            v if v.starts_with("--rel-path=") => {
                rel_path = Some(v.strip_prefix("--rel-path=").unwrap_or("").to_string());
            }
            "--yes" | "-y" => yes = true,
            v if v.starts_with('-') => return Err((2, format!("unknown flag: {v}"))),
            v => positional.push(v.to_string()),
        }
        i += 1;
    }

    let [entry_id, tag]: [String; 2] = positional
        .try_into()
        .map_err(|_| (2, "expected 2 arguments: <entry-id> <tag>".to_string()))?;
    Ok(RemoveTagArgs {
        entry_id,
        tag,
        rel_path,
        yes,
    })
}

fn execute_remove_tag(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = parse_remove_tag_args(args)?;
    let mut page = JournalPage::new(backend.config());
    let mut entry = EntrySpec::new(parsed.entry_id.as_str()).with_tags([parsed.tag.as_str()]);
    entry.rel_path = parsed.rel_path.clone();
    page.add_entry(&entry);

    let host = CliHost::new(backend, parsed.yes);
    let ctx = host.context();
    let result = block_on(page.remove_tag(&ctx, &parsed.entry_id, &parsed.tag))?;
    if let Ok(TagRemovalOutcome::Removed { .. }) = result {
        host.print(&format!(
            "removed tag \"{}\" from {}",
            parsed.tag, parsed.entry_id
        ));
    }
    Ok(host.into_output(exit_code(&result)))
}
