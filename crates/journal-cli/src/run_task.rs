//! journal run-task command.

use journal_ui::run_task;

use crate::host::CliHost;
use crate::{block_on, exit_code, finish, take_value, CommandOutput, JournalBackend};

/// Run the run-task command from test arguments.
pub fn run_run_task_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let owned: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
    finish(execute_run_task(&owned, backend))
}

#[derive(Debug)]
struct RunTaskArgs {
    task_id: String,
    param: Option<String>,
    yes: bool,
}

fn parse_run_task_args(args: &[String]) -> Result<RunTaskArgs, (i32, String)> {
    let mut task_id = None;
    let mut param = None;
    let mut yes = false;
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                let help = concat!(
                    "Usage: journal run-task <task-id> [flags]\n",
                    "\n",
                    "Run a maintenance task on the server\n",
                    "\n",
                    "Flags:\n",
                    "  --param string   value passed to the task\n",
                    "  -y, --yes        do not ask for confirmation\n",
                );
                return Err((0, help.to_string()));
            }
            "--param" => param = Some(take_value(args, &mut i, "--param")?),
            v if v.starts_with("--param=") => {
                param = Some(v.strip_prefix("--param=").unwrap_or("").to_string());
            }
            "--yes" | "-y" => yes = true,
            v if v.starts_with('-') => return Err((2, format!("unknown flag: {v}"))),
            v => {
                if task_id.is_some() {
                    return Err((2, "expected exactly 1 argument".to_string()));
                }
                task_id = Some(v.to_string());
            }
        }
        i += 1;
    }

    let task_id = task_id.ok_or_else(|| (2, "task id is required".to_string()))?;
    Ok(RunTaskArgs {
        task_id,
        param,
        yes,
    })
}

fn execute_run_task(
    args: &[String],
    backend: &dyn JournalBackend,
) -> Result<CommandOutput, (i32, String)> {
    let parsed = parse_run_task_args(args)?;
    let host = CliHost::new(backend, parsed.yes);
    let ctx = host.context();
    let result = block_on(run_task(&ctx, &parsed.task_id, parsed.param))?;
    Ok(host.into_output(exit_code(&result)))
}
