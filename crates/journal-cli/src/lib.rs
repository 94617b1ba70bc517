//! journal-cli: command-line surface for the journal server actions.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::OnceLock;

use journal_client::http::HttpJournalService;
use journal_client::JournalService;
use journal_core::config::{ClientConfig, LoadedConfig};
use journal_core::error::ActionError;
use journal_core::event::{ActionEventSink, TracingEventSink};

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "journal-cli"
}

static VERSION: OnceLock<String> = OnceLock::new();

/// Set the version string for `--version` output.
pub fn set_version(version: &str) {
    let _ = VERSION.set(version.to_string());
}

fn get_version() -> &'static str {
    VERSION.get().map(|s| s.as_str()).unwrap_or("dev")
}

fn help_text() -> String {
    "\
journal talks to a running journal server.

Usage:
  journal [--config PATH] [command]

Available Commands:
  config      Show the effective configuration or its file
  delete      Delete a stored media file
  edit        Open a file in the server's editor
  help        Help about any command
  remove-tag  Remove a tag from a journal entry
  run-task    Run a maintenance task on the server
  upload      Upload media files

Flags:
      --config PATH  config file (default: first of $XDG_CONFIG_HOME/journal, ~/.config/journal, .)
  -h, --help         help for journal
  -v, --version      version for journal

Use \"journal [command] --help\" for more information about a command.\n"
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Everything a command needs from the outside world.
pub trait JournalBackend {
    fn config(&self) -> &ClientConfig;
    /// The file the config was read from, if any.
    fn config_path(&self) -> Option<&Path>;
    fn service(&self) -> &dyn JournalService;
    fn events(&self) -> &dyn ActionEventSink;
    /// Ask the user a yes/no question on the terminal.
    fn prompt(&self, question: &str) -> bool;
    fn read_file(&self, path: &str) -> Result<Vec<u8>, String>;
}

/// Backend for a real terminal and a real server.
pub struct HttpJournalBackend {
    loaded: LoadedConfig,
    service: HttpJournalService,
    events: TracingEventSink,
}

impl HttpJournalBackend {
    pub fn new(loaded: LoadedConfig) -> Result<Self, String> {
        let service = HttpJournalService::new(&loaded.config.server).map_err(|e| e.to_string())?;
        Ok(Self {
            loaded,
            service,
            events: TracingEventSink,
        })
    }
}

impl JournalBackend for HttpJournalBackend {
    fn config(&self) -> &ClientConfig {
        &self.loaded.config
    }

    fn config_path(&self) -> Option<&Path> {
        self.loaded.path.as_deref()
    }

    fn service(&self) -> &dyn JournalService {
        &self.service
    }

    fn events(&self) -> &dyn ActionEventSink {
        &self.events
    }

    fn prompt(&self, question: &str) -> bool {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{question} [y/N] ");
        let _ = stderr.flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, String> {
        std::fs::read(path).map_err(|e| format!("read file {path}: {e}"))
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub mod config;
pub mod delete;
pub mod edit;
pub mod host;
pub mod logging;
pub mod remove_tag;
pub mod run_task;
pub mod upload;

#[cfg(test)]
pub(crate) mod tests_common;

/// Pull a global `--config PATH` (or `--config=PATH`) out of the arguments.
pub fn split_config_flag(args: &[String]) -> Result<(Option<String>, Vec<String>), String> {
    let mut config = None;
    let mut rest = Vec::with_capacity(args.len());
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if arg == "--config" {
            i += 1;
            let value = args
                .get(i)
                .ok_or_else(|| "flag --config requires a value".to_string())?;
            config = Some(value.clone());
        } else if let Some(value) = arg.strip_prefix("--config=") {
            config = Some(value.to_string());
        } else {
            rest.push(arg.clone());
        }
        i += 1;
    }
    Ok((config, rest))
}

/// Value following a flag at `args[*i]`; advances `i` past it.
pub(crate) fn take_value(
    args: &[String],
    i: &mut usize,
    flag: &str,
) -> Result<String, (i32, String)> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| (2, format!("flag {flag} requires a value")))
}

/// Drive one page flow to completion on a single-threaded runtime.
pub(crate) fn block_on<F: std::future::Future>(future: F) -> Result<F::Output, (i32, String)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| (1, format!("start runtime: {e}")))?;
    Ok(runtime.block_on(future))
}

pub(crate) fn exit_code<T>(result: &Result<T, ActionError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Turn a parse result into output: `Err((0, help))` is printed as help.
pub(crate) fn finish(result: Result<CommandOutput, (i32, String)>) -> CommandOutput {
    match result {
        Ok(output) => output,
        Err((0, help)) => CommandOutput {
            stdout: help,
            stderr: String::new(),
            exit_code: 0,
        },
        Err((exit_code, message)) => CommandOutput {
            stdout: String::new(),
            stderr: format!("{message}\n"),
            exit_code,
        },
    }
}

pub fn run_cli_for_test(args: &[&str], backend: &dyn JournalBackend) -> CommandOutput {
    let mut out = CommandOutput {
        stdout: String::new(),
        stderr: String::new(),
        exit_code: 0,
    };

    let Some((cmd, rest)) = args.split_first() else {
        out.stdout = help_text();
        return out;
    };

    match *cmd {
        "--help" | "-h" | "help" => {
            out.stdout = help_text();
            out
        }
        "--version" | "-v" => {
            out.stdout = format!("journal version {}\n", get_version());
            out
        }
        "config" => config::run_config_for_test(rest, backend),
        "delete" => delete::run_delete_for_test(rest, backend),
        "edit" => edit::run_edit_for_test(rest, backend),
        "remove-tag" => remove_tag::run_remove_tag_for_test(rest, backend),
        "run-task" => run_task::run_run_task_for_test(rest, backend),
        "upload" => upload::run_upload_for_test(rest, backend),
        _ => {
            out.stderr = format!("Error: unknown command \"{cmd}\" for \"journal\"\n");
            out.exit_code = 1;
            out
        }
    }
}

pub fn run_cli(args: &[String], backend: &dyn JournalBackend) -> CommandOutput {
    let refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    run_cli_for_test(&refs, backend)
}
