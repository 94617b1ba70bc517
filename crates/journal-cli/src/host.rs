//! Terminal page host: clipboard text goes to stdout, alerts and status
//! lines to stderr.

use std::cell::RefCell;
use std::time::Duration;

use journal_ui::flow::FlowContext;
use journal_ui::PageHost;

use crate::{CommandOutput, JournalBackend};

pub struct CliHost<'a> {
    backend: &'a dyn JournalBackend,
    assume_yes: bool,
    stdout: RefCell<String>,
    stderr: RefCell<String>,
}

impl<'a> CliHost<'a> {
    pub fn new(backend: &'a dyn JournalBackend, assume_yes: bool) -> Self {
        Self {
            backend,
            assume_yes,
            stdout: RefCell::new(String::new()),
            stderr: RefCell::new(String::new()),
        }
    }

    pub fn context(&self) -> FlowContext<'_> {
        FlowContext::new(self.backend.service(), self, self.backend.events())
    }

    pub fn print(&self, line: &str) {
        let mut stdout = self.stdout.borrow_mut();
        stdout.push_str(line);
        stdout.push('\n');
    }

    pub fn eprint(&self, line: &str) {
        let mut stderr = self.stderr.borrow_mut();
        stderr.push_str(line);
        stderr.push('\n');
    }

    pub fn into_output(self, exit_code: i32) -> CommandOutput {
        CommandOutput {
            stdout: self.stdout.into_inner(),
            stderr: self.stderr.into_inner(),
            exit_code,
        }
    }
}

impl PageHost for CliHost<'_> {
    fn confirm(&self, message: &str) -> bool {
        self.assume_yes || self.backend.prompt(message)
    }

    fn alert(&self, message: &str) {
        self.eprint(message);
    }

    fn write_clipboard(&self, text: &str) {
        self.print(text);
    }

    fn set_status(&self, text: &str) {
        self.eprint(text);
    }

    fn clear_status_after(&self, delay: Duration) {
        tracing::trace!(?delay, "status clear requested");
    }
}
