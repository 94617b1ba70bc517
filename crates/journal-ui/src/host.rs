//! The page host: everything a flow needs from its surroundings besides the
//! element tree and the server.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

/// User-facing surface of the page.
///
/// Implementations decide how prompts, alerts, and the clipboard look:
/// a browser bridge, a terminal, or the recording host used in tests.
pub trait PageHost {
    /// Ask the user a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Show a message the user must acknowledge.
    fn alert(&self, message: &str);

    /// Replace the clipboard with plain text. One call per user action.
    fn write_clipboard(&self, text: &str);

    /// Replace the shared status line.
    fn set_status(&self, text: &str);

    /// Clear the status line once `delay` has passed.
    fn clear_status_after(&self, delay: Duration);
}

/// Host that records every interaction; confirmations are answered from a
/// queue and fall back to `default_answer`.
pub struct RecordingHost {
    default_answer: bool,
    answers: RefCell<VecDeque<bool>>,
    prompts: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
    clipboard: RefCell<Vec<String>>,
    statuses: RefCell<Vec<String>>,
    clear_requests: RefCell<Vec<Duration>>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    /// A host whose user accepts every confirmation.
    pub fn new() -> Self {
        Self {
            default_answer: true,
            answers: RefCell::new(VecDeque::new()),
            prompts: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            clipboard: RefCell::new(Vec::new()),
            statuses: RefCell::new(Vec::new()),
            clear_requests: RefCell::new(Vec::new()),
        }
    }

    /// A host whose user declines every confirmation.
    pub fn declining() -> Self {
        Self {
            default_answer: false,
            ..Self::new()
        }
    }

    /// Queue the answer to the next confirmation.
    pub fn answer_next(&self, answer: bool) {
        self.answers.borrow_mut().push_back(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn clipboard_writes(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    /// Current clipboard content, if anything was written.
    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.borrow().last().cloned()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.borrow().clone()
    }

    pub fn clear_requests(&self) -> Vec<Duration> {
        self.clear_requests.borrow().clone()
    }
}

impl PageHost for RecordingHost {
    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.default_answer)
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn write_clipboard(&self, text: &str) {
        self.clipboard.borrow_mut().push(text.to_string());
    }

    fn set_status(&self, text: &str) {
        self.statuses.borrow_mut().push(text.to_string());
    }

    fn clear_status_after(&self, delay: Duration) {
        self.clear_requests.borrow_mut().push(delay);
    }
}
