//! User-facing error taxonomy for page actions.
//!
//! Every failure of a page action is terminal for that action: nothing is
//! retried automatically, the user repeats the gesture instead. The variants
//! map onto what the page shows (nothing, a generic message, or the server's
//! status and body verbatim).

use std::fmt;

/// Normalized error for a page action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The user declined the confirmation prompt. Silent no-op.
    Cancelled,

    /// The same target already has an action in flight.
    Busy { target: String },

    /// The server could not be reached.
    Transport { message: String },

    /// The server answered with a non-2xx status.
    Server { status: u16, body: String },

    /// The server answered 2xx but the body could not be understood.
    Parse { message: String },

    /// A page element or attribute the action needs is missing.
    MissingPrecondition { message: String },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("cancelled by user"),
            Self::Busy { target } => write!(f, "an action on {target:?} is already pending"),
            Self::Transport { message } => write!(f, "server unreachable: {message}"),
            Self::Server { status, body } => write!(f, "{status} {body}"),
            Self::Parse { message } => write!(f, "malformed server response: {message}"),
            Self::MissingPrecondition { message } => f.write_str(message),
        }
    }
}

impl std::error::Error for ActionError {}

impl ActionError {
    /// Whether repeating the gesture could plausibly succeed without any
    /// change on the user's side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Busy { .. })
    }

    /// Whether the page should say nothing about this outcome.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingPrecondition {
            message: message.into(),
        }
    }
}
