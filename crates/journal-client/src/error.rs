//! Errors returned by `JournalService` implementations.

use journal_core::error::ActionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("{status} {body}")]
    Server { status: u16, body: String },
    #[error("malformed response: {0}")]
    Parse(String),
}

impl From<ClientError> for ActionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidArgument(message) => Self::MissingPrecondition { message },
            ClientError::Transport(message) => Self::Transport { message },
            ClientError::Server { status, body } => Self::Server { status, body },
            ClientError::Parse(message) => Self::Parse { message },
        }
    }
}
