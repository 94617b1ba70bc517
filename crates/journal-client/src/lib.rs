//! journal-client: the journal server's HTTP endpoints behind one interface.
//!
//! Provides a transport-agnostic `JournalService` trait with implementations for:
//! - `HttpJournalService`: reqwest-backed client for a running journal server
//! - `MockJournalService`: recording mock with queued responses for tests
//!
//! Route names are joined onto a single configurable prefix (`Routes`), so
//! `/_edit` versus `/edit` is a configuration choice.

pub mod error;
pub mod http;
pub mod mock;
pub mod response;
pub mod routes;
pub mod service;
pub mod types;

pub use error::ClientError;
pub use service::JournalService;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "journal-client"
}
