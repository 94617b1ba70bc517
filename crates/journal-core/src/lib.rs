//! journal-core: shared domain types, configuration, and action events for the
//! journal client.
//!
//! This crate contains the pieces every other journal crate agrees on: the
//! client configuration (YAML file plus environment overrides), the
//! user-facing error taxonomy for page actions, the action event sink used
//! for audit/debugging, and small value types (uploaded files, preview kinds,
//! clipboard reference builders).

pub mod config;
pub mod error;
pub mod event;
pub mod types;

/// Stable crate label used for bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "journal-core"
}
