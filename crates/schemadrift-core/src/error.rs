use thiserror::Error;

use crate::snapshot::Snapshot;

/// Shared error type for introspection runs.
///
/// Per-table sampling failures are not represented here; they are recorded
/// as data inside [`crate::snapshot::SampleResult::error`] and never abort
/// a run.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection to the database was lost or could not be established.
    #[error("connection error: {0}")]
    Connection(String),
    /// A single catalog query failed (malformed identifier, permissions).
    #[error("backend query error: {0}")]
    Query(String),
    /// The run was cancelled or failed mid-flight; carries whatever was
    /// gathered before the abort.
    #[error("introspection aborted: {reason}")]
    Aborted {
        reason: String,
        partial: Box<Snapshot>,
    },
    /// The snapshot violates internal invariants.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Convenience alias for results returned by schemadrift crates.
pub type Result<T> = std::result::Result<T, Error>;
