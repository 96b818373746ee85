//! Core contracts for schemadrift.
//!
//! This crate defines the snapshot data model shared by the catalog
//! adapters, the snapshot store, and the differ, along with the common
//! error taxonomy and validation helpers.

pub mod error;
pub mod redaction;
pub mod snapshot;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use redaction::{redact_connection_string, RedactedConnection};
pub use snapshot::{
    BackendKind, Column, Index, SampleResult, SampleRow, Snapshot, Table, TableKind, TableRef,
};
pub use validation::validate_snapshot;
pub use value::Value;

/// Current format version for persisted snapshot records.
pub const FORMAT_VERSION: &str = "1";

/// Label applied to snapshots when the caller does not supply one.
pub const DEFAULT_LABEL: &str = "SNAPSHOT";

/// View definitions are truncated to this many characters at capture time.
pub const VIEW_DEFINITION_MAX: usize = 500;
