//! Catalog adapters and the snapshot engine.
//!
//! One [`CatalogAdapter`] implementation per backend translates the native
//! catalog (Postgres system views, SQLite pragmas) into the normalized
//! descriptors from `schemadrift-core`; the [`IntrospectionEngine`]
//! orchestrates adapters and the [`Sampler`] into immutable snapshots.

pub mod adapter;
pub mod cancel;
pub mod engine;
pub mod options;
pub mod postgres;
pub mod sampler;
pub mod sqlite;

pub use adapter::{quote_ident, CatalogAdapter};
pub use cancel::CancelFlag;
pub use engine::IntrospectionEngine;
pub use options::SnapshotOptions;
pub use postgres::PostgresAdapter;
pub use sampler::Sampler;
pub use sqlite::SqliteAdapter;

pub use schemadrift_core::Snapshot;
