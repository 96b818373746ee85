//! Structural snapshot comparison and report rendering.
//!
//! The differ reports facts only: which tables, columns, and indexes
//! differ, and by how much row counts moved. Policy about which changes
//! are acceptable belongs to the caller.

pub mod differ;
pub mod render;
pub mod report;

pub use differ::{diff, DiffError};
pub use render::{render_diff_text, render_snapshot_text};
pub use report::{DiffReport, RowCountDelta, RowCountEntry, TableChange, TableChanges};
