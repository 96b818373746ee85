use serde::{Deserialize, Serialize};

use schemadrift_core::{TableKind, TableRef};

/// Signed row-count movement between two snapshots of one table.
///
/// `Unknown` means at least one side's count was absent (sampling failed);
/// it is never collapsed to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowCountDelta {
    Known(i64),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCountEntry {
    pub table: TableRef,
    pub delta: RowCountDelta,
}

/// One field-level difference inside a table present in both snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableChange {
    ColumnAdded {
        name: String,
        data_type: String,
        is_nullable: bool,
    },
    ColumnRemoved {
        name: String,
    },
    ColumnTypeChanged {
        name: String,
        base: String,
        target: String,
    },
    ColumnNullabilityChanged {
        name: String,
        base: bool,
        target: bool,
    },
    ColumnDefaultChanged {
        name: String,
        base: Option<String>,
        target: Option<String>,
    },
    IndexAdded {
        name: String,
    },
    IndexRemoved {
        name: String,
    },
    KindChanged {
        base: TableKind,
        target: TableKind,
    },
    /// Definitions compared verbatim after capture-time truncation; views
    /// differing only beyond the truncation boundary compare as unchanged.
    ViewDefinitionChanged,
}

/// Every recorded change for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChanges {
    pub table: TableRef,
    pub changes: Vec<TableChange>,
}

/// Minimal structural diff between two snapshots.
///
/// A table appears in `tables_changed` only if at least one field-level
/// change was recorded; tables with identical descriptors and equal row
/// counts are absent from the report entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub base_label: String,
    pub target_label: String,
    pub tables_added: Vec<TableRef>,
    pub tables_removed: Vec<TableRef>,
    pub tables_changed: Vec<TableChanges>,
    pub row_count_deltas: Vec<RowCountEntry>,
}

impl DiffReport {
    /// True when the two snapshots are structurally identical and no row
    /// counts moved.
    pub fn is_empty(&self) -> bool {
        self.tables_added.is_empty()
            && self.tables_removed.is_empty()
            && self.tables_changed.is_empty()
            && self.row_count_deltas.is_empty()
    }
}
