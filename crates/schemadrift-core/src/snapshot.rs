use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::Value;

/// Database engine a snapshot was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Postgres,
    Sqlite,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Postgres => "postgres",
            BackendKind::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema-qualified table reference.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct TableRef {
    pub schema: String,
    pub name: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Kind of relation captured from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Table,
    View,
}

/// Column metadata in declaration order within its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub name: String,
    /// Backend-native type name (e.g. `integer`, `character varying(255)`).
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
}

/// Index metadata; `definition` is the backend-native DDL fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Index {
    pub name: String,
    pub table: String,
    pub definition: String,
}

/// A table or view with its columns and indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub kind: TableKind,
    /// View body, truncated at capture time; `None` for plain tables.
    pub view_definition: Option<String>,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(self.schema.clone(), self.name.clone())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// One sampled row: column name paired with its captured value, in
/// declaration order.
pub type SampleRow = Vec<(String, Value)>;

/// Row count plus bounded row sample for one table.
///
/// `row_count` is `None` when the count query itself failed; `error` holds
/// the failure description when either query failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SampleResult {
    pub table: TableRef,
    pub row_count: Option<i64>,
    pub rows: Vec<SampleRow>,
    pub error: Option<String>,
}

impl SampleResult {
    /// Result recording a per-table failure; no rows, no count.
    pub fn failed(table: TableRef, error: impl Into<String>) -> Self {
        Self {
            table,
            row_count: None,
            rows: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Immutable point-in-time capture of catalog structure and row samples.
///
/// Constructed in one introspection pass and never mutated afterwards; a
/// new run always produces a new snapshot value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    /// Contract version for the persisted record format.
    pub format_version: String,
    /// Caller-supplied label, e.g. `BEFORE` / `AFTER`.
    pub label: String,
    pub snapshot_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub backend: BackendKind,
    /// Tables and views sorted by schema then name.
    pub tables: Vec<Table>,
    /// One entry per sampled table, same order as `tables`.
    pub samples: Vec<SampleResult>,
}

impl Snapshot {
    pub fn table(&self, table_ref: &TableRef) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.schema == table_ref.schema && table.name == table_ref.name)
    }

    pub fn sample(&self, table_ref: &TableRef) -> Option<&SampleResult> {
        self.samples.iter().find(|sample| &sample.table == table_ref)
    }

    /// References of all captured tables, in snapshot order.
    pub fn table_refs(&self) -> Vec<TableRef> {
        self.tables.iter().map(Table::table_ref).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ref_displays_qualified_name() {
        let table = TableRef::new("app", "users");
        assert_eq!(table.to_string(), "app.users");
    }

    #[test]
    fn failed_sample_has_no_rows_and_no_count() {
        let sample = SampleResult::failed(TableRef::new("app", "users"), "permission denied");
        assert_eq!(sample.row_count, None);
        assert!(sample.rows.is_empty());
        assert_eq!(sample.error.as_deref(), Some("permission denied"));
    }
}
