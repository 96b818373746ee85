use sqlx::sqlite::SqliteRow;
use sqlx::{Column as _, Row};

use schemadrift_core::{Column, Index, SampleRow, Table, TableKind, Value};

use super::queries::{RawColumn, RawIndex, RawRelation};
use super::SQLITE_SCHEMA;

pub fn map_table(relation: RawRelation, raw_columns: Vec<RawColumn>) -> Table {
    let kind = if relation.is_view {
        TableKind::View
    } else {
        TableKind::Table
    };
    Table {
        schema: SQLITE_SCHEMA.to_string(),
        name: relation.name,
        kind,
        view_definition: if relation.is_view { relation.sql } else { None },
        columns: raw_columns.into_iter().map(map_column).collect(),
        indexes: Vec::new(),
    }
}

fn map_column(raw: RawColumn) -> Column {
    Column {
        name: raw.name,
        // Typeless SQLite columns have an empty declared type; keep it as-is.
        data_type: raw.data_type,
        is_nullable: !raw.not_null,
        default: raw.default,
    }
}

pub fn map_index(raw: RawIndex) -> Index {
    Index {
        name: raw.name,
        table: raw.table,
        definition: raw.definition,
    }
}

/// Decode a sampled row by storage class. SQLite only stores NULL, INTEGER,
/// REAL, TEXT, and BLOB, so the short chain below is exhaustive.
pub fn decode_row(row: &SqliteRow) -> SampleRow {
    row.columns()
        .iter()
        .map(|column| {
            let name = column.name().to_string();
            (name, decode_value(row, column.ordinal()))
        })
        .collect()
}

fn decode_value(row: &SqliteRow, idx: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return value.map(Value::Text).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(idx) {
        return value.map(Value::Bytes).unwrap_or(Value::Null);
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_keep_their_stored_sql() {
        let table = map_table(
            RawRelation {
                name: "recent_events".to_string(),
                is_view: true,
                sql: Some("CREATE VIEW recent_events AS select 1".to_string()),
            },
            Vec::new(),
        );
        assert_eq!(table.kind, TableKind::View);
        assert!(table.view_definition.is_some());
        assert_eq!(table.schema, SQLITE_SCHEMA);
    }

    #[test]
    fn plain_tables_drop_their_ddl() {
        let table = map_table(
            RawRelation {
                name: "events".to_string(),
                is_view: false,
                sql: Some("CREATE TABLE events (id integer)".to_string()),
            },
            vec![RawColumn {
                name: "id".to_string(),
                data_type: "INTEGER".to_string(),
                not_null: true,
                default: None,
            }],
        );
        assert_eq!(table.kind, TableKind::Table);
        assert!(table.view_definition.is_none());
        assert!(!table.columns[0].is_nullable);
    }
}
