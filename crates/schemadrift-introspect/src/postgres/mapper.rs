use sqlx::postgres::PgRow;
use sqlx::Row;

use schemadrift_core::{Column, Index, SampleRow, Table, TableKind, Value};

use crate::adapter::quote_ident;

use super::queries::{RawColumn, RawIndex, RawTable};

pub fn map_table(schema: &str, raw: RawTable, raw_columns: Vec<RawColumn>) -> Table {
    Table {
        schema: schema.to_string(),
        name: raw.name,
        kind: if raw.is_view {
            TableKind::View
        } else {
            TableKind::Table
        },
        view_definition: raw.view_definition,
        columns: raw_columns.into_iter().map(map_column).collect(),
        indexes: Vec::new(),
    }
}

fn map_column(raw: RawColumn) -> Column {
    Column {
        name: raw.name,
        data_type: raw.data_type,
        is_nullable: raw.is_nullable,
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

/// Types decoded natively; everything else is cast to text in the sample
/// query so exotic types (numerics, timestamps, arrays, json) still yield a
/// scalar instead of a decode failure.
fn is_native_scalar(data_type: &str) -> bool {
    matches!(
        data_type,
        "boolean"
            | "smallint"
            | "integer"
            | "bigint"
            | "real"
            | "double precision"
            | "text"
            | "character varying"
            | "character"
            | "name"
            | "bytea"
    )
}

pub fn select_expr(column: &RawColumn) -> String {
    let ident = quote_ident(&column.name);
    if is_native_scalar(&column.data_type) {
        ident
    } else {
        format!("{ident}::text")
    }
}

pub fn decode_row(row: &PgRow, columns: &[RawColumn]) -> SampleRow {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.name.clone(), decode_value(row, idx)))
        .collect()
}

fn decode_value(row: &PgRow, idx: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<bool>, _>(idx) {
        return value.map(Value::Bool).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i16>, _>(idx) {
        return value.map(|v| Value::Int(v.into())).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(idx) {
        return value.map(|v| Value::Int(v.into())).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(value) = row.try_get::<Option<f32>, _>(idx) {
        return value.map(|v| Value::Float(v.into())).unwrap_or(Value::Null);
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

    fn raw_column(name: &str, data_type: &str) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
            default: None,
        }
    }

    #[test]
    fn native_scalars_are_selected_verbatim() {
        assert_eq!(select_expr(&raw_column("id", "integer")), "\"id\"");
        assert_eq!(select_expr(&raw_column("email", "text")), "\"email\"");
    }

    #[test]
    fn exotic_types_are_cast_to_text() {
        assert_eq!(
            select_expr(&raw_column("created_at", "timestamp with time zone")),
            "\"created_at\"::text"
        );
        assert_eq!(select_expr(&raw_column("amount", "numeric")), "\"amount\"::text");
    }

    #[test]
    fn views_map_with_definition() {
        let table = map_table(
            "app",
            RawTable {
                name: "active_users".to_string(),
                is_view: true,
                view_definition: Some("select 1".to_string()),
            },
            vec![raw_column("id", "integer")],
        );
        assert_eq!(table.kind, TableKind::View);
        assert_eq!(table.view_definition.as_deref(), Some("select 1"));
        assert_eq!(table.columns.len(), 1);
    }
}
