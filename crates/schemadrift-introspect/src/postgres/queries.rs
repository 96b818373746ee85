use sqlx::{PgPool, Row};

use schemadrift_core::{Error, Result, SampleRow, TableRef};

use crate::adapter::quote_table;

use super::mapper;

pub(super) fn query_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            Error::Connection(err.to_string())
        }
        other => Error::Query(other.to_string()),
    }
}

pub async fn list_schemas(pool: &PgPool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        select schema_name
        from information_schema.schemata
        where schema_name not in ('pg_catalog', 'information_schema')
          and schema_name not like 'pg_toast%'
          and schema_name not like 'pg_temp%'
        order by schema_name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("schema_name").map_err(query_error))
        .collect()
}

pub struct RawTable {
    pub name: String,
    pub is_view: bool,
    pub view_definition: Option<String>,
}

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<RawTable>> {
    let rows = sqlx::query(
        r#"
        select t.table_name, t.table_type, v.view_definition
        from information_schema.tables t
        left join information_schema.views v
          on v.table_schema = t.table_schema and v.table_name = t.table_name
        where t.table_schema = $1
          and t.table_type in ('BASE TABLE', 'VIEW')
        order by t.table_name
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            let table_type: String = row.try_get("table_type").map_err(query_error)?;
            Ok(RawTable {
                name: row.try_get("table_name").map_err(query_error)?,
                is_view: table_type == "VIEW",
                view_definition: row.try_get("view_definition").map_err(query_error)?,
            })
        })
        .collect()
}

pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub default: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select column_name, data_type, is_nullable, column_default
        from information_schema.columns
        where table_schema = $1
          and table_name = $2
        order by ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            let is_nullable: String = row.try_get("is_nullable").map_err(query_error)?;
            Ok(RawColumn {
                name: row.try_get("column_name").map_err(query_error)?,
                data_type: row.try_get("data_type").map_err(query_error)?,
                is_nullable: is_nullable == "YES",
                default: row.try_get("column_default").map_err(query_error)?,
            })
        })
        .collect()
}

pub struct RawIndex {
    pub name: String,
    pub table: String,
    pub definition: String,
}

pub async fn list_indexes(pool: &PgPool, schema: &str) -> Result<Vec<RawIndex>> {
    let rows = sqlx::query(
        r#"
        select indexname, tablename, indexdef
        from pg_indexes
        where schemaname = $1
        order by indexname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            Ok(RawIndex {
                name: row.try_get("indexname").map_err(query_error)?,
                table: row.try_get("tablename").map_err(query_error)?,
                definition: row.try_get("indexdef").map_err(query_error)?,
            })
        })
        .collect()
}

/// Count rows in a table discovered from the catalog. The identifier is
/// adapter-quoted, never interpolated raw.
pub async fn count_rows(pool: &PgPool, table: &TableRef) -> Result<i64> {
    let sql = format!("select count(*) from {}", quote_table(table));
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(pool)
        .await
        .map_err(query_error)
}

/// Fetch a bounded sample. Columns outside the small native-scalar set are
/// cast to text so every backend type decodes into a [`schemadrift_core::Value`].
pub async fn fetch_rows(
    pool: &PgPool,
    table: &TableRef,
    columns: &[RawColumn],
    limit: u32,
) -> Result<Vec<SampleRow>> {
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let select_list = columns
        .iter()
        .map(mapper::select_expr)
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "select {select_list} from {} limit $1",
        quote_table(table)
    );

    let rows = sqlx::query(&sql)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(query_error)?;

    Ok(rows
        .iter()
        .map(|row| mapper::decode_row(row, columns))
        .collect())
}
