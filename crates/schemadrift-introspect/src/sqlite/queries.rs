use sqlx::{Row, SqlitePool};

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

pub struct RawRelation {
    pub name: String,
    pub is_view: bool,
    /// The stored `CREATE ...` statement; the view definition for views.
    pub sql: Option<String>,
}

pub async fn list_relations(pool: &SqlitePool) -> Result<Vec<RawRelation>> {
    let rows = sqlx::query(
        r#"
        select name, type, sql
        from sqlite_master
        where type in ('table', 'view')
          and name not like 'sqlite_%'
        order by name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            let kind: String = row.try_get("type").map_err(query_error)?;
            Ok(RawRelation {
                name: row.try_get("name").map_err(query_error)?,
                is_view: kind == "view",
                sql: row.try_get("sql").map_err(query_error)?,
            })
        })
        .collect()
}

pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub default: Option<String>,
}

pub async fn list_columns(pool: &SqlitePool, table: &str) -> Result<Vec<RawColumn>> {
    // pragma_table_info takes the table name as a bound parameter, unlike
    // the PRAGMA statement form.
    let rows = sqlx::query(
        r#"
        select name, type, "notnull", cast(dflt_value as text) as dflt_value
        from pragma_table_info($1)
        order by cid
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            let not_null: i64 = row.try_get("notnull").map_err(query_error)?;
            Ok(RawColumn {
                name: row.try_get("name").map_err(query_error)?,
                data_type: row.try_get("type").map_err(query_error)?,
                not_null: not_null != 0,
                default: row.try_get("dflt_value").map_err(query_error)?,
            })
        })
        .collect()
}

pub struct RawIndex {
    pub name: String,
    pub table: String,
    pub definition: String,
}

pub async fn list_indexes(pool: &SqlitePool) -> Result<Vec<RawIndex>> {
    // Auto-indexes created for primary keys carry no sql; skip them like
    // the catalog does.
    let rows = sqlx::query(
        r#"
        select name, tbl_name, sql
        from sqlite_master
        where type = 'index'
          and sql is not null
        order by name
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(query_error)?;

    rows.iter()
        .map(|row| {
            Ok(RawIndex {
                name: row.try_get("name").map_err(query_error)?,
                table: row.try_get("tbl_name").map_err(query_error)?,
                definition: row.try_get("sql").map_err(query_error)?,
            })
        })
        .collect()
}

pub async fn count_rows(pool: &SqlitePool, table: &TableRef) -> Result<i64> {
    let sql = format!("select count(*) from {}", quote_table(table));
    sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(pool)
        .await
        .map_err(query_error)
}

pub async fn fetch_rows(pool: &SqlitePool, table: &TableRef, limit: u32) -> Result<Vec<SampleRow>> {
    let sql = format!("select * from {} limit $1", quote_table(table));
    let rows = sqlx::query(&sql)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(query_error)?;

    Ok(rows.iter().map(mapper::decode_row).collect())
}
