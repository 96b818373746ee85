use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use schemadrift_core::{BackendKind, Error, Index, Result, SampleRow, Table, TableRef};

use crate::adapter::CatalogAdapter;

mod mapper;
mod queries;

/// The single schema name exposed by a SQLite database file.
pub const SQLITE_SCHEMA: &str = "main";

/// Catalog adapter for a single SQLite database file.
///
/// Reads `sqlite_master` and `pragma_table_info`; the file is opened
/// read-only so introspection can never mutate it. SQLite has no namespace
/// concept, so every table lives in the constant [`SQLITE_SCHEMA`] schema.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a database file (or `sqlite://` URL) read-only.
    pub async fn connect(conn: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(conn)
            .map_err(|err| Error::Connection(err.to_string()))?
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogAdapter for SqliteAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(vec![SQLITE_SCHEMA.to_string()])
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>> {
        if schema != SQLITE_SCHEMA {
            return Ok(Vec::new());
        }
        let relations = queries::list_relations(&self.pool).await?;
        let mut tables = Vec::with_capacity(relations.len());
        for relation in relations {
            let raw_columns = queries::list_columns(&self.pool, &relation.name).await?;
            tables.push(mapper::map_table(relation, raw_columns));
        }
        Ok(tables)
    }

    async fn list_indexes(&self, schema: &str) -> Result<Vec<Index>> {
        if schema != SQLITE_SCHEMA {
            return Ok(Vec::new());
        }
        let raw = queries::list_indexes(&self.pool).await?;
        Ok(raw.into_iter().map(mapper::map_index).collect())
    }

    async fn row_count(&self, table: &TableRef) -> Result<i64> {
        queries::count_rows(&self.pool, table).await
    }

    async fn fetch_rows(&self, table: &TableRef, limit: u32) -> Result<Vec<SampleRow>> {
        queries::fetch_rows(&self.pool, table, limit).await
    }
}
