use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use schemadrift_core::{BackendKind, Error, Index, Result, SampleRow, Table, TableRef};

use crate::adapter::CatalogAdapter;

mod mapper;
mod queries;

/// Catalog adapter for PostgreSQL.
///
/// Reads `information_schema` and `pg_indexes`, excluding `pg_catalog`,
/// `information_schema`, and toast/temp namespaces. Every query checks out
/// its own pooled autocommit connection, so a failed statement never poisons
/// the session of the next one and the default `reset_session` no-op
/// applies.
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    pool: PgPool,
}

impl PostgresAdapter {
    /// Create an adapter over a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect with a small pool suited to sequential introspection.
    pub async fn connect(conn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(conn)
            .await
            .map_err(|err| Error::Connection(err.to_string()))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogAdapter for PostgresAdapter {
    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn list_schemas(&self) -> Result<Vec<String>> {
        queries::list_schemas(&self.pool).await
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>> {
        let raw_tables = queries::list_tables(&self.pool, schema).await?;
        let mut tables = Vec::with_capacity(raw_tables.len());
        for raw in raw_tables {
            let raw_columns = queries::list_columns(&self.pool, schema, &raw.name).await?;
            tables.push(mapper::map_table(schema, raw, raw_columns));
        }
        Ok(tables)
    }

    async fn list_indexes(&self, schema: &str) -> Result<Vec<Index>> {
        let raw = queries::list_indexes(&self.pool, schema).await?;
        Ok(raw.into_iter().map(mapper::map_index).collect())
    }

    async fn row_count(&self, table: &TableRef) -> Result<i64> {
        queries::count_rows(&self.pool, table).await
    }

    async fn fetch_rows(&self, table: &TableRef, limit: u32) -> Result<Vec<SampleRow>> {
        let raw_columns = queries::list_columns(&self.pool, &table.schema, &table.name).await?;
        queries::fetch_rows(&self.pool, table, &raw_columns, limit).await
    }
}
