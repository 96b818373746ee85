use async_trait::async_trait;

use schemadrift_core::{BackendKind, Index, Result, SampleRow, Table, TableRef};

/// Trait implemented by backend-specific catalog drivers.
///
/// All operations are read-only; an adapter never executes DDL or DML
/// against the inspected database. Implementations must be shareable so the
/// engine can issue bounded-parallel sampler calls (pooled drivers hand out
/// one connection per in-flight query).
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Backend identifier baked into the snapshot.
    fn backend(&self) -> BackendKind;

    /// Enumerate user-visible schemas, sorted by name.
    async fn list_schemas(&self) -> Result<Vec<String>>;

    /// Enumerate tables and views in one schema with their columns, sorted
    /// by name. Index sets are attached separately via [`Self::list_indexes`].
    async fn list_tables(&self, schema: &str) -> Result<Vec<Table>>;

    /// Enumerate indexes in one schema, sorted by name.
    async fn list_indexes(&self, schema: &str) -> Result<Vec<Index>>;

    /// Count rows in one table.
    async fn row_count(&self, table: &TableRef) -> Result<i64>;

    /// Fetch at most `limit` rows from one table.
    async fn fetch_rows(&self, table: &TableRef, limit: u32) -> Result<Vec<SampleRow>>;

    /// Restore the session to a usable state after a failed query.
    ///
    /// Backends whose failures poison the session (an aborted Postgres
    /// transaction) roll back here; pooled autocommit backends have nothing
    /// to do.
    async fn reset_session(&self) -> Result<()> {
        Ok(())
    }
}

/// Quote an identifier discovered in the catalog for interpolation into a
/// dynamic query. Double-quotes the identifier and doubles embedded quotes;
/// understood by both Postgres and SQLite.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a schema-qualified table reference.
pub fn quote_table(table: &TableRef) -> String {
    format!("{}.{}", quote_ident(&table.schema), quote_ident(&table.name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_plain_identifiers() {
        assert_eq!(quote_ident("users"), "\"users\"");
    }

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn quotes_qualified_table_refs() {
        let table = TableRef::new("app", "users");
        assert_eq!(quote_table(&table), "\"app\".\"users\"");
    }
}
