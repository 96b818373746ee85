use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::snapshot::Snapshot;

/// Validate internal consistency of a captured snapshot.
///
/// This checks:
/// - duplicate table references and duplicate column names
/// - empty table/column names
/// - sample entries referring to tables absent from the snapshot
/// - negative row counts
pub fn validate_snapshot(snapshot: &Snapshot) -> Result<()> {
    let mut tables = BTreeSet::new();

    for table in &snapshot.tables {
        if table.schema.is_empty() || table.name.is_empty() {
            return Err(Error::InvalidSnapshot(format!(
                "empty table name: {:?}.{:?}",
                table.schema, table.name
            )));
        }
        if !tables.insert((table.schema.clone(), table.name.clone())) {
            return Err(Error::InvalidSnapshot(format!(
                "duplicate table: {}.{}",
                table.schema, table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if column.name.is_empty() {
                return Err(Error::InvalidSnapshot(format!(
                    "empty column name in {}.{}",
                    table.schema, table.name
                )));
            }
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate column name: {}.{}.{}",
                    table.schema, table.name, column.name
                )));
            }
        }
    }

    for sample in &snapshot.samples {
        let key = (sample.table.schema.clone(), sample.table.name.clone());
        if !tables.contains(&key) {
            return Err(Error::InvalidSnapshot(format!(
                "sample for unknown table: {}",
                sample.table
            )));
        }
        if let Some(count) = sample.row_count {
            if count < 0 {
                return Err(Error::InvalidSnapshot(format!(
                    "negative row count for {}: {count}",
                    sample.table
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::snapshot::{BackendKind, Column, SampleResult, Table, TableKind, TableRef};
    use crate::FORMAT_VERSION;

    fn snapshot_with(tables: Vec<Table>, samples: Vec<SampleResult>) -> Snapshot {
        Snapshot {
            format_version: FORMAT_VERSION.to_string(),
            label: "SNAPSHOT".to_string(),
            snapshot_id: Uuid::new_v4(),
            created_at: Utc::now(),
            backend: BackendKind::Postgres,
            tables,
            samples,
        }
    }

    fn users_table() -> Table {
        Table {
            schema: "app".to_string(),
            name: "users".to_string(),
            kind: TableKind::Table,
            view_definition: None,
            columns: vec![Column {
                name: "id".to_string(),
                data_type: "bigint".to_string(),
                is_nullable: false,
                default: None,
            }],
            indexes: Vec::new(),
        }
    }

    #[test]
    fn accepts_consistent_snapshot() {
        let snapshot = snapshot_with(vec![users_table()], Vec::new());
        assert!(validate_snapshot(&snapshot).is_ok());
    }

    #[test]
    fn rejects_duplicate_tables() {
        let snapshot = snapshot_with(vec![users_table(), users_table()], Vec::new());
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(Error::InvalidSnapshot(message)) if message.contains("duplicate table")
        ));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let mut table = users_table();
        table.columns.push(table.columns[0].clone());
        let snapshot = snapshot_with(vec![table], Vec::new());
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(Error::InvalidSnapshot(message)) if message.contains("duplicate column")
        ));
    }

    #[test]
    fn rejects_sample_for_unknown_table() {
        let sample = SampleResult::failed(TableRef::new("app", "ghost"), "gone");
        let snapshot = snapshot_with(vec![users_table()], vec![sample]);
        assert!(matches!(
            validate_snapshot(&snapshot),
            Err(Error::InvalidSnapshot(message)) if message.contains("unknown table")
        ));
    }
}
