use std::collections::BTreeSet;

use thiserror::Error;

use schemadrift_core::{Snapshot, Table, TableRef};

use crate::report::{DiffReport, RowCountDelta, RowCountEntry, TableChange, TableChanges};

/// Raised only when two snapshots cannot be structurally compared.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("snapshots use incompatible formats: {base:?} vs {target:?}")]
    IncompatibleFormat { base: String, target: String },
}

/// Compare two snapshots structurally.
///
/// Cross-backend comparison is supported (e.g. a Postgres source against a
/// migrated SQLite target); backend-native type names are compared
/// verbatim, so the report states facts and leaves interpretation to the
/// caller.
pub fn diff(base: &Snapshot, target: &Snapshot) -> Result<DiffReport, DiffError> {
    if base.format_version != target.format_version {
        return Err(DiffError::IncompatibleFormat {
            base: base.format_version.clone(),
            target: target.format_version.clone(),
        });
    }

    let base_refs: BTreeSet<TableRef> = base.table_refs().into_iter().collect();
    let target_refs: BTreeSet<TableRef> = target.table_refs().into_iter().collect();

    let tables_added: Vec<TableRef> = target_refs.difference(&base_refs).cloned().collect();
    let tables_removed: Vec<TableRef> = base_refs.difference(&target_refs).cloned().collect();

    let mut tables_changed = Vec::new();
    let mut row_count_deltas = Vec::new();

    for table_ref in base_refs.intersection(&target_refs) {
        let base_table = base.table(table_ref).expect("ref from base");
        let target_table = target.table(table_ref).expect("ref from target");

        let changes = diff_table(base_table, target_table);
        if !changes.is_empty() {
            tables_changed.push(TableChanges {
                table: table_ref.clone(),
                changes,
            });
        }

        if let Some(entry) = row_count_entry(base, target, table_ref) {
            row_count_deltas.push(entry);
        }
    }

    Ok(DiffReport {
        base_label: base.label.clone(),
        target_label: target.label.clone(),
        tables_added,
        tables_removed,
        tables_changed,
        row_count_deltas,
    })
}

/// Columns are matched by name, not ordinal position: reordering without a
/// type change is not a difference. Indexes are matched by name.
fn diff_table(base: &Table, target: &Table) -> Vec<TableChange> {
    let mut changes = Vec::new();

    if base.kind != target.kind {
        changes.push(TableChange::KindChanged {
            base: base.kind,
            target: target.kind,
        });
    }

    for base_column in &base.columns {
        match target.column(&base_column.name) {
            None => changes.push(TableChange::ColumnRemoved {
                name: base_column.name.clone(),
            }),
            Some(target_column) => {
                if base_column.data_type != target_column.data_type {
                    changes.push(TableChange::ColumnTypeChanged {
                        name: base_column.name.clone(),
                        base: base_column.data_type.clone(),
                        target: target_column.data_type.clone(),
                    });
                }
                if base_column.is_nullable != target_column.is_nullable {
                    changes.push(TableChange::ColumnNullabilityChanged {
                        name: base_column.name.clone(),
                        base: base_column.is_nullable,
                        target: target_column.is_nullable,
                    });
                }
                if base_column.default != target_column.default {
                    changes.push(TableChange::ColumnDefaultChanged {
                        name: base_column.name.clone(),
                        base: base_column.default.clone(),
                        target: target_column.default.clone(),
                    });
                }
            }
        }
    }

    for target_column in &target.columns {
        if base.column(&target_column.name).is_none() {
            changes.push(TableChange::ColumnAdded {
                name: target_column.name.clone(),
                data_type: target_column.data_type.clone(),
                is_nullable: target_column.is_nullable,
            });
        }
    }

    let base_indexes: BTreeSet<&str> = base.indexes.iter().map(|i| i.name.as_str()).collect();
    let target_indexes: BTreeSet<&str> = target.indexes.iter().map(|i| i.name.as_str()).collect();
    for name in base_indexes.difference(&target_indexes) {
        changes.push(TableChange::IndexRemoved {
            name: (*name).to_string(),
        });
    }
    for name in target_indexes.difference(&base_indexes) {
        changes.push(TableChange::IndexAdded {
            name: (*name).to_string(),
        });
    }

    if base.view_definition != target.view_definition {
        changes.push(TableChange::ViewDefinitionChanged);
    }

    changes
}

/// Emit a delta entry only when something is worth reporting: a nonzero
/// known delta, or an unknown one because a sampled side has no count. A
/// table unsampled on both sides yields no entry.
fn row_count_entry(base: &Snapshot, target: &Snapshot, table: &TableRef) -> Option<RowCountEntry> {
    let base_sample = base.sample(table);
    let target_sample = target.sample(table);

    let delta = match (base_sample, target_sample) {
        (None, None) => return None,
        (Some(base_sample), Some(target_sample)) => {
            match (base_sample.row_count, target_sample.row_count) {
                (Some(base_count), Some(target_count)) => {
                    if base_count == target_count {
                        return None;
                    }
                    RowCountDelta::Known(target_count - base_count)
                }
                _ => RowCountDelta::Unknown,
            }
        }
        _ => RowCountDelta::Unknown,
    };

    Some(RowCountEntry {
        table: table.clone(),
        delta,
    })
}
