use std::fmt::Write as _;

use schemadrift_core::{Snapshot, TableKind};

use crate::report::{DiffReport, RowCountDelta, TableChange};

/// Render a snapshot as indented console text: schema and table headers,
/// columns with nullability and defaults, indexes, then row counts and
/// sampled rows.
pub fn render_snapshot_text(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== {} ({}, {} tables, captured {}) ===",
        snapshot.label,
        snapshot.backend,
        snapshot.tables.len(),
        snapshot.created_at.to_rfc3339()
    );

    let mut current_schema: Option<&str> = None;
    for table in &snapshot.tables {
        if current_schema != Some(table.schema.as_str()) {
            current_schema = Some(table.schema.as_str());
            let _ = writeln!(out, "\nSchema: {}", table.schema);
        }

        let kind = match table.kind {
            TableKind::Table => "TABLE",
            TableKind::View => "VIEW",
        };
        let _ = writeln!(out, "  {kind}: {}", table.name);

        for column in &table.columns {
            let nullable = if column.is_nullable { "NULL" } else { "NOT NULL" };
            let default = column
                .default
                .as_deref()
                .map(|expr| format!(" DEFAULT {expr}"))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "    {}: {} {nullable}{default}",
                column.name, column.data_type
            );
        }

        for index in &table.indexes {
            let _ = writeln!(out, "    INDEX {}: {}", index.name, index.definition);
        }

        if let Some(definition) = &table.view_definition {
            let _ = writeln!(out, "    DEFINITION: {definition}");
        }

        if let Some(sample) = snapshot.sample(&table.table_ref()) {
            match (sample.row_count, sample.error.as_deref()) {
                (Some(count), None) => {
                    let _ = writeln!(out, "    -> {count} rows");
                }
                (Some(count), Some(error)) => {
                    let _ = writeln!(out, "    -> {count} rows (sampling ERROR - {error})");
                }
                (None, error) => {
                    let _ = writeln!(out, "    -> ERROR - {}", error.unwrap_or("count failed"));
                }
            }
            for row in &sample.rows {
                let rendered: Vec<String> = row
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect();
                let _ = writeln!(out, "      {{{}}}", rendered.join(", "));
            }
        }
    }

    out
}

/// Render a diff report as indented console text, one change per line.
pub fn render_diff_text(report: &DiffReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== DIFF {} -> {} ===",
        report.base_label, report.target_label
    );

    if report.is_empty() {
        let _ = writeln!(out, "no differences");
        return out;
    }

    if !report.tables_added.is_empty() {
        let _ = writeln!(out, "\nTables added:");
        for table in &report.tables_added {
            let _ = writeln!(out, "  + {table}");
        }
    }

    if !report.tables_removed.is_empty() {
        let _ = writeln!(out, "\nTables removed:");
        for table in &report.tables_removed {
            let _ = writeln!(out, "  - {table}");
        }
    }

    if !report.tables_changed.is_empty() {
        let _ = writeln!(out, "\nTables changed:");
        for changed in &report.tables_changed {
            let _ = writeln!(out, "  {}", changed.table);
            for change in &changed.changes {
                let _ = writeln!(out, "    {}", describe_change(change));
            }
        }
    }

    if !report.row_count_deltas.is_empty() {
        let _ = writeln!(out, "\nRow count deltas:");
        for entry in &report.row_count_deltas {
            let delta = match entry.delta {
                RowCountDelta::Known(delta) => format!("{delta:+}"),
                RowCountDelta::Unknown => "unknown".to_string(),
            };
            let _ = writeln!(out, "  {}: {delta}", entry.table);
        }
    }

    out
}

fn describe_change(change: &TableChange) -> String {
    match change {
        TableChange::ColumnAdded {
            name,
            data_type,
            is_nullable,
        } => {
            let nullable = if *is_nullable { "null" } else { "not null" };
            format!("column added: {name} {data_type} {nullable}")
        }
        TableChange::ColumnRemoved { name } => format!("column removed: {name}"),
        TableChange::ColumnTypeChanged { name, base, target } => {
            format!("column type changed: {name} {base} -> {target}")
        }
        TableChange::ColumnNullabilityChanged { name, base, target } => {
            let describe = |nullable: bool| if nullable { "null" } else { "not null" };
            format!(
                "column nullability changed: {name} {} -> {}",
                describe(*base),
                describe(*target)
            )
        }
        TableChange::ColumnDefaultChanged { name, base, target } => format!(
            "column default changed: {name} {} -> {}",
            base.as_deref().unwrap_or("<none>"),
            target.as_deref().unwrap_or("<none>")
        ),
        TableChange::IndexAdded { name } => format!("index added: {name}"),
        TableChange::IndexRemoved { name } => format!("index removed: {name}"),
        TableChange::KindChanged { base, target } => {
            format!("kind changed: {base:?} -> {target:?}")
        }
        TableChange::ViewDefinitionChanged => "view definition changed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use schemadrift_core::{
        BackendKind, Column, SampleResult, Table, TableRef, Value, FORMAT_VERSION,
    };

    use crate::report::{RowCountEntry, TableChanges};

    use super::*;

    fn sampled_snapshot() -> Snapshot {
        Snapshot {
            format_version: FORMAT_VERSION.to_string(),
            label: "BEFORE".to_string(),
            snapshot_id: Uuid::new_v4(),
            created_at: Utc::now(),
            backend: BackendKind::Postgres,
            tables: vec![Table {
                schema: "app".to_string(),
                name: "users".to_string(),
                kind: TableKind::Table,
                view_definition: None,
                columns: vec![Column {
                    name: "id".to_string(),
                    data_type: "integer".to_string(),
                    is_nullable: false,
                    default: None,
                }],
                indexes: Vec::new(),
            }],
            samples: vec![SampleResult {
                table: TableRef::new("app", "users"),
                row_count: Some(2),
                rows: vec![vec![("id".to_string(), Value::Int(1))]],
                error: None,
            }],
        }
    }

    #[test]
    fn snapshot_text_lists_tables_counts_and_rows() {
        let text = render_snapshot_text(&sampled_snapshot());
        assert!(text.contains("Schema: app"));
        assert!(text.contains("TABLE: users"));
        assert!(text.contains("id: integer NOT NULL"));
        assert!(text.contains("-> 2 rows"));
        assert!(text.contains("{id=1}"));
    }

    #[test]
    fn snapshot_text_flags_failed_tables_inline() {
        let mut snapshot = sampled_snapshot();
        snapshot.samples = vec![SampleResult::failed(
            TableRef::new("app", "users"),
            "permission denied",
        )];
        let text = render_snapshot_text(&snapshot);
        assert!(text.contains("-> ERROR - permission denied"));
    }

    #[test]
    fn diff_text_renders_one_change_per_line() {
        let report = DiffReport {
            base_label: "BEFORE".to_string(),
            target_label: "AFTER".to_string(),
            tables_added: vec![TableRef::new("app", "orders")],
            tables_removed: Vec::new(),
            tables_changed: vec![TableChanges {
                table: TableRef::new("app", "users"),
                changes: vec![TableChange::ColumnAdded {
                    name: "phone".to_string(),
                    data_type: "text".to_string(),
                    is_nullable: true,
                }],
            }],
            row_count_deltas: vec![RowCountEntry {
                table: TableRef::new("app", "users"),
                delta: RowCountDelta::Unknown,
            }],
        };

        let text = render_diff_text(&report);
        assert!(text.contains("+ app.orders"));
        assert!(text.contains("column added: phone text null"));
        assert!(text.contains("app.users: unknown"));
    }

    #[test]
    fn empty_diff_says_so() {
        let report = DiffReport {
            base_label: "A".to_string(),
            target_label: "B".to_string(),
            tables_added: Vec::new(),
            tables_removed: Vec::new(),
            tables_changed: Vec::new(),
            row_count_deltas: Vec::new(),
        };
        assert!(render_diff_text(&report).contains("no differences"));
    }
}
