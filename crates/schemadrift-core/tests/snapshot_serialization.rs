use chrono::{TimeZone, Utc};
use uuid::Uuid;

use schemadrift_core::{
    BackendKind, Column, SampleResult, Snapshot, Table, TableKind, TableRef, Value,
    FORMAT_VERSION,
};

fn fixture_snapshot() -> Snapshot {
    Snapshot {
        format_version: FORMAT_VERSION.to_string(),
        label: "BEFORE".to_string(),
        snapshot_id: Uuid::nil(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        backend: BackendKind::Postgres,
        tables: vec![Table {
            schema: "app".to_string(),
            name: "users".to_string(),
            kind: TableKind::Table,
            view_definition: None,
            columns: vec![
                Column {
                    name: "id".to_string(),
                    data_type: "integer".to_string(),
                    is_nullable: false,
                    default: None,
                },
                Column {
                    name: "email".to_string(),
                    data_type: "text".to_string(),
                    is_nullable: true,
                    default: None,
                },
            ],
            indexes: Vec::new(),
        }],
        samples: vec![SampleResult {
            table: TableRef::new("app", "users"),
            row_count: Some(42),
            rows: vec![vec![
                ("id".to_string(), Value::Int(1)),
                ("email".to_string(), Value::Null),
            ]],
            error: None,
        }],
    }
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = fixture_snapshot();
    let json = serde_json::to_string_pretty(&snapshot).expect("serialize snapshot");
    let parsed: Snapshot = serde_json::from_str(&json).expect("parse snapshot");

    assert_eq!(parsed.format_version, FORMAT_VERSION);
    assert_eq!(parsed.label, "BEFORE");
    assert_eq!(parsed.backend, BackendKind::Postgres);
    assert_eq!(parsed.tables, snapshot.tables);
    assert_eq!(parsed.samples, snapshot.samples);
}

#[test]
fn backend_kind_uses_stable_tags() {
    assert_eq!(
        serde_json::to_string(&BackendKind::Postgres).unwrap(),
        r#""postgres""#
    );
    assert_eq!(
        serde_json::to_string(&BackendKind::Sqlite).unwrap(),
        r#""sqlite""#
    );
}

#[test]
fn sample_lookup_matches_table_ref() {
    let snapshot = fixture_snapshot();
    let table = TableRef::new("app", "users");
    let sample = snapshot.sample(&table).expect("sample present");
    assert_eq!(sample.row_count, Some(42));
    assert!(snapshot.sample(&TableRef::new("app", "ghost")).is_none());
}
