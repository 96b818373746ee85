//! File-backed, append-only snapshot store.
//!
//! One JSON record per snapshot under `<root>/<label>/`, named
//! `<created_at>__<snapshot_id>.json`. Saving never overwrites an earlier
//! record with the same label; the comparison workflow depends on labeled
//! history being retained.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;

use schemadrift_core::{validate_snapshot, Snapshot, FORMAT_VERSION};

/// Store-level errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no snapshot stored under label {0:?}")]
    NotFound(String),
    #[error("refusing to store inconsistent snapshot: {0}")]
    Invalid(String),
    #[error("unsupported snapshot format {found:?} (supported: {supported:?})")]
    IncompatibleFormat { found: String, supported: String },
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Handle to a persisted snapshot record.
#[derive(Debug, Clone)]
pub struct SnapshotId {
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub path: PathBuf,
}

/// Append-only snapshot store rooted at a directory.
pub struct SnapshotStore {
    root: PathBuf,
    // Serializes the write path so two concurrent saves cannot interleave.
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Persist a snapshot under its label. Always creates a new record.
    ///
    /// The snapshot is validated first; an inconsistent one never reaches
    /// disk.
    pub fn save(&self, snapshot: &Snapshot) -> StoreResult<SnapshotId> {
        validate_snapshot(snapshot).map_err(|err| StoreError::Invalid(err.to_string()))?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let dir = self.root.join(sanitize_label(&snapshot.label));
        fs::create_dir_all(&dir)?;

        let file_name = format!(
            "{}__{}.json",
            snapshot.created_at.format("%Y-%m-%dT%H-%M-%S%.6fZ"),
            snapshot.snapshot_id
        );
        let path = dir.join(file_name);

        // create_new guarantees append-only semantics at the filesystem
        // level; the uuid in the name makes collisions impossible in
        // practice.
        let file = OpenOptions::new().create_new(true).write(true).open(&path)?;
        serde_json::to_writer_pretty(file, snapshot)?;

        tracing::info!(label = %snapshot.label, path = %path.display(), "snapshot saved");
        Ok(SnapshotId {
            label: snapshot.label.clone(),
            created_at: snapshot.created_at,
            path,
        })
    }

    /// Load the most recent snapshot with the given label.
    pub fn load(&self, label: &str) -> StoreResult<Snapshot> {
        let mut all = self.load_all(label)?;
        all.pop().ok_or_else(|| StoreError::NotFound(label.to_string()))
    }

    /// Load every snapshot with the given label, ordered by creation time.
    pub fn load_all(&self, label: &str) -> StoreResult<Vec<Snapshot>> {
        let dir = self.root.join(sanitize_label(label));
        if !dir.is_dir() {
            return Err(StoreError::NotFound(label.to_string()));
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            snapshots.push(read_record(&path)?);
        }

        if snapshots.is_empty() {
            return Err(StoreError::NotFound(label.to_string()));
        }

        snapshots.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.snapshot_id.cmp(&right.snapshot_id))
        });
        Ok(snapshots)
    }
}

fn read_record(path: &Path) -> StoreResult<Snapshot> {
    let contents = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&contents)?;
    if snapshot.format_version != FORMAT_VERSION {
        return Err(StoreError::IncompatibleFormat {
            found: snapshot.format_version,
            supported: FORMAT_VERSION.to_string(),
        });
    }
    Ok(snapshot)
}

/// Labels become directory names; anything path-hostile maps to `_`.
fn sanitize_label(label: &str) -> String {
    let sanitized: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        sanitized
    }
}
