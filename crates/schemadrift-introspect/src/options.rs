use schemadrift_core::VIEW_DEFINITION_MAX;

/// Default cap on sampled rows per table for broad scans.
pub const DEFAULT_SAMPLE_LIMIT: u32 = 30;

/// Options that control how a snapshot run behaves.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Label stored on the snapshot; `schemadrift_core::DEFAULT_LABEL`
    /// when absent.
    pub label: Option<String>,
    /// Restrict the run to these schemas; `None` captures all of them.
    pub schemas: Option<Vec<String>>,
    /// Case-insensitive substring patterns on table names; tables matching
    /// none of them are skipped entirely. `None` keeps every table.
    pub tables: Option<Vec<String>>,
    /// Cap on sampled rows per table.
    pub sample_limit: u32,
    /// Skip row counting and sampling entirely when false.
    pub include_samples: bool,
    /// Truncation boundary for captured view definitions.
    pub view_definition_limit: usize,
    /// Number of concurrent per-table sampler calls. 1 means sequential.
    pub parallelism: usize,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            label: None,
            schemas: None,
            tables: None,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            include_samples: true,
            view_definition_limit: VIEW_DEFINITION_MAX,
            parallelism: 1,
        }
    }
}

impl SnapshotOptions {
    pub(crate) fn schema_selected(&self, schema: &str) -> bool {
        match &self.schemas {
            Some(schemas) => schemas.iter().any(|candidate| candidate == schema),
            None => true,
        }
    }

    pub(crate) fn table_selected(&self, table: &str) -> bool {
        match &self.tables {
            Some(patterns) => {
                let table = table.to_lowercase();
                patterns
                    .iter()
                    .any(|pattern| table.contains(&pattern.to_lowercase()))
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_broad_scan_usage() {
        let opts = SnapshotOptions::default();
        assert_eq!(opts.sample_limit, 30);
        assert!(opts.include_samples);
        assert_eq!(opts.parallelism, 1);
        assert_eq!(opts.view_definition_limit, VIEW_DEFINITION_MAX);
    }

    #[test]
    fn table_patterns_match_case_insensitively() {
        let opts = SnapshotOptions {
            tables: Some(vec!["Test".to_string()]),
            ..SnapshotOptions::default()
        };
        assert!(opts.table_selected("para_test_values"));
        assert!(opts.table_selected("TESTS"));
        assert!(!opts.table_selected("users"));
    }

    #[test]
    fn no_filter_selects_everything() {
        let opts = SnapshotOptions::default();
        assert!(opts.schema_selected("app"));
        assert!(opts.table_selected("users"));
    }
}
