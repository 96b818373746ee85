use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use schemadrift_core::{
    validate_snapshot, Error, Index, Result, SampleResult, Snapshot, Table, TableRef,
    DEFAULT_LABEL, FORMAT_VERSION,
};

use crate::adapter::CatalogAdapter;
use crate::cancel::CancelFlag;
use crate::options::SnapshotOptions;
use crate::sampler::Sampler;

/// Orchestrates one catalog adapter and the sampler into a snapshot.
///
/// The engine performs no retries beyond one immediate re-issue of a failed
/// catalog listing; a failure that survives the retry, or a cancellation,
/// aborts the run with whatever partial data was gathered.
pub struct IntrospectionEngine {
    adapter: Arc<dyn CatalogAdapter>,
}

impl IntrospectionEngine {
    pub fn new(adapter: Arc<dyn CatalogAdapter>) -> Self {
        Self { adapter }
    }

    /// Capture one immutable snapshot of the connected database.
    ///
    /// Per-table sampling failures are recorded in the snapshot and do not
    /// abort the run. Only connection loss, a twice-failed catalog listing,
    /// or cancellation surface as [`Error::Aborted`], carrying the partial
    /// snapshot gathered so far.
    pub async fn run_snapshot(
        &self,
        opts: &SnapshotOptions,
        cancel: &CancelFlag,
    ) -> Result<Snapshot> {
        let mut tables: Vec<Table> = Vec::new();

        let schemas = match self.list_schemas_retry().await {
            Ok(schemas) => schemas,
            Err(err) => return Err(self.abort(opts, tables, Vec::new(), err.to_string())),
        };
        let schemas: Vec<String> = schemas
            .into_iter()
            .filter(|schema| opts.schema_selected(schema))
            .collect();
        tracing::info!(schemas = schemas.len(), "catalog enumeration started");

        for schema in &schemas {
            if cancel.is_cancelled() {
                return Err(self.abort(opts, tables, Vec::new(), "run cancelled"));
            }

            let listed = match self.list_tables_retry(schema).await {
                Ok(listed) => listed,
                Err(err) => return Err(self.abort(opts, tables, Vec::new(), err.to_string())),
            };
            let indexes = match self.list_indexes_retry(schema).await {
                Ok(indexes) => indexes,
                Err(err) => return Err(self.abort(opts, tables, Vec::new(), err.to_string())),
            };

            for mut table in listed {
                if !opts.table_selected(&table.name) {
                    continue;
                }
                table.indexes = indexes
                    .iter()
                    .filter(|index| index.table == table.name)
                    .cloned()
                    .collect();
                truncate_view_definition(&mut table, opts.view_definition_limit);
                tables.push(table);
            }
        }

        // Deterministic enumeration order, independent of sampling.
        tables.sort_by(|left, right| {
            left.schema
                .cmp(&right.schema)
                .then_with(|| left.name.cmp(&right.name))
        });

        let samples = if opts.include_samples {
            self.sample_tables(opts, cancel, &tables).await?
        } else {
            Vec::new()
        };

        let snapshot = self.assemble(opts, tables, samples);
        validate_snapshot(&snapshot)?;
        tracing::info!(
            label = %snapshot.label,
            tables = snapshot.tables.len(),
            "snapshot captured"
        );
        Ok(snapshot)
    }

    async fn sample_tables(
        &self,
        opts: &SnapshotOptions,
        cancel: &CancelFlag,
        tables: &[Table],
    ) -> Result<Vec<SampleResult>> {
        let refs: Vec<TableRef> = tables.iter().map(Table::table_ref).collect();
        let sampler = Sampler::new(Arc::clone(&self.adapter), opts.sample_limit);
        let mut samples: Vec<SampleResult> = Vec::with_capacity(refs.len());

        if opts.parallelism <= 1 {
            for table in &refs {
                if cancel.is_cancelled() {
                    return Err(self.abort(opts, tables.to_vec(), samples, "run cancelled"));
                }
                match sampler.sample(table).await {
                    Ok(sample) => samples.push(sample),
                    // Connection loss is fatal for every remaining table.
                    Err(err) => {
                        return Err(self.abort(opts, tables.to_vec(), samples, err.to_string()));
                    }
                }
            }
            return Ok(samples);
        }

        // Workers run concurrently within a chunk, each query on its own
        // pooled connection; results are reassembled in enumeration order.
        for chunk in refs.chunks(opts.parallelism) {
            if cancel.is_cancelled() {
                return Err(self.abort(opts, tables.to_vec(), samples, "run cancelled"));
            }

            let mut join_set = tokio::task::JoinSet::new();
            for (offset, table) in chunk.iter().enumerate() {
                let sampler = sampler.clone();
                let table = table.clone();
                join_set.spawn(async move { (offset, sampler.sample(&table).await) });
            }

            let mut chunk_samples: Vec<Option<SampleResult>> = vec![None; chunk.len()];
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok((offset, Ok(sample))) => chunk_samples[offset] = Some(sample),
                    Ok((_, Err(err))) => {
                        join_set.abort_all();
                        samples.extend(chunk_samples.into_iter().flatten());
                        return Err(self.abort(opts, tables.to_vec(), samples, err.to_string()));
                    }
                    Err(err) => {
                        return Err(self.abort(
                            opts,
                            tables.to_vec(),
                            samples,
                            format!("sampler task failed: {err}"),
                        ));
                    }
                }
            }
            samples.extend(chunk_samples.into_iter().flatten());
        }

        Ok(samples)
    }

    async fn list_schemas_retry(&self) -> Result<Vec<String>> {
        match self.adapter.list_schemas().await {
            Ok(schemas) => Ok(schemas),
            Err(err) => {
                tracing::warn!(error = %err, "schema listing failed, retrying once");
                self.adapter.list_schemas().await
            }
        }
    }

    async fn list_tables_retry(&self, schema: &str) -> Result<Vec<Table>> {
        match self.adapter.list_tables(schema).await {
            Ok(tables) => Ok(tables),
            Err(err) => {
                tracing::warn!(schema, error = %err, "table listing failed, retrying once");
                self.adapter.list_tables(schema).await
            }
        }
    }

    async fn list_indexes_retry(&self, schema: &str) -> Result<Vec<Index>> {
        match self.adapter.list_indexes(schema).await {
            Ok(indexes) => Ok(indexes),
            Err(err) => {
                tracing::warn!(schema, error = %err, "index listing failed, retrying once");
                self.adapter.list_indexes(schema).await
            }
        }
    }

    fn abort(
        &self,
        opts: &SnapshotOptions,
        tables: Vec<Table>,
        samples: Vec<SampleResult>,
        reason: impl Into<String>,
    ) -> Error {
        Error::Aborted {
            reason: reason.into(),
            partial: Box::new(self.assemble(opts, tables, samples)),
        }
    }

    fn assemble(
        &self,
        opts: &SnapshotOptions,
        tables: Vec<Table>,
        samples: Vec<SampleResult>,
    ) -> Snapshot {
        Snapshot {
            format_version: FORMAT_VERSION.to_string(),
            label: opts
                .label
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            snapshot_id: Uuid::new_v4(),
            created_at: Utc::now(),
            backend: self.adapter.backend(),
            tables,
            samples,
        }
    }
}

fn truncate_view_definition(table: &mut Table, limit: usize) {
    if let Some(definition) = table.view_definition.as_mut() {
        if definition.chars().count() > limit {
            *definition = definition.chars().take(limit).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use schemadrift_core::TableKind;

    use super::*;

    #[test]
    fn truncates_long_view_definitions_on_char_boundaries() {
        let mut table = Table {
            schema: "main".to_string(),
            name: "v".to_string(),
            kind: TableKind::View,
            view_definition: Some("é".repeat(600)),
            columns: Vec::new(),
            indexes: Vec::new(),
        };
        truncate_view_definition(&mut table, 500);
        assert_eq!(table.view_definition.as_ref().map(|d| d.chars().count()), Some(500));
    }

    #[test]
    fn leaves_short_view_definitions_alone() {
        let mut table = Table {
            schema: "main".to_string(),
            name: "v".to_string(),
            kind: TableKind::View,
            view_definition: Some("select 1".to_string()),
            columns: Vec::new(),
            indexes: Vec::new(),
        };
        truncate_view_definition(&mut table, 500);
        assert_eq!(table.view_definition.as_deref(), Some("select 1"));
    }
}
