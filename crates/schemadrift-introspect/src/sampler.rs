use std::sync::Arc;

use schemadrift_core::{Error, Result, SampleResult, TableRef};

use crate::adapter::CatalogAdapter;

/// Bounded per-table sampler with failure isolation.
///
/// A failing count or fetch is recorded in [`SampleResult::error`] and never
/// propagates past this boundary; after such a failure the adapter's session
/// is reset so the next table starts from a clean state. Connection loss is
/// the exception: it is fatal for every remaining table, so it propagates as
/// [`Error::Connection`] and the engine aborts the run.
#[derive(Clone)]
pub struct Sampler {
    adapter: Arc<dyn CatalogAdapter>,
    limit: u32,
}

impl Sampler {
    pub fn new(adapter: Arc<dyn CatalogAdapter>, limit: u32) -> Self {
        Self { adapter, limit }
    }

    pub async fn sample(&self, table: &TableRef) -> Result<SampleResult> {
        let row_count = match self.adapter.row_count(table).await {
            Ok(count) => Some(count),
            Err(err @ Error::Connection(_)) => return Err(err),
            Err(err) => {
                tracing::warn!(table = %table, error = %err, "row count failed");
                self.recover(table).await;
                return Ok(SampleResult::failed(table.clone(), err.to_string()));
            }
        };

        let mut rows = Vec::new();
        let mut error = None;
        if self.limit > 0 {
            match self.adapter.fetch_rows(table, self.limit).await {
                Ok(fetched) => rows = fetched,
                Err(err @ Error::Connection(_)) => return Err(err),
                Err(err) => {
                    tracing::warn!(table = %table, error = %err, "row sampling failed");
                    self.recover(table).await;
                    error = Some(err.to_string());
                }
            }
        }

        Ok(SampleResult {
            table: table.clone(),
            row_count,
            rows,
            error,
        })
    }

    async fn recover(&self, table: &TableRef) {
        if let Err(err) = self.adapter.reset_session().await {
            tracing::warn!(table = %table, error = %err, "session reset failed");
        }
    }
}
