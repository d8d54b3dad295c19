//! Ingest Application Service (Use Case)
//!
//! Loads the bulk source into the catalog in bounded atomic batches.

use std::sync::Arc;

use marquee::{CatalogRepository, CatalogSource, DomainError, ItemAttributes, WriteBatch, MAX_BATCH_WRITES};

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Documents written by committed batches
    pub written: usize,
    /// Rows refused by validation
    pub rejected: usize,
    /// Batches whose commit failed
    pub failed_batches: usize,
}

/// Application service for catalog import
pub struct IngestService<R: CatalogRepository + ?Sized> {
    repo: Arc<R>,
    source: Arc<dyn CatalogSource>,
    batch_size: usize,
}

impl<R: CatalogRepository + ?Sized> IngestService<R> {
    pub fn new(repo: Arc<R>, source: Arc<dyn CatalogSource>, batch_size: usize) -> Self {
        Self {
            repo,
            source,
            batch_size: batch_size.clamp(1, MAX_BATCH_WRITES),
        }
    }

    /// Import every valid row from the source.
    ///
    /// Batches are committed one after another. A failed batch is skipped and
    /// the run carries on; batches committed before it stay written.
    pub async fn ingest(&self) -> Result<IngestReport, DomainError> {
        let rows = self.source.read_records().await?;
        let mut report = IngestReport::default();

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            match row.and_then(ItemAttributes::try_from) {
                Ok(attributes) => items.push(attributes),
                Err(e) => {
                    tracing::warn!("Rejected source row: {}", e);
                    report.rejected += 1;
                }
            }
        }

        let total_batches = items.len().div_ceil(self.batch_size);
        let mut last_error = None;

        for (index, chunk) in items.chunks(self.batch_size).enumerate() {
            let mut batch = WriteBatch::new();
            for attributes in chunk {
                batch.upsert(attributes.clone())?;
            }

            match self.repo.commit(&batch).await {
                Ok(written) => {
                    report.written += written;
                    tracing::info!(
                        "Written {} items of {} (batch {}/{})",
                        written,
                        report.written,
                        index + 1,
                        total_batches
                    );
                }
                Err(e) => {
                    let first = batch.ids().next().unwrap_or_default();
                    tracing::error!(
                        "Batch {}/{} failed (first id {}): {}",
                        index + 1,
                        total_batches,
                        first,
                        e
                    );
                    report.failed_batches += 1;
                    last_error = Some(e);
                }
            }
        }

        // Nothing landed at all: surface the store failure to the caller
        if report.written == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        tracing::info!(
            "Imported {} items ({} rejected, {} failed batches)",
            report.written,
            report.rejected,
            report.failed_batches
        );

        Ok(report)
    }
}
