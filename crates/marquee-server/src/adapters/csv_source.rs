//! CSV implementation of CatalogSource
//!
//! Expected headers: `id` (optional), `title`, `genre` or `genres`,
//! `summary`, `cast`. Multi-valued columns stay comma-joined here;
//! splitting happens during normalization.

use async_trait::async_trait;
use std::io::Read;
use std::path::PathBuf;

use marquee::{CatalogSource, DomainError, RawRecord, SourceRow};

/// Reads catalog rows from a CSV file on disk
pub struct CsvCatalogSource {
    path: PathBuf,
}

impl CsvCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Decode every row from `reader`.
///
/// Header problems abort the whole read; a malformed row only yields an
/// error entry for that row.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<SourceRow>, DomainError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DomainError::SourceRead(format!("Failed to read CSV headers: {}", e)))?
        .clone();

    if !headers.iter().any(|h| h == "title") {
        return Err(DomainError::SourceRead(
            "CSV source has no title column".to_string(),
        ));
    }

    Ok(csv_reader
        .deserialize::<RawRecord>()
        .enumerate()
        .map(|(index, row)| {
            // +2: one for the header line, one for 1-based numbering
            row.map_err(|e| DomainError::Validation(format!("row {}: {}", index + 2, e)))
        })
        .collect())
}

#[async_trait]
impl CatalogSource for CsvCatalogSource {
    async fn read_records(&self) -> Result<Vec<SourceRow>, DomainError> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let file = std::fs::File::open(&path).map_err(|e| {
                DomainError::SourceRead(format!("Failed to open {}: {}", path.display(), e))
            })?;
            parse_records(file)
        })
        .await
        .map_err(|e| DomainError::SourceRead(format!("CSV reader task failed: {}", e)))?
    }
}
