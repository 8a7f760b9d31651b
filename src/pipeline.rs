//! End-to-end load of one CSV document
//!
//! Reads the document, drops the header by position, and feeds every data
//! row through the extractor and the loader strictly in document order.
//! Rows are kept as raw bytes so that a badly encoded row fails on its own.
//! Fatal conditions (unreadable input, no data rows) are returned before any
//! row reaches the store; everything after that is counted, never raised.

use crate::config::LoaderConfig;
use crate::constants::HEADER_ROWS;
use crate::extractor::RowExtractor;
use crate::loader::Loader;
use crate::models::RunOutcome;
use crate::report::Reporter;
use crate::store::ShelterStore;
use crate::{LoaderError, Result};
use csv::ByteRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A data row with the 1-based line it starts on
#[derive(Debug, Clone)]
pub struct DataRow {
    pub line: u64,
    pub record: ByteRecord,
}

/// All data rows of a document, header excluded
#[derive(Debug)]
pub struct ShelterDocument {
    pub path: PathBuf,
    pub total_records: usize,
    pub rows: Vec<DataRow>,
}

impl ShelterDocument {
    /// Read the whole document
    ///
    /// Rows may have any number of cells and any encoding; short or non-UTF-8
    /// rows are rejected later, one at a time, by the extractor. Only I/O
    /// failures while reading are fatal.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoaderError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let csv_error = |source: csv::Error| LoaderError::CsvRead {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;

        let mut total_records = 0;
        let mut rows = Vec::new();
        for (index, result) in reader.byte_records().enumerate() {
            let record = result.map_err(csv_error)?;
            total_records += 1;
            if index < HEADER_ROWS {
                continue;
            }

            // The reader stamps a position on every record it yields
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            rows.push(DataRow { line, record });
        }

        info!(
            "Read {} records from {} ({} data rows)",
            total_records,
            path.display(),
            rows.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            total_records,
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load every data row of `config.input_path` into `store`
///
/// Returns the store together with the final counters.
pub async fn run<S: ShelterStore>(
    config: &LoaderConfig,
    store: S,
    reporter: &mut Reporter,
) -> Result<(S, RunOutcome)> {
    let document = ShelterDocument::read(&config.input_path)?;
    reporter.note(&format!(
        "Read CSV file {} ({} lines)",
        document.path.display(),
        document.total_records
    ));

    if document.is_empty() {
        return Err(LoaderError::NoDataRows {
            path: document.path,
        });
    }

    let extractor = RowExtractor::new(config.columns.clone());
    debug!(
        "Extracting with {:?} (rows need {} columns)",
        extractor.columns(),
        extractor.min_columns()
    );

    reporter.start(document.rows.len(), &store.describe());
    let (store, outcome) = load_rows(&document.rows, &extractor, Loader::new(store), reporter).await;
    reporter.finish(&outcome);

    info!(
        "Load complete: {} succeeded, {} failed, {} total",
        outcome.success_count,
        outcome.error_count,
        outcome.total_processed()
    );

    Ok((store, outcome))
}

/// Push rows through extraction and the loader, one at a time
pub async fn load_rows<S: ShelterStore>(
    rows: &[DataRow],
    extractor: &RowExtractor,
    mut loader: Loader<S>,
    reporter: &Reporter,
) -> (S, RunOutcome) {
    for row in rows {
        let extracted = extractor.extract_raw(&row.record, row.line);
        let outcome = loader.process(extracted, row.line).await;
        reporter.row(&outcome);
    }
    loader.finish()
}
