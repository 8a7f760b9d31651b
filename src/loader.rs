//! Identifier assignment, persistence, and outcome tallying
//!
//! The loader owns the only cross-row state of a run: the success/error
//! counters and the next display identifier. The identifier advances only
//! after the store confirms an insert, so identifiers count persisted rows,
//! not input rows. A row that fails validation or persistence consumes
//! nothing, and the next row reuses the identifier a failed insert tried.

use crate::constants::FIRST_IDENTIFIER;
use crate::error::ValidationError;
use crate::models::{DisplayIdentifier, RowOutcome, RunOutcome, ShelterRecord};
use crate::store::{PlaceRow, ShelterStore};
use tracing::debug;

pub struct Loader<S: ShelterStore> {
    store: S,
    next_identifier: DisplayIdentifier,
    outcome: RunOutcome,
}

impl<S: ShelterStore> Loader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            next_identifier: DisplayIdentifier::new(FIRST_IDENTIFIER),
            outcome: RunOutcome::default(),
        }
    }

    /// Process one data row in document order
    ///
    /// Every row, good or bad, changes exactly one counter. Failures are only
    /// logged at debug level; the returned outcome is what gets reported.
    pub async fn process(
        &mut self,
        extracted: Result<ShelterRecord, ValidationError>,
        line: u64,
    ) -> RowOutcome {
        let record = match extracted {
            Ok(record) => record,
            Err(error) => {
                self.outcome.error_count += 1;
                debug!("Skipping row: {}", error);
                return RowOutcome::ValidationFailed { line, error };
            }
        };

        let id = self.next_identifier;
        let row = PlaceRow::from_record(id, &record);

        match self.store.insert(&row).await {
            Ok(()) => {
                self.outcome.success_count += 1;
                self.next_identifier = id.next();
                debug!("line {}: persisted '{}' as {}", line, record.name, id);
                RowOutcome::Persisted {
                    line,
                    id,
                    name: record.name,
                }
            }
            Err(error) => {
                self.outcome.error_count += 1;
                debug!(
                    "line {}: insert of '{}' as {} failed: {}",
                    line, record.name, id, error
                );
                RowOutcome::PersistenceFailed {
                    line,
                    id,
                    name: record.name,
                    error,
                }
            }
        }
    }

    /// End the run, handing back the store and the final counters
    pub fn finish(self) -> (S, RunOutcome) {
        (self.store, self.outcome)
    }
}
