//! Core data structures for shelter loading.
//!
//! Defines the validated shelter record, the display identifier handed out
//! to persisted rows, and the per-row and per-run outcome types.

use crate::constants::IDENTIFIER_WIDTH;
use crate::error::{StoreError, ValidationError};
use std::fmt;

/// A validated evacuation shelter row
///
/// Only exists when both coordinates parsed as finite numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterRecord {
    pub name: String,
    pub name_kana: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Kept as-is; empty becomes NULL only when persisted
    pub telephone: String,
    /// Kept as-is; empty becomes NULL only when persisted
    pub url: String,
}

/// Sequential identifier written to the `id` column
///
/// Rendered zero-padded to four digits ("0001"). Values past 9999 keep their
/// natural width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayIdentifier(u32);

impl DisplayIdentifier {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for DisplayIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = IDENTIFIER_WIDTH)
    }
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub success_count: usize,
    pub error_count: usize,
}

impl RunOutcome {
    pub fn total_processed(&self) -> usize {
        self.success_count + self.error_count
    }

    /// Success rate as a percentage of processed rows
    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            (self.success_count as f64 / total as f64) * 100.0
        }
    }
}

/// What happened to a single data row
#[derive(Debug)]
pub enum RowOutcome {
    Persisted {
        line: u64,
        id: DisplayIdentifier,
        name: String,
    },
    ValidationFailed {
        line: u64,
        error: ValidationError,
    },
    /// The identifier was tried but not consumed
    PersistenceFailed {
        line: u64,
        id: DisplayIdentifier,
        name: String,
        error: StoreError,
    },
}
