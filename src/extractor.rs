//! Row extraction and validation
//!
//! Turns one raw CSV record into a [`ShelterRecord`], or into a
//! [`ValidationError`] describing why it cannot be loaded. Failures are
//! values the caller inspects; nothing here panics on malformed input.
//!
//! - [`column_map`] - positional layout of the upstream schema
//! - [`field_parsers`] - cell access and coordinate parsing

pub mod column_map;
pub mod field_parsers;

pub use column_map::ColumnMap;

use crate::error::ValidationError;
use crate::models::ShelterRecord;
use csv::{ByteRecord, StringRecord};
use field_parsers::{get_field, get_text, parse_coordinate};
use tracing::trace;

/// Extracts shelter records from raw rows using a [`ColumnMap`]
#[derive(Debug, Clone)]
pub struct RowExtractor {
    columns: ColumnMap,
    min_columns: usize,
}

impl RowExtractor {
    pub fn new(columns: ColumnMap) -> Self {
        let min_columns = columns.min_columns();
        Self {
            columns,
            min_columns,
        }
    }

    pub fn min_columns(&self) -> usize {
        self.min_columns
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Decode a raw row and extract it
    ///
    /// A row that is not valid UTF-8 fails on its own with
    /// [`ValidationError::InvalidEncoding`]; it never affects other rows.
    pub fn extract_raw(
        &self,
        row: &ByteRecord,
        line: u64,
    ) -> std::result::Result<ShelterRecord, ValidationError> {
        let decoded = StringRecord::from_byte_record(row.clone()).map_err(|e| {
            ValidationError::InvalidEncoding {
                line,
                field: e.utf8_error().field(),
            }
        })?;
        self.extract(&decoded, line)
    }

    /// Extract and validate one data row
    ///
    /// `line` is the 1-based source line, used only for diagnostics. The
    /// header row must already have been filtered out by the caller.
    /// Latitude is checked before longitude; a bad latitude means longitude
    /// is never inspected.
    pub fn extract(
        &self,
        row: &StringRecord,
        line: u64,
    ) -> std::result::Result<ShelterRecord, ValidationError> {
        if row.len() < self.min_columns {
            return Err(ValidationError::MissingColumns {
                line,
                expected: self.min_columns,
                found: row.len(),
            });
        }

        let name = get_text(row, self.columns.name);

        let latitude_text = get_field(row, self.columns.latitude).unwrap_or_default();
        let latitude =
            parse_coordinate(latitude_text).ok_or_else(|| ValidationError::InvalidLatitude {
                line,
                name: name.clone(),
                value: latitude_text.to_string(),
            })?;

        let longitude_text = get_field(row, self.columns.longitude).unwrap_or_default();
        let longitude =
            parse_coordinate(longitude_text).ok_or_else(|| ValidationError::InvalidLongitude {
                line,
                name: name.clone(),
                value: longitude_text.to_string(),
            })?;

        trace!(line, %name, latitude, longitude, "row extracted");

        Ok(ShelterRecord {
            name,
            name_kana: get_text(row, self.columns.name_kana),
            address: get_text(row, self.columns.address),
            latitude,
            longitude,
            telephone: get_text(row, self.columns.telephone),
            url: get_text(row, self.columns.url),
        })
    }
}

impl Default for RowExtractor {
    fn default() -> Self {
        Self::new(ColumnMap::default())
    }
}
