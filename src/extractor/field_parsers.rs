//! Field access and coordinate parsing for raw CSV rows

use csv::StringRecord;

/// Cell at `index`, as written in the source
pub fn get_field(record: &StringRecord, index: usize) -> Option<&str> {
    record.get(index)
}

/// Cell at `index` as an owned string, empty when the cell is absent
pub fn get_text(record: &StringRecord, index: usize) -> String {
    get_field(record, index).unwrap_or_default().to_string()
}

/// Parse a coordinate cell as a finite decimal number
///
/// Parsing is locale independent and the cell is not trimmed. Empty text,
/// non-numeric text, repeated decimal points, and `inf`/`NaN` are rejected.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}
