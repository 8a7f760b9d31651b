//! Persistence of shelter records
//!
//! [`ShelterStore`] is the seam between the loader and the database. Each
//! call inserts exactly one row as its own unit of work; there is no
//! transaction spanning rows.
//!
//! - [`postgres`] - sqlx-backed PostgreSQL store
//! - [`memory`] - in-process store used for dry runs

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgShelterStore;

use crate::constants::PLACE_COLUMNS;
use crate::error::StoreError;
use crate::models::{DisplayIdentifier, ShelterRecord};
use crate::{LoaderError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

static TABLE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("table name pattern is valid")
});

/// Destination for validated shelter records
#[async_trait]
pub trait ShelterStore: Send {
    /// Insert one row. An error leaves the store unchanged.
    async fn insert(&mut self, row: &PlaceRow) -> std::result::Result<(), StoreError>;

    /// Short human-readable description of the destination
    fn describe(&self) -> String;
}

/// One row of the destination table, in column order
///
/// `url` and `tel` are NULL when the source cell was empty. Every other text
/// column keeps empty strings as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRow {
    pub id: String,
    pub name: String,
    pub name_kana: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub url: Option<String>,
    pub tel: Option<String>,
}

impl PlaceRow {
    pub fn from_record(id: DisplayIdentifier, record: &ShelterRecord) -> Self {
        Self {
            id: id.to_string(),
            name: record.name.clone(),
            name_kana: record.name_kana.clone(),
            address: record.address.clone(),
            lat: record.latitude,
            lon: record.longitude,
            url: null_if_empty(&record.url),
            tel: null_if_empty(&record.telephone),
        }
    }
}

/// `NULLIF(value, '')`
pub fn null_if_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check that `table` is a plain or schema-qualified SQL identifier
///
/// The table name is interpolated into the statement text, so anything else
/// is refused.
pub fn validate_table_name(table: &str) -> Result<()> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(LoaderError::configuration(format!(
            "invalid table name '{}': expected an identifier such as 'place' or 'public.place'",
            table
        )))
    }
}

/// Parameterised insert for `table`, binding columns `$1..$8` in [`PLACE_COLUMNS`] order
pub fn insert_statement(table: &str) -> String {
    let placeholders = (1..=PLACE_COLUMNS.len())
        .map(|n| format!("${}", n))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        PLACE_COLUMNS.join(", "),
        placeholders
    )
}
