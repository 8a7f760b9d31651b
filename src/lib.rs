//! Shelter Loader Library
//!
//! Loads evacuation-shelter open data from a fixed-schema CSV file into a
//! relational table, one row at a time, and reports how many rows made it.
//!
//! This library provides tools for:
//! - Extracting shelter records by column position and validating coordinates
//! - Assigning sequential display identifiers ("0001", "0002", ...) to persisted rows
//! - Inserting rows with NULL-aware contact fields into PostgreSQL
//! - Isolating per-row failures so one bad row never aborts the batch
//! - Layered configuration from defaults, TOML, and environment variables

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use config::{DatabaseConfig, LoaderConfig};
pub use error::{LoaderError, Result, StoreError, ValidationError};
pub use extractor::{ColumnMap, RowExtractor};
pub use loader::Loader;
pub use models::{DisplayIdentifier, RowOutcome, RunOutcome, ShelterRecord};
pub use store::{MemoryStore, PgShelterStore, PlaceRow, ShelterStore};
