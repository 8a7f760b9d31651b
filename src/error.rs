//! Error handling for shelter loading operations.
//!
//! Three layers of errors exist. [`LoaderError`] covers the fatal conditions
//! that abort a run before any row is processed. [`ValidationError`] and
//! [`StoreError`] are per-row failures: they are counted and reported, never
//! propagated out of the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read CSV file {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV file has no data rows: {path}")]
    NoDataRows { path: PathBuf },

    #[error("Failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to connect to database at {host}:{port}: {source}")]
    DatabaseConnect {
        host: String,
        port: u16,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database health check failed: {0}")]
    DatabaseHealthCheck(#[source] sqlx::Error),

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

impl LoaderError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for LoaderError {
    fn from(error: figment::Error) -> Self {
        Self::Configuration {
            message: error.to_string(),
        }
    }
}

/// A row that could not be turned into a shelter record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("line {line}: row has {found} columns, at least {expected} required")]
    MissingColumns {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: field {field} is not valid UTF-8")]
    InvalidEncoding { line: u64, field: usize },

    #[error("line {line}: invalid latitude '{value}' for '{name}'")]
    InvalidLatitude {
        line: u64,
        name: String,
        value: String,
    },

    #[error("line {line}: invalid longitude '{value}' for '{name}'")]
    InvalidLongitude {
        line: u64,
        name: String,
        value: String,
    },
}

/// An insert that did not succeed
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("insert timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("insert rejected: {reason}")]
    Rejected { reason: String },
}

impl StoreError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoaderError>;
