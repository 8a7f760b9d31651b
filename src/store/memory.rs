//! In-process store used for dry runs
//!
//! Behaves like the destination table with `id` as primary key: a second row
//! with an existing id is rejected.

use super::{PlaceRow, ShelterStore};
use crate::error::StoreError;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<PlaceRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[PlaceRow] {
        &self.rows
    }
}

#[async_trait]
impl ShelterStore for MemoryStore {
    async fn insert(&mut self, row: &PlaceRow) -> Result<(), StoreError> {
        if self.rows.iter().any(|existing| existing.id == row.id) {
            return Err(StoreError::rejected(format!(
                "duplicate key value violates unique constraint: id={}",
                row.id
            )));
        }
        self.rows.push(row.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store (dry run)".to_string()
    }
}
