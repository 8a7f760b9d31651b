//! Positional column mapping for the evacuation-space CSV schema
//!
//! The upstream document has no stable header names we rely on, so fields are
//! located by index. The map is plain configuration: a schema shift is fixed
//! by editing the `[columns]` table of the config file.

use crate::constants::columns;
use crate::{LoaderError, Result};
use serde::{Deserialize, Serialize};

/// 0-based index of every extracted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: usize,
    pub name_kana: usize,
    pub address: usize,
    pub latitude: usize,
    pub longitude: usize,
    pub telephone: usize,
    pub url: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: columns::NAME,
            name_kana: columns::NAME_KANA,
            address: columns::ADDRESS,
            latitude: columns::LATITUDE,
            longitude: columns::LONGITUDE,
            telephone: columns::TELEPHONE,
            url: columns::URL,
        }
    }
}

impl ColumnMap {
    /// Field name and index pairs, in extraction order
    pub fn entries(&self) -> [(&'static str, usize); 7] {
        [
            ("name", self.name),
            ("name_kana", self.name_kana),
            ("address", self.address),
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("telephone", self.telephone),
            ("url", self.url),
        ]
    }

    /// Smallest row length that can satisfy every index
    pub fn min_columns(&self) -> usize {
        self.entries()
            .iter()
            .map(|(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Reject maps where the coordinates would be read from the same cell
    pub fn validate(&self) -> Result<()> {
        if self.latitude == self.longitude {
            return Err(LoaderError::configuration(format!(
                "latitude and longitude cannot share column {}",
                self.latitude
            )));
        }
        Ok(())
    }
}
