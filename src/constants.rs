//! Application constants for the shelter loader
//!
//! Default column positions, table layout, and connection settings used
//! throughout the loader. Everything here can be overridden through
//! [`crate::config::LoaderConfig`].

// =============================================================================
// Input Document
// =============================================================================

/// Default CSV file name, as published by the municipal open-data portal
pub const DEFAULT_CSV_PATH: &str = "172014_evacuation_space.csv";

/// Number of leading records skipped by position (the header row)
pub const HEADER_ROWS: usize = 1;

/// Default 0-based column positions in the evacuation-space CSV schema
pub mod columns {
    /// 名称
    pub const NAME: usize = 3;
    /// 名称_カナ
    pub const NAME_KANA: usize = 4;
    /// 所在地_連結表記
    pub const ADDRESS: usize = 8;
    /// 緯度
    pub const LATITUDE: usize = 14;
    /// 経度
    pub const LONGITUDE: usize = 15;
    /// 電話番号
    pub const TELEPHONE: usize = 17;
    /// URL
    pub const URL: usize = 33;
}

// =============================================================================
// Persistence
// =============================================================================

/// Default destination table
pub const DEFAULT_TABLE: &str = "place";

/// Destination columns in bind order
pub const PLACE_COLUMNS: [&str; 8] = [
    "id",
    "name",
    "name_kana",
    "address",
    "lat",
    "lon",
    "url",
    "tel",
];

/// First display identifier handed out in every run
pub const FIRST_IDENTIFIER: u32 = 1;

/// Minimum width of the zero-padded display identifier
pub const IDENTIFIER_WIDTH: usize = 4;

/// Default per-insert timeout in seconds (0 disables the timeout)
pub const DEFAULT_INSERT_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Database Connection
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_DB_USER: &str = "postgres";

/// Matches the `sslmode=require` of the hosted database the data is loaded into
pub const DEFAULT_SSL_MODE: &str = "require";

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Configuration Sources
// =============================================================================

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "shelter-loader";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix for loader settings in the environment (`SHELTER_TABLE`, `SHELTER_COLUMNS__URL`, ...)
pub const ENV_PREFIX: &str = "SHELTER_";

/// Prefix of the connection variables read from `.env` (`DB_HOST`, `DB_PORT`, ...)
pub const DB_ENV_PREFIX: &str = "DB_";

/// Default dotenv file
pub const DEFAULT_ENV_FILE: &str = ".env";
