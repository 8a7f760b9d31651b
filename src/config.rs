//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SHELTER_*` environment variables, then the `DB_*` connection variables
//! (usually provided by a `.env` file). Command-line flags are applied last
//! by the CLI.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DB_ENV_PREFIX, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_CSV_PATH, DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PORT, DEFAULT_DB_USER,
    DEFAULT_ENV_FILE, DEFAULT_INSERT_TIMEOUT_SECS, DEFAULT_SSL_MODE, DEFAULT_TABLE, ENV_PREFIX,
};
use crate::extractor::ColumnMap;
use crate::store::validate_table_name;
use crate::{LoaderError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Connection settings for the destination database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name
    pub name: String,
    /// disable, allow, prefer, require, verify-ca or verify-full
    pub ssl_mode: String,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            name: DEFAULT_DB_NAME.to_string(),
            ssl_mode: DEFAULT_SSL_MODE.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DatabaseConfig {
    /// Overlay the `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and
    /// `DB_NAME` variables found through `lookup`
    ///
    /// Values are taken verbatim, so a numeric password stays a string.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(&format!("{}{}", DB_ENV_PREFIX, name));

        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port.trim().parse().map_err(|_| {
                LoaderError::configuration(format!(
                    "{}PORT is not a port number: '{}'",
                    DB_ENV_PREFIX, port
                ))
            })?;
        }
        if let Some(user) = var("USER") {
            self.user = user;
        }
        if let Some(password) = var("PASSWORD") {
            self.password = password;
        }
        if let Some(name) = var("NAME") {
            self.name = name;
        }
        Ok(())
    }
}

// Keeps the password out of debug logs
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Global configuration for a loader run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// CSV document to load
    pub input_path: PathBuf,

    /// Destination table, optionally schema-qualified
    pub table: String,

    /// Positions of the extracted fields
    pub columns: ColumnMap,

    /// Per-insert timeout in seconds (0 = wait indefinitely)
    pub insert_timeout_secs: u64,

    /// Validate and number rows without touching the database
    pub dry_run: bool,

    pub database: DatabaseConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_CSV_PATH),
            table: DEFAULT_TABLE.to_string(),
            columns: ColumnMap::default(),
            insert_timeout_secs: DEFAULT_INSERT_TIMEOUT_SECS,
            dry_run: false,
            database: DatabaseConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Default config file location (`<config dir>/shelter-loader/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the layered configuration
    ///
    /// A missing `config_file` is not an error for the default location,
    /// but an explicitly named file must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(LoaderError::configuration(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                info!("Using config file: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_config_path().filter(|p| p.exists()) {
                    info!("Using config file: {}", path.display());
                    figment = figment.merge(Toml::file(path));
                } else {
                    debug!("No config file found, using defaults and environment variables");
                }
            }
        }

        let mut config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.database.apply_env(|key| std::env::var(key).ok())?;

        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_insert_timeout_secs(mut self, secs: u64) -> Self {
        self.insert_timeout_secs = secs;
        self
    }

    pub fn with_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.table)?;
        self.columns.validate()?;

        if !self.dry_run && self.database.host.is_empty() {
            return Err(LoaderError::configuration(
                "database host is empty; set DB_HOST or [database].host",
            ));
        }

        Ok(())
    }
}

/// Load a dotenv file into the process environment
///
/// With no explicit path, `.env` in the working directory is read when
/// present. An explicit path must exist. Variables already set win.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => dotenvy::from_path(path)
            .map(|_| Some(path.to_path_buf()))
            .map_err(|source| LoaderError::EnvFile {
                path: path.to_path_buf(),
                source,
            }),
        None => match dotenvy::dotenv() {
            Ok(found) => Ok(Some(found)),
            Err(e) if e.not_found() => {
                debug!("No {} file found", DEFAULT_ENV_FILE);
                Ok(None)
            }
            Err(source) => Err(LoaderError::EnvFile {
                path: PathBuf::from(DEFAULT_ENV_FILE),
                source,
            }),
        },
    }
}
