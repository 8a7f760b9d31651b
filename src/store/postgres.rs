//! PostgreSQL store backed by a single-connection sqlx pool

use super::{PlaceRow, ShelterStore, insert_statement};
use crate::config::DatabaseConfig;
use crate::error::{LoaderError, StoreError};
use crate::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Inserts shelter rows into a PostgreSQL table
pub struct PgShelterStore {
    pool: PgPool,
    table: String,
    insert_sql: String,
    insert_timeout: Option<Duration>,
}

impl PgShelterStore {
    /// Connect and verify the connection with `SELECT 1`
    ///
    /// Rows are inserted one at a time, so the pool holds a single
    /// connection. `insert_timeout_secs == 0` disables the per-insert timeout.
    pub async fn connect(
        config: &DatabaseConfig,
        table: &str,
        insert_timeout_secs: u64,
    ) -> Result<Self> {
        let options = build_connect_options(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|source| LoaderError::DatabaseConnect {
                host: config.host.clone(),
                port: config.port,
                source,
            })?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(LoaderError::DatabaseHealthCheck)?;

        info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host, config.port, config.name
        );

        let insert_sql = insert_statement(table);
        debug!("Insert statement: {}", insert_sql);

        Ok(Self {
            pool,
            table: table.to_string(),
            insert_sql,
            insert_timeout: (insert_timeout_secs > 0)
                .then(|| Duration::from_secs(insert_timeout_secs)),
        })
    }

    /// Close the pool, waiting for the connection to shut down
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ShelterStore for PgShelterStore {
    async fn insert(&mut self, row: &PlaceRow) -> std::result::Result<(), StoreError> {
        let query = sqlx::query(&self.insert_sql)
            .bind(row.id.as_str())
            .bind(row.name.as_str())
            .bind(row.name_kana.as_str())
            .bind(row.address.as_str())
            .bind(row.lat)
            .bind(row.lon)
            .bind(row.url.as_deref())
            .bind(row.tel.as_deref());

        let execution = query.execute(&self.pool);
        match self.insert_timeout {
            Some(limit) => {
                tokio::time::timeout(limit, execution)
                    .await
                    .map_err(|_| StoreError::Timeout {
                        secs: limit.as_secs(),
                    })??;
            }
            None => {
                execution.await?;
            }
        }

        Ok(())
    }

    fn describe(&self) -> String {
        format!("PostgreSQL table '{}'", self.table)
    }
}

fn build_connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&config.ssl_mode).map_err(|e| {
        LoaderError::configuration(format!("invalid ssl_mode '{}': {}", config.ssl_mode, e))
    })?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode))
}
