pub mod dto;
pub mod error;
pub mod models;
pub mod repository;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::error::Result;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Schema migrations bundled with this crate
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Shared handle on the Postgres pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect with the default pool size
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn with_max_connections(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by `#[sqlx::test]` fixtures)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }
}
