use std::time::Duration;

use sqlx::migrate::MigrateDatabase;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Error, Sqlite, Transaction};

use crate::error::StartupError;

pub mod group;
pub mod membership;
pub mod user;

/// Handle on the relational store, handed to every request through `web::Data`.
///
/// Mutating requests run inside one transaction from [`Store::begin`]; dropping the
/// transaction without committing rolls every change back.
#[derive(Clone, Debug)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating it if needed) the database at `url` and bring its schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StartupError> {
        if !Sqlite::database_exists(url).await? {
            Sqlite::create_database(url).await?;
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Self::migrated(pool).await
    }

    /// Private in-memory database. A single connection that never expires keeps the data
    /// alive for as long as the store is.
    pub async fn in_memory() -> Result<Self, StartupError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> Result<Self, StartupError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, Error> {
        self.pool.begin().await
    }

    /// Connection for read-only requests.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, Error> {
        self.pool.acquire().await
    }
}
