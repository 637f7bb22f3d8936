//! Database layer for Rota
//!
//! Provides persistence for teams, users, pull requests and reviewer
//! assignments, and the transaction coordinator the assignment engine runs
//! its units of work in.

pub mod connection;
pub mod error;
pub mod models;
pub mod repos;
pub mod tx;

use std::path::Path;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

pub use connection::DatabaseConfig;
pub use error::{Error, Result};
pub use models::{Member, PrStatus, PullRequest, PullRequestShort, Team, User};
pub use repos::{PullRequestRepository, TeamRepository, UserRepository};
pub use tx::{Tx, TxFuture};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database with the given configuration and run migrations
    pub async fn connect(config: DatabaseConfig) -> Result<Self> {
        // Create parent directory if needed
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("Failed to create database directory: {}", e)))?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;

        info!(path = %config.path.display(), "Database ready");
        Ok(Self { pool })
    }

    /// Create a new database connection from a file path
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Self::connect(DatabaseConfig::new(db_path.as_ref())).await
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the teams repository
    pub fn teams(&self) -> TeamRepository<'_> {
        TeamRepository::new(&self.pool)
    }

    /// Get the users repository
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }

    /// Get the pull requests repository
    pub fn pull_requests(&self) -> PullRequestRepository<'_> {
        PullRequestRepository::new(&self.pool)
    }

    /// Open a transaction
    pub async fn begin(&self) -> Result<Tx> {
        Tx::begin(&self.pool).await
    }

    /// Run a unit of work in a new transaction
    ///
    /// The transaction commits if `work` returns `Ok` and rolls back
    /// otherwise; the error is handed back unchanged.
    pub async fn with_tx<T, E, F>(&self, work: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: for<'t> FnOnce(&'t mut Tx) -> TxFuture<'t, T, E>,
    {
        tx::run(&self.pool, work).await
    }

    /// Close the database connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}
