//! Transaction coordination
//!
//! Every mutating unit of work runs inside a [`Tx`]. A transaction is opened
//! with `BEGIN IMMEDIATE`, which takes SQLite's reserved lock before the first
//! read. Only one writer can hold that lock at a time, so every read made
//! inside a `Tx` is a locked read: concurrent units of work queue behind each
//! other (up to the connection's busy timeout) and each one observes the
//! committed result of the previous. This is the store's pessimistic lock,
//! covering both the pull request row and the candidate pool.
//!
//! Readers outside a transaction are not blocked (the database runs in WAL
//! mode).

use std::future::Future;
use std::pin::Pin;

use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, trace};

use crate::{Error, Result};

/// Boxed future returned by a unit of work closure
pub type TxFuture<'t, T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + Send + 't>>;

/// An open transaction holding the database write lock
///
/// Commit with [`Tx::commit`] or [`Tx::finish`]. A `Tx` dropped without being
/// finished (for example because the caller's future was cancelled) closes
/// its connection, which makes SQLite discard the uncommitted work.
pub struct Tx {
    conn: PoolConnection<Sqlite>,
    finished: bool,
}

impl Tx {
    /// Open a new transaction on a pooled connection
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let mut conn = pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;
        trace!("transaction started");

        Ok(Self {
            conn,
            finished: false,
        })
    }

    /// Connection to run statements on
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<()> {
        sqlx::query("COMMIT").execute(&mut *self.conn).await?;
        self.finished = true;
        trace!("transaction committed");
        Ok(())
    }

    /// Roll the transaction back
    pub async fn rollback(mut self) -> Result<()> {
        sqlx::query("ROLLBACK").execute(&mut *self.conn).await?;
        self.finished = true;
        trace!("transaction rolled back");
        Ok(())
    }

    /// Commit if the unit of work succeeded, roll back otherwise
    ///
    /// The unit of work's error is returned unchanged. A failed rollback is
    /// only logged: the connection is closed instead, which discards the
    /// transaction anyway.
    pub async fn finish<T, E>(self, outcome: std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<Error>,
    {
        match outcome {
            Ok(value) => {
                self.commit().await.map_err(E::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    debug!(error = %rollback_err, "failed to rollback transaction");
                }
                Err(err)
            }
        }
    }

    /// Run a unit of work inside this transaction
    ///
    /// Nothing is begun or committed here: the work joins the enclosing
    /// transaction, and an error it returns rolls back the whole transaction
    /// once it reaches the owner of this `Tx`.
    pub async fn with_tx<T, E, F>(&mut self, work: F) -> std::result::Result<T, E>
    where
        F: for<'t> FnOnce(&'t mut Tx) -> TxFuture<'t, T, E>,
    {
        trace!("joining enclosing transaction");
        work(self).await
    }
}

impl Drop for Tx {
    fn drop(&mut self) {
        if !self.finished {
            debug!("transaction dropped before completion, discarding connection");
            self.conn.close_on_drop();
        }
    }
}

/// Open a transaction, run `work` in it, and commit or roll back
pub(crate) async fn run<T, E, F>(pool: &SqlitePool, work: F) -> std::result::Result<T, E>
where
    E: From<Error>,
    F: for<'t> FnOnce(&'t mut Tx) -> TxFuture<'t, T, E>,
{
    let mut tx = Tx::begin(pool).await.map_err(E::from)?;
    let outcome = work(&mut tx).await;
    tx.finish(outcome).await
}
