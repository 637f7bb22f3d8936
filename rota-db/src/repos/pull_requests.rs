//! Pull request repository: pull request rows and reviewer assignments

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{PrStatus, PullRequest, PullRequestRow};
use crate::tx::Tx;

const SELECT_PULL_REQUEST: &str =
    "SELECT id, name, author_id, status, created_at, merged_at FROM pull_requests WHERE id = ?";

/// Repository for pull requests and their assignments
pub struct PullRequestRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PullRequestRepository<'a> {
    /// Create a new pull request repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an open pull request and return its creation time
    pub async fn insert(
        &self,
        tx: &mut Tx,
        pr_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<DateTime<Utc>> {
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO pull_requests (id, name, author_id, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(pr_id)
        .bind(name)
        .bind(author_id)
        .bind(PrStatus::Open.as_str())
        .bind(created_at)
        .execute(tx.conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::PullRequestExists(pr_id.to_string())
            }
            e => e.into(),
        })?;

        Ok(created_at)
    }

    /// Assign reviewers to a pull request
    pub async fn insert_assignments(
        &self,
        tx: &mut Tx,
        pr_id: &str,
        reviewers: &[String],
    ) -> Result<()> {
        if reviewers.is_empty() {
            return Ok(());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO assigned_reviewers (pr_id, user_id) ");
        query.push_values(reviewers, |mut row, reviewer| {
            row.push_bind(pr_id.to_string()).push_bind(reviewer.clone());
        });
        query.build().execute(tx.conn()).await?;

        debug!(pr_id, ?reviewers, "reviewers assigned");
        Ok(())
    }

    /// Mark a pull request merged
    ///
    /// The merge time is only written the first time; merging again returns
    /// the stored pull request unchanged.
    pub async fn mark_merged(&self, tx: &mut Tx, pr_id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            UPDATE pull_requests
            SET status = ?, merged_at = COALESCE(merged_at, ?)
            WHERE id = ?
            RETURNING id, name, author_id, status, created_at, merged_at
            "#,
        )
        .bind(PrStatus::Merged.as_str())
        .bind(Utc::now())
        .bind(pr_id)
        .fetch_optional(tx.conn())
        .await?
        .ok_or_else(|| Error::PullRequestNotFound(pr_id.to_string()))?;

        let reviewers = reviewers_of(tx.conn(), pr_id).await?;
        row.with_reviewers(reviewers)
    }

    /// Load a pull request for update
    ///
    /// Must run inside a transaction: the row, its reviewers and the
    /// candidate pool stay locked until the transaction ends.
    pub async fn lock_and_get(&self, tx: &mut Tx, pr_id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(SELECT_PULL_REQUEST)
            .bind(pr_id)
            .fetch_optional(tx.conn())
            .await?
            .ok_or_else(|| Error::PullRequestNotFound(pr_id.to_string()))?;

        let reviewers = reviewers_of(tx.conn(), pr_id).await?;
        row.with_reviewers(reviewers)
    }

    /// Replace one reviewer with another, returning the number of rows changed
    pub async fn replace_assignment(
        &self,
        tx: &mut Tx,
        pr_id: &str,
        old_reviewer_id: &str,
        new_reviewer_id: &str,
    ) -> Result<u64> {
        let result =
            sqlx::query("UPDATE assigned_reviewers SET user_id = ? WHERE pr_id = ? AND user_id = ?")
                .bind(new_reviewer_id)
                .bind(pr_id)
                .bind(old_reviewer_id)
                .execute(tx.conn())
                .await?;

        Ok(result.rows_affected())
    }

    /// Current reviewers of a pull request inside a transaction
    pub async fn reviewers(&self, tx: &mut Tx, pr_id: &str) -> Result<Vec<String>> {
        reviewers_of(tx.conn(), pr_id).await
    }

    /// Get a pull request without locking it
    pub async fn get(&self, pr_id: &str) -> Result<PullRequest> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, PullRequestRow>(SELECT_PULL_REQUEST)
            .bind(pr_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| Error::PullRequestNotFound(pr_id.to_string()))?;

        let reviewers = reviewers_of(&mut conn, pr_id).await?;
        row.with_reviewers(reviewers)
    }
}

async fn reviewers_of(conn: &mut SqliteConnection, pr_id: &str) -> Result<Vec<String>> {
    let reviewers = sqlx::query_scalar(
        "SELECT user_id FROM assigned_reviewers WHERE pr_id = ? ORDER BY user_id",
    )
    .bind(pr_id)
    .fetch_all(conn)
    .await?;

    Ok(reviewers)
}
