//! User repository: availability flag and review lists

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{PullRequestShort, PullRequestShortRow, User};

/// Repository for users
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user with its team name
    pub async fn get(&self, user_id: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, t.name AS team_name, u.is_active
            FROM users u
            LEFT JOIN teams t ON t.id = u.team_id
            WHERE u.id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| Error::UserNotFound(user_id.to_string()))
    }

    /// Set a user's active flag
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(user_id.to_string()));
        }

        self.get(user_id).await
    }

    /// List the pull requests a user is currently assigned to review
    pub async fn get_review(&self, user_id: &str) -> Result<Vec<PullRequestShort>> {
        sqlx::query_as::<_, PullRequestShortRow>(
            r#"
            SELECT pr.id, pr.name, pr.author_id, pr.status
            FROM assigned_reviewers ar
            JOIN pull_requests pr ON pr.id = ar.pr_id
            WHERE ar.user_id = ?
            ORDER BY pr.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(PullRequestShort::try_from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrStatus;
    use crate::test_support::{seed_team, test_db};

    #[tokio::test]
    async fn test_set_is_active() {
        let (_dir, db) = test_db().await;
        seed_team(&db, "backend", &["u1", "u2"]).await;

        let user = db.users().set_is_active("u1", false).await.unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.team_name.as_deref(), Some("backend"));
        assert!(!user.is_active);

        let user = db.users().set_is_active("u1", true).await.unwrap();
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_set_is_active_unknown_user() {
        let (_dir, db) = test_db().await;
        let err = db.users().set_is_active("ghost", true).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_get_review() {
        let (_dir, db) = test_db().await;
        seed_team(&db, "backend", &["author", "r1", "r2"]).await;

        let prs = db.pull_requests();
        let mut tx = db.begin().await.unwrap();
        for id in ["pr-2", "pr-1"] {
            prs.insert(&mut tx, id, "Title", "author").await.unwrap();
            prs.insert_assignments(&mut tx, id, &["r1".to_string()])
                .await
                .unwrap();
        }
        prs.insert(&mut tx, "pr-3", "Other", "author").await.unwrap();
        prs.insert_assignments(&mut tx, "pr-3", &["r2".to_string()])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let review = db.users().get_review("r1").await.unwrap();
        let ids: Vec<_> = review.iter().map(|pr| pr.id.as_str()).collect();
        assert_eq!(ids, vec!["pr-1", "pr-2"]);
        assert!(review.iter().all(|pr| pr.status == PrStatus::Open));
        assert!(review.iter().all(|pr| pr.author_id == "author"));

        assert!(db.users().get_review("author").await.unwrap().is_empty());
        assert!(db.users().get_review("ghost").await.unwrap().is_empty());
    }
}
