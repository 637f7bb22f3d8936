//! Team repository: team membership and candidate selection

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Member, Team};
use crate::tx::Tx;

/// Repository for teams and their members
pub struct TeamRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TeamRepository<'a> {
    /// Create a new team repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team and upsert its members
    ///
    /// A member that already exists (in this or another team) is moved into
    /// the new team with the supplied name and active flag.
    pub async fn add(&self, tx: &mut Tx, team: &Team) -> Result<Team> {
        let team_id: i64 = sqlx::query_scalar("INSERT INTO teams (name) VALUES (?) RETURNING id")
            .bind(&team.name)
            .fetch_one(tx.conn())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    Error::TeamExists(team.name.clone())
                }
                e => e.into(),
            })?;

        for member in &team.members {
            sqlx::query(
                r#"
                INSERT INTO users (id, name, is_active, team_id)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (id) DO UPDATE
                SET name = excluded.name,
                    is_active = excluded.is_active,
                    team_id = excluded.team_id
                "#,
            )
            .bind(&member.user_id)
            .bind(&member.username)
            .bind(member.is_active)
            .bind(team_id)
            .execute(tx.conn())
            .await?;
        }

        debug!(team = %team.name, members = team.members.len(), "team stored");
        Ok(team.clone())
    }

    /// Get a team with its members ordered by user id
    ///
    /// A team without members is reported as not found.
    pub async fn get(&self, name: &str) -> Result<Team> {
        let members = sqlx::query_as::<_, (String, String, bool)>(
            r#"
            SELECT u.id, u.name, u.is_active
            FROM teams t
            JOIN users u ON u.team_id = t.id
            WHERE t.name = ?
            ORDER BY u.id
            "#,
        )
        .bind(name)
        .fetch_all(self.pool)
        .await?;

        if members.is_empty() {
            return Err(Error::TeamNotFound(name.to_string()));
        }

        Ok(Team {
            name: name.to_string(),
            members: members
                .into_iter()
                .map(|(user_id, username, is_active)| Member {
                    user_id,
                    username,
                    is_active,
                })
                .collect(),
        })
    }

    /// Resolve the team a user belongs to
    pub async fn team_id_by_user(&self, tx: &mut Tx, user_id: &str) -> Result<i64> {
        let team_id: Option<Option<i64>> =
            sqlx::query_scalar("SELECT team_id FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(tx.conn())
                .await?;

        match team_id {
            None => Err(Error::UserNotFound(user_id.to_string())),
            Some(None) => Err(Error::TeamNotFound(format!("of user {}", user_id))),
            Some(Some(team_id)) => Ok(team_id),
        }
    }

    /// Select up to `limit` active members of a team, skipping `excluded`
    ///
    /// Candidates come back ordered by user id. The rows stay locked until
    /// the enclosing transaction ends, so no other unit of work can select
    /// from this pool in the meantime.
    pub async fn select_active_candidates(
        &self,
        tx: &mut Tx,
        team_id: i64,
        excluded: &[String],
        limit: u32,
    ) -> Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id FROM users WHERE is_active = 1 AND team_id = ");
        query.push_bind(team_id);

        if !excluded.is_empty() {
            query.push(" AND id NOT IN (");
            let mut ids = query.separated(", ");
            for id in excluded {
                ids.push_bind(id.clone());
            }
            ids.push_unseparated(")");
        }

        query.push(" ORDER BY id LIMIT ");
        query.push_bind(i64::from(limit));

        let candidates: Vec<String> = query
            .build_query_scalar()
            .fetch_all(tx.conn())
            .await?;

        debug!(team_id, ?excluded, ?candidates, "selected active candidates");
        Ok(candidates)
    }
}
