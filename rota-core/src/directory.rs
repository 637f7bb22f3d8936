//! Team and user bookkeeping around the assignment engine

use std::time::Instant;

use rota_db::{Database, PullRequestShort, Team, User};
use tracing::{info, instrument};

use crate::{Error, Metrics, Result};

/// Team membership and reviewer availability
#[derive(Clone)]
pub struct Directory {
    db: Database,
    metrics: Option<Metrics>,
}

impl Directory {
    pub fn new(db: Database) -> Self {
        Self { db, metrics: None }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a team and upsert its members in one transaction
    #[instrument(skip(self, team), fields(team = %team.name, members = team.members.len()))]
    pub async fn add_team(&self, team: Team) -> Result<Team> {
        let started = Instant::now();
        let db = self.db.clone();
        let result = self
            .db
            .with_tx(move |tx| {
                Box::pin(async move {
                    let team = db.teams().add(tx, &team).await?;
                    Ok::<_, Error>(team)
                })
            })
            .await;
        self.observe("add_team", started, &result);

        let team = result?;
        info!("team created");
        Ok(team)
    }

    pub async fn get_team(&self, name: &str) -> Result<Team> {
        let started = Instant::now();
        let result = self.db.teams().get(name).await.map_err(Error::from);
        self.observe("get_team", started, &result);
        result
    }

    #[instrument(skip(self))]
    pub async fn set_is_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        let started = Instant::now();
        let result = self
            .db
            .users()
            .set_is_active(user_id, is_active)
            .await
            .map_err(Error::from);
        self.observe("set_is_active", started, &result);

        let user = result?;
        info!("user availability updated");
        Ok(user)
    }

    /// Pull requests the user is currently assigned to review
    pub async fn get_review(&self, user_id: &str) -> Result<Vec<PullRequestShort>> {
        let started = Instant::now();
        let result = self.db.users().get_review(user_id).await.map_err(Error::from);
        self.observe("get_review", started, &result);
        result
    }

    fn observe<T>(&self, operation: &str, started: Instant, result: &Result<T>) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_operation(operation, result, started.elapsed());
        }
    }
}
