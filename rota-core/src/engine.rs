//! Reviewer assignment engine
//!
//! Every mutating operation is a single unit of work. The `*_in` variants take
//! an open [`Tx`] and join it, so several operations can be composed into one
//! transaction; the plain variants open their own.

use std::time::Instant;

use rota_db::{Database, PrStatus, PullRequest, Tx};
use tracing::{error, info, instrument, warn};

use crate::{Error, ErrorKind, Metrics, Result};

/// Number of reviewers requested when a pull request is created
pub const MAX_REVIEWERS: u32 = 2;

/// Outcome of a successful reassignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub pull_request: PullRequest,
    /// The teammate who took over the review
    pub replaced_by: String,
}

/// Selects reviewers and drives pull requests through their lifecycle
#[derive(Clone)]
pub struct AssignmentEngine {
    db: Database,
    metrics: Option<Metrics>,
}

impl AssignmentEngine {
    pub fn new(db: Database) -> Self {
        Self { db, metrics: None }
    }

    /// Record every top-level operation in `metrics`
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Create a pull request and assign up to two active teammates of the author
    ///
    /// Having fewer than two teammates available is not an error; the pull
    /// request is created with whoever could be found.
    #[instrument(skip(self, name))]
    pub async fn create_pull_request(
        &self,
        pr_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let started = Instant::now();
        let engine = self.clone();
        let (pr_id, name, author_id) = (
            pr_id.to_string(),
            name.to_string(),
            author_id.to_string(),
        );

        let result = self
            .db
            .with_tx(move |tx| {
                Box::pin(async move {
                    engine
                        .create_pull_request_in(tx, &pr_id, &name, &author_id)
                        .await
                })
            })
            .await;

        match &result {
            Ok(pr) => info!(reviewers = ?pr.assigned_reviewers, "pull request created"),
            Err(e) => log_failure(e),
        }
        self.observe("create_pull_request", started, &result);
        result
    }

    /// [`create_pull_request`](Self::create_pull_request) inside an open transaction
    pub async fn create_pull_request_in(
        &self,
        tx: &mut Tx,
        pr_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let teams = self.db.teams();
        let prs = self.db.pull_requests();

        let team_id = teams.team_id_by_user(tx, author_id).await?;
        let reviewers = teams
            .select_active_candidates(tx, team_id, &[author_id.to_string()], MAX_REVIEWERS)
            .await?;

        let created_at = prs.insert(tx, pr_id, name, author_id).await?;
        prs.insert_assignments(tx, pr_id, &reviewers).await?;

        Ok(PullRequest {
            id: pr_id.to_string(),
            name: name.to_string(),
            author_id: author_id.to_string(),
            status: PrStatus::Open,
            assigned_reviewers: reviewers,
            created_at,
            merged_at: None,
        })
    }

    /// Mark a pull request merged
    ///
    /// Merging twice succeeds and keeps the first merge time.
    #[instrument(skip(self))]
    pub async fn merge_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        let started = Instant::now();
        let engine = self.clone();
        let pr_id = pr_id.to_string();

        let result = self
            .db
            .with_tx(move |tx| {
                Box::pin(async move { engine.merge_pull_request_in(tx, &pr_id).await })
            })
            .await;

        match &result {
            Ok(pr) => info!(merged_at = ?pr.merged_at, "pull request merged"),
            Err(e) => log_failure(e),
        }
        self.observe("merge_pull_request", started, &result);
        result
    }

    pub async fn merge_pull_request_in(&self, tx: &mut Tx, pr_id: &str) -> Result<PullRequest> {
        Ok(self.db.pull_requests().mark_merged(tx, pr_id).await?)
    }

    /// Replace one reviewer of an open pull request with another active teammate
    ///
    /// The replacement comes from the old reviewer's team and is never the
    /// author or someone already reviewing. Candidates are tried in user id
    /// order.
    #[instrument(skip(self))]
    pub async fn reassign_reviewer(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<Reassignment> {
        let started = Instant::now();
        let engine = self.clone();
        let (pr_id, old_reviewer_id) = (pr_id.to_string(), old_reviewer_id.to_string());

        let result = self
            .db
            .with_tx(move |tx| {
                Box::pin(async move {
                    engine
                        .reassign_reviewer_in(tx, &pr_id, &old_reviewer_id)
                        .await
                })
            })
            .await;

        match &result {
            Ok(r) => info!(replaced_by = %r.replaced_by, "reviewer reassigned"),
            Err(e) => log_failure(e),
        }
        self.observe("reassign_reviewer", started, &result);
        result
    }

    pub async fn reassign_reviewer_in(
        &self,
        tx: &mut Tx,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<Reassignment> {
        let teams = self.db.teams();
        let prs = self.db.pull_requests();

        let pr = prs.lock_and_get(tx, pr_id).await?;
        if pr.is_merged() {
            return Err(Error::PullRequestMerged(pr_id.to_string()));
        }
        if !pr.has_reviewer(old_reviewer_id) {
            return Err(Error::NotAssigned {
                pr_id: pr_id.to_string(),
                user_id: old_reviewer_id.to_string(),
            });
        }

        let team_id = teams.team_id_by_user(tx, old_reviewer_id).await?;

        let mut excluded = pr.assigned_reviewers.clone();
        excluded.push(pr.author_id.clone());

        let replaced_by = teams
            .select_active_candidates(tx, team_id, &excluded, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotActiveCandidate(pr_id.to_string()))?;

        let changed = prs
            .replace_assignment(tx, pr_id, old_reviewer_id, &replaced_by)
            .await?;
        if changed != 1 {
            return Err(Error::Internal(format!(
                "expected one assignment of {} on {}, updated {}",
                old_reviewer_id, pr_id, changed
            )));
        }

        let assigned_reviewers = prs.reviewers(tx, pr_id).await?;
        Ok(Reassignment {
            pull_request: PullRequest {
                assigned_reviewers,
                ..pr
            },
            replaced_by,
        })
    }

    /// Read a pull request without taking any lock
    pub async fn get_pull_request(&self, pr_id: &str) -> Result<PullRequest> {
        let started = Instant::now();
        let result = self.db.pull_requests().get(pr_id).await.map_err(Error::from);
        self.observe("get_pull_request", started, &result);
        result
    }

    fn observe<T>(&self, operation: &str, started: Instant, result: &Result<T>) {
        if let Some(metrics) = &self.metrics {
            metrics.observe_operation(operation, result, started.elapsed());
        }
    }
}

fn log_failure(err: &Error) {
    match err.kind() {
        ErrorKind::Internal => error!(error = %err, "operation failed"),
        _ => warn!(error = %err, "operation rejected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use rota_db::{Member, Team};
    use tempfile::TempDir;

    use crate::Directory;

    struct Fixture {
        _dir: TempDir,
        engine: AssignmentEngine,
        directory: Directory,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("rota.db")).await.unwrap();
        Fixture {
            _dir: dir,
            engine: AssignmentEngine::new(db.clone()),
            directory: Directory::new(db),
        }
    }

    impl Fixture {
        async fn team(&self, name: &str, members: &[(&str, bool)]) {
            let members = members
                .iter()
                .map(|(id, active)| Member::new(*id, format!("User {}", id)).with_active(*active))
                .collect();
            self.directory
                .add_team(Team::new(name, members))
                .await
                .unwrap();
        }

        async fn deactivate(&self, user_id: &str) {
            self.directory.set_is_active(user_id, false).await.unwrap();
        }

        async fn reviewers(&self, pr_id: &str) -> Vec<String> {
            self.engine
                .get_pull_request(pr_id)
                .await
                .unwrap()
                .assigned_reviewers
        }
    }

    fn assert_invariants(pr: &PullRequest) {
        assert!(!pr.has_reviewer(&pr.author_id), "author reviews own pull request");
        let unique: HashSet<_> = pr.assigned_reviewers.iter().collect();
        assert_eq!(unique.len(), pr.assigned_reviewers.len(), "duplicate reviewer");
        assert!(pr.assigned_reviewers.len() <= MAX_REVIEWERS as usize);
    }

    #[tokio::test]
    async fn test_create_assigns_two_active_teammates() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true)]).await;

        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();

        assert_eq!(pr.status, PrStatus::Open);
        assert_eq!(pr.assigned_reviewers, vec!["r1", "r2"]);
        assert!(pr.merged_at.is_none());
        assert_invariants(&pr);
        assert_eq!(f.reviewers("pr1").await, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_create_with_single_active_teammate() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", false)]).await;

        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_create_without_teammates() {
        let f = fixture().await;
        f.team("T", &[("author", true)]).await;

        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        assert!(pr.assigned_reviewers.is_empty());
    }

    #[tokio::test]
    async fn test_create_ignores_other_teams() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true)]).await;
        f.team("U", &[("u1", true), ("u2", true)]).await;

        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_inactive_author_can_still_open_pull_request() {
        let f = fixture().await;
        f.team("T", &[("author", false), ("r1", true)]).await;

        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_create_unknown_author() {
        let f = fixture().await;
        let err = f
            .engine
            .create_pull_request("pr1", "x", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound(ref id) if id == "ghost"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_duplicate_pull_request_leaves_original_untouched() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true)]).await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.team("U", &[("other", true), ("u1", true)]).await;

        let err = f
            .engine
            .create_pull_request("pr1", "again", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PullRequestExists(ref id) if id == "pr1"));
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let stored = f.engine.get_pull_request("pr1").await.unwrap();
        assert_eq!(stored.name, "x");
        assert_eq!(stored.author_id, "author");
        assert_eq!(stored.assigned_reviewers, vec!["r1"]);
        assert!(f.directory.get_review("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reassign_to_remaining_teammate() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();

        let result = f.engine.reassign_reviewer("pr1", "r1").await.unwrap();

        assert_eq!(result.replaced_by, "r3");
        assert_eq!(result.pull_request.assigned_reviewers, vec!["r2", "r3"]);
        assert_eq!(result.pull_request.status, PrStatus::Open);
        assert_invariants(&result.pull_request);
        assert_eq!(f.reviewers("pr1").await, vec!["r2", "r3"]);
    }

    #[tokio::test]
    async fn test_reassign_without_candidate_keeps_reviewers() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", false)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();

        let err = f.engine.reassign_reviewer("pr1", "r1").await.unwrap_err();

        assert!(matches!(err, Error::NotActiveCandidate(ref id) if id == "pr1"));
        assert_eq!(err.kind(), ErrorKind::NoCandidate);
        assert_eq!(f.reviewers("pr1").await, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_reassign_after_merge_fails() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.engine.merge_pull_request("pr1").await.unwrap();

        let err = f.engine.reassign_reviewer("pr1", "r1").await.unwrap_err();
        assert!(matches!(err, Error::PullRequestMerged(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        // Still refused when the user was never a reviewer
        let err = f.engine.reassign_reviewer("pr1", "r3").await.unwrap_err();
        assert!(matches!(err, Error::PullRequestMerged(_)));
        assert_eq!(f.reviewers("pr1").await, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_reassign_user_not_assigned() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();

        let err = f.engine.reassign_reviewer("pr1", "r3").await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotAssigned { ref pr_id, ref user_id } if pr_id == "pr1" && user_id == "r3"
        ));
        assert_eq!(err.kind(), ErrorKind::Precondition);

        // The author is never a reviewer either
        let err = f.engine.reassign_reviewer("pr1", "author").await.unwrap_err();
        assert!(matches!(err, Error::NotAssigned { .. }));
    }

    #[tokio::test]
    async fn test_reassign_unknown_pull_request() {
        let f = fixture().await;
        let err = f.engine.reassign_reviewer("nope", "r1").await.unwrap_err();
        assert!(matches!(err, Error::PullRequestNotFound(_)));
    }

    #[tokio::test]
    async fn test_reassign_never_picks_author_or_current_reviewer() {
        let f = fixture().await;
        f.team(
            "T",
            &[("a", true), ("author", true), ("b", true), ("c", true), ("d", true)],
        )
        .await;
        let pr = f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        assert_eq!(pr.assigned_reviewers, vec!["a", "b"]);

        let result = f.engine.reassign_reviewer("pr1", "a").await.unwrap();
        assert_eq!(result.replaced_by, "c");

        let result = f.engine.reassign_reviewer("pr1", "b").await.unwrap();
        assert_eq!(result.replaced_by, "a");
        assert_eq!(result.pull_request.assigned_reviewers, vec!["a", "c"]);
        assert_invariants(&result.pull_request);
    }

    #[tokio::test]
    async fn test_replacement_comes_from_old_reviewers_team() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true)]).await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        // r1 moves to another team that has a spare member
        f.team("U", &[("r1", true), ("u1", true)]).await;

        let result = f.engine.reassign_reviewer("pr1", "r1").await.unwrap();
        assert_eq!(result.replaced_by, "u1");
        assert_eq!(result.pull_request.assigned_reviewers, vec!["r2", "u1"]);
    }

    #[tokio::test]
    async fn test_reassign_inactive_reviewer() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.deactivate("r1").await;

        let result = f.engine.reassign_reviewer("pr1", "r1").await.unwrap();
        assert_eq!(result.replaced_by, "r3");
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true)]).await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();

        let first = f.engine.merge_pull_request("pr1").await.unwrap();
        let second = f.engine.merge_pull_request("pr1").await.unwrap();

        assert_eq!(first.status, PrStatus::Merged);
        assert!(first.merged_at.is_some());
        assert_eq!(first.merged_at, second.merged_at);
        assert_eq!(second.assigned_reviewers, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_merge_unknown_pull_request() {
        let f = fixture().await;
        let err = f.engine.merge_pull_request("nope").await.unwrap_err();
        assert!(matches!(err, Error::PullRequestNotFound(ref id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_review_list_follows_reassignment() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.engine.reassign_reviewer("pr1", "r1").await.unwrap();

        assert!(f.directory.get_review("r1").await.unwrap().is_empty());
        let review = f.directory.get_review("r3").await.unwrap();
        assert_eq!(review.len(), 1);
        assert_eq!(review[0].id, "pr1");
    }

    #[tokio::test]
    async fn test_operations_compose_in_one_transaction() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true)]).await;
        let engine = f.engine.clone();

        let result = f
            .engine
            .database()
            .with_tx(move |tx| {
                Box::pin(async move {
                    engine.create_pull_request_in(tx, "pr1", "x", "author").await?;
                    let nested = engine.clone();
                    tx.with_tx(move |inner| {
                        Box::pin(async move { nested.merge_pull_request_in(inner, "pr1").await })
                    })
                    .await?;
                    engine.reassign_reviewer_in(tx, "pr1", "r1").await
                })
            })
            .await;

        assert!(matches!(result, Err(Error::PullRequestMerged(_))));
        // Nothing from the failed unit of work was kept
        assert!(matches!(
            f.engine.get_pull_request("pr1").await,
            Err(Error::PullRequestNotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reassignments_share_one_candidate() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.deactivate("r1").await;
        f.deactivate("r2").await;

        let a = tokio::spawn({
            let engine = f.engine.clone();
            async move { engine.reassign_reviewer("pr1", "r1").await }
        });
        let b = tokio::spawn({
            let engine = f.engine.clone();
            async move { engine.reassign_reviewer("pr1", "r2").await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let succeeded: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(succeeded.len(), 1);
        assert_eq!(succeeded[0].replaced_by, "r3");
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(Error::NotActiveCandidate(_)))));

        let stored = f.engine.get_pull_request("pr1").await.unwrap();
        assert!(stored.has_reviewer("r3"));
        assert_eq!(stored.assigned_reviewers.len(), 2);
        assert_invariants(&stored);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reassignments_on_different_pull_requests() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.engine.create_pull_request("pr2", "y", "author").await.unwrap();

        let handles: Vec<_> = ["pr1", "pr2"]
            .into_iter()
            .map(|pr_id| {
                let engine = f.engine.clone();
                tokio::spawn(async move { engine.reassign_reviewer(pr_id, "r1").await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.replaced_by, "r3");
            assert_invariants(&result.pull_request);
        }
        assert_eq!(f.reviewers("pr1").await, vec!["r2", "r3"]);
        assert_eq!(f.reviewers("pr2").await, vec!["r2", "r3"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_create_racing_reassignment_on_same_pool() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;
        f.engine.create_pull_request("pr1", "x", "author").await.unwrap();
        f.deactivate("r1").await;

        let reassign = tokio::spawn({
            let engine = f.engine.clone();
            async move { engine.reassign_reviewer("pr1", "r1").await }
        });
        let create = tokio::spawn({
            let engine = f.engine.clone();
            async move { engine.create_pull_request("pr2", "y", "author").await }
        });

        let reassignment = reassign.await.unwrap().unwrap();
        let created = create.await.unwrap().unwrap();
        assert_eq!(reassignment.replaced_by, "r3");
        assert_invariants(&reassignment.pull_request);
        assert_invariants(&created);

        // Either serial order ends in the same state: r1 is out of both pools
        // and r3 is the only spare for pr1.
        let pr1 = f.engine.get_pull_request("pr1").await.unwrap();
        let pr2 = f.engine.get_pull_request("pr2").await.unwrap();
        assert_eq!(pr1.assigned_reviewers, vec!["r2", "r3"]);
        assert_eq!(pr2.assigned_reviewers, vec!["r2", "r3"]);
        assert_invariants(&pr1);
        assert_invariants(&pr2);
    }

    #[tokio::test]
    async fn test_operations_are_recorded_in_metrics() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true)]).await;
        let metrics = Metrics::new().unwrap();
        let engine = f.engine.clone().with_metrics(metrics.clone());

        engine.create_pull_request("pr1", "x", "author").await.unwrap();
        engine.reassign_reviewer("pr1", "r1").await.unwrap_err();

        let text = metrics.render().unwrap();
        let recorded = |operation: &str, outcome: &str| {
            text.lines().any(|line| {
                line.starts_with("rota_operations_total{")
                    && line.contains(&format!(r#"operation="{}""#, operation))
                    && line.contains(&format!(r#"outcome="{}""#, outcome))
                    && line.ends_with(" 1")
            })
        };
        assert!(recorded("create_pull_request", "ok"));
        assert!(recorded("reassign_reviewer", "no_candidate"));
        assert!(!text.contains(r#"operation="merge_pull_request""#));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_keep_invariants() {
        let f = fixture().await;
        f.team("T", &[("author", true), ("r1", true), ("r2", true), ("r3", true)])
            .await;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = f.engine.clone();
                tokio::spawn(async move {
                    engine
                        .create_pull_request(&format!("pr{}", i), "x", "author")
                        .await
                })
            })
            .collect();

        for handle in handles {
            let pr = handle.await.unwrap().unwrap();
            assert_eq!(pr.assigned_reviewers.len(), 2);
            assert_invariants(&pr);
        }
    }
}
