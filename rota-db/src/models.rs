//! Data models for database records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Pull request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }

    /// Parse the stored column value
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            other => Err(Error::InvalidData(format!(
                "unknown pull request status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pull request with its current reviewer set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Caller-supplied identifier, unique and immutable
    pub id: String,

    /// Title of the pull request
    pub name: String,

    /// User who opened the pull request
    pub author_id: String,

    pub status: PrStatus,

    /// Currently assigned reviewers, ordered by user id
    pub assigned_reviewers: Vec<String>,

    /// Set by the store when the row is inserted
    pub created_at: DateTime<Utc>,

    /// Set on the first merge and never overwritten
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Check if the pull request has been merged
    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    /// Check if a user is currently assigned as a reviewer
    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|r| r == user_id)
    }
}

/// Compact pull request view used by review lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestShort {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
}

/// Team member as supplied on team creation and returned on lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl Member {
    /// Create an active member
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            is_active: true,
        }
    }

    /// Set the active flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Team with its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<Member>,
}

impl Team {
    pub fn new(name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

/// User record joined with its team name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}

/// Raw `pull_requests` row before reviewers are attached
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct PullRequestRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRow {
    pub(crate) fn with_reviewers(self, assigned_reviewers: Vec<String>) -> Result<PullRequest> {
        Ok(PullRequest {
            status: PrStatus::parse(&self.status)?,
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            assigned_reviewers,
            created_at: self.created_at,
            merged_at: self.merged_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct PullRequestShortRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: String,
}

impl TryFrom<PullRequestShortRow> for PullRequestShort {
    type Error = Error;

    fn try_from(row: PullRequestShortRow) -> Result<Self> {
        Ok(PullRequestShort {
            status: PrStatus::parse(&row.status)?,
            id: row.id,
            name: row.name,
            author_id: row.author_id,
        })
    }
}
