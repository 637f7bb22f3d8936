//! Error types for database operations

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum Error {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// A stored value could not be mapped back into a model
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No user row with this identifier
    #[error("User {0} not found")]
    UserNotFound(String),

    /// No team with this name, or the user has no team
    #[error("Team {0} not found")]
    TeamNotFound(String),

    /// No pull request row with this identifier
    #[error("Pull request {0} not found")]
    PullRequestNotFound(String),

    /// Unique constraint on the pull request identifier was violated
    #[error("Pull request {0} already exists")]
    PullRequestExists(String),

    /// Unique constraint on the team name was violated
    #[error("Team {0} already exists")]
    TeamExists(String),
}

impl Error {
    /// Whether this is a uniqueness constraint violation reported by SQLite
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Error::Sqlx(sqlx::Error::Database(e)) if e.is_unique_violation())
    }
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;
