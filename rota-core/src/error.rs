//! Error types for Rota

use thiserror::Error;

/// Result type alias for Rota operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Rota operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("User {0} not found")]
    UserNotFound(String),

    /// Unknown team name, or a user without a team
    #[error("Team {0} not found")]
    TeamNotFound(String),

    #[error("Pull request {0} not found")]
    PullRequestNotFound(String),

    #[error("Pull request {0} already exists")]
    PullRequestExists(String),

    #[error("Team {0} already exists")]
    TeamExists(String),

    /// Reassignment attempted on a merged pull request
    #[error("Cannot reassign on merged pull request {0}")]
    PullRequestMerged(String),

    /// The user to replace is not a reviewer of the pull request
    #[error("User {user_id} is not assigned to pull request {pr_id}")]
    NotAssigned { pr_id: String, user_id: String },

    /// No active teammate left to take over a review
    #[error("No active replacement candidate in team for pull request {0}")]
    NotActiveCandidate(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metric registration or encoding failure
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Store failure that has no meaning to the caller
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classification of [`Error`] used by adapters to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidState,
    NoCandidate,
    Precondition,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UserNotFound(_) | Error::TeamNotFound(_) | Error::PullRequestNotFound(_) => {
                ErrorKind::NotFound
            }
            Error::PullRequestExists(_) | Error::TeamExists(_) => ErrorKind::AlreadyExists,
            Error::PullRequestMerged(_) => ErrorKind::InvalidState,
            Error::NotActiveCandidate(_) => ErrorKind::NoCandidate,
            Error::NotAssigned { .. } => ErrorKind::Precondition,
            Error::Config(_) | Error::Io(_) | Error::Metrics(_) | Error::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<rota_db::Error> for Error {
    fn from(err: rota_db::Error) -> Self {
        use rota_db::Error as DbError;

        match err {
            DbError::UserNotFound(id) => Error::UserNotFound(id),
            DbError::TeamNotFound(name) => Error::TeamNotFound(name),
            DbError::PullRequestNotFound(id) => Error::PullRequestNotFound(id),
            DbError::PullRequestExists(id) => Error::PullRequestExists(id),
            DbError::TeamExists(name) => Error::TeamExists(name),
            other => Error::Internal(other.to_string()),
        }
    }
}
