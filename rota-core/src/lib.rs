//! Rota Core - reviewer assignment for pull requests
//!
//! This crate holds the assignment engine, which picks reviewers for new pull
//! requests and swaps them out on request, plus the team directory and the
//! service configuration.

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod metrics;

pub use config::Config;
pub use directory::Directory;
pub use engine::{AssignmentEngine, Reassignment, MAX_REVIEWERS};
pub use error::{Error, ErrorKind, Result};
pub use metrics::Metrics;

pub use rota_db::{Database, Member, PrStatus, PullRequest, PullRequestShort, Team, User};
