//! Request and response bodies

use chrono::{DateTime, Utc};
use rota_core::{Member, PrStatus, PullRequest, PullRequestShort, Reassignment, Team, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDto {
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.name,
            members: team
                .members
                .into_iter()
                .map(|m| TeamMemberDto {
                    user_id: m.user_id,
                    username: m.username,
                    is_active: m.is_active,
                })
                .collect(),
        }
    }
}

impl From<TeamDto> for Team {
    fn from(dto: TeamDto) -> Self {
        let members = dto
            .members
            .into_iter()
            .map(|m| Member::new(m.user_id, m.username).with_active(m.is_active))
            .collect();
        Team::new(dto.team_name, members)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamResponse {
    pub team: TeamDto,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub team_name: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.name,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    pub user_id: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none", default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestDto {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequestShort> for PullRequestShortDto {
    fn from(pr: PullRequestShort) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestResponse {
    pub pr: PullRequestDto,
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestRequest {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MergePullRequestRequest {
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub pull_request_id: String,
    pub old_user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReassignResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

impl From<Reassignment> for ReassignResponse {
    fn from(r: Reassignment) -> Self {
        Self {
            pr: r.pull_request.into(),
            replaced_by: r.replaced_by,
        }
    }
}
