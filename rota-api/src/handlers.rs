//! Route handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use rota_core::Team;
use serde_json::{json, Value};

use crate::dto::{
    CreatePullRequestRequest, MergePullRequestRequest, PullRequestResponse, ReassignRequest,
    ReassignResponse, ReviewResponse, SetIsActiveRequest, TeamDto, TeamQuery, TeamResponse,
    UserQuery, UserResponse,
};
use crate::error::{require, Result};
use crate::AppState;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type QueryParams<T> = std::result::Result<Query<T>, QueryRejection>;

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn add_team(
    State(state): State<AppState>,
    body: JsonBody<TeamDto>,
) -> Result<(StatusCode, Json<TeamResponse>)> {
    let Json(team) = body?;
    require("team_name", &team.team_name)?;
    for member in &team.members {
        require("user_id", &member.user_id)?;
    }

    let team = state.directory.add_team(Team::from(team)).await?;
    Ok((
        StatusCode::CREATED,
        Json(TeamResponse { team: team.into() }),
    ))
}

pub(crate) async fn get_team(
    State(state): State<AppState>,
    query: QueryParams<TeamQuery>,
) -> Result<Json<TeamDto>> {
    let Query(query) = query?;
    require("team_name", &query.team_name)?;

    let team = state.directory.get_team(&query.team_name).await?;
    Ok(Json(team.into()))
}

pub(crate) async fn set_is_active(
    State(state): State<AppState>,
    body: JsonBody<SetIsActiveRequest>,
) -> Result<Json<UserResponse>> {
    let Json(req) = body?;
    require("user_id", &req.user_id)?;

    let user = state
        .directory
        .set_is_active(&req.user_id, req.is_active)
        .await?;
    Ok(Json(UserResponse { user: user.into() }))
}

pub(crate) async fn get_review(
    State(state): State<AppState>,
    query: QueryParams<UserQuery>,
) -> Result<Json<ReviewResponse>> {
    let Query(query) = query?;
    require("user_id", &query.user_id)?;

    let pull_requests = state.directory.get_review(&query.user_id).await?;
    Ok(Json(ReviewResponse {
        user_id: query.user_id,
        pull_requests: pull_requests.into_iter().map(Into::into).collect(),
    }))
}

pub(crate) async fn create_pull_request(
    State(state): State<AppState>,
    body: JsonBody<CreatePullRequestRequest>,
) -> Result<(StatusCode, Json<PullRequestResponse>)> {
    let Json(req) = body?;
    require("pull_request_id", &req.pull_request_id)?;
    require("author_id", &req.author_id)?;

    let pr = state
        .engine
        .create_pull_request(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PullRequestResponse { pr: pr.into() }),
    ))
}

pub(crate) async fn merge_pull_request(
    State(state): State<AppState>,
    body: JsonBody<MergePullRequestRequest>,
) -> Result<Json<PullRequestResponse>> {
    let Json(req) = body?;
    require("pull_request_id", &req.pull_request_id)?;

    let pr = state.engine.merge_pull_request(&req.pull_request_id).await?;
    Ok(Json(PullRequestResponse { pr: pr.into() }))
}

pub(crate) async fn reassign_reviewer(
    State(state): State<AppState>,
    body: JsonBody<ReassignRequest>,
) -> Result<Json<ReassignResponse>> {
    let Json(req) = body?;
    require("pull_request_id", &req.pull_request_id)?;
    require("old_user_id", &req.old_user_id)?;

    let reassignment = state
        .engine
        .reassign_reviewer(&req.pull_request_id, &req.old_user_id)
        .await?;
    Ok(Json(reassignment.into()))
}
