//! Request metrics middleware and the Prometheus scrape endpoint

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::Result;
use crate::AppState;

/// Count and time every request that matched a route
pub(crate) async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unknown".to_owned());
    let method = request.method().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    state.metrics.observe_request(
        method.as_str(),
        &route,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}

pub(crate) async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.metrics.render()?;
    Ok(([(header::CONTENT_TYPE, rota_core::metrics::CONTENT_TYPE)], body))
}
