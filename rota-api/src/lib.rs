//! Rota API - HTTP interface to the reviewer assignment engine
//!
//! Routes:
//!
//! | Method | Path                   |
//! |--------|------------------------|
//! | POST   | `/team/add`            |
//! | GET    | `/team/get`            |
//! | POST   | `/users/setIsActive`   |
//! | GET    | `/users/getReview`     |
//! | POST   | `/pullRequest/create`  |
//! | POST   | `/pullRequest/merge`   |
//! | POST   | `/pullRequest/reassign`|
//! | GET    | `/health`              |
//! | GET    | `/metrics`             |
//!
//! Every other route is counted and timed in the Prometheus registry served
//! from `/metrics`. Failures are answered with `{"error": {"code", "message"}}`.

pub mod dto;
mod error;
mod handlers;
mod metrics;

use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use rota_core::{AssignmentEngine, Database, Directory, Metrics};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use error::{ApiError, Result};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: AssignmentEngine,
    pub directory: Directory,
    pub metrics: Metrics,
}

impl AppState {
    /// Build the state and register its metrics once
    pub fn new(db: Database) -> rota_core::Result<Self> {
        let metrics = Metrics::new()?;
        Ok(Self {
            engine: AssignmentEngine::new(db.clone()).with_metrics(metrics.clone()),
            directory: Directory::new(db).with_metrics(metrics.clone()),
            metrics,
        })
    }
}

/// Build the axum router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/team/add", post(handlers::add_team))
        .route("/team/get", get(handlers::get_team))
        .route("/users/setIsActive", post(handlers::set_is_active))
        .route("/users/getReview", get(handlers::get_review))
        .route("/pullRequest/create", post(handlers::create_pull_request))
        .route("/pullRequest/merge", post(handlers::merge_pull_request))
        .route("/pullRequest/reassign", post(handlers::reassign_reviewer))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .route("/metrics", get(metrics::export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API until `shutdown` resolves
///
/// In-flight requests get `drain_timeout` to finish once shutdown starts;
/// whatever is still running after that is dropped, which rolls back its
/// transaction.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
    drain_timeout: Duration,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "API listening");
    }

    let (draining_tx, draining_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("shutdown requested, draining connections");
            // The receiver is gone once the server has already finished
            let _unused = draining_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        match draining_rx.await {
            Ok(()) => tokio::time::sleep(drain_timeout).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server => result,
        _ = drain_deadline => {
            warn!(?drain_timeout, "drain timeout elapsed, dropping open connections");
            Ok(())
        }
    }
}
