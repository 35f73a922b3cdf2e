//! GET /health, mounted at the root rather than under `/api/v1` so
//! probes and load balancers reach it without the API prefix.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    db_healthy: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Reports `degraded` instead of failing the request when the database
/// is unreachable.
async fn health(State(state): State<AppState>) -> Json<Health> {
    let db_healthy = wardrobe_db::health_check(&state.pool).await.is_ok();

    Json(Health {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
