//! Route definitions for the tag catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Tag catalog routes mounted at `/tags`.
///
/// ```text
/// GET    /                  -> list_tags (?type=CATEGORY|SCENE|SEASON)
/// POST   /                  -> create_tags
/// POST   /batch-delete      -> delete_tags
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tags))
        .route("/batch-delete", post(tags::delete_tags))
}
