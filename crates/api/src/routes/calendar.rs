//! Route definitions for the outfit calendar.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Calendar routes mounted at `/calendar`.
///
/// ```text
/// GET    /                  -> month_view (?owner_id&year&month)
/// POST   /                  -> assign_outfit
/// DELETE /{id}              -> unassign_outfit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(calendar::month_view).post(calendar::assign_outfit),
        )
        .route("/{id}", delete(calendar::unassign_outfit))
}
