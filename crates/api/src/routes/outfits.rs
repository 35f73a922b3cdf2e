//! Route definitions for outfits.

use axum::routing::get;
use axum::Router;

use crate::handlers::outfits;
use crate::state::AppState;

/// Outfit routes mounted at `/outfits`.
///
/// ```text
/// GET    /                  -> list_outfits
/// POST   /                  -> create_outfit
/// GET    /{id}              -> get_outfit
/// PUT    /{id}              -> update_outfit
/// DELETE /{id}              -> delete_outfit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(outfits::list_outfits).post(outfits::create_outfit))
        .route(
            "/{id}",
            get(outfits::get_outfit)
                .put(outfits::update_outfit)
                .delete(outfits::delete_outfit),
        )
}
