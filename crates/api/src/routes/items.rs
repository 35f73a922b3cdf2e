//! Route definitions for wardrobe items.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Item routes mounted at `/items`.
///
/// ```text
/// GET    /                  -> list_items
/// POST   /                  -> create_item (multipart)
/// GET    /{id}              -> get_item
/// PUT    /{id}              -> update_item
/// DELETE /{id}              -> delete_item
/// POST   /batch-delete      -> batch_delete_items
/// POST   /batch-add-tags    -> batch_add_tags
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route(
            "/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/batch-delete", post(items::batch_delete_items))
        .route("/batch-add-tags", post(items::batch_add_tags))
}
