pub mod calendar;
pub mod health;
pub mod items;
pub mod outfits;
pub mod tags;
pub mod uploads;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                                           list, create (multipart)
/// /items/{id}                                      get, update, delete
/// /items/batch-delete                              delete many + blob cleanup (POST)
/// /items/batch-add-tags                            attach tags to many items (POST)
///
/// /outfits                                         list, create
/// /outfits/{id}                                    get, update, delete
///
/// /tags                                            list (?type=), create
/// /tags/batch-delete                               delete tags (POST)
///
/// /calendar                                        month view (?owner_id&year&month), assign
/// /calendar/{id}                                   unassign (DELETE)
///
/// /uploads                                         canvas snapshot upload (multipart POST)
///
/// /users/{id}                                      profile lookup (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Wardrobe items: CRUD plus the batch surfaces.
        .nest("/items", items::router())
        // Outfits and their canvas compositions.
        .nest("/outfits", outfits::router())
        // The shared tag catalog.
        .nest("/tags", tags::router())
        // The wear calendar.
        .nest("/calendar", calendar::router())
        // Standalone snapshot uploads for the outfit editor.
        .nest("/uploads", uploads::router())
        // Owner identity lookups.
        .nest("/users", users::router())
}
