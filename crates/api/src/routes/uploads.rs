//! Route definitions for standalone uploads.

use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Upload routes mounted at `/uploads`.
///
/// ```text
/// POST   /                  -> upload_image (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(uploads::upload_image))
}
