//! Handlers for user accounts.
//!
//! Authentication lives outside this service; requests arrive with an
//! already-resolved owner id. This endpoint only exposes the profile row
//! behind such an id.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use wardrobe_core::error::CoreError;
use wardrobe_core::types::DbId;
use wardrobe_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    Ok(Json(DataResponse { data: user }))
}
