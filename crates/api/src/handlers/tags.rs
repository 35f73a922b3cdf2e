//! Handlers for the tag catalog.
//!
//! The catalog is shared across users: tags are global rows keyed by
//! (type, name), referenced by items and outfits through the polymorphic
//! relation table. Fallback tags are reserved rows the relation layer
//! attaches on its own; they cannot be deleted here.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use wardrobe_core::error::CoreError;
use wardrobe_core::tag::TagType;
use wardrobe_db::models::tag::{
    CreateTagsRequest, DeleteTagsRequest, DeleteTagsResult, TagListParams,
};
use wardrobe_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// GET /api/v1/tags?type=SCENE
///
/// List all tags of one type, in catalog order.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<TagListParams>,
) -> AppResult<impl IntoResponse> {
    let tag_type = TagType::parse(&params.tag_type)?;

    let tags = TagRepo::list_by_type(&state.pool, tag_type).await?;

    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
///
/// Batch-create tags of one type. Names already in the catalog are skipped
/// without error; the response carries every requested tag with its id
/// either way, so clients learn the ids behind the names they sent.
pub async fn create_tags(
    State(state): State<AppState>,
    Json(input): Json<CreateTagsRequest>,
) -> AppResult<impl IntoResponse> {
    let tag_type = TagType::parse(&input.tag_type)?;

    let names: Vec<String> = input
        .names
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if names.is_empty() {
        return Err(AppError::BadRequest("names must not be empty".into()));
    }

    let tags = TagRepo::create_many(&state.pool, tag_type, &names, input.created_by).await?;

    tracing::info!(
        tag_type = tag_type.as_str(),
        requested = names.len(),
        "Tags created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: tags })))
}

/// POST /api/v1/tags/batch-delete
///
/// Delete tags from the catalog. Relations cascade away with them; an
/// entity stripped of its last tag of a type gets the fallback tag back
/// inside the same transaction. Fallback tags themselves are refused.
pub async fn delete_tags(
    State(state): State<AppState>,
    Json(input): Json<DeleteTagsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.tag_ids.is_empty() {
        return Err(AppError::BadRequest("tag_ids must not be empty".into()));
    }

    let tags = TagRepo::find_by_ids(&state.pool, &input.tag_ids).await?;
    for tag in &tags {
        let is_fallback = TagType::parse(&tag.tag_type)
            .map(|tag_type| tag_type.is_fallback_name(&tag.name))
            .unwrap_or(false);
        if is_fallback {
            return Err(AppError::Core(CoreError::Validation(format!(
                "'{}' is a fallback tag and cannot be deleted",
                tag.name
            ))));
        }
    }

    let deleted = TagRepo::delete_batch(&state.pool, &input.tag_ids).await?;

    tracing::info!(deleted, "Tags deleted");

    Ok(Json(DataResponse {
        data: DeleteTagsResult { deleted },
    }))
}
