//! Handlers for outfits and their canvas compositions.
//!
//! A save carries the full canvas state: scalar fields, the complete layer
//! stack, and both tag groups, all replaced wholesale. Layers snapshot the
//! source item's image at save time, so deleting an item later never breaks
//! an outfit that used it.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use wardrobe_core::composition::{pick_preview, validate_layer_count, validate_scale};
use wardrobe_core::error::CoreError;
use wardrobe_core::tag::{EntityKind, EntityRef, TagType};
use wardrobe_core::types::DbId;
use wardrobe_db::models::outfit::{
    CreateOutfitRequest, LayerPayload, NewLayer, NewOutfit, Outfit, OutfitChanges, OutfitDetail,
    OutfitFilter, OutfitListParams, OutfitSummary, UpdateOutfitRequest,
};
use wardrobe_db::models::tag::TagGroups;
use wardrobe_db::repositories::{ItemRepo, OutfitRepo, RelationRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::query::{page_bounds, parse_opt_ids, slice_page};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Canvas background applied when a save does not pick one.
const DEFAULT_BG_COLOR: &str = "#ffffff";

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/outfits
///
/// Save a new outfit with its layer stack and tag groups. Layers without an
/// explicit `image_url` snapshot the source item's current image.
pub async fn create_outfit(
    State(state): State<AppState>,
    Json(input): Json<CreateOutfitRequest>,
) -> AppResult<impl IntoResponse> {
    validate_layer_count(input.items.len())?;
    let name = required_name(input.name.as_deref())?;

    let mut tx = state.pool.begin().await?;

    if !UserRepo::exists_tx(&mut tx, input.owner_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.owner_id,
        }));
    }

    let layers = resolve_layers(&mut tx, &input.items).await?;

    let outfit = OutfitRepo::insert_tx(
        &mut tx,
        &NewOutfit {
            owner_id: input.owner_id,
            name,
            description: input.description.unwrap_or_default(),
            bg_color: input
                .bg_color
                .unwrap_or_else(|| DEFAULT_BG_COLOR.to_string()),
            weather: input.weather.unwrap_or_default(),
            temperature: input.temperature.unwrap_or_default(),
            image_url: input.image_url,
        },
    )
    .await?;

    OutfitRepo::replace_composition_tx(&mut tx, outfit.id, &layers).await?;

    let entity = EntityRef::outfit(outfit.id);
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Scene, &input.scene_ids).await?;
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Season, &input.season_ids).await?;

    tx.commit().await?;

    tracing::info!(
        outfit_id = outfit.id,
        owner_id = outfit.owner_id,
        layers = layers.len(),
        "Outfit created"
    );

    let detail = outfit_detail(&state, outfit).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/outfits/{id}
pub async fn get_outfit(
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outfit = OutfitRepo::find_by_id(&state.pool, outfit_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Outfit",
            id: outfit_id,
        }))?;

    let detail = outfit_detail(&state, outfit).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/outfits
///
/// List an owner's outfits, newest first, with previews and tag groups.
/// Tag filters OR within a type and AND across types; `keyword` matches
/// name or description.
pub async fn list_outfits(
    State(state): State<AppState>,
    Query(params): Query<OutfitListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = OutfitFilter {
        owner_id: params.owner_id,
        scene_ids: parse_opt_ids(params.scene_ids.as_deref())?,
        season_ids: parse_opt_ids(params.season_ids.as_deref())?,
        keyword: params.keyword,
    };
    let (page, limit) = page_bounds(params.page, params.limit);

    let all_ids = OutfitRepo::list_ids(&state.pool, &filter).await?;
    let total = all_ids.len() as i64;
    let page_ids = slice_page(&all_ids, page, limit);

    let outfits = OutfitRepo::fetch_ordered(&state.pool, &page_ids).await?;
    let layer_rows = OutfitRepo::compositions_for(&state.pool, &page_ids).await?;
    let tag_rows =
        RelationRepo::tags_for_entities(&state.pool, EntityKind::Outfit, &page_ids).await?;
    let mut groups = TagGroups::collect(tag_rows);

    // Bottom-first snapshot urls per outfit, for preview fallback.
    let mut snapshots: HashMap<DbId, Vec<String>> = HashMap::new();
    for layer in layer_rows {
        snapshots
            .entry(layer.outfit_id)
            .or_default()
            .push(layer.image_url);
    }

    let data: Vec<OutfitSummary> = outfits
        .into_iter()
        .map(|outfit| {
            let tags = groups.remove(&outfit.id).unwrap_or_default();
            let layer_urls = snapshots.remove(&outfit.id).unwrap_or_default();
            let preview_url = pick_preview(
                outfit.image_url.as_deref(),
                layer_urls.iter().map(String::as_str),
            )
            .map(str::to_string);
            OutfitSummary {
                outfit,
                preview_url,
                scenes: tags.scenes,
                seasons: tags.seasons,
            }
        })
        .collect();

    Ok(Json(PageResponse {
        data,
        total,
        page,
        limit,
    }))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PUT /api/v1/outfits/{id}
///
/// Scalar fields follow COALESCE semantics; the layer stack and both tag
/// groups are replaced wholesale with the submitted state.
pub async fn update_outfit(
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
    Json(input): Json<UpdateOutfitRequest>,
) -> AppResult<impl IntoResponse> {
    validate_layer_count(input.items.len())?;
    if let Some(ref name) = input.name {
        required_name(Some(name))?;
    }

    let mut tx = state.pool.begin().await?;

    let changes = OutfitChanges {
        name: input.name,
        description: input.description,
        bg_color: input.bg_color,
        weather: input.weather,
        temperature: input.temperature,
        image_url: input.image_url,
    };
    let outfit = OutfitRepo::update_tx(&mut tx, outfit_id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Outfit",
            id: outfit_id,
        }))?;

    let layers = resolve_layers(&mut tx, &input.items).await?;
    OutfitRepo::replace_composition_tx(&mut tx, outfit_id, &layers).await?;

    let entity = EntityRef::outfit(outfit_id);
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Scene, &input.scene_ids).await?;
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Season, &input.season_ids).await?;

    tx.commit().await?;

    tracing::info!(outfit_id, layers = layers.len(), "Outfit updated");

    let detail = outfit_detail(&state, outfit).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/outfits/{id}
///
/// Layers and calendar entries cascade with the outfit row. Layer image
/// snapshots live with their source items, so nothing is removed from
/// object storage here.
pub async fn delete_outfit(
    State(state): State<AppState>,
    Path(outfit_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;

    // No FK covers the polymorphic relation rows; remove them by hand.
    RelationRepo::delete_for_entities_tx(&mut tx, EntityKind::Outfit, &[outfit_id]).await?;

    if !OutfitRepo::delete_tx(&mut tx, outfit_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Outfit",
            id: outfit_id,
        }));
    }

    tx.commit().await?;

    tracing::info!(outfit_id, "Outfit deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate and normalize an outfit name.
fn required_name(name: Option<&str>) -> Result<String, AppError> {
    name.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Core(CoreError::Validation("name is required".to_string())))
}

/// The snapshot url carried by a layer payload, if it is usable.
fn provided_snapshot(layer: &LayerPayload) -> Option<&str> {
    layer.image_url.as_deref().filter(|url| !url.is_empty())
}

/// Turn layer payloads into insertable rows, within the save transaction.
///
/// Layers without a usable `image_url` read the source item's current
/// image. A source item that no longer exists leaves the snapshot blank
/// rather than failing the save.
async fn resolve_layers(
    tx: &mut Transaction<'_, Postgres>,
    payloads: &[LayerPayload],
) -> Result<Vec<NewLayer>, AppError> {
    for layer in payloads {
        if let Some(scale) = layer.scale {
            validate_scale(scale)?;
        }
    }

    let unresolved: Vec<DbId> = payloads
        .iter()
        .filter(|layer| provided_snapshot(layer).is_none())
        .map(|layer| layer.item_id)
        .collect();
    let current_images: HashMap<DbId, String> = if unresolved.is_empty() {
        HashMap::new()
    } else {
        ItemRepo::images_for_tx(tx, &unresolved)
            .await?
            .into_iter()
            .collect()
    };

    let layers = payloads
        .iter()
        .map(|layer| {
            let image_url = match provided_snapshot(layer) {
                Some(url) => url.to_string(),
                None => current_images
                    .get(&layer.item_id)
                    .cloned()
                    .unwrap_or_default(),
            };
            NewLayer {
                source_item_id: layer.item_id,
                image_url,
                pos_x: layer.pos_x,
                pos_y: layer.pos_y,
                scale: layer.scale.unwrap_or(Decimal::ONE),
                rotation: layer.rotation,
                z_order: layer.z_order,
                flipped: layer.flipped,
                locked: layer.locked,
            }
        })
        .collect();
    Ok(layers)
}

/// Join one outfit with its layers, tag groups, and resolved preview.
async fn outfit_detail(state: &AppState, outfit: Outfit) -> AppResult<OutfitDetail> {
    let layers = OutfitRepo::composition_for(&state.pool, outfit.id).await?;
    let rows = RelationRepo::tags_for_entity(&state.pool, EntityRef::outfit(outfit.id)).await?;
    let tags = TagGroups::collect(rows).remove(&outfit.id).unwrap_or_default();

    let preview_url = pick_preview(
        outfit.image_url.as_deref(),
        layers.iter().map(|layer| layer.image_url.as_str()),
    )
    .map(str::to_string);

    Ok(OutfitDetail {
        outfit,
        preview_url,
        layers,
        scenes: tags.scenes,
        seasons: tags.seasons,
    })
}
