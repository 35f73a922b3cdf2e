//! Handlers for the outfit calendar.
//!
//! A calendar entry pins an outfit to a day. Nothing is unique here: the
//! same outfit may repeat across days and a single day may hold several
//! entries.

use std::collections::{BTreeMap, HashMap};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use wardrobe_core::calendar::month_range;
use wardrobe_core::composition::pick_preview;
use wardrobe_core::error::CoreError;
use wardrobe_core::tag::EntityKind;
use wardrobe_core::types::DbId;
use wardrobe_db::models::calendar::{AssignOutfitRequest, CalendarDayOutfit, MonthViewParams};
use wardrobe_db::models::tag::TagGroups;
use wardrobe_db::repositories::{CalendarRepo, OutfitRepo, RelationRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Assign
// ---------------------------------------------------------------------------

/// POST /api/v1/calendar
///
/// Pin an outfit to a day. The outfit must belong to the calling owner.
pub async fn assign_outfit(
    State(state): State<AppState>,
    Json(input): Json<AssignOutfitRequest>,
) -> AppResult<impl IntoResponse> {
    if UserRepo::find_by_id(&state.pool, input.owner_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.owner_id,
        }));
    }
    if !OutfitRepo::verify_owned(&state.pool, input.outfit_id, input.owner_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Outfit",
            id: input.outfit_id,
        }));
    }

    let entry =
        CalendarRepo::insert(&state.pool, input.owner_id, input.outfit_id, input.date).await?;

    tracing::info!(
        entry_id = entry.id,
        outfit_id = entry.outfit_id,
        date = %entry.entry_date,
        "Outfit assigned to calendar"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

// ---------------------------------------------------------------------------
// Month view
// ---------------------------------------------------------------------------

/// GET /api/v1/calendar?owner_id=1&year=2025&month=4
///
/// Entries of one month grouped by day (`YYYY-MM-DD` keys, chronological),
/// each with the outfit's name, weather notes, background color, resolved
/// preview, and scene tags.
pub async fn month_view(
    State(state): State<AppState>,
    Query(params): Query<MonthViewParams>,
) -> AppResult<impl IntoResponse> {
    let (first, last) = month_range(params.year, params.month)?;

    let entries =
        CalendarRepo::entries_between(&state.pool, params.owner_id, first, last).await?;

    let mut outfit_ids: Vec<DbId> = entries.iter().map(|entry| entry.outfit_id).collect();
    outfit_ids.sort_unstable();
    outfit_ids.dedup();

    let layer_rows = OutfitRepo::compositions_for(&state.pool, &outfit_ids).await?;
    let tag_rows =
        RelationRepo::tags_for_entities(&state.pool, EntityKind::Outfit, &outfit_ids).await?;
    let groups = TagGroups::collect(tag_rows);

    // Bottom-first snapshot urls per outfit, for preview fallback.
    let mut snapshots: HashMap<DbId, Vec<String>> = HashMap::new();
    for layer in layer_rows {
        snapshots
            .entry(layer.outfit_id)
            .or_default()
            .push(layer.image_url);
    }

    // Entries may share an outfit, so lookups below must not consume.
    let mut days: BTreeMap<String, Vec<CalendarDayOutfit>> = BTreeMap::new();
    for entry in entries {
        let preview_url = pick_preview(
            entry.outfit_image_url.as_deref(),
            snapshots
                .get(&entry.outfit_id)
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
        .map(str::to_string);
        let scenes = groups
            .get(&entry.outfit_id)
            .map(|tags| tags.scenes.clone())
            .unwrap_or_default();

        days.entry(entry.entry_date.to_string())
            .or_default()
            .push(CalendarDayOutfit {
                entry_id: entry.id,
                outfit_id: entry.outfit_id,
                outfit_name: entry.outfit_name,
                weather: entry.outfit_weather,
                temperature: entry.outfit_temperature,
                bg_color: entry.outfit_bg_color,
                preview_url,
                scenes,
            });
    }

    Ok(Json(DataResponse { data: days }))
}

// ---------------------------------------------------------------------------
// Unassign
// ---------------------------------------------------------------------------

/// DELETE /api/v1/calendar/{id}
pub async fn unassign_outfit(
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CalendarRepo::delete(&state.pool, entry_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CalendarEntry",
            id: entry_id,
        }));
    }

    tracing::info!(entry_id, "Calendar entry removed");

    Ok(StatusCode::NO_CONTENT)
}
