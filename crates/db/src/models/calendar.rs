//! Outfit calendar models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardrobe_core::types::{DbId, Timestamp};

use crate::models::tag::TagInfo;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `calendar_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEntry {
    pub id: DbId,
    pub owner_id: DbId,
    pub outfit_id: DbId,
    pub entry_date: NaiveDate,
    pub created_at: Timestamp,
}

/// A calendar entry joined with its outfit, before preview resolution.
#[derive(Debug, Clone, FromRow)]
pub struct CalendarEntryJoined {
    pub id: DbId,
    pub outfit_id: DbId,
    pub entry_date: NaiveDate,
    pub outfit_name: String,
    pub outfit_weather: String,
    pub outfit_temperature: String,
    pub outfit_bg_color: String,
    pub outfit_image_url: Option<String>,
}

/// One entry in the month view response.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDayOutfit {
    pub entry_id: DbId,
    pub outfit_id: DbId,
    pub outfit_name: String,
    pub weather: String,
    pub temperature: String,
    pub bg_color: String,
    pub preview_url: Option<String>,
    pub scenes: Vec<TagInfo>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for assigning an outfit to a day.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignOutfitRequest {
    pub owner_id: DbId,
    pub outfit_id: DbId,
    pub date: NaiveDate,
}

/// Query parameters for `GET /api/v1/calendar`.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthViewParams {
    pub owner_id: DbId,
    pub year: i32,
    pub month: u32,
}
