//! Wardrobe item models and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardrobe_core::types::{DbId, Timestamp};

use crate::models::tag::TagGroups;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub wear_count: i32,
    /// Generated column: price divided by wear count, NULL while unworn.
    pub cost_per_wear: Option<Decimal>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// An item enriched with its tag groups, as returned by list and detail
/// endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithTags {
    #[serde(flatten)]
    pub item: Item,
    #[serde(flatten)]
    pub tags: TagGroups,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Fields for inserting a new item. Assembled by the handler from the
/// multipart form, with the image URL already resolved.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: DbId,
    pub name: String,
    pub image_url: String,
    pub price: Decimal,
    pub color: Option<String>,
    pub material: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating an item.
///
/// Scalar fields follow COALESCE semantics: absent fields stay untouched.
/// Tag id lists replace their group wholesale on every update; a missing
/// or empty list resets the group to its fallback tag, so clients send the
/// full tag state with each save.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<Decimal>,
    pub wear_count: Option<i32>,
    pub color: Option<String>,
    pub material: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<DbId>,
    #[serde(default)]
    pub scene_ids: Vec<DbId>,
    #[serde(default)]
    pub season_ids: Vec<DbId>,
}

/// DTO for batch-deleting items.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteItemsRequest {
    pub owner_id: DbId,
    pub item_ids: Vec<DbId>,
}

/// Result summary for batch item deletion.
#[derive(Debug, Clone, Serialize)]
pub struct BatchDeleteItemsResult {
    /// Rows actually deleted; ids owned by someone else do not count.
    pub deleted: u64,
}

/// Query parameters for `GET /api/v1/items`.
///
/// Tag id filters arrive as comma-separated lists (`category_ids=3,7`);
/// ids are OR-combined within a type and AND-combined across types.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemListParams {
    pub owner_id: DbId,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_ids: Option<String>,
    pub scene_ids: Option<String>,
    pub season_ids: Option<String>,
    pub color: Option<String>,
    pub keyword: Option<String>,
}

/// Resolved filter driving the two-phase item listing.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub owner_id: DbId,
    pub category_ids: Vec<DbId>,
    pub scene_ids: Vec<DbId>,
    pub season_ids: Vec<DbId>,
    pub color: Option<String>,
    pub keyword: Option<String>,
}
