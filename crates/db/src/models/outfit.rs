//! Outfit and composition models and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardrobe_core::types::{DbId, Timestamp};

use crate::models::tag::TagInfo;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `outfits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Outfit {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
    pub bg_color: String,
    pub weather: String,
    pub temperature: String,
    /// Explicit preview snapshot uploaded by the client, if any.
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `composition_items` table: one canvas layer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompositionItem {
    pub id: DbId,
    pub outfit_id: DbId,
    /// The item this layer was created from. Not a foreign key: the layer
    /// keeps its image snapshot after the item is deleted.
    pub source_item_id: DbId,
    pub image_url: String,
    pub pos_x: Decimal,
    pub pos_y: Decimal,
    pub scale: Decimal,
    pub rotation: Decimal,
    pub z_order: i32,
    pub flipped: bool,
    pub locked: bool,
}

/// An outfit as returned by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OutfitSummary {
    #[serde(flatten)]
    pub outfit: Outfit,
    /// Resolved preview: the explicit snapshot, or the bottom layer image.
    pub preview_url: Option<String>,
    pub scenes: Vec<TagInfo>,
    pub seasons: Vec<TagInfo>,
}

/// An outfit with its full layer stack, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OutfitDetail {
    #[serde(flatten)]
    pub outfit: Outfit,
    pub preview_url: Option<String>,
    /// Bottom layer first.
    pub layers: Vec<CompositionItem>,
    pub scenes: Vec<TagInfo>,
    pub seasons: Vec<TagInfo>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// One canvas layer in a save request.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerPayload {
    pub item_id: DbId,
    /// Image snapshot for this layer. Resolved from the item's current
    /// image when absent.
    pub image_url: Option<String>,
    #[serde(default)]
    pub pos_x: Decimal,
    #[serde(default)]
    pub pos_y: Decimal,
    /// Defaults to 1.0 when absent.
    pub scale: Option<Decimal>,
    #[serde(default)]
    pub rotation: Decimal,
    #[serde(default)]
    pub z_order: i32,
    #[serde(default)]
    pub flipped: bool,
    #[serde(default)]
    pub locked: bool,
}

/// DTO for creating an outfit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOutfitRequest {
    pub owner_id: DbId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub bg_color: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<String>,
    /// Pre-uploaded preview snapshot URL.
    pub image_url: Option<String>,
    pub items: Vec<LayerPayload>,
    #[serde(default)]
    pub scene_ids: Vec<DbId>,
    #[serde(default)]
    pub season_ids: Vec<DbId>,
}

/// DTO for updating an outfit. Scalar fields follow COALESCE semantics;
/// the layer stack and both tag groups are always replaced wholesale, so
/// an omitted or empty tag list resets that group to its fallback tag.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOutfitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub bg_color: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<String>,
    pub image_url: Option<String>,
    pub items: Vec<LayerPayload>,
    #[serde(default)]
    pub scene_ids: Vec<DbId>,
    #[serde(default)]
    pub season_ids: Vec<DbId>,
}

/// Fields for inserting a new outfit row, with defaults already applied.
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub owner_id: DbId,
    pub name: String,
    pub description: String,
    pub bg_color: String,
    pub weather: String,
    pub temperature: String,
    pub image_url: Option<String>,
}

/// Changes for an outfit update. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct OutfitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub bg_color: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<String>,
    pub image_url: Option<String>,
}

/// A fully resolved layer ready for insert.
#[derive(Debug, Clone)]
pub struct NewLayer {
    pub source_item_id: DbId,
    pub image_url: String,
    pub pos_x: Decimal,
    pub pos_y: Decimal,
    pub scale: Decimal,
    pub rotation: Decimal,
    pub z_order: i32,
    pub flipped: bool,
    pub locked: bool,
}

/// Query parameters for `GET /api/v1/outfits`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutfitListParams {
    pub owner_id: DbId,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Comma-separated tag ids, OR-combined within the type.
    pub scene_ids: Option<String>,
    pub season_ids: Option<String>,
    pub keyword: Option<String>,
}

/// Resolved filter driving the two-phase outfit listing.
#[derive(Debug, Clone, Default)]
pub struct OutfitFilter {
    pub owner_id: DbId,
    pub scene_ids: Vec<DbId>,
    pub season_ids: Vec<DbId>,
    pub keyword: Option<String>,
}
