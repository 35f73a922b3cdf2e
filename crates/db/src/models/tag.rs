//! Tag catalog and entity-tag relation models and DTOs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use wardrobe_core::tag::TagType;
use wardrobe_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub tag_type: String,
    pub name: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// Lightweight id/name pair used inside tag groups.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct TagInfo {
    pub id: DbId,
    pub name: String,
}

/// One relation row joined with its tag, fetched when filling tag groups.
#[derive(Debug, Clone, FromRow)]
pub struct EntityTagRow {
    pub entity_id: DbId,
    pub tag_id: DbId,
    pub tag_type: String,
    pub name: String,
}

/// Tags of one entity, grouped by type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagGroups {
    pub categories: Vec<TagInfo>,
    pub scenes: Vec<TagInfo>,
    pub seasons: Vec<TagInfo>,
}

impl TagGroups {
    /// Group relation rows by entity id.
    ///
    /// Rows with an unrecognized tag type are dropped; the column CHECK
    /// keeps them out of the table in the first place.
    pub fn collect(rows: Vec<EntityTagRow>) -> HashMap<DbId, TagGroups> {
        let mut grouped: HashMap<DbId, TagGroups> = HashMap::new();
        for row in rows {
            let Ok(tag_type) = TagType::parse(&row.tag_type) else {
                continue;
            };
            let info = TagInfo {
                id: row.tag_id,
                name: row.name,
            };
            let groups = grouped.entry(row.entity_id).or_default();
            match tag_type {
                TagType::Category => groups.categories.push(info),
                TagType::Scene => groups.scenes.push(info),
                TagType::Season => groups.seasons.push(info),
            }
        }
        grouped
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for batch-creating tags of one type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagsRequest {
    #[serde(rename = "type")]
    pub tag_type: String,
    pub names: Vec<String>,
    /// Attribution for user-created custom tags; seed tags carry none.
    pub created_by: Option<DbId>,
}

/// DTO for batch-deleting tags.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTagsRequest {
    pub tag_ids: Vec<DbId>,
}

/// Result summary for tag batch deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteTagsResult {
    pub deleted: u64,
}

/// DTO for attaching tags to many items at once.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchAddTagsRequest {
    pub item_ids: Vec<DbId>,
    pub tag_ids: Vec<DbId>,
}

/// Result summary for batch tag attachment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchAddTagsResult {
    /// Relations actually inserted (already-present pairs do not count).
    pub attached: u64,
    /// Fallback relations displaced by the new real tags.
    pub fallbacks_removed: u64,
}

/// Query parameters for `GET /api/v1/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagListParams {
    #[serde(rename = "type")]
    pub tag_type: String,
}
