//! Tag taxonomy shared by wardrobe items and outfits.
//!
//! Tags are grouped into a closed set of types. Each entity kind is eligible
//! for a fixed subset of those types, and every eligible (entity, type) pair
//! must always hold at least one tag: when a caller supplies none, the
//! reserved fallback tag for that type stands in. An entity therefore never
//! mixes the fallback tag with real tags of the same type.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Tag types
// ---------------------------------------------------------------------------

/// The closed set of tag types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagType {
    Category,
    Scene,
    Season,
}

impl TagType {
    /// All tag types, in the order tag groups appear in API responses.
    pub const ALL: [TagType; 3] = [TagType::Category, TagType::Scene, TagType::Season];

    /// Database and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TagType::Category => "CATEGORY",
            TagType::Scene => "SCENE",
            TagType::Season => "SEASON",
        }
    }

    /// Parse the database / wire representation.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "CATEGORY" => Ok(TagType::Category),
            "SCENE" => Ok(TagType::Scene),
            "SEASON" => Ok(TagType::Season),
            other => Err(CoreError::Validation(format!(
                "Unknown tag type: '{other}'. Valid types: CATEGORY, SCENE, SEASON"
            ))),
        }
    }

    /// Reserved fallback tag names for this type, in lookup priority order.
    ///
    /// The seed catalog creates the first name of each list; the aliases
    /// match catalogs imported from older deployments. A catalog missing
    /// all of them simply has no fallback for that type.
    pub fn fallback_names(self) -> &'static [&'static str] {
        match self {
            TagType::Category => &["未分类", "Uncategorized"],
            TagType::Scene => &["不限场景", "Anywhere"],
            TagType::Season => &["四季", "All seasons"],
        }
    }

    /// Returns `true` if `name` is a reserved fallback name for this type.
    pub fn is_fallback_name(self, name: &str) -> bool {
        self.fallback_names().contains(&name)
    }
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The closed set of taggable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Item,
    Outfit,
}

impl EntityKind {
    /// Database and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Item => "ITEM",
            EntityKind::Outfit => "OUTFIT",
        }
    }

    /// Tag types entities of this kind can carry.
    ///
    /// Outfits have no category dimension: their composition already says
    /// what they are made of.
    pub fn eligible_tag_types(self) -> &'static [TagType] {
        match self {
            EntityKind::Item => &[TagType::Category, TagType::Scene, TagType::Season],
            EntityKind::Outfit => &[TagType::Scene, TagType::Season],
        }
    }

    /// Returns `true` if entities of this kind can carry `tag_type` tags.
    pub fn is_eligible(self, tag_type: TagType) -> bool {
        self.eligible_tag_types().contains(&tag_type)
    }
}

/// A (kind, id) pair identifying one taggable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: DbId,
}

impl EntityRef {
    pub fn item(id: DbId) -> Self {
        Self {
            kind: EntityKind::Item,
            id,
        }
    }

    pub fn outfit(id: DbId) -> Self {
        Self {
            kind: EntityKind::Outfit,
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

/// Split a comma- or newline-separated list of tag names.
///
/// Names are trimmed; empty segments and duplicates (after trimming) are
/// dropped, preserving first-seen order.
pub fn split_tag_names(raw: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for segment in raw.split(|c| c == ',' || c == '\n') {
        let name = segment.trim();
        if name.is_empty() || seen.iter().any(|s| s == name) {
            continue;
        }
        seen.push(name.to_string());
    }
    seen
}

/// Parse a comma-separated list of ids (e.g. `"3,7,12"`).
///
/// Empty segments are skipped so trailing commas are harmless. A segment
/// that is not an integer is a validation error.
pub fn parse_id_list(raw: &str) -> Result<Vec<DbId>, CoreError> {
    let mut ids = Vec::new();
    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let id: DbId = segment
            .parse()
            .map_err(|_| CoreError::Validation(format!("Invalid id in list: '{segment}'")))?;
        ids.push(id);
    }
    Ok(ids)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
