//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for the requests that operate on that entity
//! - Enriched response shapes (entity plus tags, previews, layers)

pub mod calendar;
pub mod item;
pub mod outfit;
pub mod tag;
pub mod user;
