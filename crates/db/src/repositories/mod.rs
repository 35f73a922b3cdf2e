//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods suffixed `_tx`
//! take an open transaction instead, so callers can compose several
//! writes into one atomic unit.

pub mod calendar_repo;
pub mod item_repo;
pub mod outfit_repo;
pub mod relation_repo;
pub mod tag_repo;
pub mod user_repo;

pub use calendar_repo::CalendarRepo;
pub use item_repo::ItemRepo;
pub use outfit_repo::OutfitRepo;
pub use relation_repo::RelationRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
