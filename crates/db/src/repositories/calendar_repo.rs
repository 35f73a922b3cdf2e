//! Repository for the `calendar_entries` table.

use chrono::NaiveDate;
use sqlx::PgPool;
use wardrobe_core::types::DbId;

use crate::models::calendar::{CalendarEntry, CalendarEntryJoined};

/// Column list for `calendar_entries` queries.
const ENTRY_COLUMNS: &str = "id, owner_id, outfit_id, entry_date, created_at";

/// Provides CRUD operations for calendar entries.
pub struct CalendarRepo;

impl CalendarRepo {
    /// Assign an outfit to a day. No uniqueness applies: the same outfit
    /// may repeat, and a day may hold several entries.
    pub async fn insert(
        pool: &PgPool,
        owner_id: DbId,
        outfit_id: DbId,
        entry_date: NaiveDate,
    ) -> Result<CalendarEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_entries (owner_id, outfit_id, entry_date) \
             VALUES ($1, $2, $3) \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(owner_id)
            .bind(outfit_id)
            .bind(entry_date)
            .fetch_one(pool)
            .await
    }

    /// Entries for one owner between two dates inclusive, joined with
    /// their outfits, oldest day first.
    pub async fn entries_between(
        pool: &PgPool,
        owner_id: DbId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<CalendarEntryJoined>, sqlx::Error> {
        sqlx::query_as::<_, CalendarEntryJoined>(
            "SELECT c.id, c.outfit_id, c.entry_date, \
                    o.name AS outfit_name, o.weather AS outfit_weather, \
                    o.temperature AS outfit_temperature, \
                    o.bg_color AS outfit_bg_color, \
                    o.image_url AS outfit_image_url \
             FROM calendar_entries c \
             JOIN outfits o ON o.id = c.outfit_id \
             WHERE c.owner_id = $1 AND c.entry_date BETWEEN $2 AND $3 \
             ORDER BY c.entry_date, c.id",
        )
        .bind(owner_id)
        .bind(first)
        .bind(last)
        .fetch_all(pool)
        .await
    }

    /// Remove an entry unconditionally. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
