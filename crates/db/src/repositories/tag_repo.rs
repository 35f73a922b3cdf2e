//! Repository for the `tags` table.
//!
//! Provides catalog CRUD, fallback lookup, and batch deletion. Deletion
//! restores coverage: an entity stripped of its last tag of a type gets
//! that type's fallback tag back inside the same transaction.

use sqlx::{PgPool, Postgres, Transaction};
use wardrobe_core::tag::TagType;
use wardrobe_core::types::DbId;

use crate::models::tag::Tag;

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, tag_type, name, created_by, created_at";

/// Provides CRUD operations for the tag catalog.
pub struct TagRepo;

impl TagRepo {
    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Insert tags of one type, silently skipping names that already exist.
    ///
    /// Returns every tag matching the requested names, pre-existing ones
    /// included, so callers always see the ids behind the names they sent.
    pub async fn create_many(
        pool: &PgPool,
        tag_type: TagType,
        names: &[String],
        created_by: Option<DbId>,
    ) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query(
            "INSERT INTO tags (tag_type, name, created_by) \
             SELECT $1, n.name, $3 FROM UNNEST($2::text[]) AS n(name) \
             ON CONFLICT ON CONSTRAINT uq_tags_type_name DO NOTHING",
        )
        .bind(tag_type.as_str())
        .bind(names)
        .bind(created_by)
        .execute(pool)
        .await?;

        let query = format!(
            "SELECT {TAG_COLUMNS} FROM tags \
             WHERE tag_type = $1 AND name = ANY($2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(tag_type.as_str())
            .bind(names)
            .fetch_all(pool)
            .await
    }

    /// List all tags of one type, in catalog order.
    pub async fn list_by_type(pool: &PgPool, tag_type: TagType) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE tag_type = $1 ORDER BY id");
        sqlx::query_as::<_, Tag>(&query)
            .bind(tag_type.as_str())
            .fetch_all(pool)
            .await
    }

    /// Fetch tags by id. Unknown ids are simply absent from the result.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Tag>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Fallback lookup
    // -----------------------------------------------------------------------

    /// The fallback tag for a type, if the catalog has one.
    ///
    /// Catalogs imported from older deployments may use an alias for the
    /// fallback name; the first match in priority order wins.
    pub async fn fallback_for_tx(
        tx: &mut Transaction<'_, Postgres>,
        tag_type: TagType,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let names: Vec<String> = tag_type
            .fallback_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let query =
            format!("SELECT {TAG_COLUMNS} FROM tags WHERE tag_type = $1 AND name = ANY($2)");
        let candidates = sqlx::query_as::<_, Tag>(&query)
            .bind(tag_type.as_str())
            .bind(&names)
            .fetch_all(&mut **tx)
            .await?;

        // Priority comes from the name list, not the table.
        for name in tag_type.fallback_names() {
            if let Some(tag) = candidates.iter().find(|t| t.name == *name) {
                return Ok(Some(tag.clone()));
            }
        }
        Ok(None)
    }

    // -----------------------------------------------------------------------
    // Batch deletion
    // -----------------------------------------------------------------------

    /// Delete tags and restore fallback coverage, in one transaction.
    ///
    /// The relation cascade may strip an entity of its last tag of a type;
    /// such entities get the type's fallback tag back before the commit.
    /// Returns the number of tags deleted.
    pub async fn delete_batch(pool: &PgPool, tag_ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Capture which (entity, kind, type) groups lose a tag before the
        // cascade wipes the relation rows.
        let affected: Vec<(DbId, String, String)> = sqlx::query_as(
            "SELECT DISTINCT r.entity_id, r.entity_kind, t.tag_type \
             FROM entity_tag_relation r \
             JOIN tags t ON t.id = r.tag_id \
             WHERE r.tag_id = ANY($1)",
        )
        .bind(tag_ids)
        .fetch_all(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM tags WHERE id = ANY($1)")
            .bind(tag_ids)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for tag_type in TagType::ALL {
            let mut entity_ids = Vec::new();
            let mut entity_kinds = Vec::new();
            for (entity_id, entity_kind, affected_type) in &affected {
                if affected_type == tag_type.as_str() {
                    entity_ids.push(*entity_id);
                    entity_kinds.push(entity_kind.clone());
                }
            }
            if entity_ids.is_empty() {
                continue;
            }

            let Some(fallback) = Self::fallback_for_tx(&mut tx, tag_type).await? else {
                tracing::debug!(
                    tag_type = tag_type.as_str(),
                    "No fallback tag in catalog; skipping coverage restoration"
                );
                continue;
            };

            // Re-cover entities now holding zero tags of this type.
            sqlx::query(
                "INSERT INTO entity_tag_relation (entity_id, entity_kind, tag_id) \
                 SELECT e.entity_id, e.entity_kind, $3 \
                 FROM UNNEST($1::bigint[], $2::text[]) AS e(entity_id, entity_kind) \
                 WHERE NOT EXISTS ( \
                     SELECT 1 FROM entity_tag_relation r \
                     JOIN tags t ON t.id = r.tag_id \
                     WHERE r.entity_id = e.entity_id \
                       AND r.entity_kind = e.entity_kind \
                       AND t.tag_type = $4) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(&entity_ids)
            .bind(&entity_kinds)
            .bind(fallback.id)
            .bind(tag_type.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(deleted)
    }
}
