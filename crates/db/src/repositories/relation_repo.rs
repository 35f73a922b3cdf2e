//! Repository for the `entity_tag_relation` junction table.
//!
//! Guards the coverage rule: every eligible (entity, tag type) pair holds
//! at least one tag, with the reserved fallback standing in when no real
//! tag applies, and never standing next to one.

use sqlx::{PgPool, Postgres, Transaction};
use wardrobe_core::tag::{EntityKind, EntityRef, TagType};
use wardrobe_core::types::DbId;

use crate::models::tag::EntityTagRow;
use crate::repositories::tag_repo::TagRepo;

/// Provides tag attachment, replacement, and lookups across entity kinds.
pub struct RelationRepo;

impl RelationRepo {
    // -----------------------------------------------------------------------
    // Replacement
    // -----------------------------------------------------------------------

    /// Replace an entity's tags of one type wholesale.
    ///
    /// Ids that do not exist, or that belong to a different type, are
    /// silently dropped. When nothing real remains, the type's fallback
    /// tag is attached instead so the entity stays covered.
    pub async fn set_tags_tx(
        tx: &mut Transaction<'_, Postgres>,
        entity: EntityRef,
        tag_type: TagType,
        tag_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "DELETE FROM entity_tag_relation AS r \
             USING tags AS t \
             WHERE t.id = r.tag_id \
               AND r.entity_id = $1 AND r.entity_kind = $2 AND t.tag_type = $3",
        )
        .bind(entity.id)
        .bind(entity.kind.as_str())
        .bind(tag_type.as_str())
        .execute(&mut **tx)
        .await?;

        let mut inserted = 0;
        if !tag_ids.is_empty() {
            inserted = sqlx::query(
                "INSERT INTO entity_tag_relation (entity_id, entity_kind, tag_id) \
                 SELECT $1, $2, t.id FROM tags t \
                 WHERE t.id = ANY($3) AND t.tag_type = $4 \
                 ON CONFLICT DO NOTHING",
            )
            .bind(entity.id)
            .bind(entity.kind.as_str())
            .bind(tag_ids)
            .bind(tag_type.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();
        }

        if inserted == 0 {
            Self::attach_fallback_tx(tx, entity, tag_type).await?;
        }
        Ok(())
    }

    /// Attach the type's fallback tag, when the catalog has one.
    async fn attach_fallback_tx(
        tx: &mut Transaction<'_, Postgres>,
        entity: EntityRef,
        tag_type: TagType,
    ) -> Result<(), sqlx::Error> {
        let Some(fallback) = TagRepo::fallback_for_tx(tx, tag_type).await? else {
            tracing::debug!(
                tag_type = tag_type.as_str(),
                entity_id = entity.id,
                "No fallback tag in catalog; leaving entity uncovered"
            );
            return Ok(());
        };
        sqlx::query(
            "INSERT INTO entity_tag_relation (entity_id, entity_kind, tag_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(entity.id)
        .bind(entity.kind.as_str())
        .bind(fallback.id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Batch attachment
    // -----------------------------------------------------------------------

    /// Attach tags to many entities at once.
    ///
    /// Idempotent: pairs already present are skipped, as are tag ids and
    /// entity ids that do not exist. Returns the number of new relations.
    pub async fn add_if_absent_tx(
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
        entity_ids: &[DbId],
        tag_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let query = format!(
            "INSERT INTO entity_tag_relation (entity_id, entity_kind, tag_id) \
             SELECT e.id, $2, t.id \
             FROM UNNEST($1::bigint[]) AS e(id) \
             JOIN {} ON {}.id = e.id \
             CROSS JOIN tags t \
             WHERE t.id = ANY($3) \
             ON CONFLICT DO NOTHING",
            entity_table(kind),
            entity_table(kind),
        );
        let result = sqlx::query(&query)
            .bind(entity_ids)
            .bind(kind.as_str())
            .bind(tag_ids)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove fallback relations that real tags have displaced.
    ///
    /// After a batch attach, an entity may hold both the fallback tag and
    /// a real tag of the same type; the fallback loses.
    pub async fn reconcile_fallback_tx(
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
        entity_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "WITH fallback AS ( \
                 SELECT id, tag_type FROM tags \
                 WHERE (tag_type = 'CATEGORY' AND name = ANY($3)) \
                    OR (tag_type = 'SCENE' AND name = ANY($4)) \
                    OR (tag_type = 'SEASON' AND name = ANY($5)) \
             ) \
             DELETE FROM entity_tag_relation AS r \
             USING fallback AS f \
             WHERE f.id = r.tag_id \
               AND r.entity_kind = $1 AND r.entity_id = ANY($2) \
               AND EXISTS ( \
                   SELECT 1 FROM entity_tag_relation r2 \
                   JOIN tags t2 ON t2.id = r2.tag_id \
                   WHERE r2.entity_id = r.entity_id \
                     AND r2.entity_kind = r.entity_kind \
                     AND t2.tag_type = f.tag_type \
                     AND t2.id NOT IN (SELECT id FROM fallback))",
        )
        .bind(kind.as_str())
        .bind(entity_ids)
        .bind(fallback_names_owned(TagType::Category))
        .bind(fallback_names_owned(TagType::Scene))
        .bind(fallback_names_owned(TagType::Season))
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// All tag rows for one entity.
    pub async fn tags_for_entity(
        pool: &PgPool,
        entity: EntityRef,
    ) -> Result<Vec<EntityTagRow>, sqlx::Error> {
        sqlx::query_as::<_, EntityTagRow>(
            "SELECT r.entity_id, t.id AS tag_id, t.tag_type, t.name \
             FROM entity_tag_relation r \
             JOIN tags t ON t.id = r.tag_id \
             WHERE r.entity_kind = $1 AND r.entity_id = $2 \
             ORDER BY t.id",
        )
        .bind(entity.kind.as_str())
        .bind(entity.id)
        .fetch_all(pool)
        .await
    }

    /// Tag rows for a batch of entities, for filling list responses.
    pub async fn tags_for_entities(
        pool: &PgPool,
        kind: EntityKind,
        entity_ids: &[DbId],
    ) -> Result<Vec<EntityTagRow>, sqlx::Error> {
        sqlx::query_as::<_, EntityTagRow>(
            "SELECT r.entity_id, t.id AS tag_id, t.tag_type, t.name \
             FROM entity_tag_relation r \
             JOIN tags t ON t.id = r.tag_id \
             WHERE r.entity_kind = $1 AND r.entity_id = ANY($2) \
             ORDER BY r.entity_id, t.id",
        )
        .bind(kind.as_str())
        .bind(entity_ids)
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Cleanup
    // -----------------------------------------------------------------------

    /// Drop every relation a batch of entities holds. Used when deleting
    /// the entities themselves.
    pub async fn delete_for_entities_tx(
        tx: &mut Transaction<'_, Postgres>,
        kind: EntityKind,
        entity_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM entity_tag_relation WHERE entity_kind = $1 AND entity_id = ANY($2)")
                .bind(kind.as_str())
                .bind(entity_ids)
                .execute(&mut **tx)
                .await?;
        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The table holding entities of this kind.
fn entity_table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Item => "items",
        EntityKind::Outfit => "outfits",
    }
}

/// Owned fallback name list for array binding.
fn fallback_names_owned(tag_type: TagType) -> Vec<String> {
    tag_type
        .fallback_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
