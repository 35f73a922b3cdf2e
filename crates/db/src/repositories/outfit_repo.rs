//! Repository for the `outfits` and `composition_items` tables.
//!
//! The layer stack is immutable in place: every save replaces it
//! wholesale, so there is no per-layer update surface.

use sqlx::{PgPool, Postgres, Transaction};
use wardrobe_core::tag::TagType;
use wardrobe_core::types::DbId;

use crate::models::outfit::{
    CompositionItem, NewLayer, NewOutfit, Outfit, OutfitChanges, OutfitFilter,
};

/// Column list for `outfits` queries.
const OUTFIT_COLUMNS: &str = "\
    id, owner_id, name, description, bg_color, weather, temperature, \
    image_url, created_at, updated_at";

/// Column list for `composition_items` queries.
const LAYER_COLUMNS: &str = "\
    id, outfit_id, source_item_id, image_url, pos_x, pos_y, scale, \
    rotation, z_order, flipped, locked";

/// Provides CRUD operations for outfits and their layer stacks.
pub struct OutfitRepo;

impl OutfitRepo {
    // -----------------------------------------------------------------------
    // Outfit CRUD
    // -----------------------------------------------------------------------

    /// Insert a new outfit, within a transaction.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        outfit: &NewOutfit,
    ) -> Result<Outfit, sqlx::Error> {
        let query = format!(
            "INSERT INTO outfits \
                 (owner_id, name, description, bg_color, weather, temperature, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {OUTFIT_COLUMNS}"
        );
        sqlx::query_as::<_, Outfit>(&query)
            .bind(outfit.owner_id)
            .bind(&outfit.name)
            .bind(&outfit.description)
            .bind(&outfit.bg_color)
            .bind(&outfit.weather)
            .bind(&outfit.temperature)
            .bind(outfit.image_url.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an outfit by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Outfit>, sqlx::Error> {
        let query = format!("SELECT {OUTFIT_COLUMNS} FROM outfits WHERE id = $1");
        sqlx::query_as::<_, Outfit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check that an outfit exists and belongs to `owner_id`.
    pub async fn verify_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM outfits WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    /// Update an outfit's scalar fields, within a transaction.
    ///
    /// Returns `None` if no outfit with the given ID exists.
    pub async fn update_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        changes: &OutfitChanges,
    ) -> Result<Option<Outfit>, sqlx::Error> {
        let query = format!(
            "UPDATE outfits SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 bg_color = COALESCE($4, bg_color), \
                 weather = COALESCE($5, weather), \
                 temperature = COALESCE($6, temperature), \
                 image_url = COALESCE($7, image_url), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {OUTFIT_COLUMNS}"
        );
        sqlx::query_as::<_, Outfit>(&query)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.bg_color.as_deref())
            .bind(changes.weather.as_deref())
            .bind(changes.temperature.as_deref())
            .bind(changes.image_url.as_deref())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete an outfit, within a transaction.
    ///
    /// Layers and calendar entries go with it via cascade. Returns `true`
    /// if a row was deleted.
    pub async fn delete_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM outfits WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Composition (layer stack)
    // -----------------------------------------------------------------------

    /// Replace an outfit's layer stack wholesale, within a transaction.
    ///
    /// The delete takes the outfit's layer rows' locks first, so two
    /// concurrent saves serialize and the loser's stack wins whole, never
    /// interleaved.
    pub async fn replace_composition_tx(
        tx: &mut Transaction<'_, Postgres>,
        outfit_id: DbId,
        layers: &[NewLayer],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM composition_items WHERE outfit_id = $1")
            .bind(outfit_id)
            .execute(&mut **tx)
            .await?;

        for layer in layers {
            sqlx::query(
                "INSERT INTO composition_items \
                     (outfit_id, source_item_id, image_url, pos_x, pos_y, scale, \
                      rotation, z_order, flipped, locked) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(outfit_id)
            .bind(layer.source_item_id)
            .bind(&layer.image_url)
            .bind(layer.pos_x)
            .bind(layer.pos_y)
            .bind(layer.scale)
            .bind(layer.rotation)
            .bind(layer.z_order)
            .bind(layer.flipped)
            .bind(layer.locked)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// An outfit's layers, bottom first.
    pub async fn composition_for(
        pool: &PgPool,
        outfit_id: DbId,
    ) -> Result<Vec<CompositionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LAYER_COLUMNS} FROM composition_items \
             WHERE outfit_id = $1 \
             ORDER BY z_order ASC, id ASC"
        );
        sqlx::query_as::<_, CompositionItem>(&query)
            .bind(outfit_id)
            .fetch_all(pool)
            .await
    }

    /// Layers for a batch of outfits, for filling list previews.
    /// Grouped by outfit, bottom layer first within each.
    pub async fn compositions_for(
        pool: &PgPool,
        outfit_ids: &[DbId],
    ) -> Result<Vec<CompositionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LAYER_COLUMNS} FROM composition_items \
             WHERE outfit_id = ANY($1) \
             ORDER BY outfit_id, z_order ASC, id ASC"
        );
        sqlx::query_as::<_, CompositionItem>(&query)
            .bind(outfit_ids)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Two-phase listing
    // -----------------------------------------------------------------------

    /// Phase one: the full ordered id set matching a filter.
    ///
    /// Tag filters are OR within a type and AND across types. Newest
    /// outfits first, ties broken by id so pages never shuffle.
    pub async fn list_ids(pool: &PgPool, filter: &OutfitFilter) -> Result<Vec<DbId>, sqlx::Error> {
        let mut conditions = vec!["owner_id = $1".to_string()];
        let mut bind_idx = 2u32;

        let mut tag_filters: Vec<(TagType, &[DbId])> = Vec::new();
        for (tag_type, ids) in [
            (TagType::Scene, filter.scene_ids.as_slice()),
            (TagType::Season, filter.season_ids.as_slice()),
        ] {
            if !ids.is_empty() {
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM entity_tag_relation r \
                     JOIN tags t ON t.id = r.tag_id \
                     WHERE r.entity_id = outfits.id AND r.entity_kind = 'OUTFIT' \
                       AND t.tag_type = ${} AND r.tag_id = ANY(${}))",
                    bind_idx,
                    bind_idx + 1,
                ));
                bind_idx += 2;
                tag_filters.push((tag_type, ids));
            }
        }
        if filter.keyword.is_some() {
            conditions.push(format!(
                "(name ILIKE ${bind_idx} OR description ILIKE ${bind_idx})"
            ));
        }

        let query = format!(
            "SELECT id FROM outfits WHERE {} ORDER BY created_at DESC, id ASC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_scalar::<_, DbId>(&query).bind(filter.owner_id);
        for (tag_type, ids) in tag_filters {
            q = q.bind(tag_type.as_str()).bind(ids);
        }
        if let Some(ref keyword) = filter.keyword {
            q = q.bind(format!("%{keyword}%"));
        }
        q.fetch_all(pool).await
    }

    /// Phase two: full rows for one page of ids, in the given order.
    pub async fn fetch_ordered(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Outfit>, sqlx::Error> {
        let query = format!(
            "SELECT {OUTFIT_COLUMNS} FROM outfits \
             WHERE id = ANY($1) \
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Outfit>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
