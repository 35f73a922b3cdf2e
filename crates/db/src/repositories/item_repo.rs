//! Repository for the `items` table.
//!
//! Listing is two-phase: phase one resolves the full ordered id set for a
//! filter (its length is the unpaginated total), phase two fetches full
//! rows for the requested page, preserving order.

use sqlx::{PgPool, Postgres, Transaction};
use wardrobe_core::tag::TagType;
use wardrobe_core::types::DbId;

use crate::models::item::{Item, ItemFilter, NewItem, UpdateItemRequest};

/// Column list for `items` queries.
const ITEM_COLUMNS: &str = "\
    id, owner_id, name, image_url, price, wear_count, cost_per_wear, \
    color, material, location, notes, created_at";

/// Provides CRUD operations for wardrobe items.
pub struct ItemRepo;

impl ItemRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new item, within a transaction.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        item: &NewItem,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (owner_id, name, image_url, price, color, material, location, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(item.owner_id)
            .bind(&item.name)
            .bind(&item.image_url)
            .bind(item.price)
            .bind(item.color.as_deref())
            .bind(item.material.as_deref())
            .bind(item.location.as_deref())
            .bind(item.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an item's scalar fields, within a transaction.
    ///
    /// Returns `None` if no item with the given ID exists.
    pub async fn update_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        changes: &UpdateItemRequest,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET \
                 name = COALESCE($2, name), \
                 image_url = COALESCE($3, image_url), \
                 price = COALESCE($4, price), \
                 wear_count = COALESCE($5, wear_count), \
                 color = COALESCE($6, color), \
                 material = COALESCE($7, material), \
                 location = COALESCE($8, location), \
                 notes = COALESCE($9, notes) \
             WHERE id = $1 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.image_url.as_deref())
            .bind(changes.price)
            .bind(changes.wear_count)
            .bind(changes.color.as_deref())
            .bind(changes.material.as_deref())
            .bind(changes.location.as_deref())
            .bind(changes.notes.as_deref())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete items owned by `owner_id`, returning the `(id, image_url)`
    /// pairs of the deleted rows for relation and blob cleanup. Ids owned
    /// by someone else are skipped.
    pub async fn delete_batch_tx(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, String)>(
            "DELETE FROM items WHERE owner_id = $1 AND id = ANY($2) RETURNING id, image_url",
        )
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&mut **tx)
        .await
    }

    /// Delete one item regardless of owner, returning its `image_url` for
    /// blob cleanup, or `None` if the id is unknown.
    pub async fn delete_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("DELETE FROM items WHERE id = $1 RETURNING image_url")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Current image URLs for a set of items (layer snapshot resolution).
    /// Deleted items are simply absent from the result.
    pub async fn images_for_tx(
        tx: &mut Transaction<'_, Postgres>,
        ids: &[DbId],
    ) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, String)>("SELECT id, image_url FROM items WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&mut **tx)
            .await
    }

    // -----------------------------------------------------------------------
    // Two-phase listing
    // -----------------------------------------------------------------------

    /// Phase one: the full ordered id set matching a filter.
    ///
    /// Tag filters are OR within a type (any of the ids matches) and AND
    /// across types (one EXISTS per type). Newest items first.
    pub async fn list_ids(pool: &PgPool, filter: &ItemFilter) -> Result<Vec<DbId>, sqlx::Error> {
        let mut conditions = vec!["owner_id = $1".to_string()];
        let mut bind_idx = 2u32;

        let mut tag_filters: Vec<(TagType, &[DbId])> = Vec::new();
        for (tag_type, ids) in [
            (TagType::Category, filter.category_ids.as_slice()),
            (TagType::Scene, filter.scene_ids.as_slice()),
            (TagType::Season, filter.season_ids.as_slice()),
        ] {
            if !ids.is_empty() {
                conditions.push(format!(
                    "EXISTS (SELECT 1 FROM entity_tag_relation r \
                     JOIN tags t ON t.id = r.tag_id \
                     WHERE r.entity_id = items.id AND r.entity_kind = 'ITEM' \
                       AND t.tag_type = ${} AND r.tag_id = ANY(${}))",
                    bind_idx,
                    bind_idx + 1,
                ));
                bind_idx += 2;
                tag_filters.push((tag_type, ids));
            }
        }
        if filter.color.is_some() {
            conditions.push(format!("color ILIKE ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.keyword.is_some() {
            conditions.push(format!(
                "(name ILIKE ${bind_idx} OR color ILIKE ${bind_idx} OR notes ILIKE ${bind_idx})"
            ));
        }

        let query = format!(
            "SELECT id FROM items WHERE {} ORDER BY id DESC",
            conditions.join(" AND ")
        );

        let mut q = sqlx::query_scalar::<_, DbId>(&query).bind(filter.owner_id);
        for (tag_type, ids) in tag_filters {
            q = q.bind(tag_type.as_str()).bind(ids);
        }
        if let Some(ref color) = filter.color {
            q = q.bind(format!("%{color}%"));
        }
        if let Some(ref keyword) = filter.keyword {
            q = q.bind(format!("%{keyword}%"));
        }
        q.fetch_all(pool).await
    }

    /// Phase two: full rows for one page of ids, in the given order.
    pub async fn fetch_ordered(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE id = ANY($1) \
             ORDER BY array_position($1, id)"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
