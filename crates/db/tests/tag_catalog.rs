//! Integration tests for the tag catalog repository.
//!
//! Exercises `TagRepo` against a real database to verify that:
//! - Batch creation is idempotent and leaves existing rows untouched
//! - Fallback resolution walks the reserved name list in priority order
//! - Deleting tags restores fallback coverage for every stripped entity
//! - A catalog missing its fallback tag skips coverage without failing

use rust_decimal::Decimal;
use sqlx::PgPool;
use wardrobe_core::tag::{EntityRef, TagType};
use wardrobe_core::types::DbId;
use wardrobe_db::models::item::NewItem;
use wardrobe_db::models::outfit::NewOutfit;
use wardrobe_db::repositories::{ItemRepo, OutfitRepo, RelationRepo, TagRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn demo_user(pool: &PgPool) -> DbId {
    sqlx::query_scalar("SELECT id FROM users WHERE account = 'demo'")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seeded_tag(pool: &PgPool, tag_type: TagType, name: &str) -> DbId {
    sqlx::query_scalar("SELECT id FROM tags WHERE tag_type = $1 AND name = $2")
        .bind(tag_type.as_str())
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn drop_tag_row(pool: &PgPool, tag_type: TagType, name: &str) {
    sqlx::query("DELETE FROM tags WHERE tag_type = $1 AND name = $2")
        .bind(tag_type.as_str())
        .bind(name)
        .execute(pool)
        .await
        .unwrap();
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn new_item(owner_id: DbId) -> NewItem {
    NewItem {
        owner_id,
        name: "白色T恤".to_string(),
        image_url: "https://cdn.example.com/items/tee.jpg".to_string(),
        price: Decimal::new(9900, 2),
        color: None,
        material: None,
        location: None,
        notes: None,
    }
}

fn new_outfit(owner_id: DbId) -> NewOutfit {
    NewOutfit {
        owner_id,
        name: "周末穿搭".to_string(),
        description: String::new(),
        bg_color: "#FFFFFF".to_string(),
        weather: String::new(),
        temperature: String::new(),
        image_url: None,
    }
}

/// Insert an item holding exactly the given category tags.
async fn item_with_categories(pool: &PgPool, owner_id: DbId, tag_ids: &[DbId]) -> DbId {
    let mut tx = pool.begin().await.unwrap();
    let item = ItemRepo::insert_tx(&mut tx, &new_item(owner_id)).await.unwrap();
    RelationRepo::set_tags_tx(&mut tx, EntityRef::item(item.id), TagType::Category, tag_ids)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    item.id
}

/// Insert an outfit holding exactly the given scene tags.
async fn outfit_with_scenes(pool: &PgPool, owner_id: DbId, tag_ids: &[DbId]) -> DbId {
    let mut tx = pool.begin().await.unwrap();
    let outfit = OutfitRepo::insert_tx(&mut tx, &new_outfit(owner_id)).await.unwrap();
    RelationRepo::set_tags_tx(&mut tx, EntityRef::outfit(outfit.id), TagType::Scene, tag_ids)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    outfit.id
}

async fn tag_names_of(pool: &PgPool, entity: EntityRef) -> Vec<String> {
    RelationRepo::tags_for_entity(pool, entity)
        .await
        .unwrap()
        .into_iter()
        .map(|row| row.name)
        .collect()
}

// ---------------------------------------------------------------------------
// Test: create_many inserts new rows with attribution
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_many_inserts_with_attribution(pool: PgPool) {
    let user = demo_user(&pool).await;

    let tags = TagRepo::create_many(&pool, TagType::Scene, &names(&["海边", "爬山"]), Some(user))
        .await
        .unwrap();

    assert_eq!(tags.len(), 2);
    for tag in &tags {
        assert_eq!(tag.tag_type, "SCENE");
        assert_eq!(tag.created_by, Some(user));
    }
    let mut got: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    got.sort_unstable();
    assert_eq!(got, vec!["海边", "爬山"]);
}

// ---------------------------------------------------------------------------
// Test: create_many is idempotent over existing names
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_many_is_idempotent(pool: PgPool) {
    let user = demo_user(&pool).await;

    let first = TagRepo::create_many(&pool, TagType::Category, &names(&["西装"]), Some(user))
        .await
        .unwrap();
    let original_id = first[0].id;

    let second =
        TagRepo::create_many(&pool, TagType::Category, &names(&["西装", "正装"]), Some(user))
            .await
            .unwrap();

    assert_eq!(second.len(), 2);
    let resubmitted = second.iter().find(|t| t.name == "西装").unwrap();
    assert_eq!(
        resubmitted.id, original_id,
        "resubmitting a name should return the existing row"
    );
}

// ---------------------------------------------------------------------------
// Test: create_many leaves seed rows untouched on conflict
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_many_keeps_seed_rows_untouched(pool: PgPool) {
    let user = demo_user(&pool).await;

    let tags = TagRepo::create_many(&pool, TagType::Category, &names(&["上衣"]), Some(user))
        .await
        .unwrap();

    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "上衣");
    assert_eq!(
        tags[0].created_by, None,
        "conflicting insert must not overwrite the seed row's attribution"
    );
}

// ---------------------------------------------------------------------------
// Test: same name may exist under different types
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_same_name_allowed_across_types(pool: PgPool) {
    let scene = TagRepo::create_many(&pool, TagType::Scene, &names(&["度假"]), None)
        .await
        .unwrap();
    let season = TagRepo::create_many(&pool, TagType::Season, &names(&["度假"]), None)
        .await
        .unwrap();

    assert_ne!(
        scene[0].id, season[0].id,
        "uniqueness is per (type, name), not per name"
    );
}

// ---------------------------------------------------------------------------
// Test: list_by_type returns the seed catalog in id order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_by_type_returns_seed_in_id_order(pool: PgPool) {
    let tags = TagRepo::list_by_type(&pool, TagType::Category).await.unwrap();

    assert_eq!(tags.len(), 8);
    assert_eq!(tags[0].name, "未分类", "fallback tag is seeded first");
    assert!(tags.windows(2).all(|w| w[0].id < w[1].id));
    assert!(tags.iter().all(|t| t.tag_type == "CATEGORY"));
}

// ---------------------------------------------------------------------------
// Test: find_by_ids sorts ascending regardless of input order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_find_by_ids_sorts_ascending(pool: PgPool) {
    let tops = seeded_tag(&pool, TagType::Category, "上衣").await;
    let accessories = seeded_tag(&pool, TagType::Category, "配饰").await;

    let tags = TagRepo::find_by_ids(&pool, &[accessories, tops, 999_999])
        .await
        .unwrap();

    assert_eq!(tags.len(), 2, "unknown ids are simply absent");
    assert_eq!(tags[0].id, tops);
    assert_eq!(tags[1].id, accessories);
}

// ---------------------------------------------------------------------------
// Test: fallback resolution prefers the primary reserved name
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_fallback_prefers_primary_name(pool: PgPool) {
    // Both reserved names present: the first in the priority list wins.
    TagRepo::create_many(&pool, TagType::Category, &names(&["Uncategorized"]), None)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let fallback = TagRepo::fallback_for_tx(&mut tx, TagType::Category)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fallback.name, "未分类");
}

// ---------------------------------------------------------------------------
// Test: fallback resolution falls through to the alias
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_fallback_falls_through_to_alias(pool: PgPool) {
    TagRepo::create_many(&pool, TagType::Category, &names(&["Uncategorized"]), None)
        .await
        .unwrap();
    drop_tag_row(&pool, TagType::Category, "未分类").await;

    let mut tx = pool.begin().await.unwrap();
    let fallback = TagRepo::fallback_for_tx(&mut tx, TagType::Category)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fallback.name, "Uncategorized");
}

// ---------------------------------------------------------------------------
// Test: fallback resolution returns None when the catalog has none
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_fallback_none_when_catalog_lacks_one(pool: PgPool) {
    drop_tag_row(&pool, TagType::Category, "未分类").await;

    let mut tx = pool.begin().await.unwrap();
    let fallback = TagRepo::fallback_for_tx(&mut tx, TagType::Category)
        .await
        .unwrap();
    assert!(fallback.is_none());
}

// ---------------------------------------------------------------------------
// Test: delete_batch restores fallback coverage for items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_batch_restores_item_coverage(pool: PgPool) {
    let user = demo_user(&pool).await;
    let tops = seeded_tag(&pool, TagType::Category, "上衣").await;
    let item_id = item_with_categories(&pool, user, &[tops]).await;

    let deleted = TagRepo::delete_batch(&pool, &[tops]).await.unwrap();
    assert_eq!(deleted, 1);

    assert_eq!(
        tag_names_of(&pool, EntityRef::item(item_id)).await,
        vec!["未分类"],
        "stripped item should fall back rather than lose its category"
    );
}

// ---------------------------------------------------------------------------
// Test: delete_batch restores coverage for every affected kind
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_batch_restores_coverage_across_kinds(pool: PgPool) {
    let user = demo_user(&pool).await;
    let date_night = seeded_tag(&pool, TagType::Scene, "约会").await;
    let item_id = item_with_categories(&pool, user, &[]).await;
    let outfit_id = outfit_with_scenes(&pool, user, &[date_night]).await;

    // Give the item the same scene tag the outfit holds.
    let mut tx = pool.begin().await.unwrap();
    RelationRepo::set_tags_tx(&mut tx, EntityRef::item(item_id), TagType::Scene, &[date_night])
        .await
        .unwrap();
    tx.commit().await.unwrap();

    TagRepo::delete_batch(&pool, &[date_night]).await.unwrap();

    let item_tags = tag_names_of(&pool, EntityRef::item(item_id)).await;
    assert!(item_tags.contains(&"不限场景".to_string()));
    assert_eq!(
        tag_names_of(&pool, EntityRef::outfit(outfit_id)).await,
        vec!["不限场景"]
    );
}

// ---------------------------------------------------------------------------
// Test: delete_batch leaves still-covered groups alone
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_batch_leaves_covered_groups_alone(pool: PgPool) {
    let user = demo_user(&pool).await;
    let tops = seeded_tag(&pool, TagType::Category, "上衣").await;
    let coats = seeded_tag(&pool, TagType::Category, "外套").await;
    let item_id = item_with_categories(&pool, user, &[tops, coats]).await;

    TagRepo::delete_batch(&pool, &[tops]).await.unwrap();

    assert_eq!(
        tag_names_of(&pool, EntityRef::item(item_id)).await,
        vec!["外套"],
        "a group that still holds a real tag gets no fallback"
    );
}

// ---------------------------------------------------------------------------
// Test: delete_batch skips entities when the catalog has no fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_batch_skips_when_fallback_missing(pool: PgPool) {
    let user = demo_user(&pool).await;
    let tops = seeded_tag(&pool, TagType::Category, "上衣").await;
    let item_id = item_with_categories(&pool, user, &[tops]).await;

    drop_tag_row(&pool, TagType::Category, "未分类").await;

    let deleted = TagRepo::delete_batch(&pool, &[tops]).await.unwrap();
    assert_eq!(deleted, 1, "the delete itself must still go through");

    assert!(
        tag_names_of(&pool, EntityRef::item(item_id)).await.is_empty(),
        "with no fallback in the catalog the item is left uncovered"
    );
}

// ---------------------------------------------------------------------------
// Test: delete_batch counts only rows that existed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_batch_ignores_unknown_ids(pool: PgPool) {
    let deleted = TagRepo::delete_batch(&pool, &[999_999]).await.unwrap();
    assert_eq!(deleted, 0);
}
