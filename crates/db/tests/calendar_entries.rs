//! Integration tests for the calendar repository.
//!
//! Exercises `CalendarRepo` against a real database to verify that:
//! - A day may hold several entries and an outfit may repeat
//! - Range queries are inclusive on both bounds, ordered by day then id
//! - Joined rows carry the outfit's name, display fields, and snapshot
//! - Deletion is unconditional and reports whether a row existed

use chrono::NaiveDate;
use sqlx::PgPool;
use wardrobe_core::types::DbId;
use wardrobe_db::models::outfit::NewOutfit;
use wardrobe_db::repositories::{CalendarRepo, OutfitRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn demo_user(pool: &PgPool) -> DbId {
    sqlx::query_scalar("SELECT id FROM users WHERE account = 'demo'")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn insert_outfit(pool: &PgPool, owner_id: DbId, name: &str) -> DbId {
    let mut tx = pool.begin().await.unwrap();
    let row = OutfitRepo::insert_tx(
        &mut tx,
        &NewOutfit {
            owner_id,
            name: name.to_string(),
            description: String::new(),
            bg_color: "#FFFFFF".to_string(),
            weather: String::new(),
            temperature: String::new(),
            image_url: Some("https://cdn.example.com/previews/fixture.png".to_string()),
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();
    row.id
}

fn day(year: i32, month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, d).unwrap()
}

// ---------------------------------------------------------------------------
// Test: no uniqueness constraint applies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_insert_allows_repeats_on_a_day(pool: PgPool) {
    let user = demo_user(&pool).await;
    let outfit = insert_outfit(&pool, user, "重复穿").await;
    let date = day(2026, 3, 14);

    let first = CalendarRepo::insert(&pool, user, outfit, date).await.unwrap();
    let second = CalendarRepo::insert(&pool, user, outfit, date).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.entry_date, date);
    assert_eq!(second.outfit_id, outfit);
}

// ---------------------------------------------------------------------------
// Test: range bounds are inclusive
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_entries_between_is_inclusive(pool: PgPool) {
    let user = demo_user(&pool).await;
    let outfit = insert_outfit(&pool, user, "三月穿搭").await;

    for date in [day(2026, 3, 1), day(2026, 3, 14), day(2026, 3, 31), day(2026, 4, 1)] {
        CalendarRepo::insert(&pool, user, outfit, date).await.unwrap();
    }

    let entries = CalendarRepo::entries_between(&pool, user, day(2026, 3, 1), day(2026, 3, 31))
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.entry_date).collect();
    assert_eq!(dates, vec![day(2026, 3, 1), day(2026, 3, 14), day(2026, 3, 31)]);
}

// ---------------------------------------------------------------------------
// Test: ordering is day first, then insertion id
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_entries_ordered_by_day_then_id(pool: PgPool) {
    let user = demo_user(&pool).await;
    let outfit = insert_outfit(&pool, user, "乱序录入").await;

    // Later day first, then two entries on an earlier day.
    let late = CalendarRepo::insert(&pool, user, outfit, day(2026, 3, 20)).await.unwrap();
    let early_a = CalendarRepo::insert(&pool, user, outfit, day(2026, 3, 10)).await.unwrap();
    let early_b = CalendarRepo::insert(&pool, user, outfit, day(2026, 3, 10)).await.unwrap();

    let entries = CalendarRepo::entries_between(&pool, user, day(2026, 3, 1), day(2026, 3, 31))
        .await
        .unwrap();

    let ids: Vec<DbId> = entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![early_a.id, early_b.id, late.id]);
}

// ---------------------------------------------------------------------------
// Test: scoped to one owner
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_entries_between_scoped_to_owner(pool: PgPool) {
    let user = demo_user(&pool).await;
    let guest: DbId =
        sqlx::query_scalar("INSERT INTO users (account, nickname) VALUES ('guest', '访客') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();
    let mine = insert_outfit(&pool, user, "我的").await;
    let theirs = insert_outfit(&pool, guest, "别人的").await;
    CalendarRepo::insert(&pool, user, mine, day(2026, 3, 5)).await.unwrap();
    CalendarRepo::insert(&pool, guest, theirs, day(2026, 3, 5)).await.unwrap();

    let entries = CalendarRepo::entries_between(&pool, user, day(2026, 3, 1), day(2026, 3, 31))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].outfit_id, mine);
}

// ---------------------------------------------------------------------------
// Test: joined rows carry the outfit snapshot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_entries_join_outfit_fields(pool: PgPool) {
    let user = demo_user(&pool).await;
    let outfit = insert_outfit(&pool, user, "周五约会").await;
    CalendarRepo::insert(&pool, user, outfit, day(2026, 3, 6)).await.unwrap();

    let entries = CalendarRepo::entries_between(&pool, user, day(2026, 3, 6), day(2026, 3, 6))
        .await
        .unwrap();

    assert_eq!(entries[0].outfit_name, "周五约会");
    assert_eq!(entries[0].outfit_bg_color, "#FFFFFF");
    assert_eq!(entries[0].outfit_weather, "");
    assert_eq!(
        entries[0].outfit_image_url.as_deref(),
        Some("https://cdn.example.com/previews/fixture.png")
    );
}

// ---------------------------------------------------------------------------
// Test: delete reports whether a row existed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_is_unconditional(pool: PgPool) {
    let user = demo_user(&pool).await;
    let outfit = insert_outfit(&pool, user, "撤掉安排").await;
    let entry = CalendarRepo::insert(&pool, user, outfit, day(2026, 3, 9)).await.unwrap();

    assert!(CalendarRepo::delete(&pool, entry.id).await.unwrap());
    assert!(!CalendarRepo::delete(&pool, entry.id).await.unwrap());

    // The outfit itself is untouched.
    assert!(OutfitRepo::find_by_id(&pool, outfit).await.unwrap().is_some());
}
