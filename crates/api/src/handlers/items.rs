//! Handlers for wardrobe items.
//!
//! Item creation accepts a multipart form so the photo uploads in the same
//! request. The image goes to object storage before the database transaction
//! opens; a failed transaction deletes the fresh upload again (see
//! [`crate::engine::coordinator`]).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use rust_decimal::Decimal;
use wardrobe_core::error::CoreError;
use wardrobe_core::tag::{parse_id_list, EntityKind, EntityRef, TagType};
use wardrobe_core::types::DbId;
use wardrobe_db::models::item::{
    BatchDeleteItemsRequest, BatchDeleteItemsResult, Item, ItemFilter, ItemListParams,
    ItemWithTags, NewItem, UpdateItemRequest,
};
use wardrobe_db::models::tag::{BatchAddTagsRequest, BatchAddTagsResult, TagGroups};
use wardrobe_db::repositories::{ItemRepo, RelationRepo, UserRepo};
use wardrobe_storage::keys;

use crate::engine::{commit_then_cleanup, upload_then_commit, PendingUpload};
use crate::error::{AppError, AppResult};
use crate::query::{page_bounds, parse_opt_ids, slice_page};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

/// Name given to items created without one.
const DEFAULT_ITEM_NAME: &str = "未命名单品";

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Accumulates the multipart fields of an item creation request.
#[derive(Default)]
struct CreateItemForm {
    owner_id: Option<DbId>,
    name: Option<String>,
    price: Option<Decimal>,
    file: Option<(String, String, Bytes)>,
    image_url: Option<String>,
    category_ids: Vec<DbId>,
    scene_ids: Vec<DbId>,
    season_ids: Vec<DbId>,
    color: Option<String>,
    material: Option<String>,
    location: Option<String>,
    notes: Option<String>,
}

/// POST /api/v1/items
///
/// Create an item from a multipart form. The image arrives either as a
/// `file` part or as a pre-uploaded `image_url`; exactly one of the two
/// must be present. Omitted tag id lists leave the item on the type's
/// fallback tag.
pub async fn create_item(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_create_form(multipart).await?;

    let owner_id = form
        .owner_id
        .ok_or_else(|| AppError::BadRequest("owner_id is required".into()))?;

    if form.file.is_some() && form.image_url.is_some() {
        return Err(AppError::BadRequest(
            "Provide either an image file or an image_url, not both".into(),
        ));
    }

    let upload = form.file.map(|(filename, content_type, bytes)| PendingUpload {
        key: keys::item_image_key(owner_id, &filename),
        bytes,
        content_type,
    });
    if upload.is_none() && form.image_url.is_none() {
        return Err(AppError::BadRequest(
            "An image file or an image_url is required".into(),
        ));
    }

    let name = form.name.unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string());
    let price = form.price.unwrap_or(Decimal::ZERO);

    let pool = &state.pool;
    let item = upload_then_commit(&state.blob_store, upload, |uploaded_url| async move {
        let image_url = match uploaded_url.or(form.image_url) {
            Some(url) => url,
            // Checked above; unreachable once an upload or URL exists.
            None => return Err(AppError::BadRequest("An image is required".into())),
        };

        let mut tx = pool.begin().await?;

        if !UserRepo::exists_tx(&mut tx, owner_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "User",
                id: owner_id,
            }));
        }

        let item = ItemRepo::insert_tx(
            &mut tx,
            &NewItem {
                owner_id,
                name,
                image_url,
                price,
                color: form.color,
                material: form.material,
                location: form.location,
                notes: form.notes,
            },
        )
        .await?;

        let entity = EntityRef::item(item.id);
        RelationRepo::set_tags_tx(&mut tx, entity, TagType::Category, &form.category_ids).await?;
        RelationRepo::set_tags_tx(&mut tx, entity, TagType::Scene, &form.scene_ids).await?;
        RelationRepo::set_tags_tx(&mut tx, entity, TagType::Season, &form.season_ids).await?;

        tx.commit().await?;
        Ok(item)
    })
    .await?;

    tracing::info!(item_id = item.id, owner_id, "Item created");

    let with_tags = with_tags(&state, item).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: with_tags })))
}

/// Drain the multipart stream into a [`CreateItemForm`].
async fn read_create_form(mut multipart: Multipart) -> AppResult<CreateItemForm> {
    let mut form = CreateItemForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if bytes.is_empty() {
                    return Err(AppError::BadRequest("Uploaded file is empty".into()));
                }
                form.file = Some((filename, content_type, bytes));
            }
            Some("image_url") => form.image_url = Some(read_text(field).await?),
            Some("owner_id") => {
                let raw = read_text(field).await?;
                form.owner_id = Some(raw.parse().map_err(|_| {
                    AppError::BadRequest(format!("owner_id must be an integer, got '{raw}'"))
                })?);
            }
            Some("name") => form.name = Some(read_text(field).await?),
            Some("price") => {
                let raw = read_text(field).await?;
                form.price = Some(raw.parse().map_err(|_| {
                    AppError::BadRequest(format!("price must be a decimal number, got '{raw}'"))
                })?);
            }
            Some("category_ids") => form.category_ids = parse_id_list(&read_text(field).await?)?,
            Some("scene_ids") => form.scene_ids = parse_id_list(&read_text(field).await?)?,
            Some("season_ids") => form.season_ids = parse_id_list(&read_text(field).await?)?,
            Some("color") => form.color = Some(read_text(field).await?),
            Some("material") => form.material = Some(read_text(field).await?),
            Some("location") => form.location = Some(read_text(field).await?),
            Some("notes") => form.notes = Some(read_text(field).await?),
            // Unknown parts are ignored so clients can evolve first.
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    let with_tags = with_tags(&state, item).await?;
    Ok(Json(DataResponse { data: with_tags }))
}

/// GET /api/v1/items
///
/// Paginated listing. Tag id filters are OR within a type and AND across
/// types; `color` and `keyword` are substring matches. `total` counts all
/// matches regardless of the requested page.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> AppResult<impl IntoResponse> {
    let filter = ItemFilter {
        owner_id: params.owner_id,
        category_ids: parse_opt_ids(params.category_ids.as_deref())?,
        scene_ids: parse_opt_ids(params.scene_ids.as_deref())?,
        season_ids: parse_opt_ids(params.season_ids.as_deref())?,
        color: params.color,
        keyword: params.keyword,
    };
    let (page, limit) = page_bounds(params.page, params.limit);

    let all_ids = ItemRepo::list_ids(&state.pool, &filter).await?;
    let total = all_ids.len() as i64;
    let page_ids = slice_page(&all_ids, page, limit);

    let items = ItemRepo::fetch_ordered(&state.pool, &page_ids).await?;
    let tag_rows =
        RelationRepo::tags_for_entities(&state.pool, EntityKind::Item, &page_ids).await?;
    let mut groups = TagGroups::collect(tag_rows);

    let data: Vec<ItemWithTags> = items
        .into_iter()
        .map(|item| {
            let tags = groups.remove(&item.id).unwrap_or_default();
            ItemWithTags { item, tags }
        })
        .collect();

    Ok(Json(PageResponse {
        data,
        total,
        page,
        limit,
    }))
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PUT /api/v1/items/{id}
///
/// Scalar fields follow COALESCE semantics. All three tag groups are
/// replaced wholesale with the submitted lists; an omitted or empty list
/// resets that group to its fallback tag.
pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    Json(input): Json<UpdateItemRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;

    let item = ItemRepo::update_tx(&mut tx, item_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    let entity = EntityRef::item(item_id);
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Category, &input.category_ids).await?;
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Scene, &input.scene_ids).await?;
    RelationRepo::set_tags_tx(&mut tx, entity, TagType::Season, &input.season_ids).await?;

    tx.commit().await?;

    tracing::info!(item_id, "Item updated");

    let with_tags = with_tags(&state, item).await?;
    Ok(Json(DataResponse { data: with_tags }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/items/{id}
///
/// Delete one item and its tag relations, then remove its photo from
/// object storage best-effort. Unknown ids are a 404.
pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let store = &state.blob_store;
    commit_then_cleanup(store, || async move {
        let mut tx = pool.begin().await?;

        let image_url =
            ItemRepo::delete_tx(&mut tx, item_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Item",
                    id: item_id,
                }))?;
        RelationRepo::delete_for_entities_tx(&mut tx, EntityKind::Item, &[item_id]).await?;

        tx.commit().await?;

        let stale_keys: Vec<String> = store.key_for(&image_url).into_iter().collect();
        Ok(((), stale_keys))
    })
    .await?;

    tracing::info!(item_id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/items/batch-delete
///
/// Delete the caller's items and their tag relations, then remove the item
/// photos from object storage. Ids not owned by `owner_id` are skipped.
/// Outfit layers keep their image snapshots, so compositions survive.
pub async fn batch_delete_items(
    State(state): State<AppState>,
    Json(input): Json<BatchDeleteItemsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.item_ids.is_empty() {
        return Err(AppError::BadRequest("item_ids must not be empty".into()));
    }
    let owner_id = input.owner_id;

    let pool = &state.pool;
    let store = &state.blob_store;
    let result = commit_then_cleanup(store, || async move {
        let mut tx = pool.begin().await?;

        let deleted = ItemRepo::delete_batch_tx(&mut tx, owner_id, &input.item_ids).await?;
        let deleted_ids: Vec<DbId> = deleted.iter().map(|(id, _)| *id).collect();

        // The relation table has no FK on entity_id; clean up by hand.
        RelationRepo::delete_for_entities_tx(&mut tx, EntityKind::Item, &deleted_ids).await?;

        tx.commit().await?;

        let stale_keys: Vec<String> = deleted
            .iter()
            .filter_map(|(_, url)| store.key_for(url))
            .collect();
        let summary = BatchDeleteItemsResult {
            deleted: deleted_ids.len() as u64,
        };
        Ok((summary, stale_keys))
    })
    .await?;

    tracing::info!(owner_id, deleted = result.deleted, "Items batch-deleted");

    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// Batch tagging
// ---------------------------------------------------------------------------

/// POST /api/v1/items/batch-add-tags
///
/// Attach tags to many items at once. Already-tagged pairs are skipped, so
/// resubmitting the same request is harmless. Fallback tags displaced by
/// the new real tags are removed in the same transaction.
pub async fn batch_add_tags(
    State(state): State<AppState>,
    Json(input): Json<BatchAddTagsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.item_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "item_ids must not be empty".into(),
        )));
    }
    if input.tag_ids.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "tag_ids must not be empty".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;

    let attached =
        RelationRepo::add_if_absent_tx(&mut tx, EntityKind::Item, &input.item_ids, &input.tag_ids)
            .await?;
    let fallbacks_removed =
        RelationRepo::reconcile_fallback_tx(&mut tx, EntityKind::Item, &input.item_ids).await?;

    tx.commit().await?;

    tracing::info!(
        items = input.item_ids.len(),
        attached,
        fallbacks_removed,
        "Tags batch-attached to items"
    );

    Ok(Json(DataResponse {
        data: BatchAddTagsResult {
            attached,
            fallbacks_removed,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Join one item with its tag groups.
async fn with_tags(state: &AppState, item: Item) -> AppResult<ItemWithTags> {
    let rows = RelationRepo::tags_for_entity(&state.pool, EntityRef::item(item.id)).await?;
    let tags = TagGroups::collect(rows).remove(&item.id).unwrap_or_default();
    Ok(ItemWithTags { item, tags })
}
