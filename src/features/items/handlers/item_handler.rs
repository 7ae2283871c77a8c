use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::items::dtos::{
    ActorQuery, AdminActionDto, DeleteItemResponseDto, ItemDecisionResponseDto, ItemListQuery,
    ItemResponseDto, SubmitItemDto, SubmitItemResponseDto, UpdateItemDto,
};
use crate::features::items::models::ItemType;
use crate::features::items::services::{ItemFilter, ItemService, NewItem};
use crate::shared::lifecycle::Decision;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a new item report
///
/// Accepts multipart/form-data with:
/// - `owner_id`, `item_type`, `item_name`, `item_description`, `email`, `location`
/// - `item_image`: photo of the item (image/*, max 5 MiB)
#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body(
        content = SubmitItemDto,
        content_type = "multipart/form-data",
        description = "Item report form with photo",
    ),
    responses(
        (status = 200, description = "Item submitted, awaiting admin approval", body = ApiResponse<SubmitItemResponseDto>),
        (status = 400, description = "Invalid field lengths or image"),
        (status = 404, description = "User not found")
    )
)]
pub async fn submit_item(
    State(service): State<Arc<ItemService>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<SubmitItemResponseDto>>> {
    let mut owner_id: Option<Uuid> = None;
    let mut item_type: Option<ItemType> = None;
    let mut item_name: Option<String> = None;
    let mut item_description: Option<String> = None;
    let mut email: Option<String> = None;
    let mut location: Option<String> = None;
    let mut image: Option<Vec<u8>> = None;
    let mut image_content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "item_image" => {
                let ct = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                image = Some(data.to_vec());
                image_content_type = Some(ct);
            }
            "owner_id" => {
                let text = read_text_field(field, "owner_id").await?;
                owner_id = Some(
                    text.parse()
                        .map_err(|_| AppError::BadRequest("Invalid owner_id".to_string()))?,
                );
            }
            "item_type" => {
                let text = read_text_field(field, "item_type").await?;
                item_type = Some(match text.to_lowercase().as_str() {
                    "lost" => ItemType::Lost,
                    "found" => ItemType::Found,
                    _ => {
                        return Err(AppError::BadRequest(
                            "item_type must be 'lost' or 'found'".to_string(),
                        ))
                    }
                });
            }
            "item_name" => item_name = Some(read_text_field(field, "item_name").await?),
            "item_description" => {
                item_description = Some(read_text_field(field, "item_description").await?)
            }
            "email" => email = Some(read_text_field(field, "email").await?),
            "location" => location = Some(read_text_field(field, "location").await?),
            _ => {
                // Unknown fields are ignored
            }
        }
    }

    let new_item = NewItem {
        owner_id: require_field(owner_id, "owner_id")?,
        item_type: require_field(item_type, "item_type")?,
        item_name: require_field(item_name, "item_name")?,
        item_description: require_field(item_description, "item_description")?,
        email: require_field(email, "email")?,
        location: require_field(location, "location")?,
        image: require_field(image, "item_image")?,
        image_content_type: require_field(image_content_type, "item_image")?,
    };

    let item = service.submit(new_item).await?;
    Ok(Json(ApiResponse::success(
        Some(SubmitItemResponseDto {
            item_id: item.id,
            status: item.status,
        }),
        Some("Item submitted successfully, awaiting admin approval".to_string()),
        None,
    )))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))
}

fn require_field<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", name)))
}

/// List items with optional status/type/owner filters
#[utoipa::path(
    get,
    path = "/api/items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "List of items", body = ApiResponse<Vec<ItemResponseDto>>),
    ),
    tag = "items"
)]
pub async fn list_items(
    State(service): State<Arc<ItemService>>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<ApiResponse<Vec<ItemResponseDto>>>> {
    let filter = ItemFilter {
        status: query.status,
        item_type: query.item_type,
        owner_id: query.owner_id,
    };
    let (items, total) = service.list(filter, &query.pagination()).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

/// Get one item by ID
#[utoipa::path(
    get,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item found", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found")
    ),
    tag = "items"
)]
pub async fn get_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Owner partial edit of an item
#[utoipa::path(
    put,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ActorQuery
    ),
    request_body = UpdateItemDto,
    responses(
        (status = 200, description = "Item updated", body = ApiResponse<ItemResponseDto>),
        (status = 404, description = "Item not found or unauthorized")
    ),
    tag = "items"
)]
pub async fn update_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
    AppJson(dto): AppJson<UpdateItemDto>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.update(actor.user_id, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        Some("Item updated successfully".to_string()),
        None,
    )))
}

/// Owner delete of an item (cascades to its claims)
#[utoipa::path(
    delete,
    path = "/api/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ActorQuery
    ),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<DeleteItemResponseDto>),
        (status = 404, description = "Item not found or unauthorized")
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Json<ApiResponse<DeleteItemResponseDto>>> {
    service.delete(actor.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteItemResponseDto { item_id: id }),
        Some("Item deleted successfully".to_string()),
        None,
    )))
}

/// Owner marks an approved item as found
#[utoipa::path(
    put,
    path = "/api/items/{id}/found",
    params(
        ("id" = Uuid, Path, description = "Item ID"),
        ActorQuery
    ),
    responses(
        (status = 200, description = "Item marked as found", body = ApiResponse<ItemResponseDto>),
        (status = 400, description = "Item is not approved"),
        (status = 404, description = "Item not found or unauthorized")
    ),
    tag = "items"
)]
pub async fn mark_item_found(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<Json<ApiResponse<ItemResponseDto>>> {
    let item = service.mark_found(actor.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        Some(item),
        Some("Item marked as found".to_string()),
        None,
    )))
}

/// Admin approves a pending item
#[utoipa::path(
    post,
    path = "/api/items/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = AdminActionDto,
    responses(
        (status = 200, description = "Item approved", body = ApiResponse<ItemDecisionResponseDto>),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item already decided")
    ),
    tag = "items"
)]
pub async fn approve_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AdminActionDto>,
) -> Result<Json<ApiResponse<ItemDecisionResponseDto>>> {
    let item = service.decide(dto.admin_id, id, Decision::Approve).await?;
    Ok(Json(ApiResponse::success(
        Some(ItemDecisionResponseDto {
            item_id: item.id,
            status: item.status,
        }),
        Some("Item approved successfully".to_string()),
        None,
    )))
}

/// Admin rejects a pending item
#[utoipa::path(
    post,
    path = "/api/items/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = AdminActionDto,
    responses(
        (status = 200, description = "Item rejected", body = ApiResponse<ItemDecisionResponseDto>),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Item already decided")
    ),
    tag = "items"
)]
pub async fn reject_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AdminActionDto>,
) -> Result<Json<ApiResponse<ItemDecisionResponseDto>>> {
    let item = service.decide(dto.admin_id, id, Decision::Reject).await?;
    Ok(Json(ApiResponse::success(
        Some(ItemDecisionResponseDto {
            item_id: item.id,
            status: item.status,
        }),
        Some("Item rejected successfully".to_string()),
        None,
    )))
}
