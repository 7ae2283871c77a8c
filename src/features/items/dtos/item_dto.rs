use base64::prelude::*;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::items::models::{Item, ItemStatus, ItemType};
use crate::shared::types::PaginationQuery;

/// Item submission form for OpenAPI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitItemDto {
    /// Reporting user's id
    pub owner_id: Uuid,
    /// "lost" or "found"
    pub item_type: String,
    pub item_name: String,
    pub item_description: String,
    /// Contact email for the report
    pub email: String,
    pub location: String,
    /// Photo of the item (image/*, max 5 MiB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub item_image: String,
}

/// Owner partial edit. Absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItemDto {
    #[validate(length(min = 3, max = 100, message = "Item name must be between 3 and 100 characters"))]
    pub item_name: Option<String>,

    #[validate(length(
        min = 10,
        max = 500,
        message = "Item description must be between 10 and 500 characters"
    ))]
    pub item_description: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 100, message = "Location must be between 3 and 100 characters"))]
    pub location: Option<String>,
}

/// Acting user, passed explicitly (identity management is external)
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ActorQuery {
    pub user_id: Uuid,
}

/// Admin decision request body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminActionDto {
    pub admin_id: Uuid,
}

/// Optional filters for the item list.
/// Pagination fields are spelled out because serde's flatten does not
/// survive the urlencoded query deserializer.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ItemListQuery {
    pub status: Option<ItemStatus>,
    pub item_type: Option<ItemType>,
    pub owner_id: Option<Uuid>,

    /// Page number (1-indexed, default: 1)
    #[serde(default = "PaginationQuery::first_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "PaginationQuery::default_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl ItemListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Response DTO for an item report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponseDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub item_type: ItemType,
    pub item_name: String,
    pub item_description: String,
    /// Stored photo, base64-encoded for transport
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_content_type: Option<String>,
    pub email: String,
    pub report_date: NaiveDate,
    pub location: String,
    pub found: bool,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Item> for ItemResponseDto {
    fn from(i: Item) -> Self {
        Self {
            id: i.id,
            owner_id: i.owner_id,
            item_type: i.item_type,
            item_name: i.item_name,
            item_description: i.item_description,
            item_image: i.item_image.map(|bytes| BASE64_STANDARD.encode(bytes)),
            image_content_type: i.image_content_type,
            email: i.email,
            report_date: i.report_date,
            location: i.location,
            found: i.found,
            status: i.status,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

/// Response after submitting an item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitItemResponseDto {
    pub item_id: Uuid,
    pub status: ItemStatus,
}

/// Response after an admin decision on an item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemDecisionResponseDto {
    pub item_id: Uuid,
    pub status: ItemStatus,
}

/// Response after deleting an item
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteItemResponseDto {
    pub item_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_validates_present_fields_only() {
        let dto = UpdateItemDto {
            item_name: None,
            item_description: None,
            email: None,
            location: None,
        };
        assert!(dto.validate().is_ok());

        let dto = UpdateItemDto {
            item_name: Some("ab".to_string()),
            item_description: None,
            email: None,
            location: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_item_response_encodes_image() {
        let item = Item {
            id: Uuid::from_u128(7),
            owner_id: Uuid::from_u128(8),
            item_type: ItemType::Found,
            item_name: "Blue Backpack".to_string(),
            item_description: "Found near the east gate bike racks".to_string(),
            item_image: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            image_content_type: Some("image/png".to_string()),
            email: "finder@campus.edu".to_string(),
            report_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            location: "East gate".to_string(),
            found: false,
            status: ItemStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let dto = ItemResponseDto::from(item);
        assert_eq!(dto.item_image.as_deref(), Some("3q2+7w=="));
    }
}
