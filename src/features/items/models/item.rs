use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Item status enum matching database enum.
/// `pending` is the sole initial state; `approved` and `rejected` are
/// terminal. "Found" is a separate flag, not a status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatus::Pending => write!(f, "pending"),
            ItemStatus::Approved => write!(f, "approved"),
            ItemStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Whether the report is about something lost or something found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "item_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Lost,
    Found,
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemType::Lost => write!(f, "lost"),
            ItemType::Found => write!(f, "found"),
        }
    }
}

/// Database model for an item report
#[derive(Debug, Clone, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub item_type: ItemType,
    pub item_name: String,
    pub item_description: String,
    pub item_image: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
    pub email: String,
    pub report_date: NaiveDate,
    pub location: String,
    pub found: bool,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
