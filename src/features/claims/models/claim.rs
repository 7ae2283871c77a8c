use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claim status enum matching database enum. Same shape as the item
/// lifecycle: `pending` initial, `approved`/`rejected` terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "claim_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimStatus::Pending => write!(f, "pending"),
            ClaimStatus::Approved => write!(f, "approved"),
            ClaimStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for an ownership claim
#[derive(Debug, Clone, FromRow)]
pub struct Claim {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub item_id: Uuid,
    pub message: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim row joined with its item's name, for admin review listings
#[derive(Debug, Clone, FromRow)]
pub struct ClaimWithItem {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub message: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
