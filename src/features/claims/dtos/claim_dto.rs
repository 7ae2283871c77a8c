use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::claims::models::{Claim, ClaimStatus, ClaimWithItem};
use crate::shared::types::PaginationQuery;

/// Request DTO for submitting a claim.
///
/// The message length is deliberately not validated here: the lifecycle
/// engine ranks content validation below existence, state, authorization and
/// uniqueness checks, so the most fundamental failure is the one reported.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClaimDto {
    /// ID of the user making the claim
    pub claimant_id: Uuid,
    /// ID of the item being claimed
    pub item_id: Uuid,
    /// Detailed message proving ownership (min 20 characters, trimmed)
    pub message: String,
}

/// Optional filters for the claim list
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ClaimListQuery {
    pub status: Option<ClaimStatus>,

    /// Page number (1-indexed, default: 1)
    #[serde(default = "PaginationQuery::first_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "PaginationQuery::default_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl ClaimListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Response DTO for a claim
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimResponseDto {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub item_id: Uuid,
    pub message: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Claim> for ClaimResponseDto {
    fn from(c: Claim) -> Self {
        Self {
            id: c.id,
            claimant_id: c.claimant_id,
            item_id: c.item_id,
            message: c.message,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

/// Claim with its item's name, for admin review listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimListItemDto {
    pub id: Uuid,
    pub claimant_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub message: String,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ClaimWithItem> for ClaimListItemDto {
    fn from(c: ClaimWithItem) -> Self {
        Self {
            id: c.id,
            claimant_id: c.claimant_id,
            item_id: c.item_id,
            item_name: c.item_name,
            message: c.message,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

/// Response after submitting a claim
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitClaimResponseDto {
    pub claim_id: Uuid,
    pub item_id: Uuid,
    pub status: ClaimStatus,
}

/// Response after an admin rejects a claim
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimDecisionResponseDto {
    pub claim_id: Uuid,
    pub status: ClaimStatus,
}

/// Response after an admin approves a claim.
/// `email_sent` reports the notification gateway's outcome; a false value
/// means the approval stood but the owner was not reached.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimApprovalResponseDto {
    pub claim_id: Uuid,
    pub status: ClaimStatus,
    pub email_sent: bool,
}
