use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::claims::dtos::{
    ClaimApprovalResponseDto, ClaimDecisionResponseDto, ClaimListItemDto, ClaimListQuery,
    CreateClaimDto, SubmitClaimResponseDto,
};
use crate::features::claims::services::ClaimService;
use crate::features::items::dtos::AdminActionDto;
use crate::shared::lifecycle::Decision;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a claim against an approved item
#[utoipa::path(
    post,
    path = "/api/claims",
    request_body = CreateClaimDto,
    responses(
        (status = 200, description = "Claim submitted, awaiting admin review", body = ApiResponse<SubmitClaimResponseDto>),
        (status = 404, description = "Item or user not found"),
        (status = 409, description = "Item not claimable, own item, or duplicate pending claim"),
        (status = 422, description = "Claim message too short or too long")
    ),
    tag = "claims"
)]
pub async fn submit_claim(
    State(service): State<Arc<ClaimService>>,
    AppJson(dto): AppJson<CreateClaimDto>,
) -> Result<Json<ApiResponse<SubmitClaimResponseDto>>> {
    let claim = service
        .submit(dto.claimant_id, dto.item_id, &dto.message)
        .await?;
    Ok(Json(ApiResponse::success(
        Some(claim),
        Some("Claim submitted successfully, awaiting admin review".to_string()),
        None,
    )))
}

/// List claims with their item names
#[utoipa::path(
    get,
    path = "/api/claims",
    params(ClaimListQuery),
    responses(
        (status = 200, description = "List of claims", body = ApiResponse<Vec<ClaimListItemDto>>),
    ),
    tag = "claims"
)]
pub async fn list_claims(
    State(service): State<Arc<ClaimService>>,
    Query(query): Query<ClaimListQuery>,
) -> Result<Json<ApiResponse<Vec<ClaimListItemDto>>>> {
    let (claims, total) = service.list(query.status, &query.pagination()).await?;
    Ok(Json(ApiResponse::success(
        Some(claims),
        None,
        Some(Meta { total }),
    )))
}

/// Admin approves a pending claim and notifies the item's reporter
#[utoipa::path(
    put,
    path = "/api/claims/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Claim ID")
    ),
    request_body = AdminActionDto,
    responses(
        (status = 200, description = "Claim approved; email_sent reports the notification outcome", body = ApiResponse<ClaimApprovalResponseDto>),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Claim not found"),
        (status = 409, description = "Claim already decided")
    ),
    tag = "claims"
)]
pub async fn approve_claim(
    State(service): State<Arc<ClaimService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AdminActionDto>,
) -> Result<Json<ApiResponse<ClaimApprovalResponseDto>>> {
    let outcome = service.decide(dto.admin_id, id, Decision::Approve).await?;
    let email_sent = outcome.email_sent.unwrap_or(false);

    let message = if email_sent {
        "Claim approved, owner notified by email"
    } else {
        "Claim approved, but the owner notification could not be sent"
    };

    Ok(Json(ApiResponse::success(
        Some(ClaimApprovalResponseDto {
            claim_id: outcome.claim.id,
            status: outcome.claim.status,
            email_sent,
        }),
        Some(message.to_string()),
        None,
    )))
}

/// Admin rejects a pending claim
#[utoipa::path(
    put,
    path = "/api/claims/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Claim ID")
    ),
    request_body = AdminActionDto,
    responses(
        (status = 200, description = "Claim rejected", body = ApiResponse<ClaimDecisionResponseDto>),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "Claim not found"),
        (status = 409, description = "Claim already decided")
    ),
    tag = "claims"
)]
pub async fn reject_claim(
    State(service): State<Arc<ClaimService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AdminActionDto>,
) -> Result<Json<ApiResponse<ClaimDecisionResponseDto>>> {
    let outcome = service.decide(dto.admin_id, id, Decision::Reject).await?;
    Ok(Json(ApiResponse::success(
        Some(ClaimDecisionResponseDto {
            claim_id: outcome.claim.id,
            status: outcome.claim.status,
        }),
        Some("Claim rejected successfully".to_string()),
        None,
    )))
}
