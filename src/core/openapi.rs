use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, models as auth_models};
use crate::features::claims::{
    dtos as claims_dtos, handlers as claims_handlers, models as claims_models,
};
use crate::features::items::{
    dtos as items_dtos, handlers as items_handlers, models as items_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::signup,
        auth_handlers::login,
        // Items
        items_handlers::submit_item,
        items_handlers::list_items,
        items_handlers::get_item,
        items_handlers::update_item,
        items_handlers::delete_item,
        items_handlers::mark_item_found,
        items_handlers::approve_item,
        items_handlers::reject_item,
        // Claims
        claims_handlers::submit_claim,
        claims_handlers::list_claims,
        claims_handlers::approve_claim,
        claims_handlers::reject_claim,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_models::UserRole,
            auth_dtos::SignupDto,
            auth_dtos::LoginDto,
            auth_dtos::SignupResponseDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::UserResponseDto,
            ApiResponse<auth_dtos::SignupResponseDto>,
            ApiResponse<auth_dtos::LoginResponseDto>,
            // Items
            items_models::ItemStatus,
            items_models::ItemType,
            items_dtos::SubmitItemDto,
            items_dtos::UpdateItemDto,
            items_dtos::AdminActionDto,
            items_dtos::ItemResponseDto,
            items_dtos::SubmitItemResponseDto,
            items_dtos::ItemDecisionResponseDto,
            items_dtos::DeleteItemResponseDto,
            ApiResponse<items_dtos::SubmitItemResponseDto>,
            ApiResponse<Vec<items_dtos::ItemResponseDto>>,
            ApiResponse<items_dtos::ItemResponseDto>,
            ApiResponse<items_dtos::ItemDecisionResponseDto>,
            ApiResponse<items_dtos::DeleteItemResponseDto>,
            // Claims
            claims_models::ClaimStatus,
            claims_dtos::CreateClaimDto,
            claims_dtos::ClaimResponseDto,
            claims_dtos::ClaimListItemDto,
            claims_dtos::SubmitClaimResponseDto,
            claims_dtos::ClaimDecisionResponseDto,
            claims_dtos::ClaimApprovalResponseDto,
            ApiResponse<claims_dtos::SubmitClaimResponseDto>,
            ApiResponse<Vec<claims_dtos::ClaimListItemDto>>,
            ApiResponse<claims_dtos::ClaimApprovalResponseDto>,
            ApiResponse<claims_dtos::ClaimDecisionResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Account signup and login"),
        (name = "items", description = "Lost and found item reports"),
        (name = "claims", description = "Ownership claims against approved items"),
    ),
    info(
        title = "Campus Lost & Found API",
        version = "0.1.0",
        description = "API documentation for the campus lost and found service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
