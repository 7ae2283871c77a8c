use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::models::UserRole;
use crate::features::items::dtos::{ItemResponseDto, UpdateItemDto};
use crate::features::items::models::{Item, ItemStatus, ItemType};
use crate::shared::constants::{
    ITEM_DESCRIPTION_MAX_LEN, ITEM_DESCRIPTION_MIN_LEN, ITEM_LOCATION_MAX_LEN,
    ITEM_LOCATION_MIN_LEN, ITEM_NAME_MAX_LEN, ITEM_NAME_MIN_LEN, MAX_IMAGE_SIZE,
};
use crate::shared::lifecycle::{self, Decision};
use crate::shared::types::PaginationQuery;

const ITEM_COLUMNS: &str = "id, owner_id, item_type, item_name, item_description, item_image, \
     image_content_type, email, report_date, location, found, status, created_at, updated_at";

/// Raw fields of a multipart item submission
#[derive(Debug)]
pub struct NewItem {
    pub owner_id: Uuid,
    pub item_type: ItemType,
    pub item_name: String,
    pub item_description: String,
    pub email: String,
    pub location: String,
    pub image: Vec<u8>,
    pub image_content_type: String,
}

/// Filters for listing items
#[derive(Debug, Default, Clone, Copy)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub item_type: Option<ItemType>,
    pub owner_id: Option<Uuid>,
}

/// Service for item report operations
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn validate_submission(item: &NewItem) -> Result<()> {
        let name_len = item.item_name.chars().count();
        if name_len < ITEM_NAME_MIN_LEN || name_len > ITEM_NAME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Item name must be between {} and {} characters",
                ITEM_NAME_MIN_LEN, ITEM_NAME_MAX_LEN
            )));
        }

        let desc_len = item.item_description.chars().count();
        if desc_len < ITEM_DESCRIPTION_MIN_LEN || desc_len > ITEM_DESCRIPTION_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Item description must be between {} and {} characters",
                ITEM_DESCRIPTION_MIN_LEN, ITEM_DESCRIPTION_MAX_LEN
            )));
        }

        let location_len = item.location.chars().count();
        if location_len < ITEM_LOCATION_MIN_LEN || location_len > ITEM_LOCATION_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Location must be between {} and {} characters",
                ITEM_LOCATION_MIN_LEN, ITEM_LOCATION_MAX_LEN
            )));
        }

        if !item.image_content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "Item photo must be an image".to_string(),
            ));
        }
        if item.image.len() > MAX_IMAGE_SIZE {
            return Err(AppError::Validation(format!(
                "Item photo must not exceed {} bytes",
                MAX_IMAGE_SIZE
            )));
        }

        Ok(())
    }

    /// Submit a new item report. Starts in `pending`, awaiting an admin
    /// decision.
    pub async fn submit(&self, new_item: NewItem) -> Result<ItemResponseDto> {
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
            .bind(new_item.owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up item owner: {:?}", e);
                AppError::Database(e)
            })?;

        if owner.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Self::validate_submission(&new_item)?;

        let report_date = Utc::now().date_naive();

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (
                owner_id, item_type, item_name, item_description, item_image,
                image_content_type, email, report_date, location
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(new_item.owner_id)
        .bind(new_item.item_type)
        .bind(&new_item.item_name)
        .bind(&new_item.item_description)
        .bind(&new_item.image)
        .bind(&new_item.image_content_type)
        .bind(&new_item.email)
        .bind(report_date)
        .bind(&new_item.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create item: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Item submitted: id={}, owner={}, type={}",
            item.id,
            item.owner_id,
            item.item_type
        );

        Ok(item.into())
    }

    /// Get one item by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<ItemResponseDto> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get item by ID: {:?}", e);
            AppError::Database(e)
        })?;

        item.map(|i| i.into())
            .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
    }

    /// List items, optionally filtered by status, type, or owner
    pub async fn list(
        &self,
        filter: ItemFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<ItemResponseDto>, i64)> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM items WHERE 1=1");
        Self::push_filters(&mut count_qb, &filter);

        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count items: {:?}", e);
                AppError::Database(e)
            })?;

        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM items WHERE 1=1"));
        Self::push_filters(&mut qb, &filter);
        qb.push(" ORDER BY created_at DESC OFFSET ");
        qb.push_bind(pagination.offset());
        qb.push(" LIMIT ");
        qb.push_bind(pagination.limit());

        let items = qb
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list items: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items.into_iter().map(|i| i.into()).collect(), total))
    }

    fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &ItemFilter) {
        if let Some(status) = filter.status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        if let Some(item_type) = filter.item_type {
            qb.push(" AND item_type = ");
            qb.push_bind(item_type);
        }
        if let Some(owner_id) = filter.owner_id {
            qb.push(" AND owner_id = ");
            qb.push_bind(owner_id);
        }
    }

    /// Owner partial edit: present fields are applied, absent fields are
    /// left untouched.
    pub async fn update(
        &self,
        actor_id: Uuid,
        item_id: Uuid,
        dto: UpdateItemDto,
    ) -> Result<ItemResponseDto> {
        let owner_id = self.fetch_owner(item_id).await?;
        lifecycle::authorize_owner(owner_id, actor_id)?;

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET
                item_name = COALESCE($2, item_name),
                item_description = COALESCE($3, item_description),
                email = COALESCE($4, email),
                location = COALESCE($5, location),
                updated_at = now()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(item_id)
        .bind(dto.item_name)
        .bind(dto.item_description)
        .bind(dto.email)
        .bind(dto.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update item: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Item updated: id={}, owner={}", item.id, item.owner_id);

        Ok(item.into())
    }

    /// Owner delete. Claims against the item go with it (FK cascade).
    pub async fn delete(&self, actor_id: Uuid, item_id: Uuid) -> Result<()> {
        let owner_id = self.fetch_owner(item_id).await?;
        lifecycle::authorize_owner(owner_id, actor_id)?;

        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete item: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Item deleted: id={}, owner={}", item_id, owner_id);

        Ok(())
    }

    /// Owner marks an approved item as found.
    pub async fn mark_found(&self, actor_id: Uuid, item_id: Uuid) -> Result<ItemResponseDto> {
        let row: Option<(Uuid, ItemStatus)> =
            sqlx::query_as("SELECT owner_id, status FROM items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch item before mark-found: {:?}", e);
                    AppError::Database(e)
                })?;

        let (owner_id, status) =
            row.ok_or_else(|| AppError::NotFound("Item not found or unauthorized".to_string()))?;

        lifecycle::authorize_mark_found(owner_id, status, actor_id)?;

        // Guard on status so a concurrent re-decision cannot slip a
        // found=true onto a non-approved item.
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET found = TRUE, updated_at = now()
            WHERE id = $1 AND status = 'approved'
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark item as found: {:?}", e);
            AppError::Database(e)
        })?;

        // Same failure class as the pre-check: a raced re-decision and a
        // stale snapshot both answer 400.
        let item = item.ok_or_else(|| {
            AppError::BadRequest("Only approved items can be marked as found".to_string())
        })?;

        tracing::info!("Item marked as found: id={}", item.id);

        Ok(item.into())
    }

    /// Admin decision: approve or reject a pending item.
    pub async fn decide(
        &self,
        admin_id: Uuid,
        item_id: Uuid,
        decision: Decision,
    ) -> Result<ItemResponseDto> {
        let current: Option<ItemStatus> =
            sqlx::query_scalar("SELECT status FROM items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to fetch item before decision: {:?}", e);
                    AppError::Database(e)
                })?;

        // Existence answers before authorization: a missing item is a 404
        // for admin and non-admin alike.
        let current = current.ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;

        let role = self.fetch_user_role(admin_id).await?;
        lifecycle::ensure_admin(role)?;

        let next = lifecycle::item_decision(current, decision)?;

        // The status guard makes concurrent decisions lose cleanly instead
        // of double-applying.
        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET status = $2, updated_at = now()
            WHERE id = $1 AND status = 'pending'
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(item_id)
        .bind(next)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to apply item decision: {:?}", e);
            AppError::Database(e)
        })?;

        let item = item.ok_or_else(|| {
            AppError::Conflict("Item has already been decided".to_string())
        })?;

        tracing::info!(
            "Item decision applied: id={}, status={}, admin={}",
            item.id,
            item.status,
            admin_id
        );

        Ok(item.into())
    }

    async fn fetch_owner(&self, item_id: Uuid) -> Result<Uuid> {
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM items WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch item owner: {:?}", e);
                AppError::Database(e)
            })?;

        owner.ok_or_else(|| AppError::NotFound("Item not found or unauthorized".to_string()))
    }

    async fn fetch_user_role(&self, user_id: Uuid) -> Result<UserRole> {
        let role: Option<UserRole> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch user role: {:?}", e);
                AppError::Database(e)
            })?;

        role.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
