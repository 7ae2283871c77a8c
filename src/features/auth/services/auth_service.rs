use sqlx::PgPool;

use crate::core::error::{is_unique_violation, AppError, Result};
use crate::features::auth::dtos::{LoginDto, LoginResponseDto, SignupDto, SignupResponseDto};
use crate::features::auth::models::User;
use crate::features::auth::password;

/// Service for user registration and credential verification
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user.
    ///
    /// The email pre-check gives a friendly error on the common path; the
    /// unique index on `users.email` decides concurrent duplicates, and a
    /// lost race maps to the same conflict.
    pub async fn signup(&self, dto: SignupDto) -> Result<SignupResponseDto> {
        let existing: Option<uuid::Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
                .bind(&dto.email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check email uniqueness: {:?}", e);
                    AppError::Database(e)
                })?;

        if existing.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = password::hash_password(&dto.password);

        let user_id: uuid::Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (role, first_name, last_name, home_address, email, field_of_study, year, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(dto.role)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.home_address)
        .bind(&dto.email)
        .bind(&dto.field_of_study)
        .bind(dto.year)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("User registered: id={}, role={}", user_id, dto.role);

        Ok(SignupResponseDto { user_id })
    }

    /// Verify credentials and return the user's profile.
    /// Unknown email and wrong password produce the same answer.
    pub async fn login(&self, dto: LoginDto) -> Result<LoginResponseDto> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, role, first_name, last_name, home_address, email, field_of_study, year, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&dto.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user by email: {:?}", e);
            AppError::Database(e)
        })?;

        let user = user
            .filter(|u| password::verify_password(&dto.password, &u.password_hash))
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        tracing::info!("Login successful: id={}, role={}", user.id, user.role);

        Ok(user.into())
    }
}
