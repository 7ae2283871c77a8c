use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::{User, UserRole};

/// Request DTO for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupDto {
    /// User role: student or admin
    pub role: UserRole,

    #[validate(length(min = 2, max = 50, message = "First name must be 2-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be 2-50 characters"))]
    pub last_name: String,

    #[validate(length(min = 5, max = 200, message = "Home address must be 5-200 characters"))]
    pub home_address: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(max = 100, message = "Field of study must not exceed 100 characters"))]
    pub field_of_study: String,

    /// 0 for admins, 1-10 for students
    #[validate(range(min = 0, max = 10, message = "Year must be between 0 and 10"))]
    pub year: i32,

    #[validate(length(min = 6, max = 100, message = "Password must be 6-100 characters"))]
    pub password: String,
}

impl SignupDto {
    /// Cross-field rule the derive cannot express: admins register with
    /// year 0, students with 1-10.
    pub fn check_role_year(&self) -> Result<(), String> {
        match self.role {
            UserRole::Admin if self.year != 0 => {
                Err("Year must be 0 for admin role".to_string())
            }
            UserRole::Student if self.year == 0 => {
                Err("Year must be between 1-10 for student role".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// Request DTO for login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, max = 100, message = "Password must be 6-100 characters"))]
    pub password: String,
}

/// Response DTO after successful registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponseDto {
    pub user_id: Uuid,
}

/// Response DTO after successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub user_id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Full user profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub role: UserRole,
    pub first_name: String,
    pub last_name: String,
    pub home_address: String,
    pub email: String,
    pub field_of_study: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            role: u.role,
            first_name: u.first_name,
            last_name: u.last_name,
            home_address: u.home_address,
            email: u.email,
            field_of_study: u.field_of_study,
            year: u.year,
            created_at: u.created_at,
        }
    }
}

impl From<User> for LoginResponseDto {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            role: u.role,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(role: UserRole, year: i32) -> SignupDto {
        SignupDto {
            role,
            first_name: "Alice".to_string(),
            last_name: "Nguyen".to_string(),
            home_address: "12 Dorm Lane, Block C".to_string(),
            email: "alice@campus.edu".to_string(),
            field_of_study: "Physics".to_string(),
            year,
            password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_student_signup_valid() {
        assert!(signup(UserRole::Student, 2).validate().is_ok());
    }

    #[test]
    fn test_admin_requires_year_zero() {
        assert!(signup(UserRole::Admin, 0).check_role_year().is_ok());
        assert!(signup(UserRole::Admin, 3).check_role_year().is_err());
    }

    #[test]
    fn test_student_year_zero_rejected() {
        assert!(signup(UserRole::Student, 0).check_role_year().is_err());
    }

    #[test]
    fn test_field_bounds() {
        let mut dto = signup(UserRole::Student, 1);
        dto.first_name = "A".to_string();
        assert!(dto.validate().is_err());

        let mut dto = signup(UserRole::Student, 1);
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());

        let mut dto = signup(UserRole::Student, 1);
        dto.password = "short".to_string();
        assert!(dto.validate().is_err());
    }
}
