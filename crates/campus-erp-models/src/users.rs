//! User domain models and DTOs.
//!
//! A user is an account that can log in. Students, faculty, staff and
//! administrators are all users; the [`UserRole`] tells them apart.

use campus_erp_core::serde::deserialize_optional_parsed;
use campus_erp_core::{PaginationMeta, PaginationParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

pub use crate::choices::UserRole;
use crate::ids::UserId;

/// A user as returned by the API. The password hash is never selected into
/// this type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// Free-text department label, not a reference to a department record
    pub department: String,
    pub phone_number: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// `"first last"`, trimmed, so a user with no names yields `""`.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    pub role: UserRole,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub department: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone_number: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 150))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Replaces the password when present
    #[validate(length(min = 8))]
    pub password: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    #[validate(length(max = 100))]
    pub department: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_parsed")]
    pub role: Option<UserRole>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto() -> CreateUserDto {
        CreateUserDto {
            username: "jdoe".to_string(),
            email: "jdoe@uni.edu".to_string(),
            password: "password123".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: UserRole::Student,
            department: String::new(),
            phone_number: String::new(),
            is_active: None,
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Jane", "Doe"), "Jane Doe");
        assert_eq!(full_name("Jane", ""), "Jane");
        assert_eq!(full_name("", ""), "");
    }

    #[test]
    fn test_create_user_dto_validation() {
        assert!(create_dto().validate().is_ok());

        let mut bad_email = create_dto();
        bad_email.email = "not-an-email".to_string();
        assert!(bad_email.validate().is_err());

        let mut short_password = create_dto();
        short_password.password = "short".to_string();
        assert!(short_password.validate().is_err());

        let mut long_phone = create_dto();
        long_phone.phone_number = "1".repeat(21);
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn test_create_user_dto_defaults_optional_text() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"username":"a","email":"a@uni.edu","password":"password123","role":"staff"}"#,
        )
        .unwrap();
        assert_eq!(dto.first_name, "");
        assert_eq!(dto.department, "");
        assert_eq!(dto.role, UserRole::Staff);
    }

    #[test]
    fn test_update_user_dto_empty_is_valid() {
        let dto: UpdateUserDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_user_filter_params_parse_role() {
        let params: UserFilterParams = serde_json::from_str(r#"{"role":"faculty"}"#).unwrap();
        assert_eq!(params.role, Some(UserRole::Faculty));

        let params: UserFilterParams = serde_json::from_str(r#"{"role":""}"#).unwrap();
        assert_eq!(params.role, None);

        assert!(serde_json::from_str::<UserFilterParams>(r#"{"role":"dean"}"#).is_err());
    }
}
