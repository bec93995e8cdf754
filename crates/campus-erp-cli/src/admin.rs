//! Administrator bootstrap.
//!
//! `/api/users` is restricted to admins, so the first admin account has to be
//! created directly against the database.

use campus_erp_core::hash_password;
use campus_erp_models::ids::UserId;
use campus_erp_models::users::UserRole;
use sqlx::PgPool;

use crate::seeder::SeedResult;

pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl NewAdmin {
    /// Checks the fields the `users` table cannot check itself.
    pub fn validate(&self) -> Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("Username is required".to_string());
        }
        if self.username.len() > 150 {
            return Err("Username must be at most 150 characters".to_string());
        }
        if !self.email.contains('@') {
            return Err("Email address is invalid".to_string());
        }
        if self.password.len() < 8 {
            return Err("Password must be at least 8 characters".to_string());
        }
        Ok(())
    }
}

/// Inserts an active `admin` user. Fails if the username or email is taken.
pub async fn create_admin(db: &PgPool, admin: &NewAdmin) -> SeedResult<UserId> {
    admin.validate()?;

    let hashed_password = hash_password(&admin.password)
        .map_err(|e| format!("Failed to hash password: {}", e.message()))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, first_name, last_name, role, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, TRUE)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(admin.username.trim())
    .bind(admin.email.trim())
    .bind(&hashed_password)
    .bind(admin.first_name.trim())
    .bind(admin.last_name.trim())
    .bind(UserRole::Admin)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "A user with this username or email already exists".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> NewAdmin {
        NewAdmin {
            username: "registrar".to_string(),
            email: "registrar@uni.edu".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            password: "long-enough".to_string(),
        }
    }

    #[test]
    fn test_valid_admin() {
        assert!(admin().validate().is_ok());
    }

    #[test]
    fn test_rejects_short_password() {
        let a = NewAdmin {
            password: "short".to_string(),
            ..admin()
        };
        assert_eq!(
            a.validate().unwrap_err(),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_rejects_blank_username_and_bad_email() {
        let blank = NewAdmin {
            username: "  ".to_string(),
            ..admin()
        };
        assert!(blank.validate().is_err());

        let bad_email = NewAdmin {
            email: "registrar".to_string(),
            ..admin()
        };
        assert_eq!(bad_email.validate().unwrap_err(), "Email address is invalid");
    }
}
