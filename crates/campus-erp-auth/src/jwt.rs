//! Token issue and verification.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use campus_erp_config::JwtConfig;
use campus_erp_core::AppError;

use crate::claims::Claims;

/// Signs an access token for the given user.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    username: &str,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let exp = (now + jwt_config.access_token_expiry).max(0);

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: exp as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the claims.
///
/// # Errors
///
/// Returns 401 for any invalid, tampered or expired token.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

/// Pulls the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` and the `Token <token>` scheme the dashboard
/// client sends.
pub fn extract_bearer_token(header_value: &str) -> Option<&str> {
    let value = header_value.trim();
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_campus_erp".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let id = Uuid::new_v4();
        let token = create_access_token(id, "ada", "ada@uni.edu", "faculty", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.username, "ada");
        assert_eq!(claims.role, "faculty");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            create_access_token(Uuid::new_v4(), "ada", "ada@uni.edu", "admin", &config()).unwrap();
        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            access_token_expiry: 3600,
        };
        let err = verify_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtConfig {
            secret: config().secret,
            access_token_expiry: -7200,
        };
        let token =
            create_access_token(Uuid::new_v4(), "ada", "ada@uni.edu", "admin", &expired).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", &config()).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Token abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_bearer_token("abc.def"), None);
    }
}
