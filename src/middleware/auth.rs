use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sqlx::FromRow;

use campus_erp_auth::{extract_bearer_token, verify_token};
use campus_erp_core::AppError;
use campus_erp_models::ids::UserId;
use campus_erp_models::users::UserRole;

use crate::state::AppState;

/// The caller behind a verified access token.
///
/// The account is reloaded on every request, so `role` is the current one
/// and deactivated or deleted users are turned away while their token is
/// still unexpired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub role: UserRole,
}

#[derive(FromRow)]
struct AccountStatus {
    role: UserRole,
    is_active: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already verified by a role layer.
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = extract_bearer_token(auth_header)
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;
        let id = claims
            .user_id()
            .map(UserId::from_uuid)
            .ok_or_else(|| AppError::unauthorized("Invalid user ID in token"))?;

        let account = sqlx::query_as::<_, AccountStatus>(
            "SELECT role, is_active FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

        match account {
            Some(AccountStatus {
                role,
                is_active: true,
            }) => Ok(AuthUser { id, role }),
            _ => {
                tracing::warn!(user_id = %id, "Token rejected: account inactive or deleted");
                Err(AppError::unauthorized("User inactive or deleted"))
            }
        }
    }
}
