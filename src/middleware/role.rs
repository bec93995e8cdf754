//! Route-level access control.
//!
//! Attach with `route_layer` so unmatched paths still answer 404:
//!
//! ```rust,ignore
//! Router::new()
//!     .nest("/users", init_users_router())
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use campus_erp_core::AppError;
use campus_erp_models::users::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Lets the request through when the caller holds one of `allowed_roles`.
/// An empty slice admits any authenticated caller.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.is_empty() && !allowed_roles.contains(&auth_user.role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Requires role: {}",
            allowed_roles
                .iter()
                .map(UserRole::as_str)
                .collect::<Vec<_>>()
                .join(" or ")
        )));
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// Any valid token.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Administrators only.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
