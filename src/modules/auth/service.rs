use anyhow::anyhow;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};

use campus_erp_auth::create_access_token;
use campus_erp_config::JwtConfig;
use campus_erp_core::{AppError, verify_password};
use campus_erp_models::ids::UserId;
use campus_erp_models::users::{UserRole, full_name};

use super::model::{LoginRequest, LoginResponse};
use crate::metrics::{track_jwt_issued, track_user_login_failure, track_user_login_success};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(FromRow)]
struct UserWithPassword {
    id: UserId,
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    is_active: bool,
}

pub struct AuthService;

impl AuthService {
    /// Checks the credentials and issues an access token.
    ///
    /// Unknown users, wrong passwords and deactivated accounts all fail with
    /// the same 401 so the response does not reveal which usernames exist.
    #[instrument(skip(db, dto, jwt_config), fields(username = ?dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let (username, password) = dto.credentials().ok_or_else(|| {
            AppError::bad_request(anyhow!("Please provide both username and password"))
        })?;

        let Some(user) = sqlx::query_as::<_, UserWithPassword>(
            r#"SELECT id, username, email, password, first_name, last_name, role, is_active
               FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?
        else {
            track_user_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        // A hash that fails to parse can never match.
        if !verify_password(password, &user.password).unwrap_or(false) {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            track_user_login_failure("invalid_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account inactive");
            track_user_login_failure("inactive");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = create_access_token(
            user.id.into_inner(),
            &user.username,
            &user.email,
            user.role.as_str(),
            jwt_config,
        )?;
        track_jwt_issued();
        track_user_login_success(user.role.as_str());
        info!(user_id = %user.id, "User logged in");

        let name = full_name(&user.first_name, &user.last_name);
        Ok(LoginResponse {
            token,
            user_id: user.id,
            full_name: if name.is_empty() {
                user.username.clone()
            } else {
                name
            },
            username: user.username,
            email: user.email,
        })
    }
}
