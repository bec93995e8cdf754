//! Login request and response.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::UserId;

/// Both fields are optional on the wire so a missing one can be reported
/// with a single message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: Option<String>,
    #[schema(example = "password123")]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the credentials when both fields are present. Empty strings
    /// count as present and fail authentication instead.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    /// Falls back to the username when the user has no name on file
    pub full_name: String,
}
