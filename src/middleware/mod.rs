//! Authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] extractor
//! - [`role`]: route layers that reject callers without a valid token or role
//!
//! 1. Client sends `Authorization: Bearer <token>` (or `Token <token>`)
//! 2. `require_auth` / `require_admin` verify it before routing continues
//! 3. Handlers that need the caller take `AuthUser` as an argument

pub mod auth;
pub mod role;
