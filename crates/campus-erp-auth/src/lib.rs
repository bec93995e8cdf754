//! # Campus ERP Auth
//!
//! Bearer tokens for the Campus ERP API.
//!
//! `POST /api/login` exchanges a username and password for a signed JWT. Every
//! other API route expects it in the `Authorization` header.
//!
//! ```ignore
//! use campus_erp_auth::{create_access_token, verify_token};
//! use campus_erp_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "jdoe", "jdoe@uni.edu", "student", &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.username, "jdoe");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, extract_bearer_token, verify_token};
