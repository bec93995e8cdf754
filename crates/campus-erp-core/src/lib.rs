//! # Campus ERP Core
//!
//! Core types, errors, and utilities shared by every Campus ERP crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use campus_erp_core::{AppError, PaginationParams, hash_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Department not found"));
//! let hash = hash_password("correct horse battery staple")?;
//! let limit = PaginationParams::default().limit();
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
