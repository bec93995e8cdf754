//! User data models and DTOs.
//!
//! Re-exported from `campus-erp-models`.

pub use campus_erp_models::ids::UserId;
pub use campus_erp_models::users::{
    CreateUserDto, PaginatedUsersResponse, UpdateUserDto, User, UserFilterParams, UserRole,
};
