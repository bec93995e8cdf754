pub use campus_erp_models::auth::{LoginRequest, LoginResponse};
