//! campus_erp_client - HTTP client and terminal dashboard for the Campus ERP API.

pub mod client;
pub mod error;
pub mod output;

pub use client::CampusErpClient;
pub use error::{ClientError, Result};
