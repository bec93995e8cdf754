//! # Campus ERP CLI
//!
//! Administration and database seeding for Campus ERP development setups.
//!
//! ## Usage
//!
//! ```ignore
//! use campus_erp_cli::seeder::{SeedConfig, UsersPerRole, seed_all};
//!
//! let config = SeedConfig::new(4).with_users(UsersPerRole::default());
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
