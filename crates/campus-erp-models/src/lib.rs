//! # Campus ERP Models
//!
//! Database entities, request DTOs, list filters and response shapes for
//! every Campus ERP resource.
//!
//! # Modules
//!
//! - [`ids`]: Typed UUID newtypes, one per table
//! - [`choices`]: Fixed choice sets stored as TEXT
//! - [`users`]: Accounts and roles
//! - [`academics`]: Departments, academic years, semesters, courses
//! - [`faculty`]: Faculty profiles and publications
//! - [`research`]: Grants and research projects
//! - [`library`]: Catalogue and loans
//! - [`housing`]: Rooms and housing applications
//! - [`student_services`]: Counseling, health records, fitness classes
//! - [`compliance`]: Compliance reports and audits
//! - [`dashboard`]: Aggregate statistics and the activity feed
//! - [`auth`]: Login request and response
//!
//! # Example
//!
//! ```ignore
//! use campus_erp_models::housing::housing_availability;
//! use campus_erp_models::library::LibraryResourceView;
//!
//! assert_eq!(housing_availability(4, 3), "Limited");
//! let view = LibraryResourceView::from(resource);
//! ```

pub mod academics;
pub mod auth;
pub mod choices;
pub mod compliance;
pub mod dashboard;
pub mod faculty;
pub mod housing;
pub mod ids;
pub mod library;
pub mod research;
pub mod student_services;
pub mod users;
pub mod validation;

pub use auth::{LoginRequest, LoginResponse};
pub use users::{User, UserRole, full_name};
