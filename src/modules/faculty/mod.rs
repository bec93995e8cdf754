//! Faculty profiles and publications.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_faculty_profiles_router, init_publications_router};
