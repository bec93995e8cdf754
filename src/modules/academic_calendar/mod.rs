//! Academic years and the semesters inside them.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_academic_years_router, init_semesters_router};
