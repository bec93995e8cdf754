//! Residence rooms and housing applications.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_housing_applications_router, init_housing_router};
