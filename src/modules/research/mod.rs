//! Research grants and research projects.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_research_grants_router, init_research_projects_router};
