pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_audits_router, init_compliance_reports_router};
