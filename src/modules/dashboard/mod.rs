//! Read-only aggregates for the campus overview screen.
//!
//! - `GET /api/stats`: head counts, housing occupancy and compliance totals
//! - `GET /api/recent-activities`: borrowings, housing applications and
//!   counseling sessions merged into one feed

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::init_dashboard_router;
