//! Counseling appointments, health records and fitness classes.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{
    init_counseling_appointments_router, init_fitness_classes_router, init_health_records_router,
};
