//! Library catalogue and borrowings.
//!
//! A borrowing that has not been returned holds one copy of its resource.
//! Creating, returning, re-pointing and deleting borrowings keep
//! `available_copies` in step within a single transaction.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use router::{init_library_borrowings_router, init_library_resources_router};
