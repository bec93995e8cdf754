pub mod academic_calendar;
pub mod auth;
pub mod compliance;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod faculty;
pub mod housing;
pub mod library;
pub mod research;
pub mod student_services;
pub mod users;

pub use self::auth::model::LoginRequest;
pub use self::users::model::User;
