//! Diesel-backed persistence adapters for the domain ports.

mod diesel_booking_repository;
mod diesel_course_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
