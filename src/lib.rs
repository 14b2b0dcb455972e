//! Course-booking service layer.
//!
//! Domain services and ports for a small course-booking product, with
//! Diesel-backed PostgreSQL adapters under [`outbound`]. Inbound adapters
//! (HTTP, CLI) live outside this crate and consume the services through
//! their public APIs.

pub mod domain;
pub mod outbound;
pub mod telemetry;
