//! Domain primitives, services, and ports.
//!
//! Purpose: Define strongly typed booking, catalogue, and account entities
//! plus the services that implement the booking and course-management
//! workflows. Keep types immutable where possible and document invariants
//! and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload for adapters.
//! - booking / course / user — entities, views, and validated changesets.
//! - access — the role gate applied in front of privileged operations.
//! - BookingService / CourseService / UserService — driving services over
//!   the repository ports in [`ports`].

pub mod access;
pub mod booking;
pub mod booking_service;
pub mod course;
pub mod course_service;
pub mod error;
pub mod ports;
pub mod user;
pub mod user_service;

pub use self::access::{AccessDecision, Principal, authorize, require_role};
pub use self::booking::{
    Booking, BookingOutcome, BookingStatus, BookingUpdate, BookingView, NewBooking,
    UserBookingView,
};
pub use self::booking_service::BookingService;
pub use self::course::{
    Course, CourseDetail, CourseDraft, CourseSummary, CourseUpdate, CourseValidationError, Module,
    ModuleDraft,
};
pub use self::course_service::CourseService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{
    CustomerView, NewUser, Password, Role, User, UserProfile, UserUpdate, UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient service-layer result alias.
///
/// # Examples
/// ```
/// use coursebook::domain::{Error, ServiceResult};
///
/// fn refuse() -> ServiceResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ServiceResult<T> = Result<T, Error>;
