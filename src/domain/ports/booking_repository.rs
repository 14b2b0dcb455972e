//! Port for booking (subscription) persistence.
//!
//! The [`BookingRepository`] trait defines the contract for storing bookings
//! and producing the joined views consumed by the customer and admin
//! surfaces. Adapters implement this trait to provide durable storage with a
//! uniqueness guarantee on the (user, course) pair.

use async_trait::async_trait;

use crate::domain::booking::{Booking, BookingUpdate, BookingView, NewBooking, UserBookingView};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "booking repository query failed: {message}",
        /// The storage-level uniqueness constraint on (user, course) fired.
        ///
        /// This closes the check-then-act window between the duplicate
        /// lookup and the insert; callers fold it into the normal
        /// already-booked outcome.
        Duplicate { user_id: i32, course_id: i32 } =>
            "user {user_id} already holds a booking for course {course_id}",
    }
}

/// Port for booking storage and joined booking views.
///
/// # Uniqueness
///
/// Implementations must refuse a second row for the same (user, course)
/// pair with [`BookingRepositoryError::Duplicate`]; the application-level
/// duplicate check alone is racy under concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch the booking a user holds for a course, if any.
    async fn find_by_user_and_course(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, booking_id: i32)
        -> Result<Option<Booking>, BookingRepositoryError>;

    /// Persist a new booking and return its identifier.
    async fn insert(&self, booking: &NewBooking) -> Result<i32, BookingRepositoryError>;

    /// Joined rows for one customer's bookings, including course details.
    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<UserBookingView>, BookingRepositoryError>;

    /// Joined admin rows across users and courses, optionally filtered to
    /// one course.
    async fn list_all(
        &self,
        course_id: Option<i32>,
    ) -> Result<Vec<BookingView>, BookingRepositoryError>;

    /// Apply an allow-listed partial update, returning the updated row or
    /// `None` when the booking does not exist.
    async fn update(
        &self,
        booking_id: i32,
        changes: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Delete a booking, returning whether a row was removed.
    async fn delete(&self, booking_id: i32) -> Result<bool, BookingRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups return nothing, inserts report identifier 1, and mutations report
/// the target as missing. Use it in unit tests where booking behaviour is
/// not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBookingRepository;

#[async_trait]
impl BookingRepository for FixtureBookingRepository {
    async fn find_by_user_and_course(
        &self,
        _user_id: i32,
        _course_id: i32,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn find_by_id(
        &self,
        _booking_id: i32,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _booking: &NewBooking) -> Result<i32, BookingRepositoryError> {
        Ok(1)
    }

    async fn list_for_user(
        &self,
        _user_id: i32,
    ) -> Result<Vec<UserBookingView>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(
        &self,
        _course_id: Option<i32>,
    ) -> Result<Vec<BookingView>, BookingRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _booking_id: i32,
        _changes: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _booking_id: i32) -> Result<bool, BookingRepositoryError> {
        Ok(false)
    }
}
