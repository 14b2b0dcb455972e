//! Booking workflow services.
//!
//! This module implements the booking lifecycle: customers request a
//! booking for a course, admins review the resulting rows and move them
//! through the pending/confirmed/cancelled states. The duplicate-booking
//! guarantee lives here: booking the same course twice is a normal
//! [`BookingOutcome::AlreadyBooked`] outcome, never an error and never a
//! second row.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::Error;
use crate::domain::booking::{
    Booking, BookingOutcome, BookingStatus, BookingUpdate, BookingView, NewBooking,
    UserBookingView,
};
use crate::domain::ports::{BookingRepository, BookingRepositoryError};

fn map_repository_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingRepositoryError::Duplicate { user_id, course_id } => Error::conflict(format!(
            "user {user_id} already holds a booking for course {course_id}"
        )),
    }
}

/// Booking workflow service over a booking repository.
#[derive(Clone)]
pub struct BookingService<R> {
    booking_repo: Arc<R>,
}

impl<R> BookingService<R> {
    /// Create a new service with the given repository.
    pub fn new(booking_repo: Arc<R>) -> Self {
        Self { booking_repo }
    }
}

impl<R> BookingService<R>
where
    R: BookingRepository,
{
    /// Book a course for a user.
    ///
    /// Idempotent per (user, course): when a booking already exists the
    /// call reports [`BookingOutcome::AlreadyBooked`] without writing. The
    /// storage layer's uniqueness constraint backs the same guarantee under
    /// concurrent requests, and its violation folds into the same outcome.
    ///
    /// Course existence is the caller's concern; a dangling course id
    /// surfaces as a foreign-key query error from the adapter.
    pub async fn book(
        &self,
        user_id: i32,
        course_id: i32,
        special_requests: Option<&str>,
    ) -> Result<BookingOutcome, Error> {
        if user_id <= 0 || course_id <= 0 {
            return Err(Error::invalid_request(format!(
                "booking requires positive identifiers, got user {user_id} and course {course_id}"
            )));
        }

        let existing = self
            .booking_repo
            .find_by_user_and_course(user_id, course_id)
            .await
            .map_err(map_repository_error)?;
        if let Some(existing) = existing {
            info!(
                user_id,
                course_id,
                booking_id = existing.id,
                "duplicate booking request short-circuited"
            );
            return Ok(BookingOutcome::AlreadyBooked);
        }

        let booking = NewBooking::new(user_id, course_id, special_requests);
        match self.booking_repo.insert(&booking).await {
            Ok(booking_id) => {
                info!(user_id, course_id, booking_id, "booking created");
                Ok(BookingOutcome::Booked { booking_id })
            }
            // Lost the race against a concurrent request for the same pair.
            Err(BookingRepositoryError::Duplicate { .. }) => {
                info!(user_id, course_id, "concurrent duplicate booking absorbed");
                Ok(BookingOutcome::AlreadyBooked)
            }
            Err(error) => Err(map_repository_error(error)),
        }
    }

    /// A customer's bookings with course details.
    ///
    /// Invalid (non-positive) identifiers yield an empty list rather than
    /// an error; callers needing to distinguish "no bookings" from "bad id"
    /// must validate the id themselves.
    pub async fn bookings_for_user(&self, user_id: i32) -> Result<Vec<UserBookingView>, Error> {
        if user_id <= 0 {
            warn!(user_id, "ignoring booking listing for invalid user id");
            return Ok(Vec::new());
        }

        self.booking_repo
            .list_for_user(user_id)
            .await
            .map_err(map_repository_error)
    }

    /// Every booking, joined with user and course details.
    pub async fn all_bookings(&self) -> Result<Vec<BookingView>, Error> {
        self.booking_repo
            .list_all(None)
            .await
            .map_err(map_repository_error)
    }

    /// Bookings for one course, joined with user and course details.
    pub async fn bookings_for_course(&self, course_id: i32) -> Result<Vec<BookingView>, Error> {
        self.booking_repo
            .list_all(Some(course_id))
            .await
            .map_err(map_repository_error)
    }

    /// Move a booking to a new status.
    ///
    /// Any status may move to any other; the field is admin-driven and no
    /// transition legality is enforced.
    pub async fn update_status(
        &self,
        booking_id: i32,
        status: BookingStatus,
    ) -> Result<(), Error> {
        let changes = BookingUpdate::new().with_status(status);
        let updated = self
            .booking_repo
            .update(booking_id, &changes)
            .await
            .map_err(map_repository_error)?;

        match updated {
            Some(_) => {
                info!(booking_id, %status, "booking status updated");
                Ok(())
            }
            None => Err(Error::not_found(format!("booking {booking_id} not found"))),
        }
    }

    /// Apply an allow-listed partial update and return the updated row.
    ///
    /// An empty changeset reads the booking back unchanged so callers can
    /// treat "nothing to change" uniformly with a real update.
    pub async fn update_booking(
        &self,
        booking_id: i32,
        changes: BookingUpdate,
    ) -> Result<Booking, Error> {
        let result = if changes.is_empty() {
            self.booking_repo
                .find_by_id(booking_id)
                .await
                .map_err(map_repository_error)?
        } else {
            self.booking_repo
                .update(booking_id, &changes)
                .await
                .map_err(map_repository_error)?
        };

        result.ok_or_else(|| Error::not_found(format!("booking {booking_id} not found")))
    }

    /// Delete a booking.
    ///
    /// No status-based guard: confirmed bookings are deletable.
    pub async fn delete_booking(&self, booking_id: i32) -> Result<(), Error> {
        let removed = self
            .booking_repo
            .delete(booking_id)
            .await
            .map_err(map_repository_error)?;

        if !removed {
            return Err(Error::not_found(format!("booking {booking_id} not found")));
        }
        info!(booking_id, "booking deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
