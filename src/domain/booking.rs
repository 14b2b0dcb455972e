//! Booking (subscription) types and the status lifecycle.
//!
//! A booking links one user to one course. At most one booking may exist
//! per (user, course) pair; repeated booking requests are reported as
//! [`BookingOutcome::AlreadyBooked`] rather than treated as failures.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle state.
///
/// New bookings start `pending`; admins move them to `confirmed` or
/// `cancelled`. No transition legality is enforced — the field is entirely
/// admin-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Stable string form matching the database enum.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the database string form back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted booking row.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub special_requests: String,
    pub status: BookingStatus,
    pub subscription_date: DateTime<Utc>,
}

/// Payload for creating a booking.
///
/// `special_requests` defaults to an empty string when the caller supplies
/// none, matching the stored representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: i32,
    pub course_id: i32,
    pub special_requests: String,
}

impl NewBooking {
    pub fn new(user_id: i32, course_id: i32, special_requests: Option<&str>) -> Self {
        Self {
            user_id,
            course_id,
            special_requests: special_requests.unwrap_or_default().to_owned(),
        }
    }
}

/// Result of a booking request.
///
/// `AlreadyBooked` is a normal negative outcome, not an error: the caller
/// asked for a state that already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOutcome {
    /// A new booking was persisted with the given identifier.
    Booked { booking_id: i32 },
    /// A booking for this (user, course) pair already exists; nothing was
    /// written.
    AlreadyBooked,
}

/// Denormalized admin view row joining bookings with users and courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub booking_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub course_name: String,
    pub status: BookingStatus,
    pub subscription_date: DateTime<Utc>,
}

/// A customer's own booking row, joined with course details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookingView {
    pub booking_id: i32,
    pub course_name: String,
    pub course_description: Option<String>,
    pub course_price: f64,
    pub special_requests: String,
    pub status: BookingStatus,
    pub subscription_date: DateTime<Utc>,
}

/// Allow-listed partial update for a booking.
///
/// Replaces the original's set-any-attribute-by-name update: only the
/// special requests text and the status are writable, so internal fields
/// (ids, timestamps) are unrepresentable rather than silently mutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    special_requests: Option<String>,
    status: Option<BookingStatus>,
}

impl BookingUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_special_requests(mut self, special_requests: &str) -> Self {
        self.special_requests = Some(special_requests.to_owned());
        self
    }

    pub fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.special_requests.is_none() && self.status.is_none()
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn status(&self) -> Option<BookingStatus> {
        self.status
    }
}
