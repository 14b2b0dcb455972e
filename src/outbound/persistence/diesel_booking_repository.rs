//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! This adapter stores bookings in the `subscriptions` table and produces
//! the joined customer and admin views. The table's UNIQUE constraint on
//! (user_id, course_id) backs the duplicate-booking guarantee; its
//! violation maps to [`BookingRepositoryError::Duplicate`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::booking::{
    Booking, BookingStatus, BookingUpdate, BookingView, NewBooking, UserBookingView,
};
use crate::domain::ports::{BookingRepository, BookingRepositoryError};

use super::models::{NewSubscriptionRow, SubscriptionRow, SubscriptionRowChanges};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, subscriptions, users};

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain booking repository errors.
fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BookingRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain booking repository errors.
fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => BookingRepositoryError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            BookingRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => BookingRepositoryError::query("database error"),
        _ => BookingRepositoryError::query("database error"),
    }
}

/// Parse a stored status string, defaulting unknown values to pending.
fn parse_status(raw: &str, booking_id: i32) -> BookingStatus {
    BookingStatus::parse(raw).unwrap_or_else(|| {
        warn!(
            value = raw,
            booking_id, "unrecognised booking status, defaulting to pending"
        );
        BookingStatus::Pending
    })
}

/// Convert a database row to a domain booking.
fn row_to_booking(row: SubscriptionRow) -> Booking {
    let status = parse_status(&row.status, row.id);
    Booking {
        id: row.id,
        user_id: row.user_id,
        course_id: row.course_id,
        special_requests: row.special_requests,
        status,
        subscription_date: row.subscription_date,
    }
}

type AdminRow = (i32, String, String, String, String, String, DateTime<Utc>);
type CustomerRow = (
    i32,
    String,
    Option<String>,
    f64,
    String,
    String,
    DateTime<Utc>,
);

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn find_by_user_and_course(
        &self,
        user_id: i32,
        course_id: i32,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SubscriptionRow> = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::course_id.eq(course_id))
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_booking))
    }

    async fn find_by_id(
        &self,
        booking_id: i32,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<SubscriptionRow> = subscriptions::table
            .find(booking_id)
            .select(SubscriptionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_booking))
    }

    async fn insert(&self, booking: &NewBooking) -> Result<i32, BookingRepositoryError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewSubscriptionRow {
            user_id: booking.user_id,
            course_id: booking.course_id,
            special_requests: &booking.special_requests,
        };

        diesel::insert_into(subscriptions::table)
            .values(&new_row)
            .returning(subscriptions::id)
            .get_result(&mut conn)
            .await
            .map_err(|error| match error {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    BookingRepositoryError::duplicate(booking.user_id, booking.course_id)
                }
                other => map_diesel_error(other),
            })
    }

    async fn list_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<UserBookingView>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CustomerRow> = subscriptions::table
            .inner_join(courses::table)
            .filter(subscriptions::user_id.eq(user_id))
            .select((
                subscriptions::id,
                courses::name,
                courses::description,
                courses::price,
                subscriptions::special_requests,
                subscriptions::status,
                subscriptions::subscription_date,
            ))
            .order(subscriptions::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    booking_id,
                    course_name,
                    course_description,
                    course_price,
                    special_requests,
                    status,
                    subscription_date,
                )| UserBookingView {
                    booking_id,
                    course_name,
                    course_description,
                    course_price,
                    special_requests,
                    status: parse_status(&status, booking_id),
                    subscription_date,
                },
            )
            .collect())
    }

    async fn list_all(
        &self,
        course_id: Option<i32>,
    ) -> Result<Vec<BookingView>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = subscriptions::table
            .inner_join(users::table)
            .inner_join(courses::table)
            .select((
                subscriptions::id,
                users::first_name,
                users::second_name,
                users::email,
                courses::name,
                subscriptions::status,
                subscriptions::subscription_date,
            ))
            .order(subscriptions::id.asc())
            .into_boxed();
        if let Some(course_id) = course_id {
            query = query.filter(subscriptions::course_id.eq(course_id));
        }

        let rows: Vec<AdminRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    booking_id,
                    first_name,
                    second_name,
                    user_email,
                    course_name,
                    status,
                    subscription_date,
                )| BookingView {
                    booking_id,
                    user_name: format!("{first_name} {second_name}"),
                    user_email,
                    course_name,
                    status: parse_status(&status, booking_id),
                    subscription_date,
                },
            )
            .collect())
    }

    async fn update(
        &self,
        booking_id: i32,
        changes: &BookingUpdate,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        // Diesel refuses an all-None changeset; an empty update degrades to
        // a read so callers still learn whether the row exists.
        if changes.is_empty() {
            return self.find_by_id(booking_id).await;
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let status = changes.status().map(BookingStatus::as_str);
        let row_changes = SubscriptionRowChanges {
            special_requests: changes.special_requests(),
            status,
        };

        let row: Option<SubscriptionRow> = diesel::update(subscriptions::table.find(booking_id))
            .set(&row_changes)
            .returning(SubscriptionRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_booking))
    }

    async fn delete(&self, booking_id: i32) -> Result<bool, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(subscriptions::table.find(booking_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping; queries need a live database
    //! and are exercised by integration environments.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let error = map_pool_error(PoolError::checkout("pool exhausted"));
        assert_eq!(error, BookingRepositoryError::connection("pool exhausted"));
    }

    #[rstest]
    fn closed_connections_map_to_connection_failures() {
        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));
        assert!(matches!(
            error,
            BookingRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn other_database_errors_map_to_query_failures() {
        let error = map_diesel_error(DieselError::NotFound);
        assert!(matches!(error, BookingRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unknown_status_strings_default_to_pending() {
        assert_eq!(parse_status("archived", 1), BookingStatus::Pending);
        assert_eq!(parse_status("confirmed", 1), BookingStatus::Confirmed);
    }
}
