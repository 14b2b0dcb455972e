//! Tests for the booking workflow service.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockBookingRepository;

fn sample_booking(id: i32, user_id: i32, course_id: i32) -> Booking {
    Booking {
        id,
        user_id,
        course_id,
        special_requests: String::new(),
        status: BookingStatus::Pending,
        subscription_date: Utc::now(),
    }
}

#[tokio::test]
async fn book_persists_one_pending_booking() {
    let mut repo = MockBookingRepository::new();
    repo.expect_find_by_user_and_course()
        .with(eq(7), eq(1))
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .withf(|booking| {
            booking.user_id == 7 && booking.course_id == 1 && booking.special_requests.is_empty()
        })
        .times(1)
        .return_once(|_| Ok(42));

    let service = BookingService::new(Arc::new(repo));
    let outcome = service.book(7, 1, None).await.expect("booking succeeds");

    assert_eq!(outcome, BookingOutcome::Booked { booking_id: 42 });
}

#[tokio::test]
async fn second_book_for_same_pair_reports_already_booked_without_insert() {
    let mut repo = MockBookingRepository::new();
    repo.expect_find_by_user_and_course()
        .times(1)
        .return_once(|user_id, course_id| Ok(Some(sample_booking(42, user_id, course_id))));
    repo.expect_insert().times(0);

    let service = BookingService::new(Arc::new(repo));
    let outcome = service.book(7, 1, None).await.expect("lookup succeeds");

    assert_eq!(outcome, BookingOutcome::AlreadyBooked);
}

#[tokio::test]
async fn losing_the_insert_race_still_reports_already_booked() {
    let mut repo = MockBookingRepository::new();
    repo.expect_find_by_user_and_course()
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(BookingRepositoryError::duplicate(7, 1)));

    let service = BookingService::new(Arc::new(repo));
    let outcome = service.book(7, 1, None).await.expect("race is absorbed");

    assert_eq!(outcome, BookingOutcome::AlreadyBooked);
}

#[tokio::test]
async fn book_rejects_non_positive_identifiers() {
    let mut repo = MockBookingRepository::new();
    repo.expect_find_by_user_and_course().times(0);

    let service = BookingService::new(Arc::new(repo));
    let error = service.book(0, 1, None).await.expect_err("must refuse");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn book_passes_special_requests_through() {
    let mut repo = MockBookingRepository::new();
    repo.expect_find_by_user_and_course()
        .times(1)
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .withf(|booking| booking.special_requests == "front row seat")
        .times(1)
        .return_once(|_| Ok(1));

    let service = BookingService::new(Arc::new(repo));
    service
        .book(7, 1, Some("front row seat"))
        .await
        .expect("booking succeeds");
}

#[tokio::test]
async fn invalid_user_id_yields_empty_listing_not_an_error() {
    let mut repo = MockBookingRepository::new();
    repo.expect_list_for_user().times(0);

    let service = BookingService::new(Arc::new(repo));
    let bookings = service
        .bookings_for_user(-3)
        .await
        .expect("invalid id degrades to empty");

    assert!(bookings.is_empty());
}

#[tokio::test]
async fn course_filter_reaches_the_repository() {
    let mut repo = MockBookingRepository::new();
    repo.expect_list_all()
        .with(eq(Some(5)))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let service = BookingService::new(Arc::new(repo));
    service
        .bookings_for_course(5)
        .await
        .expect("listing succeeds");
}

#[tokio::test]
async fn update_status_maps_missing_booking_to_not_found() {
    let mut repo = MockBookingRepository::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(None));

    let service = BookingService::new(Arc::new(repo));
    let error = service
        .update_status(9, BookingStatus::Confirmed)
        .await
        .expect_err("missing booking");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_status_applies_the_requested_state() {
    let mut repo = MockBookingRepository::new();
    repo.expect_update()
        .withf(|booking_id, changes| {
            *booking_id == 1 && changes.status() == Some(BookingStatus::Confirmed)
        })
        .times(1)
        .return_once(|booking_id, _| {
            let mut booking = sample_booking(booking_id, 7, 1);
            booking.status = BookingStatus::Confirmed;
            Ok(Some(booking))
        });

    let service = BookingService::new(Arc::new(repo));
    service
        .update_status(1, BookingStatus::Confirmed)
        .await
        .expect("update succeeds");
}

#[tokio::test]
async fn empty_update_reads_the_booking_back() {
    let mut repo = MockBookingRepository::new();
    repo.expect_update().times(0);
    repo.expect_find_by_id()
        .with(eq(4))
        .times(1)
        .return_once(|id| Ok(Some(sample_booking(id, 7, 1))));

    let service = BookingService::new(Arc::new(repo));
    let booking = service
        .update_booking(4, BookingUpdate::new())
        .await
        .expect("read-back succeeds");

    assert_eq!(booking.id, 4);
}

#[tokio::test]
async fn delete_missing_booking_is_not_found() {
    let mut repo = MockBookingRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(false));

    let service = BookingService::new(Arc::new(repo));
    let error = service.delete_booking(9).await.expect_err("missing booking");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut repo = MockBookingRepository::new();
    repo.expect_list_all()
        .times(1)
        .return_once(|_| Err(BookingRepositoryError::connection("pool exhausted")));

    let service = BookingService::new(Arc::new(repo));
    let error = service.all_bookings().await.expect_err("pool is down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn query_failures_surface_as_internal_errors() {
    let mut repo = MockBookingRepository::new();
    repo.expect_delete()
        .times(1)
        .return_once(|_| Err(BookingRepositoryError::query("relation vanished")));

    let service = BookingService::new(Arc::new(repo));
    let error = service.delete_booking(1).await.expect_err("query failed");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
