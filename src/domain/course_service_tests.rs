//! Tests for the course management service.

use std::sync::Arc;

use mockall::predicate::eq;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::course::{Course, Module};
use crate::domain::ports::MockCourseRepository;

fn intro_draft() -> CourseDraft {
    CourseDraft::try_from_parts("Intro", Some("desc"), 100.0).expect("valid draft")
}

#[tokio::test]
async fn create_course_returns_the_new_identifier() {
    let mut repo = MockCourseRepository::new();
    repo.expect_insert()
        .withf(|draft| draft.name() == "Intro" && draft.price() == 100.0)
        .times(1)
        .return_once(|_| Ok(1));

    let service = CourseService::new(Arc::new(repo));
    let course_id = service
        .create_course(intro_draft())
        .await
        .expect("create succeeds");

    assert_eq!(course_id, 1);
}

#[tokio::test]
async fn update_missing_course_is_not_found() {
    let mut repo = MockCourseRepository::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(false));

    let service = CourseService::new(Arc::new(repo));
    let changes = CourseUpdate::new().with_price(25.0).expect("valid price");
    let error = service
        .update_course(9, changes)
        .await
        .expect_err("missing course");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn empty_update_only_checks_existence() {
    let mut repo = MockCourseRepository::new();
    repo.expect_update().times(0);
    repo.expect_find_by_id()
        .with(eq(2))
        .times(1)
        .return_once(|id| {
            Ok(Some(Course {
                id,
                name: "Intro".into(),
                description: None,
                price: 100.0,
            }))
        });

    let service = CourseService::new(Arc::new(repo));
    service
        .update_course(2, CourseUpdate::new())
        .await
        .expect("no-op update succeeds");
}

#[tokio::test]
async fn delete_with_live_bookings_is_a_conflict() {
    let mut repo = MockCourseRepository::new();
    repo.expect_delete()
        .with(eq(1))
        .times(1)
        .return_once(|course_id| Err(CourseRepositoryError::active_bookings(course_id)));

    let service = CourseService::new(Arc::new(repo));
    let error = service.delete_course(1).await.expect_err("bookings exist");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn delete_missing_course_is_not_found() {
    let mut repo = MockCourseRepository::new();
    repo.expect_delete()
        .times(1)
        .return_once(|course_id| Err(CourseRepositoryError::course_missing(course_id)));

    let service = CourseService::new(Arc::new(repo));
    let error = service.delete_course(9).await.expect_err("missing course");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn add_modules_reports_the_attached_count() {
    let modules = vec![
        ModuleDraft::try_from_parts("Lighting", None).expect("valid module"),
        ModuleDraft::try_from_parts("Sound", Some("booms and mics")).expect("valid module"),
    ];

    let mut repo = MockCourseRepository::new();
    repo.expect_add_modules()
        .withf(|course_id, modules| *course_id == 1 && modules.len() == 2)
        .times(1)
        .return_once(|_, modules| Ok(modules.len()));

    let service = CourseService::new(Arc::new(repo));
    let attached = service
        .add_modules(1, modules)
        .await
        .expect("batch succeeds");

    assert_eq!(attached, 2);
}

#[tokio::test]
async fn add_modules_to_missing_course_is_not_found() {
    let mut repo = MockCourseRepository::new();
    repo.expect_add_modules()
        .times(1)
        .return_once(|course_id, _| Err(CourseRepositoryError::course_missing(course_id)));

    let service = CourseService::new(Arc::new(repo));
    let error = service
        .add_modules(9, Vec::new())
        .await
        .expect_err("missing course");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn courses_with_modules_passes_nested_rows_through() {
    let mut repo = MockCourseRepository::new();
    repo.expect_list_with_modules().times(1).return_once(|| {
        Ok(vec![CourseDetail {
            course_id: 1,
            course_name: "Intro".into(),
            course_description: None,
            course_price: 100.0,
            modules: vec![Module {
                id: 10,
                title: "Lighting".into(),
                description: None,
            }],
        }])
    });

    let service = CourseService::new(Arc::new(repo));
    let details = service
        .courses_with_modules()
        .await
        .expect("listing succeeds");

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].modules.len(), 1);
}

#[tokio::test]
async fn connection_failures_surface_as_service_unavailable() {
    let mut repo = MockCourseRepository::new();
    repo.expect_list_summaries()
        .times(1)
        .return_once(|| Err(CourseRepositoryError::connection("pool exhausted")));

    let service = CourseService::new(Arc::new(repo));
    let error = service.course_summaries().await.expect_err("pool is down");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
