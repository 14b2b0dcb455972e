//! Port for course and module persistence.
//!
//! The [`CourseRepository`] trait defines the contract for the catalogue:
//! course CRUD, atomic module attachment, and the joined listings. Multi-row
//! operations (course deletion, module batches) must be transactional in
//! adapters — either every row persists or none do.

use async_trait::async_trait;

use crate::domain::course::{
    Course, CourseDetail, CourseDraft, CourseSummary, CourseUpdate, ModuleDraft,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "course repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "course repository query failed: {message}",
        /// The targeted course does not exist.
        CourseMissing { course_id: i32 } =>
            "course {course_id} not found",
        /// Deletion refused while bookings still reference the course.
        ActiveBookings { course_id: i32 } =>
            "course {course_id} still has active bookings",
    }
}

/// Port for catalogue storage.
///
/// # Atomicity
///
/// - `delete` removes the course-module links and the course row in one
///   transaction, after verifying no booking references the course. A
///   failure part-way must leave both tables untouched.
/// - `add_modules` inserts each module and its link as one batch; on any
///   failure the whole batch rolls back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fetch a course by identifier.
    async fn find_by_id(&self, course_id: i32) -> Result<Option<Course>, CourseRepositoryError>;

    /// Persist a new course and return its identifier.
    async fn insert(&self, draft: &CourseDraft) -> Result<i32, CourseRepositoryError>;

    /// Apply an allow-listed partial update, returning whether the course
    /// existed.
    async fn update(
        &self,
        course_id: i32,
        changes: &CourseUpdate,
    ) -> Result<bool, CourseRepositoryError>;

    /// Delete a course and its module links atomically.
    ///
    /// Fails with [`CourseRepositoryError::ActiveBookings`] while any
    /// booking references the course, and with
    /// [`CourseRepositoryError::CourseMissing`] when it does not exist.
    async fn delete(&self, course_id: i32) -> Result<(), CourseRepositoryError>;

    /// Create `modules` and link each to the course as one atomic batch,
    /// returning the number of modules attached.
    async fn add_modules(
        &self,
        course_id: i32,
        modules: &[ModuleDraft],
    ) -> Result<usize, CourseRepositoryError>;

    /// Every course with its modules nested, from one joined query.
    async fn list_with_modules(&self) -> Result<Vec<CourseDetail>, CourseRepositoryError>;

    /// Identifier/name pairs ordered most-recently-created first.
    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, CourseRepositoryError>;
}

/// Fixture implementation for testing without a real database.
///
/// Lookups return nothing, inserts report identifier 1, and mutations report
/// the course as missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCourseRepository;

#[async_trait]
impl CourseRepository for FixtureCourseRepository {
    async fn find_by_id(&self, _course_id: i32) -> Result<Option<Course>, CourseRepositoryError> {
        Ok(None)
    }

    async fn insert(&self, _draft: &CourseDraft) -> Result<i32, CourseRepositoryError> {
        Ok(1)
    }

    async fn update(
        &self,
        _course_id: i32,
        _changes: &CourseUpdate,
    ) -> Result<bool, CourseRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, course_id: i32) -> Result<(), CourseRepositoryError> {
        Err(CourseRepositoryError::course_missing(course_id))
    }

    async fn add_modules(
        &self,
        course_id: i32,
        _modules: &[ModuleDraft],
    ) -> Result<usize, CourseRepositoryError> {
        Err(CourseRepositoryError::course_missing(course_id))
    }

    async fn list_with_modules(&self) -> Result<Vec<CourseDetail>, CourseRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, CourseRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn fixture_repository_treats_every_course_as_missing() {
        let repo = FixtureCourseRepository;
        assert!(
            repo.find_by_id(3)
                .await
                .expect("fixture lookup should succeed")
                .is_none()
        );
        let err = repo.delete(3).await.expect_err("fixture delete must refuse");
        assert_eq!(err, CourseRepositoryError::course_missing(3));
    }

    #[rstest]
    fn active_bookings_error_names_the_course() {
        let error = CourseRepositoryError::active_bookings(5);
        assert!(error.to_string().contains("course 5"));
    }
}
