//! Course and module management services.
//!
//! Admin-facing catalogue maintenance: create and amend courses, attach
//! module batches, and delete courses. Deletion is guarded by referential
//! integrity — a course with live bookings is never removed — and every
//! multi-row mutation is atomic in the adapter.

use std::sync::Arc;

use tracing::info;

use crate::domain::Error;
use crate::domain::course::{CourseDetail, CourseDraft, CourseSummary, CourseUpdate, ModuleDraft};
use crate::domain::ports::{CourseRepository, CourseRepositoryError};

fn map_repository_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        CourseRepositoryError::Query { message } => {
            Error::internal(format!("course repository error: {message}"))
        }
        CourseRepositoryError::CourseMissing { course_id } => {
            Error::not_found(format!("course {course_id} not found"))
        }
        CourseRepositoryError::ActiveBookings { course_id } => Error::conflict(format!(
            "course {course_id} cannot be deleted while bookings reference it"
        )),
    }
}

/// Catalogue management service over a course repository.
#[derive(Clone)]
pub struct CourseService<R> {
    course_repo: Arc<R>,
}

impl<R> CourseService<R> {
    /// Create a new service with the given repository.
    pub fn new(course_repo: Arc<R>) -> Self {
        Self { course_repo }
    }
}

impl<R> CourseService<R>
where
    R: CourseRepository,
{
    /// Persist a new course and return its identifier.
    ///
    /// The draft is validated at construction, so a negative price can
    /// never reach this point.
    pub async fn create_course(&self, draft: CourseDraft) -> Result<i32, Error> {
        let course_id = self
            .course_repo
            .insert(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(course_id, name = draft.name(), "course created");
        Ok(course_id)
    }

    /// Apply an allow-listed partial update to a course.
    ///
    /// An empty changeset still verifies the course exists so callers get
    /// a uniform NotFound for dangling identifiers.
    pub async fn update_course(&self, course_id: i32, changes: CourseUpdate) -> Result<(), Error> {
        let found = if changes.is_empty() {
            self.course_repo
                .find_by_id(course_id)
                .await
                .map_err(map_repository_error)?
                .is_some()
        } else {
            self.course_repo
                .update(course_id, &changes)
                .await
                .map_err(map_repository_error)?
        };

        if !found {
            return Err(Error::not_found(format!("course {course_id} not found")));
        }
        info!(course_id, "course updated");
        Ok(())
    }

    /// Delete a course and its module links.
    ///
    /// Refused with a Conflict while any booking references the course;
    /// the adapter performs the link and course deletes in one transaction
    /// so a failure leaves no orphaned join rows.
    pub async fn delete_course(&self, course_id: i32) -> Result<(), Error> {
        self.course_repo
            .delete(course_id)
            .await
            .map_err(map_repository_error)?;
        info!(course_id, "course deleted");
        Ok(())
    }

    /// Create a batch of modules and attach them to a course.
    ///
    /// All-or-nothing: either every module and its link persists or none
    /// do. Returns the number of modules attached.
    pub async fn add_modules(
        &self,
        course_id: i32,
        modules: Vec<ModuleDraft>,
    ) -> Result<usize, Error> {
        let attached = self
            .course_repo
            .add_modules(course_id, &modules)
            .await
            .map_err(map_repository_error)?;
        info!(course_id, attached, "modules attached to course");
        Ok(attached)
    }

    /// Every course with its modules nested.
    pub async fn courses_with_modules(&self) -> Result<Vec<CourseDetail>, Error> {
        self.course_repo
            .list_with_modules()
            .await
            .map_err(map_repository_error)
    }

    /// Identifier/name pairs, most-recently-created first.
    pub async fn course_summaries(&self) -> Result<Vec<CourseSummary>, Error> {
        self.course_repo
            .list_summaries()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "course_service_tests.rs"]
mod tests;
