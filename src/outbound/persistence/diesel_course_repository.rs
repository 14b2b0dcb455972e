//! PostgreSQL-backed `CourseRepository` implementation using Diesel ORM.
//!
//! Multi-row mutations run inside a single transaction: course deletion
//! removes the module links and the course row together, and module batch
//! attachment inserts every module and link or none. Domain refusals
//! (missing course, live bookings) abort the transaction through a local
//! error enum so partial writes roll back.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::course::{
    Course, CourseDetail, CourseDraft, CourseSummary, CourseUpdate, Module, ModuleDraft,
};
use crate::domain::ports::{CourseRepository, CourseRepositoryError};

use super::models::{
    CourseRow, CourseRowChanges, ModuleRow, NewCourseModuleRow, NewCourseRow, NewModuleRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{course_modules, courses, modules, subscriptions};

/// Diesel-backed implementation of the `CourseRepository` port.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain course repository errors.
fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CourseRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain course repository errors.
fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CourseRepositoryError::connection("database connection error")
        }
        _ => CourseRepositoryError::query("database error"),
    }
}

/// Transaction-local error carrying domain refusals out of the closure.
///
/// Returning an error aborts the transaction, so a refusal part-way through
/// a multi-row mutation rolls every prior write back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    CourseMissing,
    ActiveBookings,
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_tx_error(error: TxError, course_id: i32) -> CourseRepositoryError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::CourseMissing => CourseRepositoryError::course_missing(course_id),
        TxError::ActiveBookings => CourseRepositoryError::active_bookings(course_id),
    }
}

fn row_to_course(row: CourseRow) -> Course {
    Course {
        id: row.id,
        name: row.name,
        description: row.description,
        price: row.price,
    }
}

fn row_to_module(row: ModuleRow) -> Module {
    Module {
        id: row.id,
        title: row.title,
        description: row.description,
    }
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn find_by_id(&self, course_id: i32) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CourseRow> = courses::table
            .find(course_id)
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_course))
    }

    async fn insert(&self, draft: &CourseDraft) -> Result<i32, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewCourseRow {
            name: draft.name(),
            description: draft.description(),
            price: draft.price(),
        };

        diesel::insert_into(courses::table)
            .values(&new_row)
            .returning(courses::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        course_id: i32,
        changes: &CourseUpdate,
    ) -> Result<bool, CourseRepositoryError> {
        // Diesel refuses an all-None changeset; an empty update degrades to
        // an existence check.
        if changes.is_empty() {
            return Ok(self.find_by_id(course_id).await?.is_some());
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row_changes = CourseRowChanges {
            name: changes.name(),
            description: changes.description(),
            price: changes.price(),
        };

        let updated = diesel::update(courses::table.find(course_id))
            .set(&row_changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(updated > 0)
    }

    async fn delete(&self, course_id: i32) -> Result<(), CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<(), TxError, _>(|conn| {
            async move {
                let exists: Option<i32> = courses::table
                    .find(course_id)
                    .select(courses::id)
                    .first(conn)
                    .await
                    .optional()?;
                if exists.is_none() {
                    return Err(TxError::CourseMissing);
                }

                let booked: Option<i32> = subscriptions::table
                    .filter(subscriptions::course_id.eq(course_id))
                    .select(subscriptions::id)
                    .first(conn)
                    .await
                    .optional()?;
                if booked.is_some() {
                    return Err(TxError::ActiveBookings);
                }

                diesel::delete(
                    course_modules::table.filter(course_modules::course_id.eq(course_id)),
                )
                .execute(conn)
                .await?;

                diesel::delete(courses::table.find(course_id))
                    .execute(conn)
                    .await?;

                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_tx_error(error, course_id))
    }

    async fn add_modules(
        &self,
        course_id: i32,
        module_drafts: &[ModuleDraft],
    ) -> Result<usize, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<usize, TxError, _>(|conn| {
            async move {
                let exists: Option<i32> = courses::table
                    .find(course_id)
                    .select(courses::id)
                    .first(conn)
                    .await
                    .optional()?;
                if exists.is_none() {
                    return Err(TxError::CourseMissing);
                }

                for draft in module_drafts {
                    let new_module = NewModuleRow {
                        title: draft.title(),
                        description: draft.description(),
                    };
                    let module_id: i32 = diesel::insert_into(modules::table)
                        .values(&new_module)
                        .returning(modules::id)
                        .get_result(conn)
                        .await?;

                    let link = NewCourseModuleRow {
                        course_id,
                        module_id,
                    };
                    diesel::insert_into(course_modules::table)
                        .values(&link)
                        .execute(conn)
                        .await?;
                }

                Ok(module_drafts.len())
            }
            .scope_boxed()
        })
        .await
        .map_err(|error| map_tx_error(error, course_id))
    }

    async fn list_with_modules(&self) -> Result<Vec<CourseDetail>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Two set-based queries instead of a per-course module lookup.
        let course_rows: Vec<CourseRow> = courses::table
            .order(courses::id.asc())
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let linked_modules: Vec<(i32, ModuleRow)> = course_modules::table
            .inner_join(modules::table)
            .order(course_modules::id.asc())
            .select((course_modules::course_id, ModuleRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut modules_by_course: HashMap<i32, Vec<Module>> = HashMap::new();
        for (course_id, row) in linked_modules {
            modules_by_course
                .entry(course_id)
                .or_default()
                .push(row_to_module(row));
        }

        Ok(course_rows
            .into_iter()
            .map(|row| CourseDetail {
                modules: modules_by_course.remove(&row.id).unwrap_or_default(),
                course_id: row.id,
                course_name: row.name,
                course_description: row.description,
                course_price: row.price,
            })
            .collect())
    }

    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(i32, String)> = courses::table
            .order(courses::id.desc())
            .select((courses::id, courses::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CourseSummary { id, name })
            .collect())
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
        let error = map_pool_error(PoolError::build("bad url"));
        assert_eq!(error, CourseRepositoryError::connection("bad url"));
    }

    #[rstest]
    fn transaction_refusals_keep_their_meaning() {
        assert_eq!(
            map_tx_error(TxError::CourseMissing, 9),
            CourseRepositoryError::course_missing(9)
        );
        assert_eq!(
            map_tx_error(TxError::ActiveBookings, 1),
            CourseRepositoryError::active_bookings(1)
        );
    }

    #[rstest]
    fn transaction_diesel_errors_map_like_plain_ones() {
        let error = map_tx_error(
            TxError::Diesel(DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection,
                Box::new("server closed the connection".to_owned()),
            )),
            1,
        );
        assert!(matches!(error, CourseRepositoryError::Connection { .. }));
    }
}
