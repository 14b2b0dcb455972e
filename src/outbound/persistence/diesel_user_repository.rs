//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Unique-email violations surface as
//! [`UserRepositoryError::DuplicateEmail`] so the service layer can report
//! them as conflicts rather than opaque failures.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{CustomerView, NewUser, Role, User, UserUpdate};

use super::models::{NewUserRow, UserRow, UserRowChanges};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain user repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain user repository errors, translating unique
/// violations on the email column.
fn map_diesel_error(error: diesel::result::Error, email: Option<&str>) -> UserRepositoryError {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::duplicate_email(email.unwrap_or("<unknown>"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserRepositoryError::connection("database connection error")
        }
        _ => UserRepositoryError::query("database error"),
    }
}

/// Parse a stored role string, defaulting unknown values to customer.
fn parse_role(raw: &str, user_id: i32) -> Role {
    Role::parse(raw).unwrap_or_else(|| {
        warn!(
            value = raw,
            user_id, "unrecognised role, defaulting to customer"
        );
        Role::Customer
    })
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> User {
    let role = parse_role(&row.role, row.id);
    User {
        id: row.id,
        first_name: row.first_name,
        second_name: row.second_name,
        email: row.email,
        password_hash: row.password_hash,
        role,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(user_id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(row.map(row_to_user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(row.map(row_to_user))
    }

    async fn insert(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<i32, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            first_name: user.first_name(),
            second_name: user.second_name(),
            email: user.email(),
            password_hash,
            role: user.role().as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, Some(user.email())))
    }

    async fn update(
        &self,
        user_id: i32,
        changes: &UserUpdate,
    ) -> Result<bool, UserRepositoryError> {
        // Diesel refuses an all-None changeset; an empty update degrades to
        // an existence check.
        if changes.is_empty() {
            return Ok(self.find_by_id(user_id).await?.is_some());
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row_changes = UserRowChanges {
            first_name: changes.first_name(),
            second_name: changes.second_name(),
            email: changes.email(),
        };

        let updated = diesel::update(users::table.find(user_id))
            .set(&row_changes)
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, changes.email()))?;

        Ok(updated > 0)
    }

    async fn set_password_hash(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(users::table.find(user_id))
            .set(users::password_hash.eq(password_hash))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(updated > 0)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerView>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .filter(users::role.ne(Role::Admin.as_str()))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, None))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let role = parse_role(&row.role, row.id);
                CustomerView {
                    user_id: row.id,
                    full_name: format!("{} {}", row.first_name, row.second_name),
                    email: row.email,
                    role,
                }
            })
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
    fn unique_violations_name_the_email() {
        let error = map_diesel_error(
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                Box::new("duplicate key value violates unique constraint".to_owned()),
            ),
            Some("ada@example.com"),
        );
        assert_eq!(error, UserRepositoryError::duplicate_email("ada@example.com"));
    }

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let error = map_pool_error(PoolError::checkout("pool exhausted"));
        assert_eq!(error, UserRepositoryError::connection("pool exhausted"));
    }

    #[rstest]
    fn unknown_role_strings_default_to_customer() {
        assert_eq!(parse_role("superuser", 1), Role::Customer);
        assert_eq!(parse_role("admin", 1), Role::Admin);
    }
}
