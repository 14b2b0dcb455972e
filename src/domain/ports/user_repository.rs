//! Port for user account persistence.
//!
//! The [`UserRepository`] trait defines the contract for registration,
//! profile updates, password changes, and the admin customer listing.
//! Accounts are never hard-deleted.

use async_trait::async_trait;

use crate::domain::user::{CustomerView, NewUser, User, UserUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The unique email constraint fired during insert or update.
        DuplicateEmail { email: String } =>
            "email {email} is already registered",
    }
}

/// Port for user account storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email, for login and duplicate checks.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Persist a new account with an already-hashed password and return its
    /// identifier.
    async fn insert(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<i32, UserRepositoryError>;

    /// Apply an allow-listed profile update, returning whether the user
    /// existed.
    async fn update(
        &self,
        user_id: i32,
        changes: &UserUpdate,
    ) -> Result<bool, UserRepositoryError>;

    /// Replace the stored password hash, returning whether the user existed.
    async fn set_password_hash(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<bool, UserRepositoryError>;

    /// All non-admin accounts, for the admin panel.
    async fn list_customers(&self) -> Result<Vec<CustomerView>, UserRepositoryError>;
}

/// Fixture implementation for testing without a real database.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _user_id: i32) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        _user: &NewUser,
        _password_hash: &str,
    ) -> Result<i32, UserRepositoryError> {
        Ok(1)
    }

    async fn update(
        &self,
        _user_id: i32,
        _changes: &UserUpdate,
    ) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn set_password_hash(
        &self,
        _user_id: i32,
        _password_hash: &str,
    ) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }

    async fn list_customers(&self) -> Result<Vec<CustomerView>, UserRepositoryError> {
        Ok(Vec::new())
    }
}
