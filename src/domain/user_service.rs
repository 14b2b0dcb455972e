//! User account services.
//!
//! Registration, login verification, profile updates, and password
//! changes. Hashing is delegated to the [`PasswordHasher`] port so the
//! algorithm stays an adapter concern; the domain only ever stores and
//! compares opaque hashes. Accounts are never hard-deleted.

use std::sync::Arc;

use tracing::info;

use crate::domain::Error;
use crate::domain::access::Principal;
use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, UserRepository, UserRepositoryError,
};
use crate::domain::user::{CustomerView, NewUser, Password, UserProfile, UserUpdate};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    let PasswordHasherError::Hashing { message } = error;
    Error::internal(format!("password hashing failed: {message}"))
}

/// Account service over a user repository and a password hasher.
#[derive(Clone)]
pub struct UserService<R, H> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(user_repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self { user_repo, hasher }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    /// Register a new account and return its identifier.
    ///
    /// A duplicate email surfaces as a Conflict; the unique constraint in
    /// storage backs the guarantee under concurrent registrations.
    pub async fn register(&self, user: NewUser, password: Password) -> Result<i32, Error> {
        let password_hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let user_id = self
            .user_repo
            .insert(&user, &password_hash)
            .await
            .map_err(map_repository_error)?;
        info!(user_id, role = %user.role(), "user registered");
        Ok(user_id)
    }

    /// Check credentials and resolve the caller into a principal.
    ///
    /// Returns `None` for an unknown email or a wrong password without
    /// distinguishing the two.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &Password,
    ) -> Result<Option<Principal>, Error> {
        let Some(user) = self
            .user_repo
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(None);
        };

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            return Ok(None);
        }
        Ok(Some(Principal::new(user.id, user.role)))
    }

    /// Fetch a profile view, password hash stripped.
    ///
    /// Invalid (non-positive) identifiers resolve to `None` rather than an
    /// error.
    pub async fn user_profile(&self, user_id: i32) -> Result<Option<UserProfile>, Error> {
        if user_id <= 0 {
            return Ok(None);
        }
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(user.map(UserProfile::from))
    }

    /// Apply an allow-listed profile update.
    ///
    /// The role and password hash are not updatable here; passwords change
    /// through [`UserService::change_password`].
    pub async fn update_profile(&self, user_id: i32, changes: UserUpdate) -> Result<(), Error> {
        let found = if changes.is_empty() {
            self.user_repo
                .find_by_id(user_id)
                .await
                .map_err(map_repository_error)?
                .is_some()
        } else {
            self.user_repo
                .update(user_id, &changes)
                .await
                .map_err(map_repository_error)?
        };

        if !found {
            return Err(Error::not_found(format!("user {user_id} not found")));
        }
        info!(user_id, "user profile updated");
        Ok(())
    }

    /// Rehash and store a new password for an existing account.
    pub async fn change_password(&self, user_id: i32, password: Password) -> Result<(), Error> {
        let password_hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let found = self
            .user_repo
            .set_password_hash(user_id, &password_hash)
            .await
            .map_err(map_repository_error)?;

        if !found {
            return Err(Error::not_found(format!("user {user_id} not found")));
        }
        info!(user_id, "password changed");
        Ok(())
    }

    /// All non-admin accounts, for the admin panel.
    pub async fn customers(&self) -> Result<Vec<CustomerView>, Error> {
        self.user_repo
            .list_customers()
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
