//! Port for password hashing.
//!
//! Hash algorithm choice is an adapter concern; the domain only requires
//! that hashing is one-way and that verification matches what `hash`
//! produced. Implementations are expected to salt per password.

use crate::domain::user::Password;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hasher adapters.
    pub enum PasswordHasherError {
        /// The underlying hash primitive failed.
        Hashing { message: String } =>
            "password hashing failed: {message}",
    }
}

/// Port for one-way password hashing and verification.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a storable hash of the password.
    fn hash(&self, password: &Password) -> Result<String, PasswordHasherError>;

    /// Check a candidate password against a stored hash.
    fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHasherError>;
}

/// Fixture hasher for tests: reversible, obviously not for production.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &Password) -> Result<String, PasswordHasherError> {
        Ok(format!("fixture${}", password.expose()))
    }

    fn verify(&self, password: &Password, hash: &str) -> Result<bool, PasswordHasherError> {
        Ok(hash == format!("fixture${}", password.expose()))
    }
}
