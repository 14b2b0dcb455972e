//! User identity types and profile update changesets.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Authorization tier gating which operations a principal may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    /// Stable string form matching the database enum.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Parse the database string form back into a role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error returned when user payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// First name was missing or blank once trimmed.
    EmptyFirstName,
    /// Second name was missing or blank once trimmed.
    EmptySecondName,
    /// Email was blank or not plausibly an address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptySecondName => write!(f, "second name must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

fn validate_email(email: &str) -> Result<String, UserValidationError> {
    let normalized = email.trim();
    let plausible = normalized
        .split_once('@')
        .is_some_and(|(local, host)| !local.is_empty() && host.contains('.'));
    if !plausible {
        return Err(UserValidationError::InvalidEmail);
    }
    Ok(normalized.to_owned())
}

fn validate_name(value: &str, missing: UserValidationError) -> Result<String, UserValidationError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(missing);
    }
    Ok(normalized.to_owned())
}

/// A registered account, as read back from the user repository.
///
/// The password hash is deliberately kept out of serialisable views; only
/// the outbound login adapter ever compares against it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// Full name in the "first second" form used by booking views.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.second_name)
    }
}

/// Serialisable profile view with the password hash stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i32,
    pub first_name: String,
    pub second_name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            first_name: user.first_name,
            second_name: user.second_name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Row in the admin customer listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub user_id: i32,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

/// Validated registration payload.
///
/// ## Invariants
/// - Names are trimmed and non-empty.
/// - `email` is trimmed and contains a local part plus a dotted host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    first_name: String,
    second_name: String,
    email: String,
    role: Role,
}

impl NewUser {
    /// Construct a registration payload from raw inputs.
    pub fn try_from_parts(
        first_name: &str,
        second_name: &str,
        email: &str,
        role: Role,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: validate_name(first_name, UserValidationError::EmptyFirstName)?,
            second_name: validate_name(second_name, UserValidationError::EmptySecondName)?,
            email: validate_email(email)?,
            role,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn second_name(&self) -> &str {
        &self.second_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Raw password captured at registration or password change.
///
/// The buffer is zeroed on drop so plaintext credentials do not linger in
/// memory after hashing. Whitespace is preserved to avoid surprising
/// credential comparisons.
#[derive(Debug, Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password; strength policy sits with callers.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        if raw.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Allow-listed profile changeset.
///
/// Replaces the original's set-any-attribute-by-name update: fields outside
/// this struct (id, role, password hash) are unrepresentable rather than
/// silently writable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    first_name: Option<String>,
    second_name: Option<String>,
    email: Option<String>,
}

impl UserUpdate {
    /// Builder over validated fields; absent fields are left untouched.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_name(mut self, first_name: &str) -> Result<Self, UserValidationError> {
        self.first_name = Some(validate_name(
            first_name,
            UserValidationError::EmptyFirstName,
        )?);
        Ok(self)
    }

    pub fn with_second_name(mut self, second_name: &str) -> Result<Self, UserValidationError> {
        self.second_name = Some(validate_name(
            second_name,
            UserValidationError::EmptySecondName,
        )?);
        Ok(self)
    }

    pub fn with_email(mut self, email: &str) -> Result<Self, UserValidationError> {
        self.email = Some(validate_email(email)?);
        Ok(self)
    }

    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.second_name.is_none() && self.email.is_none()
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn second_name(&self) -> Option<&str> {
        self.second_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Smith", "a@b.com", UserValidationError::EmptyFirstName)]
    #[case("  ", "Smith", "a@b.com", UserValidationError::EmptyFirstName)]
    #[case("Ada", "", "a@b.com", UserValidationError::EmptySecondName)]
    #[case("Ada", "Smith", "not-an-email", UserValidationError::InvalidEmail)]
    #[case("Ada", "Smith", "@b.com", UserValidationError::InvalidEmail)]
    #[case("Ada", "Smith", "a@nohost", UserValidationError::InvalidEmail)]
    fn invalid_registration_inputs(
        #[case] first: &str,
        #[case] second: &str,
        #[case] email: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = NewUser::try_from_parts(first, second, email, Role::Customer)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_trims_inputs() {
        let user = NewUser::try_from_parts("  Ada ", " Lovelace ", " ada@example.com ", Role::Admin)
            .expect("valid inputs should succeed");
        assert_eq!(user.first_name(), "Ada");
        assert_eq!(user.second_name(), "Lovelace");
        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.role(), Role::Admin);
    }

    #[rstest]
    #[case("customer", Some(Role::Customer))]
    #[case("admin", Some(Role::Admin))]
    #[case("superuser", None)]
    fn role_parses_database_strings(#[case] raw: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(raw), expected);
    }

    #[rstest]
    fn empty_password_is_rejected() {
        let err = Password::new("").expect_err("empty password must fail");
        assert_eq!(err, UserValidationError::EmptyPassword);
        assert_eq!(Password::new("  s3cret  ").expect("valid").expose(), "  s3cret  ");
    }

    #[rstest]
    fn update_tracks_supplied_fields_only() {
        let update = UserUpdate::new()
            .with_email("new@example.org")
            .expect("valid email");
        assert!(!update.is_empty());
        assert_eq!(update.email(), Some("new@example.org"));
        assert_eq!(update.first_name(), None);
        assert!(UserUpdate::new().is_empty());
    }

    #[rstest]
    fn full_name_joins_both_parts() {
        let user = User {
            id: 7,
            first_name: "Grace".into(),
            second_name: "Hopper".into(),
            email: "grace@example.com".into(),
            password_hash: "hash".into(),
            role: Role::Customer,
        };
        assert_eq!(user.full_name(), "Grace Hopper");
    }
}
