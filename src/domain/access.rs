//! Role-based access gate applied at the service boundary.
//!
//! Privileged operations are wrapped by a single guard rather than
//! re-checking the caller's role inside each operation body. The guard
//! returns a typed decision so inbound adapters can distinguish "log in
//! first" from "logged in but not allowed".

use crate::domain::user::Role;
use crate::domain::{Error, ErrorCode};

/// The authenticated caller as resolved by the session collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The caller holds the required role.
    Authorized(Principal),
    /// No authenticated caller; the adapter should prompt for login.
    Unauthenticated,
    /// Authenticated, but the caller's role does not match.
    Forbidden,
}

/// Check an optional principal against the role an operation requires.
pub fn require_role(principal: Option<&Principal>, required: Role) -> AccessDecision {
    match principal {
        None => AccessDecision::Unauthenticated,
        Some(principal) if principal.role == required => AccessDecision::Authorized(*principal),
        Some(_) => AccessDecision::Forbidden,
    }
}

/// Enforce a role requirement, converting refusals into domain errors.
///
/// Compose this in front of a privileged handler:
///
/// ```
/// use coursebook::domain::{authorize, Principal, Role};
///
/// let admin = Principal::new(1, Role::Admin);
/// let principal = authorize(Some(&admin), Role::Admin)?;
/// assert_eq!(principal.user_id, 1);
/// # Ok::<(), coursebook::domain::Error>(())
/// ```
pub fn authorize(principal: Option<&Principal>, required: Role) -> Result<Principal, Error> {
    match require_role(principal, required) {
        AccessDecision::Authorized(principal) => Ok(principal),
        AccessDecision::Unauthenticated => Err(Error::unauthorized("login required")),
        AccessDecision::Forbidden => Err(Error::new(
            ErrorCode::Forbidden,
            format!("this operation requires the {required} role"),
        )),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_principal_is_unauthenticated() {
        assert_eq!(
            require_role(None, Role::Admin),
            AccessDecision::Unauthenticated
        );
        let err = authorize(None, Role::Admin).expect_err("must refuse");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn wrong_role_is_forbidden() {
        let customer = Principal::new(7, Role::Customer);
        assert_eq!(
            require_role(Some(&customer), Role::Admin),
            AccessDecision::Forbidden
        );
        let err = authorize(Some(&customer), Role::Admin).expect_err("must refuse");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Customer)]
    fn matching_role_is_authorized(#[case] role: Role) {
        let principal = Principal::new(3, role);
        let granted = authorize(Some(&principal), role).expect("must authorize");
        assert_eq!(granted, principal);
    }
}
