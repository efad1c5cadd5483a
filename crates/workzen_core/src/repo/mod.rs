//! Collection accessors over an in-memory document.
//!
//! # Responsibility
//! - Provide typed find/insert/update/delete over `employees` and `users`.
//! - Enforce id/email uniqueness and employee-user linkage.
//!
//! # Invariants
//! - Accessors never touch storage; callers run them inside a
//!   `RecordStore` transaction and the transaction decides what commits.
//! - Emails compare in normalized form (trimmed, Unicode-lowercased) across
//!   both collections, including legacy values stored in mixed case.

use crate::model::employee::{same_email, EmployeeId, EmployeeValidationError};
use crate::model::document::Document;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RepoError {
    EmployeeNotFound(EmployeeId),
    UserNotFound(String),
    EmployeeEmailNotFound(String),
    UserEmailNotFound(String),
    DuplicateEmail(String),
    DuplicateId(String),
    Validation(EmployeeValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::UserNotFound(login_id) => write!(f, "user not found: {login_id}"),
            Self::EmployeeEmailNotFound(email) => {
                write!(f, "no employee with email: {email}")
            }
            Self::UserEmailNotFound(email) => write!(f, "no user with email: {email}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
            Self::DuplicateId(id) => write!(f, "id already in use: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EmployeeValidationError> for RepoError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Returns whether `email` is used by any employee or user, ignoring the
/// employee/user pair identified by `exempt_id`.
pub fn email_in_use(doc: &Document, email: &str, exempt_id: Option<&str>) -> bool {
    let email = email.trim();
    let exempt = |id: &str| exempt_id == Some(id);

    doc.employees
        .iter()
        .any(|employee| !exempt(&employee.id) && same_email(&employee.email, email))
        || doc
            .users
            .iter()
            .any(|user| !exempt(&user.login_id) && same_email(&user.email, email))
}
