//! Command handlers.
//!
//! # Responsibility
//! - Expose one entry point per external operation.
//! - Compose repository calls inside exactly one `RecordStore` transaction.
//! - Map lower-layer failures onto a stable, caller-facing `ErrorKind`.
//!
//! # Invariants
//! - The first error aborts the transaction; nothing is written.
//! - Password hashing never runs while the document lock is held, except
//!   for the rare re-verification described on `AccountService`.

use crate::credential::CredentialError;
use crate::model::attendance::AttendanceError;
use crate::model::employee::{EmployeeId, EmployeeValidationError};
use crate::repo::RepoError;
use crate::store::StoreError;
use chrono::{SecondsFormat, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_service;
pub mod attendance_service;
pub mod employee_service;

/// Caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    DuplicateEmail,
    DuplicateId,
    InvalidCredentials,
    InvalidAction,
    InvalidTransition,
    InvalidInput,
    CorruptStore,
    Io,
    Internal,
}

impl ErrorKind {
    /// Stable snake_case code for responses and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DuplicateEmail => "duplicate_email",
            Self::DuplicateId => "duplicate_id",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidAction => "invalid_action",
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidInput => "invalid_input",
            Self::CorruptStore => "corrupt_store",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum ServiceError {
    EmployeeNotFound(EmployeeId),
    UserNotFound(String),
    DuplicateEmail(String),
    DuplicateId(String),
    InvalidCredentials,
    InvalidAction(String),
    Attendance(AttendanceError),
    Validation(EmployeeValidationError),
    InvalidInput(&'static str),
    Credential(CredentialError),
    Store(StoreError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmployeeNotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateEmail(_) => ErrorKind::DuplicateEmail,
            Self::DuplicateId(_) => ErrorKind::DuplicateId,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::InvalidAction(_) => ErrorKind::InvalidAction,
            Self::Attendance(AttendanceError::UnknownAction(_)) => ErrorKind::InvalidAction,
            Self::Attendance(AttendanceError::CheckOutWithoutCheckIn { .. }) => {
                ErrorKind::InvalidTransition
            }
            Self::Attendance(AttendanceError::BlankTimestamp)
            | Self::Validation(_)
            | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Credential(_) => ErrorKind::Internal,
            Self::Store(StoreError::Corrupt { .. } | StoreError::VersionOverflow { .. }) => {
                ErrorKind::CorruptStore
            }
            Self::Store(StoreError::Io { .. }) => ErrorKind::Io,
            Self::Store(StoreError::Encode(_)) => ErrorKind::Internal,
        }
    }

    /// Whether the store itself is unusable (callers should answer with a
    /// service-unavailable style response rather than retry blindly).
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::CorruptStore | ErrorKind::Io)
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::UserNotFound(login_id) => write!(f, "user not found: {login_id}"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: {email}"),
            Self::DuplicateId(id) => write!(f, "id already in use: {id}"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::InvalidAction(action) => write!(f, "invalid action `{action}`"),
            Self::Attendance(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::Credential(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Attendance(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Credential(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EmployeeNotFound(id) => Self::EmployeeNotFound(id),
            RepoError::UserNotFound(login_id) => Self::UserNotFound(login_id),
            RepoError::EmployeeEmailNotFound(email) => Self::EmployeeNotFound(email),
            RepoError::UserEmailNotFound(email) => Self::UserNotFound(email),
            RepoError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            RepoError::DuplicateId(id) => Self::DuplicateId(id),
            RepoError::Validation(err) => Self::Validation(err),
        }
    }
}

impl From<EmployeeValidationError> for ServiceError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AttendanceError> for ServiceError {
    fn from(value: AttendanceError) -> Self {
        match value {
            AttendanceError::UnknownAction(action) => Self::InvalidAction(action),
            other => Self::Attendance(other),
        }
    }
}

impl From<CredentialError> for ServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

/// RFC 3339 UTC timestamp used for `createdAt` and clock-less attendance.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
