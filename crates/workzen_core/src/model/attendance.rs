//! Attendance state machine for employee records.
//!
//! # Responsibility
//! - Own the `status` / `check_in_time` / `check_out_time` transitions.
//! - Parse external action verbs into typed actions.
//!
//! # Invariants
//! - `absent` is reachable only through employee creation.
//! - Check-in always clears `check_out_time`.
//! - Under `CheckOutPolicy::Permissive`, check-out never fails.
//!
//! # Extension point
//! Only the latest cycle is stored per employee. A dated attendance history
//! would need its own append-only collection in the document.

use crate::model::employee::Employee;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Current attendance state of one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    CheckedOut,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::CheckedOut => "checked-out",
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance verb accepted from callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckIn => "check-in",
            Self::CheckOut => "check-out",
        }
    }
}

impl FromStr for AttendanceAction {
    type Err = AttendanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "check-in" => Ok(Self::CheckIn),
            "check-out" => Ok(Self::CheckOut),
            other => Err(AttendanceError::UnknownAction(other.to_string())),
        }
    }
}

/// Whether check-out requires a check-in in the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckOutPolicy {
    /// Check-out is accepted from any state.
    #[default]
    Permissive,
    /// Check-out is accepted only while `status == present`.
    RequireCheckIn,
}

impl CheckOutPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::RequireCheckIn => "require-check-in",
        }
    }
}

impl FromStr for CheckOutPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "require-check-in" | "strict" => Ok(Self::RequireCheckIn),
            other => Err(format!(
                "unsupported attendance policy `{other}`; expected permissive|require-check-in"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    /// Action verb is neither `check-in` nor `check-out`.
    UnknownAction(String),
    /// Timestamp is empty after trim.
    BlankTimestamp,
    /// Check-out rejected by `CheckOutPolicy::RequireCheckIn`.
    CheckOutWithoutCheckIn { status: AttendanceStatus },
}

impl Display for AttendanceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAction(action) => write!(f, "invalid attendance action `{action}`"),
            Self::BlankTimestamp => write!(f, "attendance timestamp must not be blank"),
            Self::CheckOutWithoutCheckIn { status } => {
                write!(f, "cannot check out while status is `{status}`")
            }
        }
    }
}

impl Error for AttendanceError {}

impl AttendanceAction {
    /// Applies this action to `employee` at `timestamp`.
    ///
    /// The record is left untouched when an error is returned.
    pub fn apply(
        self,
        employee: &mut Employee,
        timestamp: &str,
        policy: CheckOutPolicy,
    ) -> Result<(), AttendanceError> {
        let timestamp = timestamp.trim();
        if timestamp.is_empty() {
            return Err(AttendanceError::BlankTimestamp);
        }

        match self {
            Self::CheckIn => {
                employee.status = AttendanceStatus::Present;
                employee.check_in_time = Some(timestamp.to_string());
                employee.check_out_time = None;
            }
            Self::CheckOut => {
                if policy == CheckOutPolicy::RequireCheckIn
                    && employee.status != AttendanceStatus::Present
                {
                    return Err(AttendanceError::CheckOutWithoutCheckIn {
                        status: employee.status,
                    });
                }
                employee.status = AttendanceStatus::CheckedOut;
                employee.check_out_time = Some(timestamp.to_string());
            }
        }
        Ok(())
    }
}
