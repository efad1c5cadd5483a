//! Check-in / check-out command handlers.
//!
//! # Invariants
//! - Each action is one transaction on one employee record.
//! - Retried check-ins are harmless: they only move `check_in_time`.

use crate::model::attendance::{AttendanceAction, AttendanceStatus, CheckOutPolicy};
use crate::model::employee::Employee;
use crate::repo::employee_repo;
use crate::service::{current_timestamp, ServiceError};
use crate::store::{RecordStore, StoreBackend};
use log::info;
use serde::Serialize;

/// Attendance head-count for one tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub checked_out: usize,
}

pub struct AttendanceService<'s, B: StoreBackend> {
    store: &'s RecordStore<B>,
    policy: CheckOutPolicy,
}

impl<'s, B: StoreBackend> AttendanceService<'s, B> {
    /// Creates a service using the permissive check-out policy.
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self::with_policy(store, CheckOutPolicy::default())
    }

    pub fn with_policy(store: &'s RecordStore<B>, policy: CheckOutPolicy) -> Self {
        Self { store, policy }
    }

    pub fn check_in(&self, id: &str, timestamp: &str) -> Result<Employee, ServiceError> {
        self.apply(AttendanceAction::CheckIn, id, timestamp)
    }

    pub fn check_out(&self, id: &str, timestamp: &str) -> Result<Employee, ServiceError> {
        self.apply(AttendanceAction::CheckOut, id, timestamp)
    }

    /// Check-in stamped with the current UTC time.
    pub fn check_in_now(&self, id: &str) -> Result<Employee, ServiceError> {
        self.check_in(id, &current_timestamp())
    }

    /// Check-out stamped with the current UTC time.
    pub fn check_out_now(&self, id: &str) -> Result<Employee, ServiceError> {
        self.check_out(id, &current_timestamp())
    }

    /// Applies a caller-supplied action verb (`check-in` / `check-out`).
    ///
    /// # Errors
    /// - `InvalidAction` for any other verb; the store is not touched.
    /// - `EmployeeNotFound` when `id` is unknown.
    pub fn record(&self, action: &str, id: &str, timestamp: &str) -> Result<Employee, ServiceError> {
        let action = action.parse::<AttendanceAction>()?;
        self.apply(action, id, timestamp)
    }

    /// Counts employees per attendance status within `company_id`.
    pub fn summary(&self, company_id: &str) -> Result<AttendanceSummary, ServiceError> {
        self.store.read(|doc| {
            let mut summary = AttendanceSummary::default();
            for employee in employee_repo::find_by_company(doc, company_id) {
                summary.total += 1;
                match employee.status {
                    AttendanceStatus::Present => summary.present += 1,
                    AttendanceStatus::Absent => summary.absent += 1,
                    AttendanceStatus::CheckedOut => summary.checked_out += 1,
                }
            }
            Ok(summary)
        })
    }

    fn apply(
        &self,
        action: AttendanceAction,
        id: &str,
        timestamp: &str,
    ) -> Result<Employee, ServiceError> {
        let policy = self.policy;
        let updated = self.store.transaction(action.as_str(), |doc| {
            let employee = employee_repo::find_by_id_mut(doc, id)?;
            action.apply(employee, timestamp, policy)?;
            Ok::<_, ServiceError>(employee.clone())
        })?;

        info!(
            "event=attendance module=service status=ok action={} employee_id={} state={}",
            action.as_str(),
            updated.id,
            updated.status
        );
        Ok(updated)
    }
}
