//! Employee directory command handlers.
//!
//! # Responsibility
//! - Create, update and delete employees together with their login users.
//! - Serve tenant-scoped directory reads.
//!
//! # Invariants
//! - An employee and its paired user are written in the same transaction.
//! - Deleting an employee always removes its paired user.
//! - Profile fields changed on an employee are mirrored onto its user.

use crate::credential;
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::user::User;
use crate::repo::{email_in_use, employee_repo, user_repo};
use crate::service::{current_timestamp, ServiceError};
use crate::store::{RecordStore, StoreBackend};
use log::info;

/// Command handlers over the employee collection.
pub struct EmployeeService<'s, B: StoreBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StoreBackend> EmployeeService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// Creates an employee and, when `password` is non-empty, its login.
    ///
    /// # Contract
    /// - New employees start `absent` with null check-in/check-out times.
    /// - The paired user gets `login_id == employee.id`.
    /// - The password is hashed before the document lock is taken.
    ///
    /// # Errors
    /// - `DuplicateEmail` when either collection already uses the email.
    /// - `DuplicateId` when a caller-supplied id is taken.
    /// - `Validation` when the employee record is malformed.
    pub fn create_employee(
        &self,
        request: NewEmployee,
        password: Option<&str>,
    ) -> Result<Employee, ServiceError> {
        let employee = request.into_employee(current_timestamp)?;
        let credential = match password.filter(|value| !value.is_empty()) {
            Some(password) => Some(credential::hash_password(password)?),
            None => None,
        };

        let created = self.store.transaction("create_employee", |doc| {
            if email_in_use(doc, &employee.email, None) {
                return Err(ServiceError::DuplicateEmail(employee.email.clone()));
            }
            // A stand-alone login with this id would otherwise become its pair.
            if user_repo::find_by_login_id(doc, &employee.id).is_ok() {
                return Err(ServiceError::DuplicateId(employee.id.clone()));
            }
            employee_repo::insert(doc, employee.clone())?;
            if let Some(credential) = credential {
                user_repo::insert(doc, User::for_employee(&employee, credential))?;
            }
            Ok::<_, ServiceError>(employee)
        })?;

        info!(
            "event=employee_create module=service status=ok employee_id={} has_login={}",
            created.id,
            password.is_some_and(|value| !value.is_empty())
        );
        Ok(created)
    }

    /// Merges `patch` into the employee and mirrors profile fields onto the
    /// paired user, if any.
    ///
    /// An empty patch leaves the document untouched.
    pub fn update_employee(&self, id: &str, patch: &EmployeePatch) -> Result<Employee, ServiceError> {
        self.store.transaction("update_employee", |doc| {
            let updated = employee_repo::update(doc, id, patch)?;
            if user_repo::find_by_login_id(doc, id).is_ok() {
                user_repo::update(doc, id, patch)?;
            }
            Ok(updated)
        })
    }

    /// Removes the employee and its paired user, returning the employee.
    pub fn delete_employee(&self, id: &str) -> Result<Employee, ServiceError> {
        let (removed, had_login) = self.store.transaction("delete_employee", |doc| {
            let removed = employee_repo::delete(doc, id)?;
            let had_login = user_repo::delete(doc, id).is_ok();
            Ok::<_, ServiceError>((removed, had_login))
        })?;

        info!(
            "event=employee_delete module=service status=ok employee_id={} had_login={}",
            removed.id, had_login
        );
        Ok(removed)
    }

    pub fn get_employee(&self, id: &str) -> Result<Employee, ServiceError> {
        self.store
            .read(|doc| Ok(employee_repo::find_by_id(doc, id)?.clone()))
    }

    /// Lists employees of one tenant; an empty `company_id` lists everyone.
    pub fn list_employees(&self, company_id: &str) -> Result<Vec<Employee>, ServiceError> {
        self.store.read(|doc| {
            Ok(employee_repo::find_by_company(doc, company_id)
                .into_iter()
                .cloned()
                .collect())
        })
    }
}
