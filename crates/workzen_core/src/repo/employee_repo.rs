//! Employee collection accessors.
//!
//! # Invariants
//! - `insert` keeps employee ids and emails unique.
//! - `update` re-validates the merged record before it replaces the stored
//!   one; an empty patch changes nothing and validates nothing.

use super::{email_in_use, RepoError, RepoResult};
use crate::model::document::Document;
use crate::model::employee::{same_email, Employee, EmployeePatch};

pub fn find_by_id<'d>(doc: &'d Document, id: &str) -> RepoResult<&'d Employee> {
    doc.employees
        .iter()
        .find(|employee| employee.id == id)
        .ok_or_else(|| RepoError::EmployeeNotFound(id.to_string()))
}

pub fn find_by_id_mut<'d>(doc: &'d mut Document, id: &str) -> RepoResult<&'d mut Employee> {
    doc.employees
        .iter_mut()
        .find(|employee| employee.id == id)
        .ok_or_else(|| RepoError::EmployeeNotFound(id.to_string()))
}

/// Lists employees scoped to `company_id`, in stored order.
///
/// An empty `company_id` returns the whole collection; callers serving a
/// tenant must pass its id.
pub fn find_by_company<'d>(doc: &'d Document, company_id: &str) -> Vec<&'d Employee> {
    let company_id = company_id.trim();
    doc.employees
        .iter()
        .filter(|employee| employee.belongs_to(company_id))
        .collect()
}

pub fn find_by_email<'d>(doc: &'d Document, email: &str) -> RepoResult<&'d Employee> {
    let email = email.trim();
    doc.employees
        .iter()
        .find(|employee| same_email(&employee.email, email))
        .ok_or_else(|| RepoError::EmployeeEmailNotFound(email.to_string()))
}

/// Appends `employee` to the collection.
///
/// # Errors
/// - `DuplicateEmail` when another employee already uses the email.
/// - `DuplicateId` when the id is already taken.
/// - `Validation` when the record is malformed.
pub fn insert(doc: &mut Document, employee: Employee) -> RepoResult<()> {
    employee.validate()?;
    if find_by_email(doc, &employee.email).is_ok() {
        return Err(RepoError::DuplicateEmail(employee.email));
    }
    if find_by_id(doc, &employee.id).is_ok() {
        return Err(RepoError::DuplicateId(employee.id));
    }
    doc.employees.push(employee);
    Ok(())
}

/// Shallow-merges `patch` into the employee and returns the merged record.
///
/// An empty patch returns the stored record as-is, without validation, so
/// records written before the current rules stay readable through updates.
///
/// # Errors
/// - `EmployeeNotFound` when `id` is unknown.
/// - `DuplicateEmail` when the patch moves to an email owned by someone else.
/// - `Validation` when the merged record is malformed; nothing is changed.
pub fn update(doc: &mut Document, id: &str, patch: &EmployeePatch) -> RepoResult<Employee> {
    if patch.is_empty() {
        return find_by_id(doc, id).cloned();
    }

    if let Some(email) = patch.normalized_email() {
        if email_in_use(doc, &email, Some(id)) {
            return Err(RepoError::DuplicateEmail(email));
        }
    }

    let stored = find_by_id_mut(doc, id)?;
    let mut merged = stored.clone();
    patch.apply_to(&mut merged);
    merged.validate()?;
    *stored = merged.clone();
    Ok(merged)
}

/// Removes the employee and returns it for cascade handling.
pub fn delete(doc: &mut Document, id: &str) -> RepoResult<Employee> {
    let index = doc
        .employees
        .iter()
        .position(|employee| employee.id == id)
        .ok_or_else(|| RepoError::EmployeeNotFound(id.to_string()))?;
    Ok(doc.employees.remove(index))
}
