//! User (login credential) collection accessors.
//!
//! # Invariants
//! - `login_id` values are unique.
//! - A user's email may only be shared with the employee it is linked to.

use super::{email_in_use, RepoError, RepoResult};
use crate::credential;
use crate::model::document::Document;
use crate::model::employee::{normalize_email, same_email, EmployeePatch};
use crate::model::user::User;

pub fn find_by_login_id<'d>(doc: &'d Document, login_id: &str) -> RepoResult<&'d User> {
    doc.users
        .iter()
        .find(|user| user.login_id == login_id)
        .ok_or_else(|| RepoError::UserNotFound(login_id.to_string()))
}

fn find_by_login_id_mut<'d>(doc: &'d mut Document, login_id: &str) -> RepoResult<&'d mut User> {
    doc.users
        .iter_mut()
        .find(|user| user.login_id == login_id)
        .ok_or_else(|| RepoError::UserNotFound(login_id.to_string()))
}

pub fn find_by_email<'d>(doc: &'d Document, email: &str) -> RepoResult<&'d User> {
    let email = email.trim();
    doc.users
        .iter()
        .find(|user| same_email(&user.email, email))
        .ok_or_else(|| RepoError::UserEmailNotFound(email.to_string()))
}

/// Appends `user` to the collection.
///
/// # Errors
/// - `DuplicateEmail` when the email belongs to another user, or to an
///   employee other than the one this user is linked to.
/// - `DuplicateId` when `login_id` is already taken.
pub fn insert(doc: &mut Document, mut user: User) -> RepoResult<()> {
    user.email = normalize_email(&user.email);
    if doc
        .users
        .iter()
        .any(|existing| same_email(&existing.email, &user.email))
        || email_in_use(doc, &user.email, Some(&user.login_id))
    {
        return Err(RepoError::DuplicateEmail(user.email));
    }
    if find_by_login_id(doc, &user.login_id).is_ok() {
        return Err(RepoError::DuplicateId(user.login_id));
    }
    doc.users.push(user);
    Ok(())
}

/// Mirrors the profile fields of an employee patch onto the linked user.
///
/// Only `name`, `email`, `phone`, `role` and `avatar` are propagated; other
/// employee fields have no user counterpart.
pub fn update(doc: &mut Document, login_id: &str, patch: &EmployeePatch) -> RepoResult<User> {
    let user = find_by_login_id_mut(doc, login_id)?;
    if let Some(name) = &patch.name {
        user.name = name.trim().to_string();
    }
    if let Some(email) = patch.normalized_email() {
        user.email = email;
    }
    if let Some(phone) = &patch.phone {
        user.phone = phone.trim().to_string();
    }
    if let Some(role) = &patch.role {
        user.role = role.clone();
    }
    if let Some(avatar) = &patch.avatar {
        user.avatar = avatar.trim().to_string();
    }
    Ok(user.clone())
}

pub fn delete(doc: &mut Document, login_id: &str) -> RepoResult<User> {
    let index = doc
        .users
        .iter()
        .position(|user| user.login_id == login_id)
        .ok_or_else(|| RepoError::UserNotFound(login_id.to_string()))?;
    Ok(doc.users.remove(index))
}

/// Returns whether `candidate` matches the stored credential of `login_id`.
///
/// Unknown users never verify.
pub fn verify_password(doc: &Document, login_id: &str, candidate: &str) -> bool {
    find_by_login_id(doc, login_id)
        .map(|user| credential::verify_password(&user.password, candidate))
        .unwrap_or(false)
}

/// Replaces the stored credential of `login_id`.
///
/// `credential` must already be in stored form (see `credential::hash_password`).
pub fn set_password(doc: &mut Document, login_id: &str, credential: String) -> RepoResult<()> {
    find_by_login_id_mut(doc, login_id)?.password = credential;
    Ok(())
}
