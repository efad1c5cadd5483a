//! Login account command handlers.
//!
//! # Responsibility
//! - Change passwords, verify credentials and authenticate by email.
//! - Register company admin accounts that act as tenants.
//!
//! # Invariants
//! - Hashing and verification run against a snapshot, outside the lock.
//!   Inside the lock the stored credential is only re-verified when it
//!   changed since the snapshot.
//! - Unknown emails and wrong passwords are indistinguishable to callers of
//!   `authenticate`.

use crate::credential;
use crate::model::employee::{derive_initials, is_valid_email, normalize_email};
use crate::model::role::Role;
use crate::model::user::{RegisterAccount, User, UserProfile};
use crate::repo::{email_in_use, user_repo};
use crate::service::{current_timestamp, ServiceError};
use crate::store::{RecordStore, StoreBackend};
use log::{info, warn};
use serde_json::Map;
use uuid::Uuid;

pub struct AccountService<'s, B: StoreBackend> {
    store: &'s RecordStore<B>,
}

impl<'s, B: StoreBackend> AccountService<'s, B> {
    pub fn new(store: &'s RecordStore<B>) -> Self {
        Self { store }
    }

    /// Replaces the credential of `login_id` after checking `old_password`.
    ///
    /// # Errors
    /// - `UserNotFound` when no user has `login_id`.
    /// - `InvalidCredentials` when `old_password` does not match; the stored
    ///   credential is left unchanged.
    /// - `InvalidInput` when `new_password` is empty for an existing user.
    pub fn change_password(
        &self,
        login_id: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let observed = self.stored_credential(login_id)?;
        if new_password.is_empty() {
            return Err(ServiceError::InvalidInput("new password must not be empty"));
        }
        if !credential::verify_password(&observed, old_password) {
            warn!(
                "event=password_change module=service status=rejected login_id={}",
                login_id
            );
            return Err(ServiceError::InvalidCredentials);
        }
        let replacement = credential::hash_password(new_password)?;

        self.store.transaction("change_password", |doc| {
            let current = &user_repo::find_by_login_id(doc, login_id)?.password;
            if current != &observed && !user_repo::verify_password(doc, login_id, old_password) {
                return Err(ServiceError::InvalidCredentials);
            }
            user_repo::set_password(doc, login_id, replacement)?;
            Ok::<_, ServiceError>(())
        })?;

        info!(
            "event=password_change module=service status=ok login_id={}",
            login_id
        );
        Ok(())
    }

    /// Returns whether `candidate` is the current password of `login_id`.
    pub fn verify_password(&self, login_id: &str, candidate: &str) -> Result<bool, ServiceError> {
        match self.stored_credential(login_id) {
            Ok(stored) => Ok(credential::verify_password(&stored, candidate)),
            Err(ServiceError::UserNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Looks up a user by email and checks the password.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile, ServiceError> {
        let user = self.store.read(|doc| {
            Ok::<_, ServiceError>(user_repo::find_by_email(doc, email).ok().cloned())
        })?;

        match user {
            Some(user) if credential::verify_password(&user.password, password) => {
                info!(
                    "event=authenticate module=service status=ok login_id={}",
                    user.login_id
                );
                Ok(user.profile())
            }
            _ => {
                warn!("event=authenticate module=service status=rejected");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Registers a company admin whose login id doubles as the tenant id.
    ///
    /// # Errors
    /// - `InvalidInput` for a blank name/company, malformed email or empty
    ///   password.
    /// - `DuplicateEmail` when either collection already uses the email.
    pub fn register_company_admin(
        &self,
        request: RegisterAccount,
    ) -> Result<UserProfile, ServiceError> {
        let name = request.name.trim().to_string();
        let company_name = request.company_name.trim().to_string();
        let email = normalize_email(&request.email);
        if name.is_empty() {
            return Err(ServiceError::InvalidInput("name must not be blank"));
        }
        if company_name.is_empty() {
            return Err(ServiceError::InvalidInput("company name must not be blank"));
        }
        if !is_valid_email(&email) {
            return Err(ServiceError::InvalidInput("email address is malformed"));
        }
        if request.password.is_empty() {
            return Err(ServiceError::InvalidInput("password must not be empty"));
        }

        let login_id = Uuid::new_v4().to_string();
        let user = User {
            company_id: Some(login_id.clone()),
            login_id,
            company_name: Some(company_name),
            avatar: derive_initials(&name),
            name,
            email,
            phone: request.phone.trim().to_string(),
            password: credential::hash_password(&request.password)?,
            logo: None,
            role: Role::Admin,
            created_at: Some(current_timestamp()),
            extra: Map::new(),
        };
        let profile = user.profile();

        self.store.transaction("register_company_admin", |doc| {
            if email_in_use(doc, &user.email, None) {
                return Err(ServiceError::DuplicateEmail(user.email.clone()));
            }
            user_repo::insert(doc, user)?;
            Ok::<_, ServiceError>(())
        })?;

        info!(
            "event=register_admin module=service status=ok login_id={}",
            profile.login_id
        );
        Ok(profile)
    }

    fn stored_credential(&self, login_id: &str) -> Result<String, ServiceError> {
        self.store.read(|doc| {
            Ok(user_repo::find_by_login_id(doc, login_id)?
                .password
                .clone())
        })
    }
}
