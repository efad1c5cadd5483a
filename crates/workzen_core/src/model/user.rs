//! Login credential records.
//!
//! # Invariants
//! - A user created through employee creation has `login_id == employee.id`.
//! - `password` holds the stored credential form and is never printed by
//!   `Debug` or exposed through `UserProfile`.

use crate::model::employee::{normalize_email, Employee};
use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};

/// Persisted login record.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub login_id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Stored credential (Argon2 PHC string, or legacy plaintext).
    pub password: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Builds the login record paired with `employee`.
    pub fn for_employee(employee: &Employee, credential: String) -> Self {
        Self {
            login_id: employee.id.clone(),
            company_name: None,
            name: employee.name.clone(),
            email: normalize_email(&employee.email),
            phone: employee.phone.clone(),
            password: credential,
            logo: None,
            role: employee.role.clone(),
            avatar: employee.avatar.clone(),
            company_id: employee.company_id.clone(),
            created_at: employee.created_at.clone(),
            extra: Map::new(),
        }
    }

    /// Credential-free view handed back to callers.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            login_id: self.login_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role.clone(),
            avatar: self.avatar.clone(),
            company_id: self.company_id.clone(),
            company_name: self.company_name.clone(),
        }
    }
}

impl Debug for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("login_id", &self.login_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("company_id", &self.company_id)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// User data safe to return from authentication and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub login_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub avatar: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
}

/// Input for registering a company admin account.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterAccount {
    pub company_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Debug for RegisterAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterAccount")
            .field("company_name", &self.company_name)
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
