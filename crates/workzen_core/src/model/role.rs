//! Role model shared by employees and login users.
//!
//! # Invariants
//! - Predefined labels round-trip to the same variant, case-insensitively.
//! - Any other label is kept verbatim as `Role::Custom`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Access role assigned to an employee or login user.
///
/// Persisted as its display label so documents written by older dashboard
/// builds (free-text `role` strings) load without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    HrOfficer,
    PayrollOfficer,
    #[default]
    Employee,
    /// Tenant-defined role outside the predefined set.
    Custom(String),
}

impl Role {
    /// Returns the persisted/display label.
    pub fn label(&self) -> &str {
        match self {
            Self::Admin => "Admin",
            Self::HrOfficer => "HR Officer",
            Self::PayrollOfficer => "Payroll Officer",
            Self::Employee => "Employee",
            Self::Custom(label) => label.as_str(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "hr officer" => Self::HrOfficer,
            "payroll officer" => Self::PayrollOfficer,
            "employee" => Self::Employee,
            _ => Self::Custom(trimmed.to_string()),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Custom(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn predefined_labels_parse_case_insensitively() {
        assert_eq!(Role::from("hr officer"), Role::HrOfficer);
        assert_eq!(Role::from(" PAYROLL OFFICER "), Role::PayrollOfficer);
        assert_eq!(Role::from("Admin"), Role::Admin);
    }

    #[test]
    fn unknown_label_becomes_custom() {
        let role = Role::from("  Team Lead ");
        assert_eq!(role, Role::Custom("Team Lead".to_string()));
        assert!(role.is_custom());
        assert_eq!(role.label(), "Team Lead");
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&Role::HrOfficer).unwrap();
        assert_eq!(json, "\"HR Officer\"");

        let custom: Role = serde_json::from_str("\"Auditor\"").unwrap();
        assert_eq!(custom, Role::Custom("Auditor".to_string()));
    }
}
