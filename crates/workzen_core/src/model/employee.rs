//! Employee domain model.
//!
//! # Responsibility
//! - Define the persisted employee record and its create/patch inputs.
//! - Validate record shape before it reaches the document.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `email` is stored trimmed and lowercased.
//! - New employees start `absent` with no check-in/check-out times.
//! - Keys this build does not know about survive a load/save cycle.

use crate::model::attendance::AttendanceStatus;
use crate::model::role::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Opaque employee identifier. Also used as the paired user's `loginId`.
pub type EmployeeId = String;

/// Persisted employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, serialize_with = "whole_number")]
    pub salary: Option<f64>,
    /// Initials shown in place of a photo.
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatar_color: Option<String>,
    /// Tenant scope: the login id of the admin account that owns this record.
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    /// Creates an `absent` employee with empty optional fields.
    pub fn new(
        id: impl Into<EmployeeId>,
        name: impl Into<String>,
        email: impl AsRef<str>,
        role: Role,
    ) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            avatar: derive_initials(&name),
            name,
            email: normalize_email(email.as_ref()),
            phone: String::new(),
            department: String::new(),
            position: String::new(),
            role,
            salary: None,
            avatar_color: None,
            company_id: None,
            status: AttendanceStatus::Absent,
            check_in_time: None,
            check_out_time: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Validates fields that every persisted employee must satisfy.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::BlankName);
        }
        if !is_valid_email(&self.email) {
            return Err(EmployeeValidationError::InvalidEmail(self.email.clone()));
        }
        if let Role::Custom(label) = &self.role {
            if label.trim().is_empty() {
                return Err(EmployeeValidationError::BlankCustomRole);
            }
        }
        if let Some(salary) = self.salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(EmployeeValidationError::InvalidSalary(salary));
            }
        }
        Ok(())
    }

    /// Returns whether this employee belongs to `company_id`.
    ///
    /// An empty `company_id` matches every employee.
    pub fn belongs_to(&self, company_id: &str) -> bool {
        company_id.is_empty() || self.company_id.as_deref() == Some(company_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmployeeValidationError {
    BlankName,
    InvalidEmail(String),
    BlankCustomRole,
    InvalidSalary(f64),
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "employee name must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::BlankCustomRole => write!(f, "custom role must not be blank"),
            Self::InvalidSalary(value) => {
                write!(f, "salary must be a non-negative number, got {value}")
            }
        }
    }
}

impl Error for EmployeeValidationError {}

/// Input for the create-employee command.
///
/// Deserializes from the dashboard's camelCase request body. Unknown keys are
/// ignored; the login password travels separately.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEmployee {
    /// Caller-supplied id. A UUID is generated when absent or blank.
    pub id: Option<EmployeeId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub role: Role,
    pub salary: Option<f64>,
    /// Derived from `name` when absent or blank.
    pub avatar: Option<String>,
    pub avatar_color: Option<String>,
    pub company_id: Option<String>,
    /// Stamped by the command handler when absent.
    pub created_at: Option<String>,
}

impl NewEmployee {
    /// Builds the persisted record: fresh attendance state, generated id and
    /// avatar where missing, normalized email.
    ///
    /// # Errors
    /// Returns the first validation failure of the resulting record.
    pub fn into_employee(
        self,
        default_created_at: impl FnOnce() -> String,
    ) -> Result<Employee, EmployeeValidationError> {
        let id = non_blank(self.id).unwrap_or_else(|| Uuid::new_v4().to_string());
        let name = self.name.trim().to_string();
        let avatar = non_blank(self.avatar).unwrap_or_else(|| derive_initials(&name));

        let employee = Employee {
            id,
            name,
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            department: self.department.trim().to_string(),
            position: self.position.trim().to_string(),
            role: self.role,
            salary: self.salary,
            avatar,
            avatar_color: non_blank(self.avatar_color),
            company_id: non_blank(self.company_id),
            status: AttendanceStatus::Absent,
            check_in_time: None,
            check_out_time: None,
            created_at: Some(non_blank(self.created_at).unwrap_or_else(default_created_at)),
            extra: Map::new(),
        };
        employee.validate()?;
        Ok(employee)
    }
}

/// Partial update for an employee record.
///
/// `None` keeps the stored value. For nullable fields, `Some(None)` (an
/// explicit JSON `null`) clears the stored value. Attendance fields and the
/// id are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub role: Option<Role>,
    #[serde(deserialize_with = "explicit_null")]
    pub salary: Option<Option<f64>>,
    pub avatar: Option<String>,
    #[serde(deserialize_with = "explicit_null")]
    pub avatar_color: Option<Option<String>>,
    #[serde(deserialize_with = "explicit_null")]
    pub company_id: Option<Option<String>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Normalized email this patch would store, if it sets one.
    pub fn normalized_email(&self) -> Option<String> {
        self.email.as_deref().map(normalize_email)
    }

    /// Shallow-merges the provided fields into `employee`.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(name) = &self.name {
            employee.name = name.trim().to_string();
        }
        if let Some(email) = self.normalized_email() {
            employee.email = email;
        }
        if let Some(phone) = &self.phone {
            employee.phone = phone.trim().to_string();
        }
        if let Some(department) = &self.department {
            employee.department = department.trim().to_string();
        }
        if let Some(position) = &self.position {
            employee.position = position.trim().to_string();
        }
        if let Some(role) = &self.role {
            employee.role = role.clone();
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(avatar) = &self.avatar {
            employee.avatar = avatar.trim().to_string();
        }
        if let Some(avatar_color) = &self.avatar_color {
            employee.avatar_color = avatar_color.clone();
        }
        if let Some(company_id) = &self.company_id {
            employee.company_id = company_id.clone();
        }
    }
}

/// Trims and lowercases an email for storage and comparison.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Compares two emails the way they are stored: trimmed and lowercased,
/// including non-ASCII letters.
pub fn same_email(left: &str, right: &str) -> bool {
    normalize_email(left) == normalize_email(right)
}

/// Returns whether `value` has a `local@domain.tld` shape.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Derives up to two uppercase initials from a display name.
///
/// `"Emma Johnson"` -> `"EJ"`, `"Cher"` -> `"C"`.
pub fn derive_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

// Largest magnitude at which every whole f64 is exactly an i64 (2^53).
const MAX_EXACT_WHOLE: f64 = 9_007_199_254_740_992.0;

// Whole amounts are written without a fraction (`50000`, not `50000.0`), the
// way the dashboard's JSON encoder writes them.
fn whole_number<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(amount) if amount.fract() == 0.0 && amount.abs() <= MAX_EXACT_WHOLE => {
            serializer.serialize_some(&(*amount as i64))
        }
        Some(amount) => serializer.serialize_some(amount),
        None => serializer.serialize_none(),
    }
}

// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`,
// via `#[serde(default)]`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::{
        derive_initials, is_valid_email, same_email, EmployeePatch, EmployeeValidationError,
        NewEmployee,
    };
    use crate::model::attendance::AttendanceStatus;
    use crate::model::role::Role;

    fn request() -> NewEmployee {
        NewEmployee {
            name: " Emma Johnson ".to_string(),
            email: " Emma@WorkZen.com ".to_string(),
            department: "Engineering".to_string(),
            ..NewEmployee::default()
        }
    }

    #[test]
    fn into_employee_fills_generated_fields() {
        let employee = request()
            .into_employee(|| "2024-11-07T09:00:00Z".to_string())
            .unwrap();

        assert!(!employee.id.is_empty());
        assert_eq!(employee.name, "Emma Johnson");
        assert_eq!(employee.email, "emma@workzen.com");
        assert_eq!(employee.avatar, "EJ");
        assert_eq!(employee.status, AttendanceStatus::Absent);
        assert_eq!(employee.check_in_time, None);
        assert_eq!(employee.check_out_time, None);
        assert_eq!(employee.created_at.as_deref(), Some("2024-11-07T09:00:00Z"));
    }

    #[test]
    fn into_employee_keeps_caller_id() {
        let employee = NewEmployee {
            id: Some("EMP-0042".to_string()),
            ..request()
        }
        .into_employee(String::new)
        .unwrap();
        assert_eq!(employee.id, "EMP-0042");
    }

    #[test]
    fn into_employee_rejects_invalid_input() {
        let blank_name = NewEmployee {
            name: "   ".to_string(),
            ..request()
        };
        assert_eq!(
            blank_name.into_employee(String::new).unwrap_err(),
            EmployeeValidationError::BlankName
        );

        let bad_email = NewEmployee {
            email: "not-an-email".to_string(),
            ..request()
        };
        assert!(matches!(
            bad_email.into_employee(String::new),
            Err(EmployeeValidationError::InvalidEmail(_))
        ));

        let blank_role = NewEmployee {
            role: Role::Custom(String::new()),
            ..request()
        };
        assert_eq!(
            blank_role.into_employee(String::new).unwrap_err(),
            EmployeeValidationError::BlankCustomRole
        );

        let negative_salary = NewEmployee {
            salary: Some(-1.0),
            ..request()
        };
        assert!(matches!(
            negative_salary.into_employee(String::new),
            Err(EmployeeValidationError::InvalidSalary(_))
        ));
    }

    #[test]
    fn patch_distinguishes_absent_and_null() {
        let patch: EmployeePatch =
            serde_json::from_str(r#"{"salary": null, "department": "Ops", "status": "present"}"#)
                .unwrap();
        assert_eq!(patch.salary, Some(None));
        assert_eq!(patch.avatar_color, None);
        assert_eq!(patch.department.as_deref(), Some("Ops"));

        let empty: EmployeePatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn patch_apply_merges_only_given_fields() {
        let mut employee = request().into_employee(String::new).unwrap();
        employee.salary = Some(50_000.0);
        employee.avatar_color = Some("#3366ff".to_string());

        let patch: EmployeePatch =
            serde_json::from_str(r#"{"position": "Lead", "avatarColor": null}"#).unwrap();
        patch.apply_to(&mut employee);

        assert_eq!(employee.position, "Lead");
        assert_eq!(employee.department, "Engineering");
        assert_eq!(employee.salary, Some(50_000.0));
        assert_eq!(employee.avatar_color, None);
    }

    #[test]
    fn whole_salaries_serialize_without_fraction() {
        let mut employee = request().into_employee(String::new).unwrap();
        employee.salary = Some(50_000.0);
        let value = serde_json::to_value(&employee).unwrap();
        assert_eq!(value["salary"], serde_json::json!(50000));
        assert_eq!(serde_json::to_string(&value["salary"]).unwrap(), "50000");

        employee.salary = Some(4_250.5);
        assert_eq!(serde_json::to_value(&employee).unwrap()["salary"], serde_json::json!(4250.5));

        employee.salary = None;
        assert_eq!(serde_json::to_value(&employee).unwrap()["salary"], serde_json::Value::Null);
    }

    #[test]
    fn initials_and_email_helpers() {
        assert_eq!(derive_initials("emma rose johnson"), "ER");
        assert_eq!(derive_initials("Cher"), "C");
        assert_eq!(derive_initials("   "), "");
        assert!(same_email(" ÉMILE@WorkZen.com", "émile@workzen.com"));
        assert!(!same_email("emile@workzen.com", "émile@workzen.com"));
        assert!(is_valid_email("hr@workzen.com"));
        assert!(!is_valid_email("hr@workzen"));
        assert!(!is_valid_email("h r@workzen.com"));
    }
}
