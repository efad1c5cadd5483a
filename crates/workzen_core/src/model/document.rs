//! Whole-store document shape.

use crate::model::employee::Employee;
use crate::model::user::User;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The single persisted document holding both collections.
///
/// Missing arrays load as empty; a missing `version` loads as `0`. Other
/// top-level keys are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Commit counter, bumped once per committed change.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }
}
