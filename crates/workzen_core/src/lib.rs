//! Record store for the WorkZen HR dashboard.
//! This crate is the single source of truth for employee/user invariants.

pub mod config;
pub mod credential;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::StoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::attendance::{AttendanceAction, AttendanceError, AttendanceStatus, CheckOutPolicy};
pub use model::document::Document;
pub use model::employee::{
    Employee, EmployeeId, EmployeePatch, EmployeeValidationError, NewEmployee,
};
pub use model::role::Role;
pub use model::user::{RegisterAccount, User, UserProfile};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::attendance_service::{AttendanceService, AttendanceSummary};
pub use service::employee_service::EmployeeService;
pub use service::{ErrorKind, ServiceError};
pub use store::{
    open_store, open_store_in_memory, JsonFileBackend, MemoryBackend, RecordStore, StoreBackend,
    StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
