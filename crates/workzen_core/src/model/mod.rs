//! Domain model for the HR record store.
//!
//! # Responsibility
//! - Define the persisted document, employee and user records.
//! - Own the attendance state machine and role variants.
//!
//! # Invariants
//! - Every employee is identified by a stable `EmployeeId`.
//! - Records serialize with the dashboard's camelCase keys.

pub mod attendance;
pub mod document;
pub mod employee;
pub mod role;
pub mod user;
