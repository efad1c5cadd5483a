//! Whole-document transaction boundary.
//!
//! # Responsibility
//! - Run every read-modify-write cycle under one exclusive lock.
//! - Commit a working copy only when the closure succeeds.
//!
//! # Invariants
//! - At most one transaction touches the stored document at a time, across
//!   handles and processes when the backend's `Guard` spans them.
//! - A failed or panicking transaction writes zero bytes.
//! - `Document::version` grows by exactly one per committed change.

use super::{StoreBackend, StoreError, StoreResult};
use crate::model::document::Document;
use log::{debug, error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Shared, serialized access to one document.
///
/// Safe to share across threads by reference (`std::thread::scope`) or
/// inside an `Arc`.
#[derive(Debug)]
pub struct RecordStore<B: StoreBackend> {
    backend: Mutex<B>,
}

impl<B: StoreBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Runs `f` against a working copy and commits it when `f` succeeds.
    ///
    /// The working copy is written only if it differs from the loaded
    /// document; an error from `f` discards every change.
    ///
    /// # Errors
    /// - Any error returned by `f`, unchanged.
    /// - `StoreError` (converted into `E`) when loading or saving fails.
    pub fn transaction<T, E>(
        &self,
        name: &'static str,
        f: impl FnOnce(&mut Document) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let started_at = Instant::now();
        let mut backend = self.lock();
        let mode = backend.mode();

        let _held = backend.acquire().map_err(|err| {
            log_failure(name, mode, started_at, "store_lock_failed", &err);
            err
        })?;
        let loaded = backend.load().map_err(|err| {
            log_failure(name, mode, started_at, "store_load_failed", &err);
            err
        })?;
        let mut working = loaded.clone();

        let output = match f(&mut working) {
            Ok(output) => output,
            Err(err) => {
                debug!(
                    "event=txn_abort module=store txn={} mode={} duration_ms={}",
                    name,
                    mode,
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        };

        if working == loaded {
            debug!(
                "event=txn_commit module=store status=noop txn={} mode={} version={}",
                name, mode, loaded.version
            );
            return Ok(output);
        }

        working.version = loaded.version.checked_add(1).ok_or_else(|| {
            let err = StoreError::VersionOverflow {
                version: loaded.version,
            };
            log_failure(name, mode, started_at, "store_version_overflow", &err);
            err
        })?;
        backend.save(&working).map_err(|err| {
            log_failure(name, mode, started_at, "store_save_failed", &err);
            err
        })?;

        info!(
            "event=txn_commit module=store status=ok txn={} mode={} version={} duration_ms={}",
            name,
            mode,
            working.version,
            started_at.elapsed().as_millis()
        );
        Ok(output)
    }

    /// Runs a read-only closure against the current document.
    pub fn read<T, E>(&self, f: impl FnOnce(&Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let document = self.load_current()?;
        f(&document)
    }

    /// Returns a copy of the current document.
    pub fn snapshot(&self) -> StoreResult<Document> {
        self.load_current()
    }

    fn load_current(&self) -> StoreResult<Document> {
        let mut backend = self.lock();
        let _held = backend.acquire()?;
        backend.load()
    }

    // A panic inside a transaction happens before `save`, so the backend is
    // still consistent and the poisoned lock can be reused.
    fn lock(&self) -> MutexGuard<'_, B> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_failure(
    name: &'static str,
    mode: &'static str,
    started_at: Instant,
    error_code: &'static str,
    err: &StoreError,
) {
    error!(
        "event=txn_commit module=store status=error txn={} mode={} duration_ms={} error_code={} error={}",
        name,
        mode,
        started_at.elapsed().as_millis(),
        error_code,
        err
    );
}
