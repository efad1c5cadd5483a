//! Store bootstrap entry points.
//!
//! # Invariants
//! - Returned file stores point at an existing, parseable document.

use super::{JsonFileBackend, MemoryBackend, RecordStore, StoreBackend, StoreResult};
use log::{error, info};
use std::path::Path;
use std::time::Instant;

/// Opens the JSON document at `path`, creating it when missing.
///
/// Every handle opened on the same path, in this process or another,
/// shares one document lock through the sibling `<path>.lock` file.
///
/// # Side effects
/// - Creates parent directories, the lock file and an empty document on
///   first use.
/// - Emits `store_open` logging events with duration and status.
///
/// # Errors
/// - `StoreError::Corrupt` when the existing file does not parse.
/// - `StoreError::Io` when the file cannot be created or read.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<RecordStore<JsonFileBackend>> {
    let started_at = Instant::now();
    let path = path.as_ref();
    info!(
        "event=store_open module=store status=start mode=file path={}",
        path.display()
    );

    let mut backend = JsonFileBackend::new(path);
    let loaded = backend.acquire().and_then(|_held| backend.load());
    match loaded {
        Ok(document) => {
            info!(
                "event=store_open module=store status=ok mode=file duration_ms={} version={} employees={} users={}",
                started_at.elapsed().as_millis(),
                document.version,
                document.employees.len(),
                document.users.len()
            );
            Ok(RecordStore::new(backend))
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode=file duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens an empty in-memory store.
pub fn open_store_in_memory() -> RecordStore<MemoryBackend> {
    info!("event=store_open module=store status=ok mode=memory");
    RecordStore::new(MemoryBackend::new())
}
