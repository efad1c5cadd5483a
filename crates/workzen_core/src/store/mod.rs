//! Document storage backends and the transaction boundary.
//!
//! # Responsibility
//! - Load and persist the whole document through a `StoreBackend`.
//! - Serialize read-modify-write cycles behind one whole-document lock that
//!   also holds across store handles and processes sharing a file.
//!
//! # Invariants
//! - A persisted document is always either the previous or the next fully
//!   written version.
//! - Unparseable content is reported as `StoreError::Corrupt`, never healed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod file;
mod memory;
mod open;
mod record_store;

pub use file::{FileLockGuard, JsonFileBackend};
pub use memory::MemoryBackend;
pub use open::{open_store, open_store_in_memory};
pub use record_store::RecordStore;

use crate::model::document::Document;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Reading, writing or replacing the backing file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stored content does not parse as a document.
    Corrupt { path: PathBuf, reason: String },
    /// Document could not be encoded.
    Encode(serde_json::Error),
    /// The stored commit counter cannot be incremented any further.
    VersionOverflow { version: u64 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store io failed at `{}`: {source}", path.display())
            }
            Self::Corrupt { path, reason } => write!(
                f,
                "store document at `{}` is corrupt and needs manual repair: {reason}",
                path.display()
            ),
            Self::Encode(err) => write!(f, "failed to encode store document: {err}"),
            Self::VersionOverflow { version } => write!(
                f,
                "store document version {version} cannot be incremented and needs manual repair"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Corrupt { .. } | Self::VersionOverflow { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

/// Durable holder of the document.
///
/// Implementations are driven only from inside `RecordStore`, which holds
/// its own mutex and the backend `Guard` around every load/save cycle.
pub trait StoreBackend {
    /// Exclusive claim on the stored document, released on drop.
    type Guard;

    /// Blocks until no other holder (in this or another process) has the
    /// document claimed.
    fn acquire(&mut self) -> StoreResult<Self::Guard>;
    /// Reads the current document, initializing an empty one on first use.
    fn load(&mut self) -> StoreResult<Document>;
    /// Replaces the stored document with `document`.
    fn save(&mut self, document: &Document) -> StoreResult<()>;
    /// Short label used in log events.
    fn mode(&self) -> &'static str;
}
