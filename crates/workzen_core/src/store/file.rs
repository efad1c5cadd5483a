//! JSON file backend.
//!
//! # Invariants
//! - Writes land in a sibling temp file that is fsynced and then renamed
//!   over the target, so readers never observe a partial document.
//! - A missing file is created as an empty document; an existing file is
//!   never rewritten by `load`.
//! - Every load/save cycle runs under an advisory exclusive lock on the
//!   sibling `<file>.lock`, so separate handles and processes on one file
//!   never interleave their commits.

use super::{StoreBackend, StoreError, StoreResult};
use crate::model::document::Document;
use fs4::fs_std::FileExt;
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the document as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file carrying the cross-process document lock.
    pub fn lock_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(".lock");
        PathBuf::from(raw)
    }

    /// Creates the parent directory and an empty document if none exists.
    pub fn ensure_initialized(&self) -> StoreResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_atomically(&Document::new())?;
        info!(
            "event=store_init module=store status=ok path={}",
            self.path.display()
        );
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn write_atomically(&self, document: &Document) -> StoreResult<()> {
        let mut bytes = serde_json::to_vec_pretty(document).map_err(StoreError::Encode)?;
        bytes.push(b'\n');

        let dir = self.parent_dir();
        fs::create_dir_all(&dir).map_err(|err| self.io_error(err))?;

        let mut staged = NamedTempFile::new_in(&dir).map_err(|err| self.io_error(err))?;
        staged.write_all(&bytes).map_err(|err| self.io_error(err))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|err| self.io_error(err))?;
        // Dropping a failed persist removes the temp file; the target is untouched.
        staged
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

/// Holds the advisory lock on `<file>.lock`; closing the handle releases it.
#[derive(Debug)]
pub struct FileLockGuard {
    _file: File,
}

impl StoreBackend for JsonFileBackend {
    type Guard = FileLockGuard;

    fn acquire(&mut self) -> StoreResult<FileLockGuard> {
        fs::create_dir_all(self.parent_dir()).map_err(|err| self.io_error(err))?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StoreError::Io {
                path: lock_path.clone(),
                source,
            })?;
        file.lock_exclusive().map_err(|source| StoreError::Io {
            path: lock_path,
            source,
        })?;
        Ok(FileLockGuard { _file: file })
    }

    fn load(&mut self) -> StoreResult<Document> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.ensure_initialized()?;
                return Ok(Document::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_str::<Document>(&raw).map_err(|err| {
            warn!(
                "event=store_load module=store status=error error_code=corrupt_store path={} line={} column={}",
                self.path.display(),
                err.line(),
                err.column()
            );
            StoreError::Corrupt {
                path: self.path.clone(),
                reason: err.to_string(),
            }
        })
    }

    fn save(&mut self, document: &Document) -> StoreResult<()> {
        self.write_atomically(document)
    }

    fn mode(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::JsonFileBackend;
    use crate::model::document::Document;
    use crate::model::employee::Employee;
    use crate::model::role::Role;
    use crate::store::{StoreBackend, StoreError};

    #[test]
    fn load_creates_missing_file_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("users.json");
        let mut backend = JsonFileBackend::new(&path);

        let document = backend.load().unwrap();
        assert_eq!(document, Document::new());
        assert!(path.exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["employees"], serde_json::json!([]));
        assert_eq!(value["users"], serde_json::json!([]));
    }

    #[test]
    fn save_then_load_returns_same_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("users.json"));

        let mut document = Document::new();
        document.version = 3;
        document.employees.push(Employee::new(
            "emp-1",
            "Emma Johnson",
            "emma@workzen.com",
            Role::Employee,
        ));
        backend.save(&document).unwrap();

        assert_eq!(backend.load().unwrap(), document);
    }

    #[test]
    fn save_leaves_no_staging_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonFileBackend::new(dir.path().join("users.json"));
        backend.save(&Document::new()).unwrap();
        backend.save(&Document::new()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], "users.json");
    }

    #[test]
    fn acquire_blocks_second_holder_until_release() {
        use fs4::fs_std::FileExt;

        let dir = tempfile::tempdir().unwrap();
        let mut first = JsonFileBackend::new(dir.path().join("users.json"));
        let second = JsonFileBackend::new(dir.path().join("users.json"));

        let guard = first.acquire().unwrap();
        let contender = std::fs::OpenOptions::new()
            .write(true)
            .open(second.lock_path())
            .unwrap();
        assert!(contender.try_lock_exclusive().is_err());

        drop(guard);
        contender.try_lock_exclusive().unwrap();
    }

    #[test]
    fn unparseable_content_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{\"employees\": [").unwrap();

        let err = JsonFileBackend::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"employees\": [");
    }
}
