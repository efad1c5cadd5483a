//! In-process backend for tests and throwaway tooling.

use super::{StoreBackend, StoreResult};
use crate::model::document::Document;

/// Keeps the document in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Document,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document, e.g. a fixture.
    pub fn with_document(document: Document) -> Self {
        Self { document }
    }
}

impl StoreBackend for MemoryBackend {
    // The owning `RecordStore` mutex is the only way to reach this document.
    type Guard = ();

    fn acquire(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn load(&mut self) -> StoreResult<Document> {
        Ok(self.document.clone())
    }

    fn save(&mut self, document: &Document) -> StoreResult<()> {
        self.document = document.clone();
        Ok(())
    }

    fn mode(&self) -> &'static str {
        "memory"
    }
}
