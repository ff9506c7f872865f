//! In-memory document store.
//!
//! Keeps documents in a plain `Vec` in insertion order. Behaves exactly like
//! [`crate::SqliteStore`] minus durability, which makes it the store of
//! choice for doctests and for tests that do not want a database file.

use crate::Result;
use crate::storage::{DocumentStore, FeedbackChanges, StoredFeedback, StoredRating};

/// Ephemeral [`DocumentStore`] backed by a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Vec<StoredFeedback>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            documents: Vec::new(),
        }
    }

    /// Creates a store pre-seeded with documents, as if an earlier process
    /// had written them.
    #[must_use]
    pub fn with_documents(documents: Vec<StoredFeedback>) -> Self {
        Self { documents }
    }

    /// Returns the stored documents in insertion order.
    #[must_use]
    pub fn documents(&self) -> &[StoredFeedback] {
        &self.documents
    }
}

impl DocumentStore for MemoryStore {
    fn find_all(&mut self) -> Result<Vec<StoredFeedback>> {
        Ok(self.documents.clone())
    }

    fn insert(&mut self, document: &StoredFeedback) -> Result<()> {
        self.documents.push(document.clone());
        Ok(())
    }

    fn update(&mut self, feedback_id: &str, changes: &FeedbackChanges) -> Result<bool> {
        match self
            .documents
            .iter_mut()
            .find(|d| d.feedback_id == feedback_id)
        {
            Some(document) => {
                document.feedback_text = changes.feedback_text.clone();
                document.rating = StoredRating::Number(changes.rating);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    fn delete(&mut self, feedback_id: &str) -> Result<bool> {
        match self
            .documents
            .iter()
            .position(|d| d.feedback_id == feedback_id)
        {
            Some(index) => {
                self.documents.remove(index);
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
