//! Storage layer: the persistent side of the ledger.
//!
//! The authoritative copy of every feedback record lives in a document store
//! behind the [`DocumentStore`] trait: an insertion-ordered collection of
//! self-contained documents addressed by `feedback_id`. Two implementations
//! ship:
//!
//! - [`SqliteStore`]: durable, `SQLite`-backed, the default for the binary
//! - [`MemoryStore`]: ephemeral `Vec`-backed store for tests and doctests
//!
//! Stores are deliberately dumb. They hold documents as written (including
//! legacy rating representations, see [`StoredRating`]) and report whether a
//! keyed operation matched anything; id uniqueness, rating normalization, and
//! keeping the in-memory chain in sync are all the ledger's job.

pub mod document;
pub mod memory;
pub mod sqlite;

pub use document::{FeedbackChanges, StoredFeedback, StoredRating};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::Result;

/// A persistent, insertion-ordered collection of feedback documents.
///
/// `find_all` must return documents in the order they were inserted; the
/// ledger rebuilds its chain from that order on load. `update` and `delete`
/// return whether a document matched, so the caller can detect drift between
/// the store and its own view.
pub trait DocumentStore: Send {
    /// Returns every document in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if the store cannot be read.
    fn find_all(&mut self) -> Result<Vec<StoredFeedback>>;

    /// Appends a new document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if the document cannot be written.
    fn insert(&mut self, document: &StoredFeedback) -> Result<()>;

    /// Applies `changes` to the document keyed by `feedback_id`.
    ///
    /// Returns `false` when no document matched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if the store cannot be written.
    fn update(&mut self, feedback_id: &str, changes: &FeedbackChanges) -> Result<bool>;

    /// Removes the document keyed by `feedback_id`.
    ///
    /// Returns `false` when no document matched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Store`] if the store cannot be written.
    fn delete(&mut self, feedback_id: &str) -> Result<bool>;
}
