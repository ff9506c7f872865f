//! # Voxpop
//!
//! A customer feedback aggregator that keeps every record in two places at
//! once: an in-memory doubly linked chain (insertion-ordered, the fast path
//! for lookups and aggregation) and a persistent document store (the durable
//! copy). Every mutation writes through to both.
//!
//! ## Architecture
//!
//! - [`chain`]: the in-memory chain, an arena of records with index-based
//!   `prev`/`next` links. Pure structure, no I/O.
//! - [`storage`]: the [`storage::DocumentStore`] adapter contract plus the
//!   `SQLite` and in-memory backends.
//! - [`services`]: [`FeedbackLedger`], which owns one chain and one store
//!   and applies every operation to both, plus export.
//! - [`shell`]: the interactive menu that drives a ledger.
//!
//! ## Example
//!
//! ```rust
//! use voxpop::{FeedbackLedger, NewFeedback};
//! use voxpop::storage::MemoryStore;
//!
//! let mut ledger = FeedbackLedger::open(MemoryStore::new())?;
//! ledger.add(NewFeedback::new("F1", "Alice", "Great service", 5))?;
//! assert_eq!(ledger.find("F1").map(|r| r.rating), Some(5));
//! # Ok::<(), voxpop::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod chain;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod shell;
pub mod storage;

// Re-exports for convenience
pub use config::VoxpopConfig;
pub use models::{FeedbackId, FeedbackRecord, NewFeedback, RatingSummary};
pub use services::{ExportFormat, FeedbackLedger};
pub use storage::{DocumentStore, MemoryStore, SqliteStore};

/// Error type for voxpop operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `NotFound` | An update/delete referenced a feedback id absent from the chain |
/// | `DuplicateId` | An add referenced a feedback id already present in the chain |
/// | `Store` | The document store call failed (I/O, SQL, serialization) |
/// | `OperationFailed` | Something outside the store failed (config, logging, export I/O) |
/// | `InvalidInput` | Input shape was wrong before any operation ran |
#[derive(Debug, ThisError)]
pub enum Error {
    /// No record with the given feedback id exists in the chain.
    ///
    /// Recovered locally: the operation performed no mutation and no store
    /// call, and the shell surfaces it as a plain message.
    #[error("feedback '{id}' not found")]
    NotFound {
        /// The feedback id that was looked up.
        id: String,
    },

    /// A record with the given feedback id already exists in the chain.
    ///
    /// Raised by `add` before any mutation; one persisted document never
    /// backs two chain entries.
    #[error("feedback '{id}' already exists")]
    DuplicateId {
        /// The feedback id that collided.
        id: String,
    },

    /// The document store failed or was unavailable.
    ///
    /// Raised when `SQLite` open, read, or write operations fail.
    #[error("store operation '{operation}' failed: {cause}")]
    Store {
        /// The store operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An operation outside the document store failed.
    ///
    /// Raised when:
    /// - a config file cannot be read
    /// - logging cannot be initialized
    /// - an export file cannot be created or written
    /// - the interactive session's input or output stream fails
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - an add carries an empty feedback id
    /// - an export path has no recognized extension
    /// - a configuration file cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Builds a [`Error::Store`] from an operation name and any displayable cause.
    pub(crate) fn store(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::Store {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Builds a [`Error::OperationFailed`] from an operation name and any
    /// displayable cause.
    pub(crate) fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for voxpop operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotFound {
            id: "F42".to_string(),
        };
        assert_eq!(err.to_string(), "feedback 'F42' not found");

        let err = Error::DuplicateId {
            id: "F1".to_string(),
        };
        assert_eq!(err.to_string(), "feedback 'F1' already exists");

        let err = Error::store("insert", "disk full");
        assert_eq!(err.to_string(), "store operation 'insert' failed: disk full");

        let err = Error::operation("write_output", "broken pipe");
        assert_eq!(
            err.to_string(),
            "operation 'write_output' failed: broken pipe"
        );

        let err = Error::InvalidInput("bad extension".to_string());
        assert_eq!(err.to_string(), "invalid input: bad extension");
    }
}
