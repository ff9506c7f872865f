//! Document contract shared by every store implementation.
//!
//! A store holds feedback as self-contained documents keyed by `feedback_id`.
//! The field names here ARE the contract: they match the column names in the
//! `SQLite` schema and the keys a JSON rendition of a document would carry, so
//! a database written by one store version stays readable by the next.

use crate::models::{FeedbackId, FeedbackRecord};
use serde::{Deserialize, Serialize};

/// One feedback document as a store holds it.
///
/// Unlike [`FeedbackRecord`], the rating is kept in whatever representation
/// the writing process used. Normalization to an integer happens when the
/// ledger loads the document, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFeedback {
    /// Unique document key.
    pub feedback_id: String,
    /// Customer display name.
    pub customer_name: String,
    /// Free-form feedback body.
    pub feedback_text: String,
    /// Rating as stored, possibly by an older writer.
    pub rating: StoredRating,
}

impl StoredFeedback {
    /// Builds the document form of an in-memory record.
    #[must_use]
    pub fn from_record(record: &FeedbackRecord) -> Self {
        Self {
            feedback_id: record.id.to_string(),
            customer_name: record.customer.clone(),
            feedback_text: record.text.clone(),
            rating: StoredRating::Number(record.rating),
        }
    }

    /// Converts the document into an in-memory record, normalizing the
    /// rating.
    #[must_use]
    pub fn into_record(self) -> FeedbackRecord {
        let rating = self.rating.normalize();
        FeedbackRecord {
            id: FeedbackId::new(self.feedback_id),
            customer: self.customer_name,
            text: self.feedback_text,
            rating,
        }
    }
}

/// A rating value as found in a store.
///
/// Current writers always store integers, but databases written by earlier
/// tooling carry ratings as text. Loads must accept both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredRating {
    /// Integral rating, the representation every current writer produces.
    Number(i64),
    /// Rating serialized as text by a legacy writer.
    Text(String),
    /// Anything else a writer managed to store (null, float, blob).
    Unsupported,
}

impl StoredRating {
    /// Collapses a stored rating to an integer.
    ///
    /// Integers pass through unchanged. Text parses as a signed decimal
    /// integer (optional leading sign, digits, nothing else); text that does
    /// not parse normalizes to 0 rather than failing the load, and so does
    /// anything that is neither an integer nor text.
    #[must_use]
    pub fn normalize(&self) -> i64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.parse().unwrap_or(0),
            Self::Unsupported => 0,
        }
    }
}

/// The mutable subset of a document, applied by update operations.
///
/// The document key and customer name are immutable once written; an update
/// always rewrites both the text and the rating together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackChanges {
    /// Replacement feedback body.
    pub feedback_text: String,
    /// Replacement rating.
    pub rating: i64,
}
