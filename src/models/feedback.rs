//! Feedback record types and identifiers.

use std::fmt;

/// Unique identifier for a feedback record.
///
/// The id is chosen by the submitter (or generated by the shell when left
/// blank) and never changes once the record exists. It is the sole lookup
/// key for point queries, updates, and deletions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedbackId(String);

impl FeedbackId {
    /// Creates a new feedback id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FeedbackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FeedbackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One piece of customer feedback.
///
/// `id` and `customer` are fixed at creation; `text` and `rating` are the
/// only fields an update may touch. The expected rating domain is 1 to 5,
/// but the core accepts any integer; range validation is the shell's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// Unique identifier.
    pub id: FeedbackId,
    /// Customer name, free text.
    pub customer: String,
    /// Feedback body, free text.
    pub text: String,
    /// Rating given by the customer.
    pub rating: i64,
}

/// Request to add a new feedback record.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    /// Unique identifier for the new record.
    pub id: FeedbackId,
    /// Customer name.
    pub customer: String,
    /// Feedback body.
    pub text: String,
    /// Rating given by the customer.
    pub rating: i64,
}

impl NewFeedback {
    /// Creates a new feedback request.
    #[must_use]
    pub fn new(
        id: impl Into<FeedbackId>,
        customer: impl Into<String>,
        text: impl Into<String>,
        rating: i64,
    ) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            text: text.into(),
            rating,
        }
    }

    pub(crate) fn into_record(self) -> FeedbackRecord {
        FeedbackRecord {
            id: self.id,
            customer: self.customer,
            text: self.text,
            rating: self.rating,
        }
    }
}

/// Aggregate over all live ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    /// Mean rating, float-accumulated over the whole chain.
    pub average: f64,
    /// Number of records that contributed.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_id_roundtrip() {
        let id = FeedbackId::new("F1");
        assert_eq!(id.as_str(), "F1");
        assert_eq!(id.to_string(), "F1");
        assert_eq!(FeedbackId::from("F1"), FeedbackId::from("F1".to_string()));
    }

    #[test]
    fn test_new_feedback_into_record() {
        let record = NewFeedback::new("F1", "Alice", "Great service", 5).into_record();
        assert_eq!(record.id.as_str(), "F1");
        assert_eq!(record.customer, "Alice");
        assert_eq!(record.text, "Great service");
        assert_eq!(record.rating, 5);
    }
}
