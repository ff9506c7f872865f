//! The feedback ledger: one collection, two representations.
//!
//! A [`FeedbackLedger`] owns an in-memory [`FeedbackChain`] and a persistent
//! [`DocumentStore`] and keeps them describing the same collection through
//! every mutation. The chain answers reads (lookups, traversal, aggregation)
//! without touching the store; the store is the durable copy that survives
//! restarts.
//!
//! # Write ordering
//!
//! Mutations hit the store first and commit to the chain only once the store
//! call succeeds. A store failure therefore leaves the chain exactly as it
//! was, and the two sides can never disagree about a record the caller was
//! told exists. The inverse failure (store written, process dies before the
//! chain commit) costs nothing: the chain is rebuilt from the store on the
//! next load.
//!
//! # Existence checks
//!
//! The chain is the arbiter of existence. `add` rejects an id the chain
//! already holds without calling the store; `update` and `delete` report
//! [`Error::NotFound`] on a chain miss without calling the store. When the
//! chain says a record exists but the store reports no match, the ledger
//! logs the drift and carries on rather than failing the operation.

use crate::chain::{self, FeedbackChain};
use crate::models::{FeedbackRecord, NewFeedback, RatingSummary};
use crate::storage::{DocumentStore, FeedbackChanges, StoredFeedback};
use crate::{Error, Result};
use tracing::{debug, info, instrument, warn};

/// Keeps the in-memory chain and the document store in lockstep.
///
/// # Examples
///
/// ```rust
/// use voxpop::{FeedbackLedger, NewFeedback};
/// use voxpop::storage::MemoryStore;
///
/// let mut ledger = FeedbackLedger::open(MemoryStore::new())?;
/// ledger.add(NewFeedback::new("F1", "Alice", "Great service", 5))?;
/// ledger.add(NewFeedback::new("F2", "Bob", "Too slow", 2))?;
///
/// ledger.delete("F1")?;
/// assert_eq!(ledger.len(), 1);
/// # Ok::<(), voxpop::Error>(())
/// ```
pub struct FeedbackLedger<S: DocumentStore> {
    chain: FeedbackChain,
    store: S,
}

impl<S: DocumentStore> FeedbackLedger<S> {
    /// Creates a ledger over the given store without reading it.
    ///
    /// The chain starts empty; call [`FeedbackLedger::load`] to populate it.
    /// Most callers want [`FeedbackLedger::open`] instead.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            chain: FeedbackChain::new(),
            store,
        }
    }

    /// Creates a ledger and loads the store's current contents into the
    /// chain.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store cannot be read.
    pub fn open(store: S) -> Result<Self> {
        let mut ledger = Self::new(store);
        ledger.load()?;
        Ok(ledger)
    }

    /// Rebuilds the chain from the store and returns how many records were
    /// loaded.
    ///
    /// The store is read before the chain is touched, so a read failure
    /// leaves the current chain intact. Ratings are normalized on the way
    /// in (see [`crate::storage::StoredRating::normalize`]); loading twice
    /// yields the same chain, not a doubled one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Store`] if the store cannot be read.
    #[instrument(skip(self))]
    pub fn load(&mut self) -> Result<usize> {
        let documents = self.store.find_all()?;

        self.chain.clear();
        for document in documents {
            self.chain.push_back(document.into_record());
        }

        info!(count = self.chain.len(), "loaded feedback from store");
        Ok(self.chain.len())
    }

    /// Records new feedback in the store and appends it to the chain.
    ///
    /// The store write happens first; the chain is only touched after it
    /// succeeds.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the feedback id is empty
    /// - [`Error::DuplicateId`] if the chain already holds the id (the store
    ///   is not called)
    /// - [`Error::Store`] if the store write fails (the chain is unchanged)
    #[instrument(skip(self, feedback), fields(feedback.id = %feedback.id))]
    pub fn add(&mut self, feedback: NewFeedback) -> Result<()> {
        if feedback.id.as_str().is_empty() {
            return Err(Error::InvalidInput(
                "feedback id must not be empty".to_string(),
            ));
        }
        if self.chain.contains(feedback.id.as_str()) {
            return Err(Error::DuplicateId {
                id: feedback.id.to_string(),
            });
        }

        let record = feedback.into_record();
        self.store.insert(&StoredFeedback::from_record(&record))?;
        self.chain.push_back(record);

        debug!(count = self.chain.len(), "feedback recorded");
        Ok(())
    }

    /// Returns the record with the given id, if the chain holds one.
    ///
    /// Pure chain scan; the store is not consulted.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&FeedbackRecord> {
        self.chain.find(id)
    }

    /// Replaces the text and rating of an existing record, store first.
    ///
    /// The customer name and id are immutable; only the feedback body and
    /// rating change.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the chain holds no such id (the store is not
    ///   called)
    /// - [`Error::Store`] if the store write fails (the chain is unchanged)
    #[instrument(skip(self, text), fields(feedback.id = %id))]
    pub fn update(&mut self, id: &str, text: impl Into<String>, rating: i64) -> Result<()> {
        if !self.chain.contains(id) {
            return Err(Error::NotFound { id: id.to_string() });
        }

        let text = text.into();
        let changes = FeedbackChanges {
            feedback_text: text.clone(),
            rating,
        };
        let matched = self.store.update(id, &changes)?;
        if !matched {
            // Chain and store disagree; keep serving from the chain and let
            // the next load reconcile.
            warn!(feedback.id = %id, "store had no document to update");
        }

        if let Some(record) = self.chain.find_mut(id) {
            record.text = text;
            record.rating = rating;
        }
        Ok(())
    }

    /// Removes a record from the store and unlinks it from the chain.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the chain holds no such id (the store is not
    ///   called)
    /// - [`Error::Store`] if the store write fails (the chain is unchanged)
    #[instrument(skip(self), fields(feedback.id = %id))]
    pub fn delete(&mut self, id: &str) -> Result<()> {
        if !self.chain.contains(id) {
            return Err(Error::NotFound { id: id.to_string() });
        }

        let matched = self.store.delete(id)?;
        if !matched {
            warn!(feedback.id = %id, "store had no document to delete");
        }

        self.chain.remove(id);
        debug!(count = self.chain.len(), "feedback deleted");
        Ok(())
    }

    /// Iterates the records in insertion order.
    #[must_use]
    pub fn iter(&self) -> chain::Iter<'_> {
        self.chain.iter()
    }

    /// Returns the number of records currently held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns true if the ledger holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Computes the mean rating across all current records.
    ///
    /// Returns `None` when the ledger is empty; there is no meaningful
    /// average of nothing.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rating(&self) -> Option<RatingSummary> {
        if self.chain.is_empty() {
            return None;
        }

        let count = self.chain.len();
        // Accumulate in f64: the core accepts any i64 rating, and an integer
        // sum can overflow across records.
        let sum: f64 = self.chain.iter().map(|r| r.rating as f64).sum();
        Some(RatingSummary {
            average: sum / count as f64,
            count,
        })
    }

    /// Returns a reference to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<'a, S: DocumentStore> IntoIterator for &'a FeedbackLedger<S> {
    type Item = &'a FeedbackRecord;
    type IntoIter = chain::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
