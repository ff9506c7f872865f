//! In-memory doubly linked chain of feedback records.
//!
//! The chain is the fast-path representation of the feedback collection:
//! insertion-ordered, traversable from either end, with O(1) appends and
//! unlinks. Records live in a slot arena (a `Vec` of optional nodes plus a
//! free list) and `prev`/`next` are slot indices into that arena, so there
//! are no ownership cycles and no unsafe pointer surgery.
//!
//! The chain is pure structure: it performs no I/O and knows nothing about
//! persistence. [`crate::FeedbackLedger`] owns exactly one chain and is the
//! only writer of its links.
//!
//! # Invariants
//!
//! After every public operation:
//!
//! - the chain is acyclic and doubly consistent: if `a.next == b` then
//!   `b.prev == a`, and symmetrically;
//! - an empty chain has `head == tail == None`; a singleton chain has
//!   `head == tail` pointing at a node with both links `None`;
//! - traversal order is append order, and removals preserve the relative
//!   order of the remainder.
//!
//! Id uniqueness is NOT a chain invariant; the ledger enforces it before
//! appending. [`FeedbackChain::find`] returns the first match in chain order.

use crate::models::FeedbackRecord;

/// One arena slot: a record plus its neighbor links.
#[derive(Debug)]
struct Node {
    record: FeedbackRecord,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Insertion-ordered doubly linked chain backed by a slot arena.
#[derive(Debug, Default)]
pub struct FeedbackChain {
    /// Arena of nodes; vacated slots are `None` and tracked in `free`.
    slots: Vec<Option<Node>>,
    /// Indices of vacated slots, reused before the arena grows.
    free: Vec<usize>,
    /// First node in chain order.
    head: Option<usize>,
    /// Last node in chain order.
    tail: Option<usize>,
    /// Number of live records.
    len: usize,
}

impl FeedbackChain {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of live records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every record and vacates the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Appends a record at the tail in O(1).
    pub fn push_back(&mut self, record: FeedbackRecord) {
        let node = Node {
            record,
            prev: self.tail,
            next: None,
        };

        let idx = if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        };

        match self.tail {
            Some(old_tail) => {
                if let Some(tail) = self.node_mut(old_tail) {
                    tail.next = Some(idx);
                }
            },
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Returns the first record whose id matches exactly, scanning from the
    /// head. O(n) in the number of live records.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&FeedbackRecord> {
        self.find_slot(id)
            .and_then(|idx| self.node(idx))
            .map(|node| &node.record)
    }

    /// Mutable variant of [`FeedbackChain::find`].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut FeedbackRecord> {
        let idx = self.find_slot(id)?;
        self.node_mut(idx).map(|node| &mut node.record)
    }

    /// Returns true if a record with the given id is live in the chain.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.find_slot(id).is_some()
    }

    /// Unlinks the first record matching the id and returns it.
    ///
    /// Neighbors are reconnected around the removed node and `head`/`tail`
    /// are adjusted when an endpoint goes away; the vacated slot is recycled.
    /// Returns `None` without mutating anything when no record matches.
    pub fn remove(&mut self, id: &str) -> Option<FeedbackRecord> {
        let idx = self.find_slot(id)?;
        self.unlink(idx)
    }

    /// Returns the record at the head, if any.
    #[must_use]
    pub fn front(&self) -> Option<&FeedbackRecord> {
        self.head.and_then(|idx| self.node(idx)).map(|n| &n.record)
    }

    /// Returns the record at the tail, if any.
    #[must_use]
    pub fn back(&self) -> Option<&FeedbackRecord> {
        self.tail.and_then(|idx| self.node(idx)).map(|n| &n.record)
    }

    /// Returns a lazy, restartable iterator in chain order (head to tail).
    ///
    /// The iterator is double-ended; iterating from the back walks the
    /// `prev` links, which is what the traversal tests lean on to prove
    /// link symmetry.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn find_slot(&self, id: &str) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = self.node(idx)?;
            if node.record.id.as_str() == id {
                return Some(idx);
            }
            cursor = node.next;
        }
        None
    }

    fn unlink(&mut self, idx: usize) -> Option<FeedbackRecord> {
        let node = self.slots.get_mut(idx)?.take()?;

        match node.prev {
            Some(prev_idx) => {
                if let Some(prev) = self.node_mut(prev_idx) {
                    prev.next = node.next;
                }
            },
            None => self.head = node.next,
        }
        match node.next {
            Some(next_idx) => {
                if let Some(next) = self.node_mut(next_idx) {
                    next.prev = node.prev;
                }
            },
            None => self.tail = node.prev,
        }

        self.free.push(idx);
        self.len -= 1;
        Some(node.record)
    }
}

impl<'a> IntoIterator for &'a FeedbackChain {
    type Item = &'a FeedbackRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`FeedbackChain`] in chain order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    chain: &'a FeedbackChain,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FeedbackRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front?;
        let node = self.chain.node(idx)?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.front = node.next;
        }
        Some(&node.record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back?;
        let node = self.chain.node(idx)?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.front = None;
            self.back = None;
        } else {
            self.back = node.prev;
        }
        Some(&node.record)
    }
}

impl ExactSizeIterator for Iter<'_> {}
