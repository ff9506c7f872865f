//! Data models for voxpop.
//!
//! This module contains the core data structures used throughout the system.

mod feedback;

pub use feedback::{FeedbackId, FeedbackRecord, NewFeedback, RatingSummary};
