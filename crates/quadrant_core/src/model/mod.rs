//! Domain model for hashtag-classified task records.
//!
//! # Responsibility
//! - Define the record shapes moved between store, classifier and callers.
//! - Define the closed marker vocabularies (quadrants, time periods).
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Marker vocabularies are wire protocol and are never extended implicitly.

pub mod delegate;
pub mod quadrant;
pub mod record;
