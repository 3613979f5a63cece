//! Task record shapes.
//!
//! # Responsibility
//! - Define the raw store row (`RawRecord`) and the classified working-set
//!   record (`Record`).
//! - Convert between the two without losing store identity or version.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `revision` is owned by the store; callers only echo it back on writes.
//! - After normalization every `structured_tags` entry appears in `notes`
//!   and every non-quadrant marker in `notes` appears in `structured_tags`.

use crate::model::quadrant::{Quadrant, TimePeriod};
use crate::tags::extract::extract_markers;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable external identifier of a record.
pub type RecordId = Uuid;

/// Record exactly as the store holds it, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: RecordId,
    pub title: String,
    /// Free text that may carry hashtag markers.
    pub notes: String,
    /// Name of the list the record lives in.
    pub container: String,
    pub completed: bool,
    /// Unix epoch milliseconds of the last store write.
    pub last_modified_ms: i64,
    /// Optimistic version stamp, bumped by every store update.
    pub revision: i64,
}

impl RawRecord {
    /// Builds an unsaved row with a fresh id.
    pub fn new(
        title: impl Into<String>,
        notes: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            notes: notes.into(),
            container: container.into(),
            completed: false,
            last_modified_ms: 0,
            revision: 0,
        }
    }
}

/// Classified record exposed to application callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    /// Text blob; canonical after normalization.
    pub notes: String,
    /// Auxiliary markers kept alongside `notes`, quadrant marker excluded.
    pub structured_tags: Vec<String>,
    /// `None` means unassigned; such records never reach the working set.
    pub quadrant: Option<Quadrant>,
    pub completed: bool,
    pub last_modified_ms: i64,
    pub container: String,
    pub revision: i64,
}

impl Record {
    /// Lifts a store row into a record, seeding tags from its notes.
    pub fn from_raw(raw: &RawRecord, quadrant: Option<Quadrant>) -> Self {
        Self {
            id: raw.id,
            title: raw.title.clone(),
            notes: raw.notes.clone(),
            structured_tags: extract_markers(&raw.notes),
            quadrant,
            completed: raw.completed,
            last_modified_ms: raw.last_modified_ms,
            container: raw.container.clone(),
            revision: raw.revision,
        }
    }

    /// Projects this record back to the store shape.
    pub fn to_raw(&self) -> RawRecord {
        RawRecord {
            id: self.id,
            title: self.title.clone(),
            notes: self.notes.clone(),
            container: self.container.clone(),
            completed: self.completed,
            last_modified_ms: self.last_modified_ms,
            revision: self.revision,
        }
    }

    /// Case-insensitive membership test over `structured_tags`.
    pub fn has_tag(&self, marker: &str) -> bool {
        let lower = marker.to_lowercase();
        self.structured_tags
            .iter()
            .any(|tag| tag.to_lowercase() == lower)
    }

    /// Time periods tagged on this record, in tag order.
    pub fn time_periods(&self) -> Vec<TimePeriod> {
        self.structured_tags
            .iter()
            .filter_map(|tag| TimePeriod::from_marker(tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{RawRecord, Record};
    use crate::model::quadrant::{Quadrant, TimePeriod};

    #[test]
    fn from_raw_seeds_tags_without_quadrant_markers() {
        let raw = RawRecord::new("Call", "Call Bob #DoNow #Today #bob", "Inbox");
        let record = Record::from_raw(&raw, Some(Quadrant::DoNow));

        assert_eq!(record.structured_tags, vec!["#today", "#bob"]);
        assert!(record.has_tag("#BOB"));
        assert_eq!(record.time_periods(), vec![TimePeriod::Today]);
        assert_eq!(record.to_raw(), raw);
    }
}
