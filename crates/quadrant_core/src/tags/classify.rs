//! Quadrant classification from embedded markers.
//!
//! # Responsibility
//! - Decide which quadrant a record belongs to from its notes, title and
//!   container label.
//!
//! # Invariants
//! - Priority is DoNow > Delegate > Schedule > Bin > `#challenge` (Bin).
//! - A time-period marker without any quadrant marker yields `Schedule`.
//! - The container label only counts through markers it spells; a list
//!   named `today` is not a marker.
//! - No marker at all yields `None`; the caller must not surface the record.

use crate::model::quadrant::{Quadrant, TimePeriod, CHALLENGE_MARKER};
use crate::model::record::RawRecord;
use crate::tags::extract::scan_all_markers;

/// Classifies one record by its text fields.
///
/// Sloppy spellings (`##DoNow`, `# #donow`, `# DoNow`, `#do now`, any case)
/// are recognized because the corpus is canonicalized before scanning.
pub fn classify(text: &str, title: &str, container_label: &str) -> Option<Quadrant> {
    let corpus = format!("{text}\n{title}\n{container_label}").to_lowercase();
    let markers = scan_all_markers(&corpus);

    let explicit = markers
        .iter()
        .filter(|marker| Quadrant::is_quadrant_marker(marker))
        .filter_map(|marker| Quadrant::from_marker(marker))
        .max_by_key(|quadrant| quadrant.rank());
    if explicit.is_some() {
        return explicit;
    }

    if markers.iter().any(|marker| marker == CHALLENGE_MARKER) {
        return Some(Quadrant::Bin);
    }

    if markers
        .iter()
        .any(|marker| TimePeriod::from_marker(marker).is_some())
    {
        return Some(Quadrant::Schedule);
    }

    None
}

/// Classifies a raw store row.
pub fn classify_record(raw: &RawRecord) -> Option<Quadrant> {
    classify(&raw.notes, &raw.title, &raw.container)
}

/// First time-period marker found in `text`, if any.
pub fn time_period_of(text: &str) -> Option<TimePeriod> {
    scan_all_markers(text)
        .iter()
        .find_map(|marker| TimePeriod::from_marker(marker))
}
