//! Canonical notes rebuilding.
//!
//! # Responsibility
//! - Merge text markers and structured tags into one auxiliary marker list.
//! - Rebuild notes as `prose` + quadrant marker + auxiliary markers.
//! - Provide time-period, delegate and quadrant rewrites on top of the same
//!   rebuild step.
//!
//! # Invariants
//! - `normalize(normalize(r)) == normalize(r)` for every record.
//! - Output `structured_tags` never contains a quadrant marker.
//! - At most one time-period marker survives `set_time_period`.
//! - Hashtag-only notes collapse to the bare marker form; prose formatting
//!   (indentation, blank-line runs) is not preserved.

use crate::model::delegate::Delegate;
use crate::model::quadrant::{Quadrant, TimePeriod};
use crate::model::record::Record;
use crate::tags::extract::{
    canonicalize_markers, dedup_markers, extract_markers, remove_markers, sanitize_marker,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Rebuilds `record.notes` and `record.structured_tags` canonically.
///
/// Text markers come first, then structured tags not already in the text.
pub fn normalize(record: &Record) -> Record {
    let aux = auxiliary_markers(record);
    rebuild(record, record.quadrant, aux)
}

/// Assigns `quadrant` and rebuilds; every previous quadrant marker spelling
/// is dropped from the text.
pub fn move_to_quadrant(record: &Record, quadrant: Quadrant) -> Record {
    let aux = auxiliary_markers(record);
    rebuild(record, Some(quadrant), aux)
}

/// Replaces any time-period marker with `period`.
pub fn set_time_period(record: &Record, period: TimePeriod) -> Record {
    let mut aux = without_time_periods(auxiliary_markers(record));
    aux.push(period.marker().to_string());
    rebuild(record, record.quadrant, aux)
}

/// Drops every time-period marker.
pub fn remove_time_period(record: &Record) -> Record {
    let aux = without_time_periods(auxiliary_markers(record));
    rebuild(record, record.quadrant, aux)
}

/// Removes the period markers when `period` is set, otherwise sets it.
pub fn toggle_time_period(record: &Record, period: TimePeriod) -> Record {
    let has_period = auxiliary_markers(record)
        .iter()
        .any(|marker| marker.eq_ignore_ascii_case(period.marker()));
    if has_period {
        remove_time_period(record)
    } else {
        set_time_period(record, period)
    }
}

/// Swaps the delegate marker.
///
/// Every marker naming an entry of `directory` is removed, then the marker
/// of `delegate` is appended when one is given.
pub fn assign_delegate(
    record: &Record,
    directory: &[Delegate],
    delegate: Option<&Delegate>,
) -> Record {
    let mut aux: Vec<String> = auxiliary_markers(record)
        .into_iter()
        .filter(|marker| {
            let known = directory.iter().any(|entry| entry.matches_marker(marker));
            let incoming = delegate.is_some_and(|entry| entry.matches_marker(marker));
            !known && !incoming
        })
        .collect();

    if let Some(delegate) = delegate {
        match sanitize_marker(&delegate.marker()) {
            Some(marker) => aux.push(marker),
            None => debug!(
                "event=delegate_marker_skip module=tags status=skip delegate_id={}",
                delegate.id
            ),
        }
    }
    rebuild(record, record.quadrant, aux)
}

/// Notes text with every marker removed and whitespace tidied.
///
/// Applied until stable so that removing one marker can never expose a new
/// one on the next pass.
pub fn user_prose(text: &str) -> String {
    let mut current = strip_markers_once(text);
    loop {
        let next = strip_markers_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Joins prose, quadrant marker and auxiliary markers into notes text.
pub fn compose_notes(prose: &str, quadrant: Option<Quadrant>, aux: &[String]) -> String {
    let mut notes = String::from(prose);
    if let Some(quadrant) = quadrant {
        if !notes.is_empty() {
            notes.push_str("\n\n");
        }
        notes.push_str(quadrant.marker());
    }
    if !aux.is_empty() {
        if quadrant.is_some() {
            notes.push('\n');
        } else if !notes.is_empty() {
            notes.push_str("\n\n");
        }
        notes.push_str(&aux.join(" "));
    }
    notes
}

fn auxiliary_markers(record: &Record) -> Vec<String> {
    let from_text = extract_markers(&record.notes);
    let from_tags = record.structured_tags.iter().filter_map(|tag| {
        let sanitized = sanitize_marker(tag);
        if sanitized.is_none() {
            debug!(
                "event=tag_drop module=tags status=skip record_id={} reason=not_a_marker",
                record.id
            );
        }
        sanitized
    });
    dedup_markers(from_text.into_iter().chain(from_tags))
        .into_iter()
        .filter(|marker| !Quadrant::is_quadrant_marker(marker))
        .collect()
}

fn without_time_periods(aux: Vec<String>) -> Vec<String> {
    aux.into_iter()
        .filter(|marker| TimePeriod::from_marker(marker).is_none())
        .collect()
}

fn rebuild(record: &Record, quadrant: Option<Quadrant>, aux: Vec<String>) -> Record {
    let aux = dedup_markers(aux);
    let prose = user_prose(&record.notes);
    Record {
        notes: compose_notes(&prose, quadrant, &aux),
        structured_tags: aux,
        quadrant,
        ..record.clone()
    }
}

fn strip_markers_once(text: &str) -> String {
    let canonical = canonicalize_markers(text);
    tidy_whitespace(&remove_markers(&canonical))
}

fn tidy_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let collapsed = INLINE_WS_RE.replace_all(line.trim(), " ").into_owned();
        let previous_blank = lines.last().map_or(true, |last| last.is_empty());
        if collapsed.is_empty() && previous_blank {
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
