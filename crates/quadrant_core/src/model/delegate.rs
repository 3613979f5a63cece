//! Delegate directory entry.
//!
//! # Invariants
//! - `short_name` and `full_name` are stored trimmed.
//! - Identity is the stable `id`; names may be renamed freely.

use crate::model::record::RecordId;
use serde::{Deserialize, Serialize};

/// A person tasks can be handed to, referenced in notes by `#<short_name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    /// Id of the backing record in the delegates container.
    pub id: RecordId,
    /// Marker word, e.g. `JohnD`.
    pub short_name: String,
    /// Display only.
    pub full_name: String,
}

impl Delegate {
    pub fn new(id: RecordId, short_name: &str, full_name: &str) -> Self {
        Self {
            id,
            short_name: short_name.trim().to_string(),
            full_name: full_name.trim().to_string(),
        }
    }

    /// Marker used to tag tasks handed to this delegate.
    pub fn marker(&self) -> String {
        format!("#{}", self.short_name)
    }

    /// Full name when known, otherwise the short name.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.short_name
        } else {
            &self.full_name
        }
    }

    /// Case-insensitive match against a marker token.
    pub fn matches_marker(&self, marker: &str) -> bool {
        self.marker().to_lowercase() == marker.to_lowercase()
    }
}
