//! Priority quadrant and time-period vocabularies.
//!
//! # Responsibility
//! - Define the closed set of Eisenhower quadrants and their wire markers.
//! - Define the closed set of time-period markers.
//!
//! # Invariants
//! - Marker strings are bit-exact wire protocol; never localize them.
//! - `Quadrant::ALL` is ordered by descending priority rank.

use serde::{Deserialize, Serialize};

/// Legacy alias marker that resolves to [`Quadrant::Bin`].
pub const CHALLENGE_MARKER: &str = "#challenge";

/// Eisenhower-matrix quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Urgent and important.
    DoNow,
    /// Urgent, not important.
    Delegate,
    /// Important, not urgent.
    Schedule,
    /// Neither urgent nor important.
    Bin,
}

impl Quadrant {
    /// All quadrants, highest priority first.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::DoNow,
        Quadrant::Delegate,
        Quadrant::Schedule,
        Quadrant::Bin,
    ];

    /// Canonical marker written into notes.
    pub fn marker(self) -> &'static str {
        match self {
            Self::DoNow => "#DoNow",
            Self::Delegate => "#Delegate",
            Self::Schedule => "#Schedule",
            Self::Bin => "#Bin",
        }
    }

    /// Priority rank; higher wins when several markers are present.
    pub fn rank(self) -> u8 {
        match self {
            Self::DoNow => 4,
            Self::Delegate => 3,
            Self::Schedule => 2,
            Self::Bin => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DoNow => "Do Now",
            Self::Delegate => "Delegate",
            Self::Schedule => "Schedule",
            Self::Bin => "Bin",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::DoNow => "Urgent / Important",
            Self::Delegate => "Urgent / Not Important",
            Self::Schedule => "Not Urgent / Important",
            Self::Bin => "Not Urgent / Not Important",
        }
    }

    /// Resolves a single marker token (any case) to a quadrant.
    ///
    /// `#challenge` resolves to `Bin`.
    pub fn from_marker(marker: &str) -> Option<Self> {
        let lower = marker.to_lowercase();
        if lower == CHALLENGE_MARKER {
            return Some(Self::Bin);
        }
        Self::ALL
            .into_iter()
            .find(|quadrant| quadrant.marker().to_lowercase() == lower)
    }

    /// Whether `marker` is one of the four canonical quadrant markers.
    ///
    /// Unlike [`Quadrant::from_marker`], the challenge alias is not included.
    pub fn is_quadrant_marker(marker: &str) -> bool {
        Self::ALL
            .iter()
            .any(|quadrant| quadrant.marker().eq_ignore_ascii_case(marker))
    }
}

/// Planning horizon attached to a task by marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    Today,
    ThisWeek,
    ThisMonth,
    ThisQuarter,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 4] = [
        TimePeriod::Today,
        TimePeriod::ThisWeek,
        TimePeriod::ThisMonth,
        TimePeriod::ThisQuarter,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Self::Today => "#today",
            Self::ThisWeek => "#thisweek",
            Self::ThisMonth => "#thismonth",
            Self::ThisQuarter => "#thisquarter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::ThisQuarter => "This Quarter",
        }
    }

    pub fn from_marker(marker: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.marker().eq_ignore_ascii_case(marker))
    }

    /// Whether a record tagged with `other` is in scope for this period.
    ///
    /// The weekly view also surfaces items planned for today.
    pub fn covers(self, other: TimePeriod) -> bool {
        self == other || (self == Self::ThisWeek && other == Self::Today)
    }
}
