//! Intensity and severity classification.
//!
//! Every function here is total: unknown tags map to an explicit default
//! instead of an error.

use crate::{ColorToken, Priority, Severity, Status};

/// Heat weight for any priority without an entry in the weight table,
/// including [`Priority::Emergency`] and unrecognized tags.
pub const DEFAULT_HEAT_WEIGHT: f64 = 0.5;

/// Marker color for unrecognized priority tags.
pub const DEFAULT_MARKER_COLOR: ColorToken = ColorToken::Blue;

/// Counts strictly above this are [`Severity::High`].
pub const HIGH_SEVERITY_THRESHOLD: u64 = 50;

/// Counts strictly above this (and not high) are [`Severity::Medium`].
pub const MEDIUM_SEVERITY_THRESHOLD: u64 = 20;

impl Priority {
    /// Heat weight in `[0, 1]`. `Emergency` has no entry and falls back to
    /// [`DEFAULT_HEAT_WEIGHT`] in [`priority_to_weight`].
    #[must_use]
    pub const fn heat_weight(self) -> Option<f64> {
        match self {
            Self::Emergency => None,
            Self::High => Some(1.0),
            Self::Medium => Some(0.7),
            Self::Low => Some(0.4),
        }
    }

    #[must_use]
    pub const fn marker_color(self) -> ColorToken {
        match self {
            Self::Emergency => ColorToken::Red,
            Self::High => ColorToken::Orange,
            Self::Medium => ColorToken::Yellow,
            Self::Low => ColorToken::Green,
        }
    }
}

impl Status {
    #[must_use]
    pub const fn color(self) -> ColorToken {
        match self {
            Self::Pending => ColorToken::Yellow,
            Self::Assigned => ColorToken::Blue,
            Self::InProgress => ColorToken::Orange,
            Self::Resolved => ColorToken::Green,
            Self::Closed => ColorToken::Gray,
            Self::Rejected => ColorToken::Red,
        }
    }
}

/// Maps a raw priority tag to its heat weight.
#[must_use]
pub fn priority_to_weight(tag: &str) -> f64 {
    Priority::from_tag(tag)
        .and_then(Priority::heat_weight)
        .unwrap_or(DEFAULT_HEAT_WEIGHT)
}

/// Maps a raw priority tag to its marker fill color.
#[must_use]
pub fn priority_to_marker_color(tag: &str) -> ColorToken {
    Priority::from_tag(tag).map_or(DEFAULT_MARKER_COLOR, Priority::marker_color)
}

/// Buckets an aggregate count into a [`Severity`].
#[must_use]
pub const fn count_to_severity(count: u64) -> Severity {
    if count > HIGH_SEVERITY_THRESHOLD {
        Severity::High
    } else if count > MEDIUM_SEVERITY_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Display label for a raw status tag. Legacy aliases render as their
/// modern equivalent; unknown tags are shown verbatim.
#[must_use]
pub fn status_label(tag: &str) -> String {
    Status::from_tag(tag).map_or_else(|| tag.to_string(), |s| s.label().to_string())
}

/// Badge color for a raw status tag.
#[must_use]
pub fn status_color(tag: &str) -> ColorToken {
    Status::from_tag(tag).map_or(ColorToken::Gray, Status::color)
}
