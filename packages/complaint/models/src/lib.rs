#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Complaint record types and the priority/status taxonomy.
//!
//! Complaint records arrive from the external complaint service as JSON.
//! Categorical fields (`priority`, `status`) are kept as the raw tags the
//! service sent so unknown values survive for display; the closed enums in
//! this crate are looked up from those tags when a derived value (heat
//! weight, marker color, severity bucket) is needed. See [`classify`].

pub mod classify;
pub mod counts;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use counts::{CountLookup, OrderedCounts};

/// Complaint priority as assigned by the municipality.
///
/// Tags are case-sensitive: `"high"` is not [`Priority::High`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Priority {
    /// Immediate danger to people or property
    Emergency,
    /// Needs attention within the day
    High,
    /// Normal service queue
    Medium,
    /// Cosmetic or informational
    Low,
}

impl Priority {
    /// Looks up a priority from its raw tag. Returns `None` for any tag
    /// that is not an exact match.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        tag.parse().ok()
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Emergency, Self::High, Self::Medium, Self::Low]
    }
}

/// Lifecycle status of a complaint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Status {
    /// Filed, not yet triaged
    Pending,
    /// Assigned to a worker
    Assigned,
    /// Work has started
    InProgress,
    /// Work finished
    Resolved,
    /// Closed after resolution or as duplicate
    Closed,
    /// Rejected during triage
    Rejected,
}

impl Status {
    /// Looks up a status from its raw tag, accepting the legacy
    /// `completed` and `denied` tags as [`Status::Resolved`] and
    /// [`Status::Rejected`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "completed" => Some(Self::Resolved),
            "denied" => Some(Self::Rejected),
            other => other.parse().ok(),
        }
    }

    /// Human-readable label for popups and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
            Self::Rejected => "Rejected",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::Assigned,
            Self::InProgress,
            Self::Resolved,
            Self::Closed,
            Self::Rejected,
        ]
    }
}

/// Severity bucket derived from an aggregate complaint count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// More than 50 complaints
    High,
    /// 21 to 50 complaints
    Medium,
    /// 20 complaints or fewer
    Low,
}

/// Named color token understood by the rendering surface.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ColorToken {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Gray,
}

impl ColorToken {
    /// Hex RGB value used when exporting styled features.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Orange => "#f97316",
            Self::Yellow => "#eab308",
            Self::Green => "#22c55e",
            Self::Blue => "#3b82f6",
            Self::Gray => "#6b7280",
        }
    }
}

/// A complaint as returned by the complaint service.
///
/// Only `lat`/`lng` and `priority` feed spatial derivation; the remaining
/// fields are display and grouping data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRecord {
    /// Display identifier (e.g. `"CMP-2024-0042"`).
    #[serde(default, deserialize_with = "nullable_string")]
    pub ticket_id: String,
    /// Latitude, absent when the complaint is not geocoded yet.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lat: Option<f64>,
    /// Longitude, absent when the complaint is not geocoded yet.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub lng: Option<f64>,
    /// Raw priority tag (see [`Priority::from_tag`]).
    #[serde(default, deserialize_with = "nullable_string")]
    pub priority: String,
    /// Raw status tag (see [`Status::from_tag`]).
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    /// Responsible department key (e.g. `"water"`).
    #[serde(default, deserialize_with = "nullable_string")]
    pub department: String,
    /// Complaint category.
    #[serde(default, deserialize_with = "nullable_string")]
    pub category: String,
    /// Free-text location description.
    #[serde(default, deserialize_with = "nullable_string")]
    pub location: String,
    /// Creation timestamp as sent by the service (RFC 3339).
    #[serde(default, deserialize_with = "nullable_string")]
    pub created_at: String,
}

impl ComplaintRecord {
    /// Returns `(lat, lng)` when both coordinates are present and inside
    /// the WGS84 extent.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng))
                if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) =>
            {
                Some((lat, lng))
            }
            _ => None,
        }
    }
}

/// Pre-aggregated counts computed by the complaint service.
///
/// The engine only reads these; it never recomputes them from records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Total complaints matching the query.
    #[serde(default)]
    pub total: u64,
    /// Counts keyed by status tag.
    #[serde(default, deserialize_with = "counts::nullable_counts")]
    pub by_status: OrderedCounts,
    /// Counts keyed by priority tag.
    #[serde(default, deserialize_with = "counts::nullable_counts")]
    pub by_priority: OrderedCounts,
    /// Counts keyed by department, in the order the service sent them.
    #[serde(default, deserialize_with = "counts::nullable_counts")]
    pub by_department: OrderedCounts,
}

/// Treats `null` as an empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a JSON number, a numeric string, or `null`. Anything else,
/// including non-finite values, decodes as `None`.
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = Option::<Raw>::deserialize(deserializer)?;
    Ok(match value {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Raw::Other(_)) | None => None,
    }
    .filter(|v| v.is_finite()))
}
