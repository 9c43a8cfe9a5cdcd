#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Value types shared between the dashboard controller, the data source
//! client, and the rendering layers.
//!
//! These are plain data: the filter selection that determines which
//! complaint snapshot is fetched, the fetch lifecycle status, map regions,
//! and heat layer options.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// The sentinel filter value meaning "no constraint".
pub const ALL: &str = "all";

/// One of the four independent dashboard filters.
///
/// The string form is the query parameter name sent to the complaint
/// service.
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
pub enum FilterField {
    Category,
    Department,
    Timeframe,
    Priority,
}

impl FilterField {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Category,
            Self::Department,
            Self::Timeframe,
            Self::Priority,
        ]
    }
}

/// A single filter value: either unconstrained or a concrete tag that is
/// passed through to the service verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterValue {
    #[default]
    All,
    Only(String),
}

impl FilterValue {
    /// Parses a raw selection. Exactly `"all"` means unconstrained; any
    /// other string, including the empty string, is a concrete value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw == ALL {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(value) => value,
        }
    }

    /// The concrete value, if constrained.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FilterValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// The user-selected query constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub category: FilterValue,
    #[serde(default)]
    pub department: FilterValue,
    #[serde(default)]
    pub timeframe: FilterValue,
    #[serde(default)]
    pub priority: FilterValue,
}

impl FilterState {
    #[must_use]
    pub const fn get(&self, field: FilterField) -> &FilterValue {
        match field {
            FilterField::Category => &self.category,
            FilterField::Department => &self.department,
            FilterField::Timeframe => &self.timeframe,
            FilterField::Priority => &self.priority,
        }
    }

    /// Sets `field` to `value`, returning `true` if the state changed.
    pub fn set(&mut self, field: FilterField, value: FilterValue) -> bool {
        let slot = match field {
            FilterField::Category => &mut self.category,
            FilterField::Department => &mut self.department,
            FilterField::Timeframe => &mut self.timeframe,
            FilterField::Priority => &mut self.priority,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Builder-style variant of [`Self::set`].
    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl Into<FilterValue>) -> Self {
        self.set(field, value.into());
        self
    }

    /// Query parameters for the complaint service. `"all"` fields are
    /// omitted; every other value is passed through unchanged.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterField::all()
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .value()
                    .map(|value| (field_param(*field), value.to_string()))
            })
            .collect()
    }
}

const fn field_param(field: FilterField) -> &'static str {
    match field {
        FilterField::Category => "category",
        FilterField::Department => "department",
        FilterField::Timeframe => "timeframe",
        FilterField::Priority => "priority",
    }
}

/// Lifecycle of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// Human-readable failure reason.
    Error(String),
}

impl FetchStatus {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// A geographic rectangle in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl Region {
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Returns `(lat, lng)` of the rectangle's center.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }

    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }
}

/// A map camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_lat: 20.5937,
            center_lng: 78.9629,
            zoom: 5,
        }
    }
}

/// What the rendering surface should do with its viewport after a redraw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", content = "region", rename_all = "lowercase")]
pub enum ViewportChange {
    /// Fit the camera to this region.
    Fit(Region),
    /// Keep the current camera.
    Unchanged,
}

/// Rendering options for the heat layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatOptions {
    /// Point radius in pixels.
    pub radius: u32,
    /// Blur amount in pixels.
    pub blur: u32,
    /// Zoom level at which points reach full intensity.
    pub max_zoom: u8,
    /// Minimum opacity of the heat surface.
    pub min_opacity: f64,
}

impl Default for HeatOptions {
    fn default() -> Self {
        Self {
            radius: 25,
            blur: 15,
            max_zoom: 17,
            min_opacity: 0.4,
        }
    }
}
