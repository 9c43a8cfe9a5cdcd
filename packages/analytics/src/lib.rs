#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary-panel analytics over service-supplied statistics.
//!
//! Nothing here looks at raw complaint records beyond their count: the
//! complaint service pre-aggregates [`AggregateStats`] and these functions
//! only relabel and bucket those counts.
//!
//! [`AggregateStats`]: complaint_map_complaint_models::AggregateStats

pub mod counters;
pub mod hotspots;

pub use counters::{SummaryCounters, summary_counters};
pub use hotspots::{Hotspot, MAX_HOTSPOTS, derive_hotspots};
