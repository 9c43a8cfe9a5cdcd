#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Projection of complaint records onto the map.
//!
//! Turns [`ComplaintRecord`]s into weighted heat samples and interactive
//! marker descriptors, and computes the padded envelope used to fit the
//! viewport (see [`bounds`]). Records without usable coordinates are
//! dropped here rather than treated as errors, since upstream geocoding
//! routinely lags behind complaint creation.

pub mod bounds;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use complaint_map_complaint_models::classify::{
    priority_to_marker_color, priority_to_weight, status_color, status_label,
};
use complaint_map_complaint_models::{ColorToken, ComplaintRecord};
use serde::Serialize;

pub use bounds::compute_bounds;

/// A weighted coordinate sample on the heat surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lng: f64,
    /// Intensity in `[0, 1]`.
    pub weight: f64,
}

/// Fields shown in a marker's popup, copied from the source record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupFields {
    pub ticket_id: String,
    pub location: String,
    pub department: String,
    pub priority: String,
    /// Display label (legacy aliases resolved).
    pub status: String,
    pub status_color: ColorToken,
    /// Creation date formatted for display.
    pub created_at: String,
}

/// An individual interactive marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerDescriptor {
    pub lat: f64,
    pub lng: f64,
    /// Fill color derived from the complaint's priority.
    pub color: ColorToken,
    pub popup: PopupFields,
}

/// Heat points projected from a record set, with the number of records
/// that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatProjection {
    pub points: Vec<HeatPoint>,
    pub dropped: usize,
}

/// Projects a record into a heat sample, or `None` when its coordinates
/// are missing or non-finite.
#[must_use]
pub fn to_heat_point(record: &ComplaintRecord) -> Option<HeatPoint> {
    let (lat, lng) = record.coordinates()?;
    Some(HeatPoint {
        lat,
        lng,
        weight: priority_to_weight(&record.priority),
    })
}

/// Projects a record into a marker descriptor, or `None` when its
/// coordinates are missing or non-finite.
#[must_use]
pub fn to_marker_descriptor(record: &ComplaintRecord) -> Option<MarkerDescriptor> {
    let (lat, lng) = record.coordinates()?;
    Some(MarkerDescriptor {
        lat,
        lng,
        color: priority_to_marker_color(&record.priority),
        popup: PopupFields {
            ticket_id: record.ticket_id.clone(),
            location: record.location.clone(),
            department: record.department.clone(),
            priority: record.priority.clone(),
            status: status_label(&record.status),
            status_color: status_color(&record.status),
            created_at: format_display_date(&record.created_at),
        },
    })
}

/// Projects every record with valid coordinates into a heat point.
#[must_use]
pub fn project_heat_points(records: &[ComplaintRecord]) -> HeatProjection {
    let mut projection = HeatProjection {
        points: Vec::with_capacity(records.len()),
        dropped: 0,
    };

    for record in records {
        if let Some(point) = to_heat_point(record) {
            projection.points.push(point);
        } else {
            log::debug!(
                "Skipping complaint {:?} without valid coordinates (lat={:?}, lng={:?})",
                record.ticket_id,
                record.lat,
                record.lng,
            );
            projection.dropped += 1;
        }
    }

    if projection.dropped > 0 {
        log::debug!(
            "Dropped {} of {} complaints from the heat set",
            projection.dropped,
            records.len()
        );
    }

    projection
}

/// Projects every record with valid coordinates into a marker.
#[must_use]
pub fn project_markers(records: &[ComplaintRecord]) -> Vec<MarkerDescriptor> {
    records.iter().filter_map(to_marker_descriptor).collect()
}

/// Formats a service timestamp as a US-locale date (`M/D/YYYY`).
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`, or a bare date. Anything
/// else is returned unchanged.
#[must_use]
pub fn format_display_date(raw: &str) -> String {
    const DISPLAY: &str = "%-m/%-d/%Y";

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DISPLAY).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticket: &str, lat: Option<f64>, lng: Option<f64>, priority: &str) -> ComplaintRecord {
        ComplaintRecord {
            ticket_id: ticket.to_string(),
            lat,
            lng,
            priority: priority.to_string(),
            status: "completed".to_string(),
            department: "water".to_string(),
            location: "MG Road".to_string(),
            created_at: "2024-03-07T09:15:00Z".to_string(),
            ..ComplaintRecord::default()
        }
    }

    #[test]
    fn drops_records_without_coordinates() {
        let records = vec![
            record("A", Some(1.0), Some(2.0), "High"),
            record("B", None, Some(2.0), "Low"),
            record("C", Some(f64::NAN), Some(2.0), "Low"),
        ];

        let projection = project_heat_points(&records);
        assert_eq!(
            projection.points,
            [HeatPoint {
                lat: 1.0,
                lng: 2.0,
                weight: 1.0
            }]
        );
        assert_eq!(projection.dropped, 2);
        assert_eq!(project_markers(&records).len(), 1);
    }

    #[test]
    fn unknown_priority_gets_default_weight() {
        let point = to_heat_point(&record("A", Some(0.0), Some(0.0), "urgent")).unwrap();
        assert!((point.weight - 0.5).abs() < 1e-9);
    }

    #[test]
    fn marker_carries_popup_fields() {
        let marker = to_marker_descriptor(&record("T-1", Some(12.9), Some(77.6), "Emergency"))
            .unwrap();
        assert_eq!(marker.color, ColorToken::Red);
        assert_eq!(marker.popup.ticket_id, "T-1");
        assert_eq!(marker.popup.status, "Resolved");
        assert_eq!(marker.popup.status_color, ColorToken::Green);
        assert_eq!(marker.popup.created_at, "3/7/2024");
        assert_eq!(marker.popup.department, "water");
    }

    #[test]
    fn display_date_formats() {
        assert_eq!(format_display_date("2024-12-25T23:59:59+05:30"), "12/25/2024");
        assert_eq!(format_display_date("2024-01-02T03:04:05.678"), "1/2/2024");
        assert_eq!(format_display_date("2024-01-02"), "1/2/2024");
        assert_eq!(format_display_date("yesterday"), "yesterday");
        assert_eq!(format_display_date(""), "");
    }
}
