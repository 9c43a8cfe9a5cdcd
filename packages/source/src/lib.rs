#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Complaint data source trait and response envelope handling.
//!
//! The complaint service is a black box queried with the current
//! [`FilterState`]. Implementations of [`ComplaintSource`] turn one query
//! into one [`ComplaintSnapshot`]; the dashboard controller decides what to
//! do with it. [`http::HttpComplaintSource`] talks to the real service.

pub mod envelope;
pub mod http;
pub mod progress;

use async_trait::async_trait;
use complaint_map_complaint_models::{AggregateStats, ComplaintRecord};
use complaint_map_dashboard_models::FilterState;

pub use envelope::parse_envelope;
pub use http::HttpComplaintSource;

/// Errors that can occur while fetching complaints.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status.
    #[error("Request failed ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, or the status line.
        message: String,
    },

    /// The body was JSON but not the expected envelope.
    #[error("Malformed response: {message}")]
    MalformedEnvelope {
        /// Description of what was missing or wrong.
        message: String,
    },
}

/// One complaint snapshot as returned by the service for a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintSnapshot {
    /// Total complaints matching the query (may exceed `records.len()`).
    pub total: u64,
    /// The complaint records.
    pub records: Vec<ComplaintRecord>,
    /// Records pre-filtered or downsampled for visualization, if the
    /// service sent them.
    pub heatmap_records: Option<Vec<ComplaintRecord>>,
    /// Pre-aggregated counts.
    pub stats: Option<AggregateStats>,
}

impl ComplaintSnapshot {
    /// Records to project onto the map: `heatmapData` when present,
    /// otherwise `data`.
    #[must_use]
    pub fn point_source(&self) -> &[ComplaintRecord] {
        self.heatmap_records.as_deref().unwrap_or(&self.records)
    }

    /// A valid response with zero records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A queryable complaint service.
#[async_trait]
pub trait ComplaintSource: Send + Sync {
    /// Human-readable name used in log messages.
    fn name(&self) -> &str;

    /// Fetches the snapshot matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the service returns a
    /// non-success status, or the body is not a valid envelope.
    async fn fetch(&self, filters: &FilterState) -> Result<ComplaintSnapshot, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticket: &str) -> ComplaintRecord {
        ComplaintRecord {
            ticket_id: ticket.to_string(),
            ..ComplaintRecord::default()
        }
    }

    #[test]
    fn heatmap_records_are_preferred() {
        let snapshot = ComplaintSnapshot {
            records: vec![record("A"), record("B")],
            heatmap_records: Some(vec![record("H")]),
            ..ComplaintSnapshot::default()
        };
        assert_eq!(snapshot.point_source(), [record("H")]);

        let snapshot = ComplaintSnapshot {
            heatmap_records: None,
            ..snapshot
        };
        assert_eq!(snapshot.point_source().len(), 2);
    }

    #[test]
    fn status_error_is_readable() {
        let err = SourceError::Status {
            status: 503,
            message: "Service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed (503): Service unavailable");
    }
}
