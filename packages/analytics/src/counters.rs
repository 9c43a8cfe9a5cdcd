//! Headline counters for the summary panel.

use complaint_map_complaint_models::{AggregateStats, CountLookup, Priority, Status};
use serde::Serialize;

/// Totals shown above the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounters {
    pub total: u64,
    pub resolved: u64,
    pub pending: u64,
    pub high_priority: u64,
}

/// Reads the headline counters out of `stats`. Absent stats yield zeros.
///
/// `resolved` includes complaints still tagged with the legacy
/// `completed` status.
#[must_use]
pub fn summary_counters(stats: Option<&AggregateStats>) -> SummaryCounters {
    let Some(stats) = stats else {
        return SummaryCounters::default();
    };

    let resolved: u64 = stats
        .by_status
        .iter()
        .filter(|(tag, _)| Status::from_tag(tag) == Some(Status::Resolved))
        .map(|(_, count)| count)
        .sum();

    SummaryCounters {
        total: stats.total,
        resolved,
        pending: stats.by_status.count(Status::Pending.as_ref()),
        high_priority: stats.by_priority.count(Priority::High.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_counts_from_stats() {
        let stats: AggregateStats = serde_json::from_value(serde_json::json!({
            "total": 120,
            "byStatus": {"pending": 30, "resolved": 50, "completed": 7, "rejected": 3},
            "byPriority": {"Emergency": 2, "High": 18, "Low": 40},
            "byDepartment": {}
        }))
        .unwrap();

        assert_eq!(
            summary_counters(Some(&stats)),
            SummaryCounters {
                total: 120,
                resolved: 57,
                pending: 30,
                high_priority: 18,
            }
        );
    }

    #[test]
    fn absent_stats_are_zero() {
        assert_eq!(summary_counters(None), SummaryCounters::default());
    }
}
