//! Department hotspots.

use complaint_map_complaint_models::classify::count_to_severity;
use complaint_map_complaint_models::{AggregateStats, Severity};
use serde::Serialize;

/// Maximum number of hotspots shown.
pub const MAX_HOTSPOTS: usize = 5;

/// Area label of the placeholder shown before any data has arrived.
pub const PLACEHOLDER_AREA: &str = "No data available";

/// A named grouping labeled by complaint count and severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hotspot {
    /// Display name (e.g. `"Water Department Areas"`).
    pub area: String,
    pub complaints: u64,
    /// Display name of the grouping key (e.g. `"Water"`).
    pub category: String,
    pub severity: Severity,
}

impl Hotspot {
    /// The single entry shown when there is nothing to rank, so the
    /// summary panel keeps a stable slot.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            area: PLACEHOLDER_AREA.to_string(),
            complaints: 0,
            category: "N/A".to_string(),
            severity: Severity::Low,
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.area == PLACEHOLDER_AREA && self.complaints == 0
    }
}

/// Derives up to [`MAX_HOTSPOTS`] hotspots from `stats.byDepartment`.
///
/// Entries are taken in the order the service sent them and are not
/// sorted by count. When `stats` is absent, `record_count` is zero, or
/// there are no department counts, a single [`Hotspot::placeholder`] is
/// returned instead of an empty list.
#[must_use]
pub fn derive_hotspots(stats: Option<&AggregateStats>, record_count: usize) -> Vec<Hotspot> {
    let Some(stats) = stats else {
        return vec![Hotspot::placeholder()];
    };
    if record_count == 0 || stats.by_department.is_empty() {
        return vec![Hotspot::placeholder()];
    }

    if stats.by_department.len() > MAX_HOTSPOTS {
        log::debug!(
            "Showing {MAX_HOTSPOTS} of {} departments as hotspots",
            stats.by_department.len()
        );
    }

    // TODO: rank by count once product confirms "top" means largest; the
    // dashboard has always shown the first five departments as sent.
    stats
        .by_department
        .iter()
        .take(MAX_HOTSPOTS)
        .map(|(department, &complaints)| {
            let name = capitalize(department);
            Hotspot {
                area: format!("{name} Department Areas"),
                complaints,
                category: name,
                severity: count_to_severity(complaints),
            }
        })
        .collect()
}

/// Uppercases the first character, leaving the rest unchanged.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(departments: &[(&str, u64)]) -> AggregateStats {
        AggregateStats {
            total: departments.iter().map(|(_, c)| c).sum(),
            by_department: departments
                .iter()
                .map(|(name, count)| ((*name).to_string(), *count))
                .collect(),
            ..AggregateStats::default()
        }
    }

    #[test]
    fn keeps_insertion_order() {
        let hotspots = derive_hotspots(Some(&stats(&[("water", 55), ("road", 10)])), 65);

        assert_eq!(
            hotspots,
            [
                Hotspot {
                    area: "Water Department Areas".to_string(),
                    complaints: 55,
                    category: "Water".to_string(),
                    severity: Severity::High,
                },
                Hotspot {
                    area: "Road Department Areas".to_string(),
                    complaints: 10,
                    category: "Road".to_string(),
                    severity: Severity::Low,
                },
            ]
        );
    }

    #[test]
    fn does_not_sort_by_count() {
        let hotspots = derive_hotspots(
            Some(&stats(&[("parks", 3), ("sanitation", 90), ("road", 30)])),
            123,
        );
        let counts: Vec<u64> = hotspots.iter().map(|h| h.complaints).collect();
        assert_eq!(counts, [3, 90, 30]);
        assert_eq!(hotspots[2].severity, Severity::Medium);
    }

    #[test]
    fn caps_at_five() {
        let hotspots = derive_hotspots(
            Some(&stats(&[
                ("a", 1),
                ("b", 2),
                ("c", 3),
                ("d", 4),
                ("e", 5),
                ("f", 600),
            ])),
            615,
        );
        assert_eq!(hotspots.len(), MAX_HOTSPOTS);
        assert!(hotspots.iter().all(|h| h.category != "F"));
    }

    #[test]
    fn placeholder_when_nothing_to_rank() {
        assert_eq!(derive_hotspots(None, 10), [Hotspot::placeholder()]);
        assert_eq!(
            derive_hotspots(Some(&stats(&[("water", 5)])), 0),
            [Hotspot::placeholder()]
        );
        assert_eq!(derive_hotspots(Some(&stats(&[])), 4), [Hotspot::placeholder()]);
        assert!(Hotspot::placeholder().is_placeholder());
    }

    #[test]
    fn capitalizes_first_character_only() {
        assert_eq!(capitalize("water"), "Water");
        assert_eq!(capitalize("publicWorks"), "PublicWorks");
        assert_eq!(capitalize("électricité"), "Électricité");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn serializes_severity_lowercase() {
        let json = serde_json::to_value(&derive_hotspots(Some(&stats(&[("water", 21)])), 21))
            .unwrap();
        assert_eq!(json[0]["severity"], "medium");
        assert_eq!(json[0]["area"], "Water Department Areas");
    }
}
