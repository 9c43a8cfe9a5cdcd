//! Text rendering of the dashboard state and `GeoJSON` export.

use std::path::Path;

use complaint_map_dashboard::{DashboardView, ViewOutcome};
use complaint_map_dashboard_models::FilterField;
use complaint_map_layers::MemorySurface;

/// Prints the summary panel, layer counts, and any banner to stdout.
pub fn print_view(view: &DashboardView) {
    println!("{}", summary_text(view));
}

/// Writes every attached layer to `path` as a `FeatureCollection`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn export_geojson(
    surface: &MemorySurface,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = surface.to_feature_collection();
    log::debug!(
        "Exporting {} features to {}",
        collection.features.len(),
        path.display()
    );
    std::fs::write(path, serde_json::to_string_pretty(&collection)?)?;
    Ok(())
}

fn summary_text(view: &DashboardView) -> String {
    let mut lines = Vec::new();

    let filters: Vec<String> = FilterField::all()
        .iter()
        .map(|field| format!("{field}={}", view.filters.get(*field)))
        .collect();
    lines.push(format!("Filters: {}", filters.join(", ")));

    match &view.outcome {
        ViewOutcome::Failure(reason) => {
            lines.push(format!("Error: {reason}"));
            lines.push("Change a filter or refresh to try again.".to_string());
            return lines.join("\n");
        }
        ViewOutcome::Empty => {
            lines.push("No complaints match these filters. Try adjusting them.".to_string());
        }
        ViewOutcome::Pending => lines.push("Waiting for data...".to_string()),
        ViewOutcome::Success => {}
    }

    let counters = view.counters;
    lines.push(format!(
        "Total: {}  Resolved: {}  Pending: {}  High priority: {}",
        counters.total, counters.resolved, counters.pending, counters.high_priority
    ));
    lines.push(format!(
        "Map: {} heat points, {} markers{} ({} without coordinates)",
        view.heat_point_count,
        view.marker_count,
        if view.show_markers { "" } else { " (markers off)" },
        view.dropped_count
    ));
    lines.push(format!(
        "Viewport: {:.4}, {:.4} @ zoom {}",
        view.viewport.center_lat, view.viewport.center_lng, view.viewport.zoom
    ));

    lines.push("Hotspots:".to_string());
    for hotspot in &view.hotspots {
        if hotspot.is_placeholder() {
            lines.push(format!("  {}", hotspot.area));
        } else {
            lines.push(format!(
                "  {} - {} complaints ({})",
                hotspot.area, hotspot.complaints, hotspot.severity
            ));
        }
    }

    lines.join("\n")
}
