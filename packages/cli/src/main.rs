#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the complaint map dashboard.
//!
//! Fetches one snapshot for the given filters, prints the summary panel and
//! layer counts, and optionally exports the map layers as `GeoJSON`. With
//! `--interactive` it stays open and lets the user change filters, toggle
//! markers, and refresh from a `dialoguer` menu.
//!
//! Uses `indicatif-log-bridge` (via [`complaint_map_cli_utils::init_logger`])
//! so log lines and the fetch spinner never fight for the terminal.

mod interactive;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use complaint_map_cli_utils::IndicatifProgress;
use complaint_map_dashboard::{Dashboard, DashboardConfig, ViewOutcome};
use complaint_map_dashboard_models::{FilterField, FilterState, FilterValue};
use complaint_map_layers::MemorySurface;
use complaint_map_source::HttpComplaintSource;

#[derive(Parser)]
#[command(name = "complaint_map", about = "Municipal complaint heat map")]
struct Cli {
    /// TOML config file (defaults to the built-in configuration)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Complaint category, or "all"
    #[arg(long)]
    category: Option<String>,
    /// Responsible department, or "all"
    #[arg(long)]
    department: Option<String>,
    /// Time window understood by the service (e.g. "week"), or "all"
    #[arg(long)]
    timeframe: Option<String>,
    /// Priority tag (Emergency, High, Medium, Low), or "all"
    #[arg(long)]
    priority: Option<String>,
    /// Also build the per-complaint marker layer
    #[arg(long)]
    markers: bool,
    /// Write the map layers to this path as a `GeoJSON` `FeatureCollection`
    #[arg(long)]
    export: Option<PathBuf>,
    /// Print the dashboard state as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Keep running with a menu for changing filters
    #[arg(long, short)]
    interactive: bool,
}

impl Cli {
    /// Overlays filter flags onto `base`.
    fn filters(&self, base: FilterState) -> FilterState {
        [
            (FilterField::Category, &self.category),
            (FilterField::Department, &self.department),
            (FilterField::Timeframe, &self.timeframe),
            (FilterField::Priority, &self.priority),
        ]
        .into_iter()
        .fold(base, |filters, (field, value)| match value {
            Some(value) => filters.with(field, FilterValue::parse(value)),
            None => filters,
        })
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let multi = complaint_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    config.filters = cli.filters(config.filters.clone());
    config.markers.show |= cli.markers;
    log::debug!("Using complaint service at {}", config.source.base_url);

    let mut source = HttpComplaintSource::new(&config.source.base_url, config.source.timeout())?;
    if !cli.interactive && !cli.json {
        source = source.with_progress(IndicatifProgress::fetch_spinner(
            &multi,
            "Fetching complaints",
        ));
    }

    let mut dashboard = Dashboard::new(
        Arc::new(source),
        MemorySurface::new(config.viewport),
        &config,
    );
    dashboard.mount();
    dashboard.settle().await;

    if cli.interactive {
        interactive::run(&mut dashboard).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let view = dashboard.view();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        report::print_view(&view);
    }

    if let Some(path) = &cli.export {
        report::export_geojson(dashboard.layers().surface(), path)?;
        println!("Wrote map layers to {}", path.display());
    }

    Ok(match view.outcome {
        ViewOutcome::Failure(_) => ExitCode::FAILURE,
        ViewOutcome::Pending | ViewOutcome::Success | ViewOutcome::Empty => ExitCode::SUCCESS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flags_override_config() {
        let cli = Cli::parse_from([
            "complaint_map",
            "--priority",
            "High",
            "--department",
            "all",
        ]);
        let base = FilterState::default().with(FilterField::Department, "water");

        let filters = cli.filters(base);
        assert_eq!(filters.priority, FilterValue::Only("High".to_string()));
        assert_eq!(filters.department, FilterValue::All);
        assert_eq!(filters.category, FilterValue::All);
    }
}
