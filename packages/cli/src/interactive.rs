//! Interactive mode for the complaint map.
//!
//! A `dialoguer` menu loop over a mounted dashboard. Each filter change or
//! refresh starts a fetch and waits for it before redrawing the summary.

use std::path::PathBuf;

use complaint_map_dashboard::Dashboard;
use complaint_map_dashboard_models::{FilterField, FilterState, FilterValue};
use complaint_map_layers::MemorySurface;
use dialoguer::{Confirm, Input, Select};

use crate::report;

/// Actions available from the main menu.
enum Action {
    ChangeFilter,
    ClearFilters,
    ToggleMarkers,
    Refresh,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ChangeFilter,
        Self::ClearFilters,
        Self::ToggleMarkers,
        Self::Refresh,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeFilter => "Change a filter",
            Self::ClearFilters => "Clear all filters",
            Self::ToggleMarkers => "Toggle complaint markers",
            Self::Refresh => "Refresh",
            Self::Export => "Export map as GeoJSON",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the menu loop until the user quits, then unmounts the dashboard.
///
/// # Errors
///
/// Returns an error if a prompt fails or the export cannot be written.
pub async fn run(
    dashboard: &mut Dashboard<MemorySurface>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Complaint Map");
    println!();
    report::print_view(&dashboard.view());

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::ChangeFilter => {
                if change_filter(dashboard)? {
                    dashboard.settle().await;
                    report::print_view(&dashboard.view());
                } else {
                    println!("Filter unchanged.");
                }
            }
            Action::ClearFilters => {
                if dashboard.set_filters(FilterState::default()) {
                    dashboard.settle().await;
                }
                report::print_view(&dashboard.view());
            }
            Action::ToggleMarkers => {
                let show = !dashboard.layers().config().show_markers;
                let summary = dashboard.set_show_markers(show);
                println!(
                    "Markers {} ({} on map)",
                    if show { "on" } else { "off" },
                    summary.markers
                );
            }
            Action::Refresh => {
                dashboard.refresh();
                dashboard.settle().await;
                report::print_view(&dashboard.view());
            }
            Action::Export => export(dashboard)?,
            Action::Quit => break,
        }
    }

    dashboard.unmount();
    Ok(())
}

/// Prompts for a field and value. Returns whether a fetch was started.
fn change_filter(dashboard: &mut Dashboard<MemorySurface>) -> Result<bool, dialoguer::Error> {
    let fields = FilterField::all();
    let labels: Vec<String> = fields
        .iter()
        .map(|field| format!("{field} ({})", dashboard.filters().get(*field)))
        .collect();

    let idx = Select::new()
        .with_prompt("Which filter?")
        .items(&labels)
        .default(0)
        .interact()?;
    let field = fields[idx];

    let raw: String = Input::new()
        .with_prompt(format!("{field} (\"all\" to clear)"))
        .default(dashboard.filters().get(field).to_string())
        .interact_text()?;

    Ok(dashboard.set_filter(field, FilterValue::parse(raw.trim())))
}

fn export(dashboard: &Dashboard<MemorySurface>) -> Result<(), Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Output path")
        .default("complaints.geojson".to_string())
        .interact_text()?;
    let path = PathBuf::from(path);

    if path.exists()
        && !Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()
            .unwrap_or(false)
    {
        println!("Cancelled.");
        return Ok(());
    }

    report::export_geojson(dashboard.layers().surface(), &path)?;
    println!("Wrote map layers to {}", path.display());
    Ok(())
}
