#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Complaint map dashboard.
//!
//! Wires the pieces together: the [`FetchController`] decides which
//! response is current, the [`LayerManager`] redraws the map from it, and
//! the analytics crate derives the summary panel. A [`Dashboard`] is driven
//! by filter changes and refreshes, each of which starts a fetch; completed
//! fetches are applied in completion order and stale ones are discarded.

pub mod config;
pub mod controller;

use std::sync::Arc;

use complaint_map_analytics::{derive_hotspots, summary_counters};
use complaint_map_complaint_models::ComplaintRecord;
use complaint_map_dashboard_models::{
    FetchStatus, FilterField, FilterState, FilterValue, HeatOptions, Region, Viewport,
    ViewportChange,
};
use complaint_map_layers::{LayerConfig, LayerManager, RenderSummary, RenderSurface};
use complaint_map_source::ComplaintSource;
use serde::Serialize;

pub use complaint_map_analytics::{Hotspot, SummaryCounters};
pub use config::{ConfigError, DashboardConfig};
pub use controller::{FetchCompletion, FetchController, FetchOutcome, FetchTicket, InFlight};

/// What the map and summary panel should show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum ViewOutcome {
    /// No fetch has been applied yet.
    #[default]
    Pending,
    /// Records are on the map.
    Success,
    /// The service answered with zero records; adjust filters.
    Empty,
    /// The last fetch failed; the map is cleared.
    Failure(String),
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: FetchStatus,
    pub outcome: ViewOutcome,
    pub filters: FilterState,
    pub show_markers: bool,
    /// Complaints matching the query as reported by the service.
    pub total: u64,
    /// Records in the current snapshot.
    pub record_count: usize,
    pub heat_point_count: usize,
    pub marker_count: usize,
    /// Records left off the map for missing or invalid coordinates.
    pub dropped_count: usize,
    pub viewport: Viewport,
    pub hotspots: Vec<Hotspot>,
    pub counters: SummaryCounters,
}

/// The dashboard engine, generic over the surface layers are drawn on.
pub struct Dashboard<S: RenderSurface> {
    source: Arc<dyn ComplaintSource>,
    controller: FetchController,
    layers: LayerManager<S>,
    in_flight: InFlight,
    outcome: ViewOutcome,
    hotspots: Vec<Hotspot>,
    counters: SummaryCounters,
    viewport: Viewport,
    last_render: RenderSummary,
    mounted: bool,
}

impl<S: RenderSurface> Dashboard<S> {
    /// Creates an unmounted dashboard. Nothing is fetched until
    /// [`Self::mount`].
    #[must_use]
    pub fn new(source: Arc<dyn ComplaintSource>, surface: S, config: &DashboardConfig) -> Self {
        let layers = LayerManager::new(
            surface,
            LayerConfig {
                heat: config.heat,
                show_markers: config.markers.show,
            },
        );

        Self {
            source,
            controller: FetchController::new(config.filters.clone()),
            layers,
            in_flight: InFlight::default(),
            outcome: ViewOutcome::Pending,
            hotspots: vec![Hotspot::placeholder()],
            counters: SummaryCounters::default(),
            viewport: config.viewport,
            last_render: RenderSummary::default(),
            mounted: false,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &FetchController {
        &self.controller
    }

    #[must_use]
    pub const fn layers(&self) -> &LayerManager<S> {
        &self.layers
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        self.controller.filters()
    }

    #[must_use]
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    #[must_use]
    pub const fn counters(&self) -> SummaryCounters {
        self.counters
    }

    #[must_use]
    pub const fn outcome(&self) -> &ViewOutcome {
        &self.outcome
    }

    /// Summary of the most recent redraw, including whether it refit the
    /// viewport.
    #[must_use]
    pub const fn last_render(&self) -> RenderSummary {
        self.last_render
    }

    /// Fetches started but not yet applied.
    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.in_flight.len()
    }

    /// Starts the initial fetch.
    pub fn mount(&mut self) {
        self.mounted = true;
        let ticket = self.controller.mount();
        self.start(ticket);
    }

    /// Re-fetches with the current filters.
    pub fn refresh(&mut self) {
        let ticket = self.controller.refresh();
        self.start(ticket);
    }

    /// Changes one filter. Returns whether a fetch was started.
    pub fn set_filter(&mut self, field: FilterField, value: FilterValue) -> bool {
        self.controller
            .set_filter(field, value)
            .map(|ticket| self.start(ticket))
            .is_some()
    }

    /// Replaces every filter. Returns whether a fetch was started.
    pub fn set_filters(&mut self, filters: FilterState) -> bool {
        self.controller
            .set_filters(filters)
            .map(|ticket| self.start(ticket))
            .is_some()
    }

    /// Toggles marker mode without touching the heat layer.
    pub fn set_show_markers(&mut self, show: bool) -> RenderSummary {
        let summary = self.layers.set_show_markers(show);
        self.record(summary)
    }

    /// Applies new heat options, rebuilding only the heat layer.
    pub fn set_heat_options(&mut self, options: HeatOptions) -> RenderSummary {
        let summary = self.layers.set_heat_options(options);
        self.record(summary)
    }

    /// Waits for the next in-flight fetch and applies it. Returns `None`
    /// when nothing is in flight, otherwise whether the response was
    /// current.
    pub async fn poll_next(&mut self) -> Option<bool> {
        let completion = self.in_flight.next().await?;
        Some(self.apply(completion))
    }

    /// Applies every in-flight fetch as it completes.
    pub async fn settle(&mut self) {
        while self.poll_next().await.is_some() {}
    }

    /// Applies a completed fetch. Returns `false` if it was stale or the
    /// dashboard is unmounted.
    pub fn apply(&mut self, completion: FetchCompletion) -> bool {
        if !self.mounted {
            log::debug!(
                "Ignoring generation {} after unmount",
                completion.ticket.generation()
            );
            return false;
        }

        let Some(outcome) = self.controller.apply(completion) else {
            return false;
        };

        match outcome {
            FetchOutcome::Success(snapshot) | FetchOutcome::Empty(snapshot) => {
                let points: Arc<[ComplaintRecord]> = Arc::from(snapshot.point_source());
                let rendered = self.layers.render(points);
                let summary = self.record(rendered);

                self.hotspots = derive_hotspots(snapshot.stats.as_ref(), snapshot.records.len());
                self.counters = summary_counters(snapshot.stats.as_ref());
                self.outcome = if snapshot.is_empty() {
                    ViewOutcome::Empty
                } else {
                    ViewOutcome::Success
                };

                log::info!(
                    "Rendered {} heat points, {} markers ({} dropped)",
                    summary.heat_points,
                    summary.markers,
                    summary.dropped
                );
            }
            FetchOutcome::Failure(reason) => {
                let cleared = self.layers.render(Arc::from(Vec::new()));
                self.record(cleared);
                self.hotspots = derive_hotspots(None, 0);
                self.counters = SummaryCounters::default();
                self.outcome = ViewOutcome::Failure(reason);
            }
        }

        true
    }

    /// Current state for display.
    #[must_use]
    pub fn view(&self) -> DashboardView {
        let summary = self.layers.summary();
        let snapshot = self.controller.snapshot();

        DashboardView {
            status: self.controller.status().clone(),
            outcome: self.outcome.clone(),
            filters: self.controller.filters().clone(),
            show_markers: self.layers.config().show_markers,
            total: snapshot.map_or(0, |s| s.total),
            record_count: snapshot.map_or(0, |s| s.records.len()),
            heat_point_count: summary.heat_points,
            marker_count: summary.markers,
            dropped_count: summary.dropped,
            viewport: self.viewport,
            hotspots: self.hotspots.clone(),
            counters: self.counters,
        }
    }

    /// Drops in-flight fetches and releases every layer.
    pub fn unmount(&mut self) {
        if !self.in_flight.is_empty() {
            log::debug!("Abandoning {} in-flight fetches", self.in_flight.len());
        }
        self.in_flight = InFlight::default();
        self.layers.unmount();
        self.mounted = false;
    }

    fn start(&mut self, ticket: FetchTicket) {
        self.in_flight.start(Arc::clone(&self.source), ticket);
    }

    fn record(&mut self, summary: RenderSummary) -> RenderSummary {
        if let ViewportChange::Fit(region) = summary.viewport {
            self.viewport = fit_viewport(region);
        }
        self.last_render = summary;
        summary
    }
}

impl<S: RenderSurface> std::fmt::Debug for Dashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("source", &self.source.name())
            .field("controller", &self.controller)
            .field("in_flight", &self.in_flight)
            .field("outcome", &self.outcome)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

/// Camera centered on `region`, zoomed so its larger side fits a 256px
/// tile.
#[must_use]
pub fn fit_viewport(region: Region) -> Viewport {
    let (center_lat, center_lng) = region.center();
    let span = (region.east - region.west)
        .max(region.north - region.south)
        .max(f64::EPSILON);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let zoom = (360.0 / span).log2().floor().clamp(1.0, 18.0) as u8;

    Viewport {
        center_lat,
        center_lng,
        zoom,
    }
}
