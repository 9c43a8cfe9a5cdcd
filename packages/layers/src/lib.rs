#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Layer lifecycle management for the complaint map.
//!
//! The [`LayerManager`] is the only component that mutates the rendering
//! surface. It owns at most one heat layer and one marker layer, each
//! either [`LayerState::Absent`] or [`LayerState::Active`]. Every replace
//! detaches the old layer before attaching the new one, and dropping the
//! manager detaches everything that is still attached.
//!
//! Rendering backends implement [`RenderSurface`]. [`MemorySurface`] is an
//! in-process backend that records layers and can export them as
//! `GeoJSON`.

pub mod memory;

use std::sync::Arc;

use complaint_map_complaint_models::ComplaintRecord;
use complaint_map_dashboard_models::{HeatOptions, Region, ViewportChange};
use complaint_map_spatial::{
    HeatPoint, MarkerDescriptor, compute_bounds, project_heat_points, project_markers,
};

pub use memory::MemorySurface;

/// Opaque handle to a layer attached to a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// A map view that layers can be attached to.
pub trait RenderSurface {
    /// Attaches a heat layer built from `points`.
    fn attach_heat(&mut self, points: &[HeatPoint], options: &HeatOptions) -> LayerId;

    /// Attaches a marker group layer.
    fn attach_markers(&mut self, markers: &[MarkerDescriptor]) -> LayerId;

    /// Detaches and releases a previously attached layer.
    fn detach(&mut self, layer: LayerId);

    /// Moves the camera so `region` is fully visible.
    fn fit_bounds(&mut self, region: Region);
}

/// Whether a layer kind currently has something attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerState {
    #[default]
    Absent,
    Active(LayerId),
}

impl LayerState {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Layer configuration that can change independently of the data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerConfig {
    pub heat: HeatOptions,
    pub show_markers: bool,
}

/// Outcome of a redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    /// Points on the heat layer.
    pub heat_points: usize,
    /// Records dropped for missing or invalid coordinates.
    pub dropped: usize,
    /// Markers on the marker layer (`0` when marker mode is off).
    pub markers: usize,
    pub viewport: ViewportChange,
}

impl Default for RenderSummary {
    fn default() -> Self {
        Self {
            heat_points: 0,
            dropped: 0,
            markers: 0,
            viewport: ViewportChange::Unchanged,
        }
    }
}

/// Owns the heat and marker layers on a [`RenderSurface`].
pub struct LayerManager<S: RenderSurface> {
    surface: S,
    config: LayerConfig,
    records: Arc<[ComplaintRecord]>,
    heat: LayerState,
    markers: LayerState,
    heat_points: usize,
    dropped: usize,
    marker_count: usize,
}

impl<S: RenderSurface> LayerManager<S> {
    #[must_use]
    pub fn new(surface: S, config: LayerConfig) -> Self {
        Self {
            surface,
            config,
            records: Arc::from(Vec::new()),
            heat: LayerState::Absent,
            markers: LayerState::Absent,
            heat_points: 0,
            dropped: 0,
            marker_count: 0,
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn config(&self) -> &LayerConfig {
        &self.config
    }

    #[must_use]
    pub const fn heat_state(&self) -> LayerState {
        self.heat
    }

    #[must_use]
    pub const fn marker_state(&self) -> LayerState {
        self.markers
    }

    /// Counts for the layers currently attached.
    #[must_use]
    pub const fn summary(&self) -> RenderSummary {
        RenderSummary {
            heat_points: self.heat_points,
            dropped: self.dropped,
            markers: self.marker_count,
            viewport: ViewportChange::Unchanged,
        }
    }

    /// Replaces both layers with projections of a new record set and fits
    /// the viewport to the new heat points.
    pub fn render(&mut self, records: Arc<[ComplaintRecord]>) -> RenderSummary {
        self.records = records;
        let viewport = self.rebuild_heat();
        self.rebuild_markers();

        RenderSummary {
            viewport,
            ..self.summary()
        }
    }

    /// Applies new heat options, rebuilding only the heat layer.
    pub fn set_heat_options(&mut self, options: HeatOptions) -> RenderSummary {
        if self.config.heat == options {
            return self.summary();
        }
        self.config.heat = options;
        let viewport = self.rebuild_heat();

        RenderSummary {
            viewport,
            ..self.summary()
        }
    }

    /// Turns marker mode on or off, leaving the heat layer untouched.
    pub fn set_show_markers(&mut self, show: bool) -> RenderSummary {
        if self.config.show_markers != show {
            self.config.show_markers = show;
            self.rebuild_markers();
        }
        self.summary()
    }

    /// Detaches every attached layer. Called on drop; calling it earlier
    /// is harmless.
    pub fn unmount(&mut self) {
        Self::release(&mut self.surface, &mut self.heat, "heat");
        Self::release(&mut self.surface, &mut self.markers, "marker");
        self.heat_points = 0;
        self.dropped = 0;
        self.marker_count = 0;
        self.records = Arc::from(Vec::new());
    }

    fn rebuild_heat(&mut self) -> ViewportChange {
        Self::release(&mut self.surface, &mut self.heat, "heat");

        let projection = project_heat_points(&self.records);
        self.heat_points = projection.points.len();
        self.dropped = projection.dropped;

        if projection.points.is_empty() {
            return ViewportChange::Unchanged;
        }

        let id = self
            .surface
            .attach_heat(&projection.points, &self.config.heat);
        log::debug!("Attached heat {id} with {} points", projection.points.len());
        self.heat = LayerState::Active(id);

        match compute_bounds(&projection.points) {
            Some(region) => {
                self.surface.fit_bounds(region);
                ViewportChange::Fit(region)
            }
            None => ViewportChange::Unchanged,
        }
    }

    fn rebuild_markers(&mut self) {
        Self::release(&mut self.surface, &mut self.markers, "marker");
        self.marker_count = 0;

        if !self.config.show_markers {
            return;
        }

        let markers = project_markers(&self.records);
        if markers.is_empty() {
            return;
        }

        let id = self.surface.attach_markers(&markers);
        log::debug!("Attached marker {id} with {} markers", markers.len());
        self.marker_count = markers.len();
        self.markers = LayerState::Active(id);
    }

    fn release(surface: &mut S, state: &mut LayerState, kind: &str) {
        if let LayerState::Active(id) = std::mem::take(state) {
            log::trace!("Detaching {kind} {id}");
            surface.detach(id);
        }
    }
}

impl<S: RenderSurface> Drop for LayerManager<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
