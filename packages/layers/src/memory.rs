//! In-process rendering surface.
//!
//! Keeps attached layers in memory and counts attach/detach calls. The CLI
//! uses it to export the current map state as a `GeoJSON`
//! `FeatureCollection`; tests use it to check layer lifecycle invariants.

use std::collections::BTreeMap;

use complaint_map_dashboard_models::{HeatOptions, Region, Viewport};
use complaint_map_spatial::{HeatPoint, MarkerDescriptor};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

use crate::{LayerId, RenderSurface};

/// A layer held by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryLayer {
    Heat {
        points: Vec<HeatPoint>,
        options: HeatOptions,
    },
    Markers(Vec<MarkerDescriptor>),
}

/// A [`RenderSurface`] that stores layers in memory.
#[derive(Debug, Default)]
pub struct MemorySurface {
    layers: BTreeMap<LayerId, MemoryLayer>,
    next_id: u64,
    attached: u64,
    detached: u64,
    initial_viewport: Viewport,
    fitted: Option<Region>,
}

impl MemorySurface {
    /// Creates a surface whose camera starts at `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            initial_viewport: viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_attached(&self, layer: LayerId) -> bool {
        self.layers.contains_key(&layer)
    }

    /// Number of layers currently attached.
    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn heat_layer_count(&self) -> usize {
        self.layers
            .values()
            .filter(|l| matches!(l, MemoryLayer::Heat { .. }))
            .count()
    }

    #[must_use]
    pub fn marker_layer_count(&self) -> usize {
        self.layers
            .values()
            .filter(|l| matches!(l, MemoryLayer::Markers(_)))
            .count()
    }

    /// Total attach calls over the surface's lifetime.
    #[must_use]
    pub const fn attached(&self) -> u64 {
        self.attached
    }

    /// Total detach calls over the surface's lifetime.
    #[must_use]
    pub const fn detached(&self) -> u64 {
        self.detached
    }

    #[must_use]
    pub const fn initial_viewport(&self) -> Viewport {
        self.initial_viewport
    }

    /// The last region the camera was fitted to, if any.
    #[must_use]
    pub const fn fitted_region(&self) -> Option<Region> {
        self.fitted
    }

    /// Options of the attached heat layer.
    #[must_use]
    pub fn heat_options(&self) -> Option<HeatOptions> {
        self.layers.values().find_map(|l| match l {
            MemoryLayer::Heat { options, .. } => Some(*options),
            MemoryLayer::Markers(_) => None,
        })
    }

    pub fn layers(&self) -> impl Iterator<Item = (LayerId, &MemoryLayer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer))
    }

    /// Renders every attached layer as `Point` features.
    ///
    /// Heat samples carry `layer: "heat"` and `weight`; markers carry
    /// `layer: "markers"`, their popup fields, and `color`/`fill` styling.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::new();

        for layer in self.layers.values() {
            match layer {
                MemoryLayer::Heat { points, .. } => {
                    for p in points {
                        let mut props = JsonObject::new();
                        props.insert("layer".to_string(), JsonValue::from("heat"));
                        props.insert("weight".to_string(), JsonValue::from(p.weight));
                        features.push(point_feature(p.lat, p.lng, props));
                    }
                }
                MemoryLayer::Markers(markers) => {
                    for m in markers {
                        let mut props = match serde_json::to_value(&m.popup) {
                            Ok(JsonValue::Object(map)) => map,
                            _ => JsonObject::new(),
                        };
                        props.insert("layer".to_string(), JsonValue::from("markers"));
                        props.insert("color".to_string(), JsonValue::from(m.color.as_ref()));
                        props.insert("fill".to_string(), JsonValue::from(m.color.hex()));
                        features.push(point_feature(m.lat, m.lng, props));
                    }
                }
            }
        }

        FeatureCollection {
            bbox: self
                .fitted
                .map(|r| vec![r.west, r.south, r.east, r.north]),
            features,
            foreign_members: None,
        }
    }
}

fn point_feature(lat: f64, lng: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![lng, lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl RenderSurface for MemorySurface {
    fn attach_heat(&mut self, points: &[HeatPoint], options: &HeatOptions) -> LayerId {
        self.insert(MemoryLayer::Heat {
            points: points.to_vec(),
            options: *options,
        })
    }

    fn attach_markers(&mut self, markers: &[MarkerDescriptor]) -> LayerId {
        self.insert(MemoryLayer::Markers(markers.to_vec()))
    }

    fn detach(&mut self, layer: LayerId) {
        if self.layers.remove(&layer).is_some() {
            self.detached += 1;
        } else {
            log::warn!("Attempted to detach unknown {layer}");
        }
    }

    fn fit_bounds(&mut self, region: Region) {
        self.fitted = Some(region);
    }
}

impl MemorySurface {
    fn insert(&mut self, layer: MemoryLayer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.layers.insert(id, layer);
        self.attached += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complaint_map_complaint_models::ComplaintRecord;
    use complaint_map_spatial::to_marker_descriptor;

    #[test]
    fn detaching_unknown_layer_is_ignored() {
        let mut surface = MemorySurface::default();
        surface.detach(LayerId(42));
        assert_eq!(surface.detached(), 0);
    }

    #[test]
    fn exports_heat_and_markers() {
        let mut surface = MemorySurface::default();
        surface.attach_heat(
            &[HeatPoint {
                lat: 1.0,
                lng: 2.0,
                weight: 0.7,
            }],
            &HeatOptions::default(),
        );
        let record = ComplaintRecord {
            ticket_id: "T-9".to_string(),
            lat: Some(3.0),
            lng: Some(4.0),
            priority: "Low".to_string(),
            status: "pending".to_string(),
            ..ComplaintRecord::default()
        };
        surface.attach_markers(&[to_marker_descriptor(&record).unwrap()]);
        surface.fit_bounds(Region::new(1.0, 0.0, 5.0, 4.0));

        let collection = surface.to_feature_collection();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.bbox, Some(vec![1.0, 0.0, 5.0, 4.0]));

        let heat = &collection.features[0];
        assert_eq!(
            heat.geometry.as_ref().map(|g| g.value.clone()),
            Some(geojson::Value::Point(vec![2.0, 1.0]))
        );
        assert_eq!(heat.property("weight").and_then(JsonValue::as_f64), Some(0.7));

        let marker = &collection.features[1];
        assert_eq!(marker.property("layer").and_then(JsonValue::as_str), Some("markers"));
        assert_eq!(marker.property("ticketId").and_then(JsonValue::as_str), Some("T-9"));
        assert_eq!(marker.property("color").and_then(JsonValue::as_str), Some("green"));
        assert_eq!(marker.property("status").and_then(JsonValue::as_str), Some("Pending"));
    }
}
