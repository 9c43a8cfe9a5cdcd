//! Padded bounding region for viewport fitting.

use complaint_map_dashboard_models::Region;
use geo::{BoundingRect, MultiPoint, Point};

use crate::HeatPoint;

/// Fraction of the envelope's span added on each side.
pub const PADDING_RATIO: f64 = 0.1;

/// Minimum padding in degrees on each side, so a single point (or a set
/// of identical points) still yields a region with nonzero extent.
pub const MIN_PADDING_DEGREES: f64 = 0.005;

/// Computes the envelope of `points`, padded by [`PADDING_RATIO`] of its
/// span on each side.
///
/// The envelope is clamped to the WGS84 extent before padding, so the
/// result always has `west <= east` and `south <= north`.
///
/// Returns `None` for an empty set; callers keep their current viewport in
/// that case.
#[must_use]
pub fn compute_bounds(points: &[HeatPoint]) -> Option<Region> {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(p.lng, p.lat))
        .collect::<Vec<_>>()
        .into();

    let rect = multi.bounding_rect()?;
    let (west, east) = (clamp_lng(rect.min().x), clamp_lng(rect.max().x));
    let (south, north) = (clamp_lat(rect.min().y), clamp_lat(rect.max().y));

    let pad_lng = ((east - west) * PADDING_RATIO).max(MIN_PADDING_DEGREES);
    let pad_lat = ((north - south) * PADDING_RATIO).max(MIN_PADDING_DEGREES);

    Some(Region::new(
        clamp_lng(west - pad_lng),
        clamp_lat(south - pad_lat),
        clamp_lng(east + pad_lng),
        clamp_lat(north + pad_lat),
    ))
}

const fn clamp_lng(lng: f64) -> f64 {
    lng.clamp(-180.0, 180.0)
}

const fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    const fn point(lat: f64, lng: f64) -> HeatPoint {
        HeatPoint {
            lat,
            lng,
            weight: 1.0,
        }
    }

    #[test]
    fn empty_set_has_no_bounds() {
        assert_eq!(compute_bounds(&[]), None);
    }

    #[test]
    fn single_point_is_centered_with_padding() {
        let region = compute_bounds(&[point(10.0, 20.0)]).unwrap();
        let (lat, lng) = region.center();

        assert!((lat - 10.0).abs() < EPS);
        assert!((lng - 20.0).abs() < EPS);
        assert!(region.north > 10.0 && region.south < 10.0);
        assert!(region.east > 20.0 && region.west < 20.0);
    }

    #[test]
    fn pads_ten_percent_of_span() {
        let region = compute_bounds(&[point(0.0, 0.0), point(10.0, 20.0), point(5.0, 5.0)])
            .unwrap();

        assert!((region.south - -1.0).abs() < EPS);
        assert!((region.north - 11.0).abs() < EPS);
        assert!((region.west - -2.0).abs() < EPS);
        assert!((region.east - 22.0).abs() < EPS);
    }

    #[test]
    fn encloses_every_point() {
        let points = [point(12.97, 77.59), point(13.01, 77.55), point(12.93, 77.62)];
        let region = compute_bounds(&points).unwrap();
        for p in &points {
            assert!(region.contains(p.lat, p.lng), "{p:?} outside {region:?}");
        }
    }

    #[test]
    fn clamps_to_world_extent() {
        let region = compute_bounds(&[point(-90.0, -180.0), point(90.0, 180.0)]).unwrap();
        assert_eq!(region, Region::new(-180.0, -90.0, 180.0, 90.0));
    }

    #[test]
    fn off_world_points_never_invert_the_region() {
        for p in [point(95.0, 20.0), point(-120.0, 200.0), point(10.0, -400.0)] {
            let region = compute_bounds(&[p]).unwrap();
            assert!(region.south <= region.north, "{p:?} gave {region:?}");
            assert!(region.west <= region.east, "{p:?} gave {region:?}");
            assert!((-90.0..=90.0).contains(&region.south));
            assert!((-180.0..=180.0).contains(&region.east));
        }

        let region = compute_bounds(&[point(95.0, 20.0)]).unwrap();
        assert!((region.north - 90.0).abs() < EPS);
        assert!(region.contains(90.0, 20.0));
    }
}
