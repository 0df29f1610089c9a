use geograph_core::{GeoCoordinate, MAX_MERCATOR_LATITUDE};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::graph::Vec2;
use crate::viewport::Viewport;

/// Edge length in pixels of the world at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Spherical (web) Mercator projection into zoom-scaled world-pixel space.
///
/// The world at zoom `z` is a square of `tile_size * 2^z` pixels with the
/// origin at the north-west corner; x grows east, y grows south. Latitude
/// is clamped to the Mercator-safe range so the output is finite for any
/// input latitude, including the poles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    pub tile_size: f64,
}

impl Default for MercatorProjection {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
        }
    }
}

impl MercatorProjection {
    pub fn world_size(&self, zoom: f64) -> f64 {
        self.tile_size * 2f64.powf(zoom)
    }

    /// Geographic coordinate to world-pixel coordinate at `zoom`.
    pub fn project(&self, coordinate: GeoCoordinate, zoom: f64) -> Vec2 {
        let size = self.world_size(zoom);
        let lat = coordinate
            .lat
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let sin = lat.to_radians().sin();

        let x = (coordinate.lng / 360.0 + 0.5) * size;
        let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * size;
        Vec2::new(x, y)
    }

    /// Inverse of [`project`](Self::project).
    pub fn unproject(&self, pixel: Vec2, zoom: f64) -> GeoCoordinate {
        let size = self.world_size(zoom);
        let lng = (pixel.x / size - 0.5) * 360.0;
        let n = PI * (1.0 - 2.0 * pixel.y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoCoordinate::new(lat, lng)
    }
}

/// Maps a node's geographic coordinate to a pixel position relative to the
/// top-left corner of the map pane described by a [`Viewport`].
///
/// Pure: no side effects, deterministic for identical inputs. Callers are
/// responsible for skipping nodes without a coordinate; the mapper itself
/// never sees invalid input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    pub projection: MercatorProjection,
}

impl CoordinateMapper {
    pub fn new(projection: MercatorProjection) -> Self {
        Self { projection }
    }

    pub fn screen_position(&self, coordinate: GeoCoordinate, viewport: &Viewport) -> Vec2 {
        let world = self.projection.project(coordinate, viewport.zoom);
        let center = self.projection.project(viewport.center, viewport.zoom);
        Vec2::new(
            world.x - center.x + viewport.size.x * 0.5,
            world.y - center.y + viewport.size.y * 0.5,
        )
    }

    /// Inverse mapping: pane-relative pixel position back to a geographic
    /// coordinate under the same viewport.
    pub fn coordinate_at(&self, screen: Vec2, viewport: &Viewport) -> GeoCoordinate {
        let center = self.projection.project(viewport.center, viewport.zoom);
        let world = Vec2::new(
            screen.x + center.x - viewport.size.x * 0.5,
            screen.y + center.y - viewport.size.y * 0.5,
        );
        self.projection.unproject(world, viewport.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport {
            center: GeoCoordinate::new(0.0, 0.0),
            zoom: 2.0,
            size: Vec2::new(800.0, 600.0),
        }
    }

    #[test]
    fn test_equator_meridian_projects_to_world_center() {
        let projection = MercatorProjection::default();
        let origin = projection.project(GeoCoordinate::new(0.0, 0.0), 0.0);
        assert!((origin.x - 128.0).abs() < 1e-9);
        assert!((origin.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_center_maps_to_pane_center() {
        let mapper = CoordinateMapper::default();
        let vp = viewport();
        let screen = mapper.screen_position(vp.center, &vp);
        assert!((screen.x - 400.0).abs() < 1e-9);
        assert!((screen.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_poles_project_finite() {
        let projection = MercatorProjection::default();
        for lat in [90.0, -90.0, 89.9999, -89.9999] {
            let p = projection.project(GeoCoordinate::new(lat, 0.0), 5.0);
            assert!(p.is_finite(), "lat {lat} projected to {p:?}");
        }
    }

    proptest! {
        /// Every valid coordinate projects to a finite point, and projecting
        /// twice with the same inputs yields identical output.
        #[test]
        fn prop_projection_finite_and_deterministic(
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
            zoom in 0.0f64..=19.0
        ) {
            let projection = MercatorProjection::default();
            let coordinate = GeoCoordinate::new(lat, lng);

            let first = projection.project(coordinate, zoom);
            let second = projection.project(coordinate, zoom);

            prop_assert!(first.is_finite());
            prop_assert_eq!(first, second);
        }

        /// Away from the clamped polar caps, unproject inverts project.
        #[test]
        fn prop_unproject_inverts_project(
            lat in -85.0f64..=85.0,
            lng in -179.9f64..=179.9,
            zoom in 0.0f64..=19.0
        ) {
            let projection = MercatorProjection::default();
            let coordinate = GeoCoordinate::new(lat, lng);

            let back = projection.unproject(projection.project(coordinate, zoom), zoom);

            prop_assert!((back.lat - lat).abs() < 1e-6);
            prop_assert!((back.lng - lng).abs() < 1e-6);
        }

        /// Screen positions are finite for any valid coordinate under any
        /// sane viewport.
        #[test]
        fn prop_screen_position_finite(
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
            center_lat in -85.0f64..=85.0,
            center_lng in -180.0f64..=180.0,
            zoom in 0.0f64..=19.0
        ) {
            let mapper = CoordinateMapper::default();
            let vp = Viewport {
                center: GeoCoordinate::new(center_lat, center_lng),
                zoom,
                size: Vec2::new(1024.0, 768.0),
            };
            prop_assert!(mapper.screen_position(GeoCoordinate::new(lat, lng), &vp).is_finite());
        }
    }
}
