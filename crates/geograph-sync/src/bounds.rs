use geograph_core::GeoBounds;
use serde::{Deserialize, Serialize};

use crate::graph::{GraphNode, Vec2};
use crate::projection::MercatorProjection;
use crate::viewport::MapViewportProvider;

/// Tunables for fit-to-bounds viewport changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Pixel padding kept between the fitted bounds and the pane edges.
    pub padding_px: f64,
    /// Upper zoom bound, so fitting a degenerate (single-point) bounds does
    /// not zoom in without limit.
    pub max_zoom: f64,
    /// Extend the current viewport to additionally cover the bounds instead
    /// of replacing the view outright.
    pub extend_current: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            padding_px: 50.0,
            max_zoom: 10.0,
            extend_current: false,
        }
    }
}

/// Computes minimal enclosing geographic rectangles and drives the map
/// viewport to fit them.
pub struct BoundsCalculator;

impl BoundsCalculator {
    /// Fold the minimal bounds over every node that has a coordinate.
    ///
    /// `None` means no node in the input carries a coordinate, which lets
    /// callers distinguish "nothing to show" from "show the whole world".
    pub fn compute_bounds<'a, I>(nodes: I) -> Option<GeoBounds>
    where
        I: IntoIterator<Item = &'a GraphNode>,
    {
        let mut bounds: Option<GeoBounds> = None;
        for node in nodes {
            let Some(coordinate) = node.coordinate else {
                continue;
            };
            match bounds.as_mut() {
                Some(b) => b.extend(coordinate),
                None => bounds = Some(GeoBounds::from_point(coordinate)),
            }
        }
        bounds
    }

    /// Drive the provider's viewport to show `bounds`.
    ///
    /// `None` falls back to the whole-world view. With
    /// [`FitOptions::extend_current`] the target is the union of `bounds`
    /// and the current viewport bounds, preserving what is already on
    /// screen.
    pub fn fit_to_bounds<P>(provider: &mut P, bounds: Option<GeoBounds>, options: &FitOptions)
    where
        P: MapViewportProvider + ?Sized,
    {
        let target = match bounds {
            None => GeoBounds::WORLD,
            Some(b) if options.extend_current => b.union(&provider.current_bounds()),
            Some(b) => b,
        };

        let pane_size = provider.pane_rect().size();
        let zoom = Self::zoom_for_bounds(&target, pane_size, options);
        provider.set_view(target.center(), zoom);
    }

    /// Largest zoom at which `bounds` plus padding fits into `pane_size`,
    /// capped at `options.max_zoom` and floored at zero.
    fn zoom_for_bounds(bounds: &GeoBounds, pane_size: Vec2, options: &FitOptions) -> f64 {
        let projection = MercatorProjection::default();
        let south_west = projection.project(bounds.south_west, 0.0);
        let north_east = projection.project(bounds.north_east, 0.0);
        let extent_x = (north_east.x - south_west.x).abs();
        let extent_y = (north_east.y - south_west.y).abs();

        let available_x = (pane_size.x - 2.0 * options.padding_px).max(1.0);
        let available_y = (pane_size.y - 2.0 * options.padding_px).max(1.0);

        // Degenerate axes yield an infinite scale; the cap below turns that
        // into "zoom in as far as allowed" instead of a division blowup.
        let scale = (available_x / extent_x).min(available_y / extent_y);
        scale.log2().min(options.max_zoom).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::InMemoryMapProvider;
    use geograph_core::{GeoCoordinate, NodeId};
    use proptest::prelude::*;

    fn graph_node(id: i64, coordinate: Option<GeoCoordinate>) -> GraphNode {
        GraphNode {
            id: NodeId(id),
            label: format!("n{id}"),
            coordinate,
            visible: true,
        }
    }

    fn provider() -> InMemoryMapProvider {
        InMemoryMapProvider::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_compute_bounds_empty_input_is_none() {
        let nodes: Vec<GraphNode> = Vec::new();
        assert!(BoundsCalculator::compute_bounds(nodes.iter()).is_none());
    }

    #[test]
    fn test_compute_bounds_skips_coordinate_less_nodes() {
        let nodes = vec![graph_node(1, None), graph_node(2, None)];
        assert!(BoundsCalculator::compute_bounds(nodes.iter()).is_none());
    }

    #[test]
    fn test_compute_bounds_encloses_all_coordinates() {
        let nodes = vec![
            graph_node(1, Some(GeoCoordinate::new(10.0, 20.0))),
            graph_node(2, None),
            graph_node(3, Some(GeoCoordinate::new(-30.0, 5.0))),
        ];
        let bounds = BoundsCalculator::compute_bounds(nodes.iter()).unwrap();

        assert_eq!(bounds.south_west, GeoCoordinate::new(-30.0, 5.0));
        assert_eq!(bounds.north_east, GeoCoordinate::new(10.0, 20.0));
    }

    #[test]
    fn test_single_node_fit_respects_zoom_cap() {
        let mut provider = provider();
        let bounds = GeoBounds::from_point(GeoCoordinate::new(48.8566, 2.3522));
        let options = FitOptions::default();

        BoundsCalculator::fit_to_bounds(&mut provider, Some(bounds), &options);

        assert_eq!(provider.current_zoom(), options.max_zoom);
        let center = provider.viewport().center;
        assert!((center.lat - 48.8566).abs() < 1e-9);
        assert!((center.lng - 2.3522).abs() < 1e-9);
    }

    #[test]
    fn test_missing_bounds_falls_back_to_world_view() {
        let mut provider = provider();
        provider.set_view(GeoCoordinate::new(50.0, 8.0), 12.0);

        BoundsCalculator::fit_to_bounds(&mut provider, None, &FitOptions::default());

        let center = provider.viewport().center;
        assert!(center.lat.abs() < 1e-9);
        assert!(center.lng.abs() < 1e-9);
        assert!(provider.current_zoom() <= 2.0);
    }

    #[test]
    fn test_extend_current_unions_with_viewport() {
        let mut provider = provider();
        provider.set_view(GeoCoordinate::new(0.0, 0.0), 6.0);
        let visible_before = provider.current_bounds();

        let far_point = GeoBounds::from_point(GeoCoordinate::new(40.0, 60.0));
        let options = FitOptions {
            extend_current: true,
            ..FitOptions::default()
        };
        BoundsCalculator::fit_to_bounds(&mut provider, Some(far_point), &options);

        let after = provider.current_bounds();
        assert!(after.contains(far_point.center()));
        assert!(after.contains(visible_before.center()));
    }

    #[test]
    fn test_replace_fit_centers_on_bounds() {
        let mut provider = provider();
        let mut bounds = GeoBounds::from_point(GeoCoordinate::new(10.0, 10.0));
        bounds.extend(GeoCoordinate::new(20.0, 30.0));

        BoundsCalculator::fit_to_bounds(&mut provider, Some(bounds), &FitOptions::default());

        let center = provider.viewport().center;
        assert!((center.lat - 15.0).abs() < 1e-9);
        assert!((center.lng - 20.0).abs() < 1e-9);
        let after = provider.current_bounds();
        assert!(after.contains(bounds.south_west));
        assert!(after.contains(bounds.north_east));
    }

    proptest! {
        /// compute_bounds yields min ≤ max on both axes whenever any input
        /// node has a coordinate.
        #[test]
        fn prop_bounds_min_le_max(
            coords in proptest::collection::vec(proptest::option::of((-90.0f64..=90.0, -180.0f64..=180.0)), 0..40)
        ) {
            let nodes: Vec<GraphNode> = coords
                .iter()
                .enumerate()
                .map(|(i, c)| graph_node(i as i64, c.map(|(lat, lng)| GeoCoordinate::new(lat, lng))))
                .collect();
            let has_coords = nodes.iter().any(|n| n.coordinate.is_some());

            match BoundsCalculator::compute_bounds(nodes.iter()) {
                None => prop_assert!(!has_coords),
                Some(bounds) => {
                    prop_assert!(has_coords);
                    prop_assert!(bounds.south_west.lat <= bounds.north_east.lat);
                    prop_assert!(bounds.south_west.lng <= bounds.north_east.lng);
                    for node in nodes.iter() {
                        if let Some(c) = node.coordinate {
                            prop_assert!(bounds.contains(c));
                        }
                    }
                }
            }
        }

        /// Fitting never exceeds the configured zoom cap, degenerate bounds
        /// included.
        #[test]
        fn prop_fit_never_exceeds_max_zoom(
            lat in -85.0f64..=85.0,
            lng in -180.0f64..=180.0,
            max_zoom in 1.0f64..=18.0
        ) {
            let mut provider = InMemoryMapProvider::new(Vec2::new(800.0, 600.0));
            let options = FitOptions { max_zoom, ..FitOptions::default() };
            let bounds = GeoBounds::from_point(GeoCoordinate::new(lat, lng));

            BoundsCalculator::fit_to_bounds(&mut provider, Some(bounds), &options);

            prop_assert!(provider.current_zoom() <= max_zoom + 1e-9);
        }
    }
}
