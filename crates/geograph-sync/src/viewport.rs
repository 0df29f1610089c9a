use geograph_core::{GeoBounds, GeoCoordinate};
use serde::{Deserialize, Serialize};

use crate::graph::Vec2;
use crate::projection::CoordinateMapper;

/// Axis-aligned pixel rectangle in host-window space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Snapshot of the map surface's mutable state: what the user currently
/// sees. Created once per map session and discarded when map mode ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoCoordinate,
    pub zoom: f64,
    /// Pane size in pixels.
    pub size: Vec2,
}

impl Viewport {
    pub fn new(center: GeoCoordinate, zoom: f64, size: Vec2) -> Self {
        Self { center, zoom, size }
    }

    /// Geographic rectangle currently covered by the pane.
    pub fn bounds(&self, mapper: &CoordinateMapper) -> GeoBounds {
        let north_west = mapper.coordinate_at(Vec2::ZERO, self);
        let south_east = mapper.coordinate_at(self.size, self);
        GeoBounds {
            south_west: GeoCoordinate::new(south_east.lat, north_west.lng),
            north_east: GeoCoordinate::new(north_west.lat, south_east.lng),
        }
    }
}

/// Viewport-changing occurrences on the map surface, in map-library terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// A zoom gesture began; the graph surface is hidden until it ends.
    ZoomStart,
    Zoom,
    /// The zoom gesture completed; the surface is re-shown after a final sync.
    ZoomEnd,
    Move,
    MoveEnd,
    Resize,
    Drag,
}

/// Abstraction over a concrete mapping library's viewport.
///
/// The synchronization core only ever talks to this trait, so any map
/// provider that can report its viewport, pane geometry, and projection can
/// be substituted.
pub trait MapViewportProvider {
    fn viewport(&self) -> Viewport;

    /// Pixel rectangle of the map pane within the host window. The graph
    /// surface's container is sized to exactly overlay it.
    fn pane_rect(&self) -> Rect;

    fn current_bounds(&self) -> GeoBounds;

    fn current_zoom(&self) -> f64 {
        self.viewport().zoom
    }

    /// Pane-relative projection of a geographic coordinate.
    fn project_to_pixel(&self, coordinate: GeoCoordinate) -> Vec2;

    /// Inverse of [`project_to_pixel`](Self::project_to_pixel).
    fn project_to_coord(&self, pixel: Vec2) -> GeoCoordinate;

    /// Replace the viewport outright. Implementations clamp `zoom` to their
    /// supported range.
    fn set_view(&mut self, center: GeoCoordinate, zoom: f64);
}

/// Reference [`MapViewportProvider`] backed by plain state instead of a
/// mapping library. Serves headless hosts and the test suite.
#[derive(Debug, Clone)]
pub struct InMemoryMapProvider {
    viewport: Viewport,
    pane_origin: Vec2,
    mapper: CoordinateMapper,
    min_zoom: f64,
    max_zoom: f64,
}

impl InMemoryMapProvider {
    pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
    pub const DEFAULT_MAX_ZOOM: f64 = 19.0;

    pub fn new(size: Vec2) -> Self {
        Self {
            viewport: Viewport::new(GeoCoordinate::new(0.0, 0.0), 1.0, size),
            pane_origin: Vec2::ZERO,
            mapper: CoordinateMapper::default(),
            min_zoom: Self::DEFAULT_MIN_ZOOM,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Move the pane within the host window without changing the view.
    pub fn set_pane_origin(&mut self, origin: Vec2) {
        self.pane_origin = origin;
    }

    pub fn resize(&mut self, size: Vec2) {
        self.viewport.size = size;
    }

    /// Shift the view by a pixel delta, as a drag gesture would.
    pub fn pan_by(&mut self, delta: Vec2) {
        let shifted = Vec2::new(
            self.viewport.size.x * 0.5 + delta.x,
            self.viewport.size.y * 0.5 + delta.y,
        );
        self.viewport.center = self.mapper.coordinate_at(shifted, &self.viewport);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        let zoom = self.viewport.zoom + delta;
        self.set_view(self.viewport.center, zoom);
    }
}

impl MapViewportProvider for InMemoryMapProvider {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn pane_rect(&self) -> Rect {
        Rect::from_pos_size(self.pane_origin, self.viewport.size)
    }

    fn current_bounds(&self) -> GeoBounds {
        self.viewport.bounds(&self.mapper)
    }

    fn project_to_pixel(&self, coordinate: GeoCoordinate) -> Vec2 {
        self.mapper.screen_position(coordinate, &self.viewport)
    }

    fn project_to_coord(&self, pixel: Vec2) -> GeoCoordinate {
        self.mapper.coordinate_at(pixel, &self.viewport)
    }

    fn set_view(&mut self, center: GeoCoordinate, zoom: f64) {
        self.viewport.center = center;
        self.viewport.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }
}
