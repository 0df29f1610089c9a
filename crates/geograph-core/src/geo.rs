use serde::{Deserialize, Serialize};

use crate::error::GeographError;

/// Latitude beyond which the spherical Mercator projection diverges.
///
/// Projections clamp to this value so that any latitude in [-90, 90]
/// (or outside it, for hosts that feed implausible data) still maps to a
/// finite pixel coordinate.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

/// A `{lat, lng}` pair identifying a point on Earth's surface.
///
/// Attached to graph nodes as domain data. Plausibility (lat within ±90,
/// lng within ±180) is deliberately not enforced here; consumers that need
/// finite outputs clamp at projection time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Minimal geographic rectangle, corner-addressed.
///
/// Invariant: `south_west.lat <= north_east.lat` and
/// `south_west.lng <= north_east.lng`. Constructors uphold it; `new`
/// rejects inverted corners instead of silently swapping them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: GeoCoordinate,
    pub north_east: GeoCoordinate,
}

impl GeoBounds {
    /// The whole-world extent used as the fallback view when there is
    /// nothing to fit. Latitude is capped at the Mercator limit so the
    /// world rectangle is square in projected space.
    pub const WORLD: Self = Self {
        south_west: GeoCoordinate {
            lat: -MAX_MERCATOR_LATITUDE,
            lng: -180.0,
        },
        north_east: GeoCoordinate {
            lat: MAX_MERCATOR_LATITUDE,
            lng: 180.0,
        },
    };

    pub fn new(south_west: GeoCoordinate, north_east: GeoCoordinate) -> Result<Self, GeographError> {
        if south_west.lat > north_east.lat || south_west.lng > north_east.lng {
            return Err(GeographError::InvalidBounds {
                south_west,
                north_east,
            });
        }
        Ok(Self {
            south_west,
            north_east,
        })
    }

    /// Degenerate zero-area bounds around a single coordinate.
    pub fn from_point(coordinate: GeoCoordinate) -> Self {
        Self {
            south_west: coordinate,
            north_east: coordinate,
        }
    }

    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::new(
            (self.south_west.lat + self.north_east.lat) * 0.5,
            (self.south_west.lng + self.north_east.lng) * 0.5,
        )
    }

    /// Grow the bounds in place so they contain `coordinate`.
    pub fn extend(&mut self, coordinate: GeoCoordinate) {
        self.south_west.lat = self.south_west.lat.min(coordinate.lat);
        self.south_west.lng = self.south_west.lng.min(coordinate.lng);
        self.north_east.lat = self.north_east.lat.max(coordinate.lat);
        self.north_east.lng = self.north_east.lng.max(coordinate.lng);
    }

    /// Smallest bounds containing both `self` and `other`.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            south_west: GeoCoordinate::new(
                self.south_west.lat.min(other.south_west.lat),
                self.south_west.lng.min(other.south_west.lng),
            ),
            north_east: GeoCoordinate::new(
                self.north_east.lat.max(other.north_east.lat),
                self.north_east.lng.max(other.north_east.lng),
            ),
        }
    }

    pub fn contains(&self, coordinate: GeoCoordinate) -> bool {
        coordinate.lat >= self.south_west.lat
            && coordinate.lat <= self.north_east.lat
            && coordinate.lng >= self.south_west.lng
            && coordinate.lng <= self.north_east.lng
    }

    /// True when the bounds enclose no area (the single-node case).
    pub fn is_degenerate(&self) -> bool {
        self.south_west.lat == self.north_east.lat || self.south_west.lng == self.north_east.lng
    }
}
