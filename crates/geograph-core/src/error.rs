use crate::geo::GeoCoordinate;
use crate::NodeId;
use thiserror::Error;

/// Failures surfaced to host applications.
///
/// Missing coordinates and empty filter results are deliberately not errors;
/// they are handled by omission and user-visible notifications. Only
/// host-input mistakes that cannot be recovered locally end up here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeographError {
    #[error("node {0} is not part of the graph")]
    UnknownNode(NodeId),
    #[error("invalid bounds: south-west {south_west:?} exceeds north-east {north_east:?}")]
    InvalidBounds {
        south_west: GeoCoordinate,
        north_east: GeoCoordinate,
    },
}
