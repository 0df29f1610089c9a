pub mod bounds;
pub mod controller;
pub mod graph;
pub mod projection;
pub mod surface;
pub mod synchronizer;
pub mod viewport;
pub mod visibility;

pub use bounds::{BoundsCalculator, FitOptions};
pub use controller::MapModeController;
pub use graph::{EdgeIndex, Graph, GraphEdge, GraphModel, GraphNode, NodeIndex, Vec2};
pub use projection::{CoordinateMapper, MercatorProjection, TILE_SIZE};
pub use surface::{GraphSurface, InMemorySurface, RenderTarget, SurfaceMutation};
pub use synchronizer::{SyncSettings, ViewportSynchronizer};
pub use viewport::{InMemoryMapProvider, MapViewportProvider, Rect, Viewport, ViewportEvent};
pub use visibility::{MapModeContext, VisibilityFilter};
