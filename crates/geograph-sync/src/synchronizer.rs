use serde::{Deserialize, Serialize};

use crate::graph::GraphModel;
use crate::projection::CoordinateMapper;
use crate::surface::GraphSurface;
use crate::viewport::{MapViewportProvider, ViewportEvent};

/// Tunables for the synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Hide the graph surface while a zoom gesture is in flight, so node
    /// positions never lag behind the live-updating map tiles.
    pub hide_during_zoom_gesture: bool,
    /// Clear edge bend points on every sync so edges stay straight lines
    /// between geo-positioned endpoints.
    pub straighten_edges: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            hide_during_zoom_gesture: true,
            straighten_edges: true,
        }
    }
}

/// Keeps the graph surface's node and edge positions consistent with the
/// map viewport across zoom, pan, move, and resize events.
///
/// All work happens synchronously inside the caller's event handler. There
/// is no cancellation: a newer pass simply overwrites the previous one, and
/// repeating a pass with an unchanged viewport reproduces identical
/// positions.
#[derive(Debug, Default)]
pub struct ViewportSynchronizer {
    mapper: CoordinateMapper,
    settings: SyncSettings,
    gesture_active: bool,
}

impl ViewportSynchronizer {
    pub fn new(settings: SyncSettings) -> Self {
        Self {
            mapper: CoordinateMapper::default(),
            settings,
            gesture_active: false,
        }
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// React to a viewport-changing event from the map surface.
    pub fn on_viewport_change<P, S>(
        &mut self,
        event: ViewportEvent,
        provider: &P,
        model: &GraphModel,
        surface: &mut S,
    ) where
        P: MapViewportProvider + ?Sized,
        S: GraphSurface + ?Sized,
    {
        match event {
            ViewportEvent::ZoomStart => {
                self.gesture_active = true;
                if self.settings.hide_during_zoom_gesture {
                    surface.set_hidden(true);
                }
            }
            ViewportEvent::ZoomEnd => {
                self.synchronize(provider, model, surface);
                if self.gesture_active && self.settings.hide_during_zoom_gesture {
                    surface.set_hidden(false);
                }
                self.gesture_active = false;
            }
            ViewportEvent::Zoom
            | ViewportEvent::Move
            | ViewportEvent::MoveEnd
            | ViewportEvent::Resize
            | ViewportEvent::Drag => {
                self.synchronize(provider, model, surface);
            }
        }
    }

    /// One full synchronization pass.
    ///
    /// Order is contractual: the container is sized to the map pane first,
    /// because node screen positions are relative to its top-left origin.
    pub fn synchronize<P, S>(&self, provider: &P, model: &GraphModel, surface: &mut S)
    where
        P: MapViewportProvider + ?Sized,
        S: GraphSurface + ?Sized,
    {
        surface.set_container_rect(provider.pane_rect());

        let viewport = provider.viewport();
        for node in model.visible_nodes() {
            let Some(coordinate) = node.coordinate else {
                // Coordinate-less nodes are filtered out in map mode; any
                // still visible are simply left where they are.
                continue;
            };
            surface.set_node_position(node.id, self.mapper.screen_position(coordinate, &viewport));
        }

        if self.settings.straighten_edges {
            for edge in model.edges().filter(|e| e.visible) {
                surface.clear_edge_bends(edge.id);
            }
        }

        surface.repaint();
    }
}
