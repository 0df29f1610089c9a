use geograph_core::{Edge, GeographError, Node, NodeId};
use geograph_events::{Event, EventBus, EventListener};

use crate::bounds::{BoundsCalculator, FitOptions};
use crate::graph::GraphModel;
use crate::surface::GraphSurface;
use crate::synchronizer::{SyncSettings, ViewportSynchronizer};
use crate::viewport::{MapViewportProvider, ViewportEvent};
use crate::visibility::{MapModeContext, VisibilityFilter};

/// Zoom delta applied by the zoom-in / zoom-out commands.
const ZOOM_STEP: f64 = 1.0;

/// Facade owning one widget instance's synchronization state: the mirrored
/// graph model, the map provider, the graph surface, and the map-mode
/// context.
///
/// Commands arrive either as direct method calls or as [`Event`]s drained
/// from the bus; whenever the visible node set changes, the controller
/// publishes [`Event::SearchResultsInvalidated`] back.
pub struct MapModeController<P, S>
where
    P: MapViewportProvider,
    S: GraphSurface,
{
    model: GraphModel,
    provider: P,
    surface: S,
    context: MapModeContext,
    synchronizer: ViewportSynchronizer,
    fit_options: FitOptions,
    bus: EventBus,
}

impl<P, S> MapModeController<P, S>
where
    P: MapViewportProvider,
    S: GraphSurface,
{
    pub fn new(model: GraphModel, provider: P, surface: S, bus: EventBus) -> Self {
        Self {
            model,
            provider,
            surface,
            context: MapModeContext::new(),
            synchronizer: ViewportSynchronizer::default(),
            fit_options: FitOptions::default(),
            bus,
        }
    }

    pub fn with_fit_options(mut self, fit_options: FitOptions) -> Self {
        self.fit_options = fit_options;
        self
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.synchronizer = ViewportSynchronizer::new(settings);
        self
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn context(&self) -> &MapModeContext {
        &self.context
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Replace the mirrored graph with a fresh host snapshot. Active map
    /// mode is exited first so the filter never tracks stale node ids.
    pub fn load_graph(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        if self.context.is_active() {
            tracing::warn!("graph reloaded while map mode active, exiting map mode first");
            self.exit_map_mode();
        }
        let mut model = GraphModel::new();
        for node in nodes {
            model.add_node(node);
        }
        for edge in edges {
            model.add_edge(edge);
        }
        self.model = model;
    }

    /// Switch to geographic positioning: filter out coordinate-less nodes,
    /// fit the viewport to what remains, and push fresh positions.
    pub fn enter_map_mode(&mut self) {
        VisibilityFilter::enter_map_mode(&mut self.model, &mut self.context, &self.bus);

        let bounds = BoundsCalculator::compute_bounds(self.model.visible_nodes());
        let options = FitOptions {
            extend_current: false,
            ..self.fit_options
        };
        BoundsCalculator::fit_to_bounds(&mut self.provider, bounds, &options);
        self.resync();
    }

    /// Restore the node set hidden on entry; the graph returns to whatever
    /// layout the host maintains outside map mode.
    pub fn exit_map_mode(&mut self) {
        VisibilityFilter::exit_map_mode(&mut self.model, &mut self.context, &self.bus);
    }

    /// Fit the viewport to `ids`, or to every node when `ids` is `None`.
    ///
    /// Explicit subsets honor [`FitOptions::extend_current`]; fitting the
    /// whole content always replaces the viewport.
    pub fn fit_to_nodes(&mut self, ids: Option<&[NodeId]>) -> Result<(), GeographError> {
        let (bounds, options) = match ids {
            None => (
                BoundsCalculator::compute_bounds(self.model.nodes()),
                FitOptions {
                    extend_current: false,
                    ..self.fit_options
                },
            ),
            Some(ids) => {
                let mut nodes = Vec::with_capacity(ids.len());
                for &id in ids {
                    nodes.push(
                        self.model
                            .get_node(id)
                            .ok_or(GeographError::UnknownNode(id))?,
                    );
                }
                (
                    BoundsCalculator::compute_bounds(nodes.into_iter()),
                    self.fit_options,
                )
            }
        };

        BoundsCalculator::fit_to_bounds(&mut self.provider, bounds, &options);
        self.resync();
        Ok(())
    }

    pub fn zoom_in(&mut self) {
        self.zoom_by(ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_by(-ZOOM_STEP);
    }

    /// Center and zoom onto a single node, capped at the fit zoom limit.
    pub fn zoom_to_item(&mut self, id: NodeId) -> Result<(), GeographError> {
        let node = self
            .model
            .get_node(id)
            .ok_or(GeographError::UnknownNode(id))?;
        let Some(coordinate) = node.coordinate else {
            self.bus.publish(Event::ShowInfo {
                message: format!("Node {} has no geographic coordinate to zoom to.", node.label),
            });
            return Ok(());
        };

        BoundsCalculator::fit_to_bounds(
            &mut self.provider,
            Some(geograph_core::GeoBounds::from_point(coordinate)),
            &self.fit_options,
        );
        self.resync();
        Ok(())
    }

    /// Forward a map-surface event into the synchronizer. Outside map mode
    /// the graph is not geo-positioned, so viewport changes are ignored.
    pub fn on_viewport_change(&mut self, event: ViewportEvent) {
        if !self.context.is_active() {
            return;
        }
        self.synchronizer
            .on_viewport_change(event, &self.provider, &self.model, &mut self.surface);
    }

    fn zoom_by(&mut self, delta: f64) {
        let viewport = self.provider.viewport();
        self.provider
            .set_view(viewport.center, viewport.zoom + delta);
        self.resync();
    }

    fn resync(&mut self) {
        if self.context.is_active() {
            self.synchronizer
                .synchronize(&self.provider, &self.model, &mut self.surface);
        }
    }
}

impl<P, S> EventListener for MapModeController<P, S>
where
    P: MapViewportProvider,
    S: GraphSurface,
{
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::MapModeEnter => self.enter_map_mode(),
            Event::MapModeExit => self.exit_map_mode(),
            Event::ZoomIn => self.zoom_in(),
            Event::ZoomOut => self.zoom_out(),
            Event::FitContent => {
                if let Err(err) = self.fit_to_nodes(None) {
                    tracing::warn!("fit-content command failed: {err}");
                }
            }
            Event::ZoomToItem { id } => {
                if let Err(err) = self.zoom_to_item(*id) {
                    tracing::warn!("zoom-to-item command failed: {err}");
                }
            }
            // Outbound notifications; nothing for the controller to do.
            Event::SearchResultsInvalidated
            | Event::ShowInfo { .. }
            | Event::ShowWarning { .. } => {}
        }
    }
}
