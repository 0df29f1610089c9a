use geograph_core::{EdgeId, NodeId};
use std::collections::HashMap;

use crate::graph::Vec2;
use crate::viewport::Rect;

/// The graph renderer's visual state, as seen by the synchronization core.
///
/// Implementations own per-node visual positions and per-edge bend points;
/// the synchronizer overwrites both on every viewport change. None of these
/// operations touch the underlying domain graph.
pub trait GraphSurface {
    /// Resize/reposition the rendering container to exactly overlay the map
    /// pane. Always called before any node repositioning in a sync pass,
    /// since node positions are relative to the container's top-left origin.
    fn set_container_rect(&mut self, rect: Rect);

    fn set_node_position(&mut self, id: NodeId, position: Vec2);

    /// Drop all curvature control points so the edge renders as a straight
    /// line between its endpoints.
    fn clear_edge_bends(&mut self, id: EdgeId);

    /// Toggle surface visibility. Used to hide the graph during live zoom
    /// gestures, where the map tiles update continuously underneath.
    fn set_hidden(&mut self, hidden: bool);

    fn repaint(&mut self);
}

/// A rendering surface that can be re-parented between containers, e.g.
/// between the map pane and the widget's regular layout slot when map mode
/// toggles. Modeled independently of any windowing toolkit.
pub trait RenderTarget {
    type Container;

    fn attach(&mut self, container: Self::Container);

    fn detach(&mut self);

    fn is_attached(&self) -> bool;
}

/// In-memory [`GraphSurface`] for headless hosts and tests: records every
/// mutation the synchronizer performs so assertions can inspect them.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    positions: HashMap<NodeId, Vec2>,
    bends: HashMap<EdgeId, Vec<Vec2>>,
    container_rect: Rect,
    hidden: bool,
    repaint_count: usize,
    container: Option<String>,
    /// Ordered log of mutations, for asserting sequencing guarantees.
    mutations: Vec<SurfaceMutation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceMutation {
    ContainerRect(Rect),
    NodePosition(NodeId, Vec2),
    EdgeBendsCleared(EdgeId),
    Hidden(bool),
    Repaint,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_position(&self, id: NodeId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    pub fn positioned_node_count(&self) -> usize {
        self.positions.len()
    }

    /// Seed bend points on an edge, standing in for an organic layout the
    /// host computed before map mode took over.
    pub fn set_edge_bends(&mut self, id: EdgeId, bends: Vec<Vec2>) {
        self.bends.insert(id, bends);
    }

    pub fn edge_bends(&self, id: EdgeId) -> &[Vec2] {
        self.bends.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn container_rect(&self) -> Rect {
        self.container_rect
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn repaint_count(&self) -> usize {
        self.repaint_count
    }

    pub fn mutations(&self) -> &[SurfaceMutation] {
        &self.mutations
    }

    pub fn clear_mutation_log(&mut self) {
        self.mutations.clear();
    }
}

impl GraphSurface for InMemorySurface {
    fn set_container_rect(&mut self, rect: Rect) {
        self.container_rect = rect;
        self.mutations.push(SurfaceMutation::ContainerRect(rect));
    }

    fn set_node_position(&mut self, id: NodeId, position: Vec2) {
        self.positions.insert(id, position);
        self.mutations
            .push(SurfaceMutation::NodePosition(id, position));
    }

    fn clear_edge_bends(&mut self, id: EdgeId) {
        self.bends.insert(id, Vec::new());
        self.mutations.push(SurfaceMutation::EdgeBendsCleared(id));
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
        self.mutations.push(SurfaceMutation::Hidden(hidden));
    }

    fn repaint(&mut self) {
        self.repaint_count += 1;
        self.mutations.push(SurfaceMutation::Repaint);
    }
}

impl RenderTarget for InMemorySurface {
    type Container = String;

    fn attach(&mut self, container: String) {
        self.container = Some(container);
    }

    fn detach(&mut self) {
        self.container = None;
    }

    fn is_attached(&self) -> bool {
        self.container.is_some()
    }
}
