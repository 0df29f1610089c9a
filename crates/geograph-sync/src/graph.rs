use geograph_core::{Edge, EdgeId, GeoCoordinate, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pixel-space vector. Doubles as a screen position, which is derived,
/// transient state: recomputed on every viewport change, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Visual record for one node on the graph surface.
///
/// `coordinate` is copied from the host's domain node and treated as
/// read-only; `visible` is the only field the filter layer mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub label: String,
    pub coordinate: Option<GeoCoordinate>,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub visible: bool,
    pub source_idx: NodeIndex,
    pub target_idx: NodeIndex,
}

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: GraphNode) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    pub fn add_edge(
        &mut self,
        source_idx: NodeIndex,
        target_idx: NodeIndex,
        edge: GraphEdge,
    ) -> EdgeIndex {
        let idx = EdgeIndex(self.edges.len());
        let mut edge = edge;
        edge.source_idx = source_idx;
        edge.target_idx = target_idx;
        self.edges.push(edge);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.edges
            .get(index.0)
            .map(|e| (e.source_idx, e.target_idx))
    }
}

impl Index<NodeIndex> for Graph {
    type Output = GraphNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Graph {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for Graph {
    type Output = GraphEdge;
    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}

impl IndexMut<EdgeIndex> for Graph {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Self::Output {
        &mut self.edges[index.0]
    }
}

/// The graph surface's view of the host graph: structure and coordinates
/// mirrored from the domain model, plus the visibility flags the filtered
/// view maintains. The domain graph itself is never written back to.
#[derive(Debug, Default)]
pub struct GraphModel {
    pub graph: Graph,
    pub node_map: HashMap<NodeId, NodeIndex>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) {
        if !self.node_map.contains_key(&node.id) {
            let record = GraphNode {
                id: node.id,
                label: node.label,
                coordinate: node.coordinate,
                visible: true,
            };
            let idx = self.graph.add_node(record);
            self.node_map.insert(node.id, idx);
        }
    }

    pub fn add_edge(&mut self, edge: Edge) {
        if let (Some(&src), Some(&target)) = (
            self.node_map.get(&edge.source),
            self.node_map.get(&edge.target),
        ) {
            let record = GraphEdge {
                id: edge.id,
                source: edge.source,
                target: edge.target,
                visible: true,
                source_idx: src,
                target_idx: target,
            };
            self.graph.add_edge(src, target, record);
        } else {
            if !self.node_map.contains_key(&edge.source) {
                tracing::warn!(
                    "Dropping edge {} because source node {} is missing from graph model",
                    edge.id,
                    edge.source
                );
            }
            if !self.node_map.contains_key(&edge.target) {
                tracing::warn!(
                    "Dropping edge {} because target node {} is missing from graph model",
                    edge.id,
                    edge.target
                );
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn get_node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_map.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.node_map.get(&id).map(|&idx| &mut self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.graph.edges()
    }

    /// Nodes currently part of the filtered view.
    pub fn visible_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.nodes().filter(|n| n.visible)
    }

    pub fn visible_node_ids(&self) -> Vec<NodeId> {
        self.visible_nodes().map(|n| n.id).collect()
    }

    pub fn set_node_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.get_node_mut(id) {
            node.visible = visible;
        } else {
            tracing::warn!("Ignoring visibility change for unknown node {}", id);
        }
    }

    /// Recompute edge visibility from node visibility: an edge is part of
    /// the filtered view exactly when both endpoints are.
    pub fn recompute_edge_visibility(&mut self) {
        let indices: Vec<_> = self.graph.edge_indices().collect();
        for edge_idx in indices {
            let Some((source_idx, target_idx)) = self.graph.edge_endpoints(edge_idx) else {
                continue;
            };
            let visible = self.graph[source_idx].visible && self.graph[target_idx].visible;
            self.graph[edge_idx].visible = visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, coordinate: Option<GeoCoordinate>) -> Node {
        Node {
            id: NodeId(id),
            label: format!("n{id}"),
            coordinate,
        }
    }

    fn edge(id: i64, source: i64, target: i64) -> Edge {
        Edge {
            id: EdgeId(id),
            source: NodeId(source),
            target: NodeId(target),
        }
    }

    #[test]
    fn test_model_mirrors_host_nodes_and_edges() {
        let mut model = GraphModel::new();
        model.add_node(node(1, Some(GeoCoordinate::new(10.0, 20.0))));
        model.add_node(node(2, None));
        model.add_edge(edge(1, 1, 2));

        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert!(model.get_node(NodeId(1)).unwrap().coordinate.is_some());
        assert!(model.get_node(NodeId(2)).unwrap().coordinate.is_none());
    }

    #[test]
    fn test_edge_with_missing_endpoint_is_dropped() {
        let mut model = GraphModel::new();
        model.add_node(node(1, None));
        model.add_edge(edge(1, 1, 99));

        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_node_ids_are_ignored() {
        let mut model = GraphModel::new();
        model.add_node(node(1, None));
        model.add_node(node(1, Some(GeoCoordinate::new(1.0, 2.0))));

        assert_eq!(model.node_count(), 1);
        assert!(model.get_node(NodeId(1)).unwrap().coordinate.is_none());
    }

    #[test]
    fn test_edge_visibility_follows_endpoints() {
        let mut model = GraphModel::new();
        model.add_node(node(1, None));
        model.add_node(node(2, None));
        model.add_edge(edge(1, 1, 2));

        model.set_node_visible(NodeId(2), false);
        model.recompute_edge_visibility();
        assert!(!model.edges().next().unwrap().visible);

        model.set_node_visible(NodeId(2), true);
        model.recompute_edge_visibility();
        assert!(model.edges().next().unwrap().visible);
    }
}
