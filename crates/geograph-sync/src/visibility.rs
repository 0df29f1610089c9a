use geograph_core::NodeId;
use geograph_events::{Event, EventBus};
use std::collections::HashSet;

use crate::graph::GraphModel;

/// Per-widget map-mode state: which nodes the filter hid, and whether map
/// mode is currently active.
///
/// One context per graph/map widget instance; nothing here is shared
/// globally, so multiple widgets can toggle map mode independently.
#[derive(Debug, Default)]
pub struct MapModeContext {
    hidden: HashSet<NodeId>,
    active: bool,
}

impl MapModeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hidden(&self) -> &HashSet<NodeId> {
        &self.hidden
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

/// Maintains the node predicate of the graph's filtered view while map mode
/// is toggled on and off.
///
/// Only coordinate *presence* is checked. Implausible values (lat beyond
/// ±90) pass through and later produce nonsensical but finite screen
/// positions; rejecting them is the host's business.
pub struct VisibilityFilter;

impl VisibilityFilter {
    /// Hide every currently visible node that lacks a geocoordinate, then
    /// recompute the filtered view and announce the change.
    ///
    /// Warning policy: zero nodes with coordinates is a user-visible
    /// warning (the map would be empty); partial coverage is a softer
    /// informational notice. Neither is an error.
    pub fn enter_map_mode(model: &mut GraphModel, context: &mut MapModeContext, bus: &EventBus) {
        if context.active {
            tracing::warn!("map mode already active, re-applying coordinate filter");
            Self::exit_map_mode(model, context, bus);
        }

        let total = model.node_count();
        let mut newly_hidden = Vec::new();
        for node in model.nodes() {
            if node.visible && node.coordinate.is_none() {
                newly_hidden.push(node.id);
            }
        }
        for &id in &newly_hidden {
            model.set_node_visible(id, false);
            context.hidden.insert(id);
        }
        model.recompute_edge_visibility();
        context.active = true;

        bus.publish(Event::SearchResultsInvalidated);

        let hidden = context.hidden.len();
        let with_coords = model.nodes().filter(|n| n.coordinate.is_some()).count();
        if total > 0 && with_coords == 0 {
            bus.publish(Event::ShowWarning {
                message: "None of the nodes have geographic coordinates; the map shows an empty graph."
                    .to_string(),
            });
        } else if hidden > 0 {
            bus.publish(Event::ShowInfo {
                message: format!(
                    "{hidden} of {total} nodes have no geographic coordinates and were hidden."
                ),
            });
        }
    }

    /// Restore exactly the nodes the matching [`enter_map_mode`] hid.
    ///
    /// Nodes hidden by the host for other reasons stay hidden, which is
    /// what makes enter→exit a strict round trip on the visible set.
    ///
    /// [`enter_map_mode`]: Self::enter_map_mode
    pub fn exit_map_mode(model: &mut GraphModel, context: &mut MapModeContext, bus: &EventBus) {
        if !context.active {
            return;
        }

        for id in context.hidden.drain() {
            model.set_node_visible(id, true);
        }
        model.recompute_edge_visibility();
        context.active = false;

        bus.publish(Event::SearchResultsInvalidated);
    }
}
