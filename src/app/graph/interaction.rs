use eframe::egui::{Pos2, Vec2};

use crate::flow::{SelectionDetails, TopologyGraph};

use super::super::physics::NodePositions;
use super::super::viewport::ViewportTransform;

pub(in crate::app) const NODE_HIT_RADIUS: f32 = 10.0;
pub(in crate::app) const EDGE_HIT_DISTANCE: f32 = 5.0;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) enum Selection {
    #[default]
    None,
    Node(String),
    Edge(String),
}

impl Selection {
    pub(in crate::app) fn node_id(&self) -> Option<&str> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }

    pub(in crate::app) fn edge_id(&self) -> Option<&str> {
        match self {
            Self::Edge(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum DragState {
    #[default]
    Idle,
    Dragging {
        anchor: Pos2,
    },
}

/// Pointer state machine over the graph canvas. Owns the viewport and the
/// selection; never touches node positions.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct InteractionController {
    viewport: ViewportTransform,
    selection: Selection,
    drag: DragState,
}

impl InteractionController {
    pub(in crate::app) fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    pub(in crate::app) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub(in crate::app) fn pointer_down(
        &mut self,
        screen: Pos2,
        graph: &TopologyGraph,
        positions: &NodePositions,
    ) {
        let world = self.viewport.screen_to_world(screen);
        let selection = hit_test(world, graph, positions);
        if selection != self.selection {
            log::debug!("selection changed to {selection:?}");
        }
        self.selection = selection;
        self.drag = DragState::Dragging { anchor: screen };
    }

    pub(in crate::app) fn pointer_move(&mut self, screen: Pos2) {
        let DragState::Dragging { anchor } = self.drag else {
            return;
        };

        self.viewport.pan_by(screen - anchor);
        self.drag = DragState::Dragging { anchor: screen };
    }

    pub(in crate::app) fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    pub(in crate::app) fn pointer_leave(&mut self) {
        self.drag = DragState::Idle;
    }

    pub(in crate::app) fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub(in crate::app) fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub(in crate::app) fn reset(&mut self) {
        self.viewport.reset();
        self.selection = Selection::None;
    }

    /// Selection made outside the canvas, e.g. from the details panel.
    pub(in crate::app) fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub(in crate::app) fn details(&self, graph: &TopologyGraph) -> Option<SelectionDetails> {
        match &self.selection {
            Selection::None => None,
            Selection::Node(id) => graph.node_details(id),
            Selection::Edge(id) => graph.edge_details(id),
        }
    }
}

/// Nodes take precedence over edges; within each, the first hit in graph
/// order wins.
pub(in crate::app) fn hit_test(
    world: Vec2,
    graph: &TopologyGraph,
    positions: &NodePositions,
) -> Selection {
    let node_hit = graph.nodes.keys().find(|node_id| {
        positions
            .get(node_id)
            .is_some_and(|position| (position - world).length() <= NODE_HIT_RADIUS)
    });
    if let Some(node_id) = node_hit {
        return Selection::Node(node_id.clone());
    }

    let edge_hit = graph.edges.iter().find(|edge| {
        match (positions.get(&edge.source_id), positions.get(&edge.target_id)) {
            (Some(start), Some(end)) => distance_to_segment(world, start, end) < EDGE_HIT_DISTANCE,
            _ => false,
        }
    });

    edge_hit
        .map(|edge| Selection::Edge(edge.id.clone()))
        .unwrap_or_default()
}

fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq <= f32::EPSILON {
        return (point - start).length();
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    (point - (start + segment * t)).length()
}
