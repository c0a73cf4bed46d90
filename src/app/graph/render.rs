use std::collections::HashSet;

use eframe::egui::{Align2, Color32, Pos2, Stroke, vec2};

use crate::config::Theme;
use crate::flow::TopologyGraph;

use super::super::physics::NodePositions;
use super::super::render_utils::{blend_color, dim_color, node_fill, palette};
use super::super::viewport::ViewportTransform;
use super::interaction::Selection;

pub(in crate::app) const NODE_RADIUS: f32 = 8.0;
pub(in crate::app) const SELECTED_NODE_RADIUS: f32 = 12.0;
const EDGE_WIDTH: f32 = 1.4;
const SELECTED_EDGE_WIDTH: f32 = 3.6;
const LABEL_SIZE: f32 = 12.0;

/// Raster target for a frame. Coordinates are canvas-local screen pixels.
pub(in crate::app) trait Canvas {
    fn clear(&mut self, color: Color32);
    fn line(&mut self, points: [Pos2; 2], stroke: Stroke);
    fn disc(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke);
    fn ring(&mut self, center: Pos2, radius: f32, stroke: Stroke);
    fn text(&mut self, anchor: Pos2, align: Align2, text: &str, size: f32, color: Color32);
}

pub(in crate::app) struct FrameInput<'a> {
    pub(in crate::app) graph: &'a TopologyGraph,
    pub(in crate::app) positions: &'a NodePositions,
    pub(in crate::app) viewport: &'a ViewportTransform,
    pub(in crate::app) selection: &'a Selection,
    pub(in crate::app) theme: Theme,
    pub(in crate::app) search_matches: Option<&'a HashSet<String>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct FrameStats {
    pub(in crate::app) nodes: usize,
    pub(in crate::app) edges: usize,
}

/// Full redraw: clear, edges underneath, then nodes and their labels.
pub(in crate::app) fn render_frame(canvas: &mut impl Canvas, frame: &FrameInput<'_>) -> FrameStats {
    let palette = palette(frame.theme);
    let viewport = frame.viewport;
    let zoom = viewport.zoom();
    let zoom_sqrt = zoom.sqrt();
    let mut stats = FrameStats::default();

    canvas.clear(palette.background);

    let selected_edge = frame.selection.edge_id();
    for edge in &frame.graph.edges {
        let (Some(source), Some(target)) = (
            frame.positions.get(&edge.source_id),
            frame.positions.get(&edge.target_id),
        ) else {
            continue;
        };

        let start = viewport.world_to_screen(source);
        let end = viewport.world_to_screen(target);
        let base_color = if edge.is_vulnerable {
            palette.edge_vulnerable
        } else {
            palette.edge_safe
        };

        if selected_edge == Some(edge.id.as_str()) {
            let color = blend_color(base_color, palette.edge_selected, 0.7);
            canvas.line([start, end], Stroke::new(SELECTED_EDGE_WIDTH * zoom_sqrt, color));

            let midpoint = start + (end - start) * 0.5;
            canvas.text(
                midpoint - vec2(0.0, 6.0),
                Align2::CENTER_BOTTOM,
                &format!("{}:{}", edge.protocol, edge.port),
                LABEL_SIZE,
                palette.label,
            );
        } else {
            canvas.line([start, end], Stroke::new(EDGE_WIDTH * zoom_sqrt, base_color));
        }
        stats.edges += 1;
    }

    let selected_node = frame.selection.node_id();
    let search_active = frame
        .search_matches
        .is_some_and(|matches| !matches.is_empty());
    let outline = Stroke::new(1.0, palette.node_outline);

    for node in frame.graph.nodes.values() {
        let Some(world) = frame.positions.get(&node.id) else {
            continue;
        };

        let center = viewport.world_to_screen(world);
        let is_selected = selected_node == Some(node.id.as_str());
        let is_match = frame
            .search_matches
            .is_some_and(|matches| matches.contains(&node.id));

        let radius = if is_selected {
            SELECTED_NODE_RADIUS
        } else {
            NODE_RADIUS
        } * zoom;

        let fill = node_fill(node, &palette);
        let fill = if search_active && !is_match && !is_selected {
            dim_color(fill, 0.45)
        } else {
            fill
        };

        canvas.disc(center, radius, fill, outline);
        if is_selected {
            canvas.ring(center, radius + 3.0, Stroke::new(2.0, palette.edge_selected));
        }
        if is_match {
            canvas.ring(center, radius + 5.0, Stroke::new(1.6, palette.search_ring));
        }

        canvas.text(
            center + vec2(radius + 5.0, 0.0),
            Align2::LEFT_CENTER,
            &node.label,
            LABEL_SIZE,
            palette.label,
        );
        stats.nodes += 1;
    }

    stats
}

#[cfg(test)]
mod tests {
    use eframe::egui::Vec2;

    use crate::flow::FlowRecord;

    use super::super::super::physics::{LayoutConfig, rebuild_layout};
    use super::super::super::render_utils::Palette;
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum DrawOp {
        Clear(Color32),
        Line { width: f32, color: Color32 },
        Disc { center: Pos2, radius: f32, fill: Color32 },
        Ring { radius: f32 },
        Text(String),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<DrawOp>,
    }

    impl RecordingCanvas {
        fn shapes(&self) -> impl Iterator<Item = &DrawOp> {
            self.ops
                .iter()
                .filter(|op| !matches!(op, DrawOp::Clear(_)))
        }

        fn discs(&self) -> Vec<(Pos2, f32, Color32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Disc {
                        center,
                        radius,
                        fill,
                    } => Some((*center, *radius, *fill)),
                    _ => None,
                })
                .collect()
        }

        fn lines(&self) -> Vec<(f32, Color32)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Line { width, color } => Some((*width, *color)),
                    _ => None,
                })
                .collect()
        }

        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    DrawOp::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, color: Color32) {
            self.ops.push(DrawOp::Clear(color));
        }

        fn line(&mut self, _points: [Pos2; 2], stroke: Stroke) {
            self.ops.push(DrawOp::Line {
                width: stroke.width,
                color: stroke.color,
            });
        }

        fn disc(&mut self, center: Pos2, radius: f32, fill: Color32, _outline: Stroke) {
            self.ops.push(DrawOp::Disc {
                center,
                radius,
                fill,
            });
        }

        fn ring(&mut self, _center: Pos2, radius: f32, _stroke: Stroke) {
            self.ops.push(DrawOp::Ring { radius });
        }

        fn text(&mut self, _anchor: Pos2, _align: Align2, text: &str, _size: f32, _color: Color32) {
            self.ops.push(DrawOp::Text(text.to_owned()));
        }
    }

    fn scenario() -> (TopologyGraph, NodePositions) {
        let records: Vec<FlowRecord> = serde_json::from_str(
            r#"[
                {"source": "A:50000", "destination": "B:443", "protocol": "TLS", "risk": "High"},
                {"source": "A:50001", "destination": "C:80", "protocol": "HTTP", "risk": "None"}
            ]"#,
        )
        .unwrap();
        let graph = TopologyGraph::from_flows(&records);
        let positions = rebuild_layout(&graph, &LayoutConfig::default(), 3);
        (graph, positions)
    }

    fn draw(
        graph: &TopologyGraph,
        positions: &NodePositions,
        viewport: &ViewportTransform,
        selection: &Selection,
        theme: Theme,
    ) -> (RecordingCanvas, FrameStats) {
        let mut canvas = RecordingCanvas::default();
        let stats = render_frame(
            &mut canvas,
            &FrameInput {
                graph,
                positions,
                viewport,
                selection,
                theme,
                search_matches: None,
            },
        );
        (canvas, stats)
    }

    fn dark() -> Palette {
        palette(Theme::Dark)
    }

    #[test]
    fn empty_graph_draws_no_shapes() {
        let (canvas, stats) = draw(
            &TopologyGraph::default(),
            &NodePositions::default(),
            &ViewportTransform::default(),
            &Selection::None,
            Theme::Dark,
        );

        assert_eq!(canvas.ops, vec![DrawOp::Clear(dark().background)]);
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn unpositioned_graph_is_skipped() {
        let (graph, _) = scenario();
        let (canvas, stats) = draw(
            &graph,
            &NodePositions::default(),
            &ViewportTransform::default(),
            &Selection::Node("A".to_owned()),
            Theme::Light,
        );

        assert_eq!(canvas.shapes().count(), 0);
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn draws_every_edge_and_node_with_priority_colors() {
        let (graph, positions) = scenario();
        let (canvas, stats) = draw(
            &graph,
            &positions,
            &ViewportTransform::default(),
            &Selection::None,
            Theme::Dark,
        );
        let palette = dark();

        assert_eq!(stats, FrameStats { nodes: 3, edges: 2 });
        assert_eq!(
            canvas.lines(),
            vec![
                (EDGE_WIDTH, palette.edge_vulnerable),
                (EDGE_WIDTH, palette.edge_safe)
            ]
        );

        let fills = canvas
            .discs()
            .into_iter()
            .map(|(_, _, fill)| fill)
            .collect::<Vec<_>>();
        assert_eq!(
            fills,
            vec![palette.node_caution, palette.node_alert, palette.node_server]
        );
        assert_eq!(canvas.texts(), vec!["A", "B", "C"]);
    }

    #[test]
    fn nodes_are_projected_through_viewport() {
        let (graph, positions) = scenario();
        let mut viewport = ViewportTransform::default();
        viewport.zoom_in();
        viewport.pan_by(Vec2::new(-20.0, 35.0));

        let (canvas, _) = draw(&graph, &positions, &viewport, &Selection::None, Theme::Dark);
        let (center, radius, _) = canvas.discs()[0];
        let expected = viewport.world_to_screen(positions.get("A").unwrap());

        assert!((center - expected).length() < 1e-4);
        assert!((radius - NODE_RADIUS * viewport.zoom()).abs() < 1e-4);
    }

    #[test]
    fn selected_node_is_larger() {
        let (graph, positions) = scenario();
        let (canvas, _) = draw(
            &graph,
            &positions,
            &ViewportTransform::default(),
            &Selection::Node("B".to_owned()),
            Theme::Dark,
        );

        let radii = canvas
            .discs()
            .into_iter()
            .map(|(_, radius, _)| radius)
            .collect::<Vec<_>>();
        assert_eq!(radii, vec![NODE_RADIUS, SELECTED_NODE_RADIUS, NODE_RADIUS]);
        assert!(canvas.ops.contains(&DrawOp::Ring {
            radius: SELECTED_NODE_RADIUS + 3.0
        }));
    }

    #[test]
    fn selected_edge_is_heavier_and_labelled() {
        let (graph, positions) = scenario();
        let (canvas, _) = draw(
            &graph,
            &positions,
            &ViewportTransform::default(),
            &Selection::Edge("flow-0".to_owned()),
            Theme::Light,
        );

        let widths = canvas
            .lines()
            .into_iter()
            .map(|(width, _)| width)
            .collect::<Vec<_>>();
        assert_eq!(widths, vec![SELECTED_EDGE_WIDTH, EDGE_WIDTH]);
        assert!(canvas.texts().contains(&"TLS:443"));
        assert!(!canvas.texts().contains(&"HTTP:80"));
    }

    #[test]
    fn theme_changes_colors() {
        let (graph, positions) = scenario();
        let viewport = ViewportTransform::default();
        let (dark, _) = draw(&graph, &positions, &viewport, &Selection::None, Theme::Dark);
        let (light, _) = draw(&graph, &positions, &viewport, &Selection::None, Theme::Light);

        assert_ne!(dark.ops[0], light.ops[0]);
        assert_ne!(dark.lines(), light.lines());
    }

    #[test]
    fn search_dims_non_matches() {
        let (graph, positions) = scenario();
        let matches = HashSet::from(["C".to_owned()]);
        let mut canvas = RecordingCanvas::default();
        render_frame(
            &mut canvas,
            &FrameInput {
                graph: &graph,
                positions: &positions,
                viewport: &ViewportTransform::default(),
                selection: &Selection::None,
                theme: Theme::Dark,
                search_matches: Some(&matches),
            },
        );

        let palette = dark();
        let fills = canvas
            .discs()
            .into_iter()
            .map(|(_, _, fill)| fill)
            .collect::<Vec<_>>();
        assert_eq!(fills[2], palette.node_server);
        assert_eq!(fills[0], dim_color(palette.node_caution, 0.45));
        assert_eq!(
            canvas
                .ops
                .iter()
                .filter(|op| matches!(op, DrawOp::Ring { .. }))
                .count(),
            1
        );
    }
}
