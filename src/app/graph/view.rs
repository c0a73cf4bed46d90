use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, Event, FontId, Painter, PointerButton, Pos2, Rect, Sense, Stroke, Ui,
    Vec2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::render_utils::palette;
use super::super::{SearchMatchCache, ViewModel};
use super::interaction::{Selection, hit_test};
use super::render::{Canvas, FrameInput, render_frame};

const SCROLL_PER_ZOOM_STEP: f32 = 40.0;

struct PainterCanvas<'a> {
    painter: &'a Painter,
    origin: Vec2,
}

impl Canvas for PainterCanvas<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, color);
    }

    fn line(&mut self, points: [Pos2; 2], stroke: Stroke) {
        self.painter
            .line_segment([points[0] + self.origin, points[1] + self.origin], stroke);
    }

    fn disc(&mut self, center: Pos2, radius: f32, fill: Color32, outline: Stroke) {
        self.painter.circle_filled(center + self.origin, radius, fill);
        self.painter.circle_stroke(center + self.origin, radius, outline);
    }

    fn ring(&mut self, center: Pos2, radius: f32, stroke: Stroke) {
        self.painter.circle_stroke(center + self.origin, radius, stroke);
    }

    fn text(&mut self, anchor: Pos2, align: Align2, text: &str, size: f32, color: Color32) {
        self.painter.text(
            anchor + self.origin,
            align,
            text,
            FontId::proportional(size),
            color,
        );
    }
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<String>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.topology_revision == self.topology_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .topology
            .graph
            .nodes
            .keys()
            .filter(|address| fuzzy_match_score(&matcher, address, query).is_some())
            .cloned()
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            topology_revision: self.topology_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    /// Feeds raw pointer events to the controller in arrival order, so a
    /// press, drag and release within one frame still pan correctly.
    fn forward_pointer_events(&mut self, ui: &Ui, rect: Rect) {
        let origin = rect.min.to_vec2();
        let events = ui.input(|input| input.events.clone());

        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    ..
                } if rect.contains(pos) => {
                    self.controller
                        .pointer_down(pos - origin, &self.topology.graph, &self.positions);
                }
                Event::PointerButton {
                    button: PointerButton::Primary,
                    pressed: false,
                    ..
                } => self.controller.pointer_up(),
                Event::PointerMoved(pos) if rect.contains(pos) => {
                    self.controller.pointer_move(pos - origin);
                }
                Event::PointerMoved(_) | Event::PointerGone => self.controller.pointer_leave(),
                _ => {}
            }
        }
    }

    fn handle_scroll_zoom(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            self.scroll_accumulator = 0.0;
            return;
        }

        self.scroll_accumulator += ui.input(|input| input.raw_scroll_delta.y);
        while self.scroll_accumulator >= SCROLL_PER_ZOOM_STEP {
            self.controller.zoom_in();
            self.scroll_accumulator -= SCROLL_PER_ZOOM_STEP;
        }
        while self.scroll_accumulator <= -SCROLL_PER_ZOOM_STEP {
            self.controller.zoom_out();
            self.scroll_accumulator += SCROLL_PER_ZOOM_STEP;
        }
    }

    fn update_cursor(&self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if self.controller.is_dragging() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
            return;
        }

        let Some(hover) = response.hover_pos() else {
            return;
        };
        let world = self
            .controller
            .viewport()
            .screen_to_world(hover - rect.min.to_vec2());
        if hit_test(world, &self.topology.graph, &self.positions) != Selection::None {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_size = rect.size();

        self.forward_pointer_events(ui, rect);
        self.handle_scroll_zoom(ui, &response);
        self.update_cursor(ui, rect, &response);

        let search_matches = self.cached_search_matches();
        let painter = ui.painter_at(rect);
        let mut canvas = PainterCanvas {
            painter: &painter,
            origin: rect.min.to_vec2(),
        };
        self.frame_stats = render_frame(
            &mut canvas,
            &FrameInput {
                graph: &self.topology.graph,
                positions: &self.positions,
                viewport: self.controller.viewport(),
                selection: self.controller.selection(),
                theme: self.theme,
                search_matches: search_matches.as_deref(),
            },
        );

        if self.topology.graph.is_empty() {
            let color = palette(self.theme).label;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No network flows in this scan",
                FontId::proportional(18.0),
                color,
            );
            painter.text(
                rect.center() + vec2(0.0, 24.0),
                Align2::CENTER_CENTER,
                "Load a report with source/destination flow records.",
                FontId::proportional(13.0),
                color,
            );
        }

        if self.controller.is_dragging() {
            ui.ctx().request_repaint();
        }
    }
}
