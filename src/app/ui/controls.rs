use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui, vec2};

use crate::config::{MAX_ITERATIONS, Theme};
use crate::flow::NodeKind;

use super::super::graph::TopologyJob;
use super::super::render_utils::{kind_color, palette};
use super::super::ViewModel;

fn legend_swatch(ui: &mut Ui, fill: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().circle_filled(rect.center(), 6.0, fill);
        ui.label(label);
    });
}

fn legend_line(ui: &mut Ui, color: Color32, label: &str) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
        ui.painter().line_segment(
            [rect.left_center(), rect.right_center()],
            Stroke::new(2.0, color),
        );
        ui.label(label);
    });
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, job_request: &mut Option<TopologyJob>) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                self.controller.zoom_in();
            }
            if ui.button("Zoom out").clicked() {
                self.controller.zoom_out();
            }
            if ui.button("Reset view").clicked() {
                self.controller.reset();
            }
        });
        let viewport = self.controller.viewport();
        ui.label(format!(
            "Zoom: {:.0}%  pan: ({:.0}, {:.0})",
            viewport.zoom() * 100.0,
            viewport.pan().x,
            viewport.pan().y
        ));

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Theme");
            for theme in [Theme::Dark, Theme::Light] {
                ui.selectable_value(&mut self.theme, theme, theme.label());
            }
        });

        ui.separator();
        ui.label(RichText::new("Layout").strong());
        ui.horizontal(|ui| {
            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.seed_input));
        });
        ui.add(
            egui::Slider::new(&mut self.layout.iterations, 0..=MAX_ITERATIONS).text("iterations"),
        );
        ui.horizontal(|ui| {
            if ui.button("Re-layout").clicked() {
                *job_request = Some(self.relayout_job());
            }
            if ui.button("Shuffle seed").clicked() {
                self.seed_input = rand::random();
                *job_request = Some(self.relayout_job());
            }
        });
        ui.small(format!("current layout seed: {}", self.seed));

        ui.separator();
        ui.label("Search (address)")
            .on_hover_text("Fuzzy match against host addresses.");
        ui.text_edit_singleline(&mut self.search);
        if let Some(matches) = self.cached_search_matches() {
            ui.small(format!("{} matching hosts", matches.len()));
        }

        ui.separator();
        self.draw_summary(ui);

        ui.separator();
        self.draw_legend(ui);
    }

    fn draw_summary(&self, ui: &mut Ui) {
        let summary = &self.topology.summary;
        ui.label(RichText::new("Summary").strong());
        ui.label(format!("Sessions: {}", summary.session_count));
        ui.label(format!("Vulnerable: {}", summary.vulnerable_count));
        ui.label(format!("Safe: {}", summary.safe_count));

        if summary.protocol_counts.is_empty() {
            return;
        }
        ui.add_space(4.0);
        egui::Grid::new("protocol_counts")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (protocol, count) in &summary.protocol_counts {
                    ui.label(protocol.as_str());
                    ui.label(count.to_string());
                    ui.end_row();
                }
            });
    }

    fn draw_legend(&self, ui: &mut Ui) {
        let palette = palette(self.theme);
        ui.label(RichText::new("Legend").strong());
        for kind in NodeKind::ALL {
            legend_swatch(ui, kind_color(kind, &palette), kind.label());
        }
        legend_swatch(ui, palette.node_caution, "some vulnerable flows");
        legend_swatch(ui, palette.node_alert, "mostly vulnerable flows");
        legend_line(ui, palette.edge_safe, "safe flow");
        legend_line(ui, palette.edge_vulnerable, "vulnerable flow");
    }
}
