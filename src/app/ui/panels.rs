use eframe::egui::{self, Align, Color32, Context, Layout, RichText, Vec2};

use crate::config::{Theme, ViewerConfig};

use super::super::graph::{FrameStats, InteractionController, LaidOutTopology, TopologyJob};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(laid_out: LaidOutTopology, config: &ViewerConfig) -> Self {
        log::info!(
            "loaded {} hosts and {} flows from {}",
            laid_out.topology.graph.node_count(),
            laid_out.topology.graph.edge_count(),
            config.source
        );

        Self {
            source: config.source.clone(),
            topology: laid_out.topology,
            positions: laid_out.positions,
            layout: laid_out.layout,
            seed: laid_out.seed,
            seed_input: laid_out.seed,
            controller: InteractionController::default(),
            theme: config.theme,
            search: String::new(),
            search_match_cache: None,
            topology_revision: 0,
            canvas_size: Vec2::ZERO,
            scroll_accumulator: 0.0,
            frame_stats: FrameStats::default(),
            last_error: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        job_request: &mut Option<TopologyJob>,
        is_busy: bool,
    ) {
        ctx.set_visuals(match self.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("flow-topology");
                    ui.separator();
                    ui.label(format!("source: {}", self.source));
                    if let Some(scan_type) = &self.topology.scan_type {
                        ui.label(format!("scan: {scan_type}"));
                    }
                    ui.label(format!("hosts: {}", self.topology.graph.node_count()));
                    ui.label(format!("flows: {}", self.topology.graph.edge_count()));
                    if ui.button("Reload report").clicked() {
                        *job_request = Some(self.reload_job());
                    }
                    if is_busy {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(error) = &self.last_error {
                            ui.label(RichText::new(error).color(Color32::from_rgb(232, 72, 72)))
                                .on_hover_text("The previous topology is still shown.");
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui, job_request));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn visible_graph_text(&self) -> String {
        format!(
            "drawn: {} hosts / {} flows  |  zoom {:.0}%",
            self.frame_stats.nodes,
            self.frame_stats.edges,
            self.controller.viewport().zoom() * 100.0
        )
    }
}
