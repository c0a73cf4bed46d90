use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::TryRecvError;

use eframe::egui::{self, Context, Vec2};

use crate::config::{Theme, ViewerConfig};
use crate::flow::ReportSource;

mod graph;
mod physics;
mod render_utils;
mod ui;
mod viewport;

use graph::{
    FrameStats, InteractionController, JobReceiver, Topology, TopologyJob,
    spawn_topology_job,
};
use physics::{LayoutConfig, NodePositions};

pub struct TopologyApp {
    config: ViewerConfig,
    state: AppState,
    pending_rx: Option<JobReceiver>,
}

enum AppState {
    Loading { rx: JobReceiver },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    source: ReportSource,
    topology: Topology,
    positions: NodePositions,
    layout: LayoutConfig,
    seed: u64,
    seed_input: u64,
    controller: InteractionController,
    theme: Theme,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    topology_revision: u64,
    canvas_size: Vec2,
    scroll_accumulator: f32,
    frame_stats: FrameStats,
    last_error: Option<String>,
}

struct SearchMatchCache {
    query: String,
    topology_revision: u64,
    matches: Arc<HashSet<String>>,
}

impl TopologyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let state = Self::start_load(&config);
        Self {
            config,
            state,
            pending_rx: None,
        }
    }

    fn start_load(config: &ViewerConfig) -> AppState {
        let layout = LayoutConfig {
            iterations: config.clamped_iterations(),
            ..LayoutConfig::default()
        };
        let job = TopologyJob::load(config.source.clone(), layout, config.initial_seed());
        AppState::Loading {
            rx: spawn_topology_job(job),
        }
    }
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(laid_out)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            laid_out,
                            &self.config,
                        ))));
                    }
                    Ok(Err(error)) => {
                        log::error!("failed to load {}: {error}", self.config.source);
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background topology worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading {}...", self.config.source));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the scan report");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut job_request = None;
                let is_busy = self.pending_rx.is_some();
                model.show(ctx, &mut job_request, is_busy);

                if let Some(job) = job_request {
                    if is_busy {
                        log::info!("superseding the running topology job");
                    }
                    self.pending_rx = Some(spawn_topology_job(job));
                }

                if let Some(rx) = self.pending_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(laid_out)) => model.apply_topology(laid_out),
                        Ok(Err(error)) => model.report_error(error),
                        Err(TryRecvError::Empty) => {
                            self.pending_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            model.report_error("Background topology worker disconnected".to_owned());
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.pending_rx = None;
            self.state = next_state;
        }
    }
}

