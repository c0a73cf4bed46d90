use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Instant;

use anyhow::Result;
use eframe::egui::{Pos2, Rect};

use crate::flow::{FlowSummary, ReportSource, ScanReport, TopologyGraph, load_scan_report};

use super::super::ViewModel;
use super::super::physics::{LayoutConfig, NodePositions, rebuild_layout};

pub(in crate::app) type JobReceiver = Receiver<Result<LaidOutTopology, String>>;

#[derive(Clone, Debug, Default)]
pub(in crate::app) struct Topology {
    pub(in crate::app) scan_type: Option<String>,
    pub(in crate::app) graph: TopologyGraph,
    pub(in crate::app) summary: FlowSummary,
}

impl Topology {
    fn from_report(report: ScanReport) -> Self {
        let graph = TopologyGraph::from_flows(&report.records);
        let summary = FlowSummary::from_graph(&graph);
        Self {
            scan_type: report.scan_type,
            graph,
            summary,
        }
    }
}

/// A topology together with the one layout computed for it. Handed over
/// whole so the view never sees a partial layout.
#[derive(Debug)]
pub(in crate::app) struct LaidOutTopology {
    pub(in crate::app) topology: Topology,
    pub(in crate::app) positions: NodePositions,
    pub(in crate::app) layout: LayoutConfig,
    pub(in crate::app) seed: u64,
}

enum JobRequest {
    Load(ReportSource),
    Relayout(Topology),
}

pub(in crate::app) struct TopologyJob {
    request: JobRequest,
    layout: LayoutConfig,
    seed: u64,
}

impl TopologyJob {
    pub(in crate::app) fn load(source: ReportSource, layout: LayoutConfig, seed: u64) -> Self {
        Self {
            request: JobRequest::Load(source),
            layout,
            seed,
        }
    }

    pub(in crate::app) fn relayout(topology: Topology, layout: LayoutConfig, seed: u64) -> Self {
        Self {
            request: JobRequest::Relayout(topology),
            layout,
            seed,
        }
    }

    fn run(self) -> Result<LaidOutTopology> {
        let topology = match self.request {
            JobRequest::Load(source) => Topology::from_report(load_scan_report(&source)?),
            JobRequest::Relayout(topology) => topology,
        };

        let started = Instant::now();
        let positions = rebuild_layout(&topology.graph, &self.layout, self.seed);
        log::info!(
            "laid out {} nodes / {} edges in {:.1?} (seed {}, {} iterations)",
            positions.len(),
            topology.graph.edge_count(),
            started.elapsed(),
            self.seed,
            self.layout.iterations
        );

        Ok(LaidOutTopology {
            topology,
            positions,
            layout: self.layout,
            seed: self.seed,
        })
    }
}

/// Runs the job on a worker thread. Dropping the receiver supersedes the
/// job; its result is then discarded.
pub(in crate::app) fn spawn_topology_job(job: TopologyJob) -> JobReceiver {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = job.run().map_err(|error| format!("{error:#}"));
        if tx.send(result).is_err() {
            log::debug!("topology job was superseded, dropping its result");
        }
    });

    rx
}

impl ViewModel {
    pub(in crate::app) fn apply_topology(&mut self, laid_out: LaidOutTopology) {
        self.topology = laid_out.topology;
        self.positions = laid_out.positions;
        self.layout = laid_out.layout;
        self.seed = laid_out.seed;
        self.seed_input = laid_out.seed;
        self.topology_revision += 1;
        self.search_match_cache = None;
        self.last_error = None;
    }

    pub(in crate::app) fn report_error(&mut self, error: String) {
        log::error!("topology update failed: {error}");
        self.last_error = Some(error);
    }

    fn current_layout(&self) -> LayoutConfig {
        let mut layout = self.layout;
        if self.canvas_size.x > 0.0 && self.canvas_size.y > 0.0 {
            layout.bounds = Rect::from_min_size(Pos2::ZERO, self.canvas_size);
        }
        layout
    }

    pub(in crate::app) fn reload_job(&self) -> TopologyJob {
        TopologyJob::load(self.source.clone(), self.current_layout(), self.seed_input)
    }

    pub(in crate::app) fn relayout_job(&self) -> TopologyJob {
        TopologyJob::relayout(self.topology.clone(), self.current_layout(), self.seed_input)
    }
}
