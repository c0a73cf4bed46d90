mod app;
mod config;
mod flow;

use std::path::PathBuf;

use clap::Parser;

use config::{DEFAULT_ITERATIONS, Theme, ViewerConfig};
use flow::ReportSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Scan report (JSON) to visualize; the built-in demo scan is shown when omitted.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Seed for the initial node placement.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ViewerConfig {
        source: args
            .report
            .map(ReportSource::File)
            .unwrap_or(ReportSource::Demo),
        seed: args.seed,
        iterations: args.iterations,
        theme: args.theme,
    };
    log::debug!("starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "flow-topology",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopologyApp::new(cc, config)))),
    )
}
