use clap::ValueEnum;

use crate::flow::ReportSource;

pub const DEFAULT_ITERATIONS: usize = 50;
pub const MAX_ITERATIONS: usize = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

/// Startup settings resolved from the command line.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub source: ReportSource,
    pub seed: Option<u64>,
    pub iterations: usize,
    pub theme: Theme,
}

impl ViewerConfig {
    pub fn initial_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed = rand::random();
            log::info!("no layout seed given, using {seed}");
            seed
        })
    }

    pub fn clamped_iterations(&self) -> usize {
        self.iterations.min(MAX_ITERATIONS)
    }
}
