mod collect;
mod demo;
mod graph;
mod parse;
mod record;

pub use collect::{ReportSource, load_scan_report};
pub use graph::{FlowSummary, Node, NodeKind, SelectionDetails, TopologyGraph};
pub use parse::ScanReport;
#[cfg(test)]
pub use record::FlowRecord;
