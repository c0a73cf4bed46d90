use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::demo::demo_flow_records;
use super::parse::{ScanReport, parse_report_output};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportSource {
    Demo,
    File(PathBuf),
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Demo => f.write_str("demo scan"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub fn load_scan_report(source: &ReportSource) -> Result<ScanReport> {
    let report = match source {
        ReportSource::Demo => ScanReport {
            scan_type: Some("network_demo".to_owned()),
            records: demo_flow_records(),
        },
        ReportSource::File(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read scan report {}", path.display()))?;
            parse_report_output(&raw)
                .with_context(|| format!("failed to parse scan report {}", path.display()))?
        }
    };

    log::info!(
        "loaded {} flow records from {source} (scan type: {})",
        report.records.len(),
        report.scan_type.as_deref().unwrap_or("unspecified")
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_report_from_file() {
        let path = std::env::temp_dir().join(format!(
            "flow_topology_report_{}.json",
            std::process::id()
        ));
        fs::write(
            &path,
            r#"{"results": [{"source": "a:1", "destination": "b:443", "risk": "High"}]}"#,
        )
        .expect("write temp report");

        let report = load_scan_report(&ReportSource::File(path.clone())).unwrap();
        assert_eq!(report.records.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("/nonexistent/flow-topology/report.json");
        let error = load_scan_report(&ReportSource::File(path)).unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/flow-topology/report.json"));
    }

    #[test]
    fn demo_source_is_never_empty() {
        let report = load_scan_report(&ReportSource::Demo).unwrap();
        assert!(!report.records.is_empty());
    }
}
