use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::record::FlowRecord;

#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub scan_type: Option<String>,
    pub records: Vec<FlowRecord>,
}

/// Accepts a bare array of flows, the analyzer response object
/// (`{"results": [...]}`) or a single-handshake response (`{"result": {...}}`).
pub(super) fn parse_report_output(raw: &str) -> Result<ScanReport> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in scan report")?;

    match parsed {
        Value::Array(entries) => Ok(ScanReport {
            scan_type: None,
            records: collect_records(&entries),
        }),
        Value::Object(object) => {
            if object.get("status").and_then(Value::as_str) == Some("error") {
                let message = object
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("no error message");
                return Err(anyhow!("scan reported an error: {message}"));
            }

            let scan_type = object
                .get("scan_type")
                .and_then(Value::as_str)
                .map(str::to_owned);

            if let Some(results) = object.get("results") {
                let entries = results
                    .as_array()
                    .ok_or_else(|| anyhow!("invalid results list in scan report"))?;
                return Ok(ScanReport {
                    scan_type,
                    records: collect_records(entries),
                });
            }

            if let Some(result) = object.get("result") {
                let record = FlowRecord::deserialize(result)
                    .context("invalid result entry in scan report")?;
                return Ok(ScanReport {
                    scan_type,
                    records: vec![record],
                });
            }

            if object.contains_key("source") || object.contains_key("destination") {
                let record = FlowRecord::deserialize(Value::Object(object))
                    .context("invalid flow record in scan report")?;
                return Ok(ScanReport {
                    scan_type,
                    records: vec![record],
                });
            }

            Err(anyhow!(
                "could not parse scan report; no flow records found"
            ))
        }
        _ => Err(anyhow!("unexpected JSON type in scan report")),
    }
}

fn collect_records(entries: &[Value]) -> Vec<FlowRecord> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match FlowRecord::deserialize(entry) {
            Ok(record) => records.push(record),
            Err(error) => log::warn!("skipping flow record #{index}: {error}"),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_analyzer_response() {
        let raw = r#"{
            "status": "success",
            "scan_type": "network_demo",
            "session_count": 2,
            "results": [
                {"protocol": "TLS", "risk": "High", "vulnerability_type": "Shor's Algorithm",
                 "algorithm": "RSA", "source": "192.168.1.10:50000",
                 "destination": "93.184.216.34:443", "port": 443, "session_id": "TLS-0"},
                {"source": 17, "destination": "x:1"},
                {"source": "192.168.1.11:50001", "destination": "93.184.216.35:443"}
            ]
        }"#;

        let report = parse_report_output(raw).unwrap();
        assert_eq!(report.scan_type.as_deref(), Some("network_demo"));
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].port, Some(443));
        assert_eq!(report.records[1].risk, None);
    }

    #[test]
    fn parses_bare_array_and_single_result() {
        let array = parse_report_output(r#"[{"source": "a:1", "destination": "b:2"}]"#).unwrap();
        assert_eq!(array.records.len(), 1);
        assert!(array.scan_type.is_none());

        let single = parse_report_output(
            r#"{"status": "success", "scan_type": "tls_handshake",
                "result": {"source": "a:1", "destination": "b:443", "protocol": "TLS"}}"#,
        )
        .unwrap();
        assert_eq!(single.records.len(), 1);
        assert_eq!(single.records[0].protocol.as_deref(), Some("TLS"));
    }

    #[test]
    fn unusable_port_keeps_the_flow() {
        let raw = r#"{"results": [
            {"source": "10.0.0.1:5000", "destination": "10.0.0.2:8443", "port": "443"},
            {"source": "10.0.0.1:5001", "destination": "10.0.0.3:22", "port": "ssh"},
            {"source": "10.0.0.1:5002", "destination": "10.0.0.4:80", "port": -1}
        ]}"#;

        let report = parse_report_output(raw).unwrap();
        assert_eq!(report.records.len(), 3);

        let graph = super::super::TopologyGraph::from_flows(&report.records);
        let ports = graph.edges.iter().map(|edge| edge.port).collect::<Vec<_>>();
        assert_eq!(ports, vec![443, 22, 80]);
        assert_eq!(graph.node_count(), 4);
    }

    #[test]
    fn empty_results_are_not_an_error() {
        let report = parse_report_output(r#"{"status": "success", "results": []}"#).unwrap();
        assert!(report.records.is_empty());
    }

    #[test]
    fn error_status_and_garbage_are_rejected() {
        let error = parse_report_output(r#"{"status": "error", "error": "pcap unreadable"}"#)
            .unwrap_err();
        assert!(error.to_string().contains("pcap unreadable"));

        assert!(parse_report_output("not json").is_err());
        assert!(parse_report_output("42").is_err());
        assert!(parse_report_output(r#"{"status": "success"}"#).is_err());
        assert!(parse_report_output(r#"{"results": {"source": "a:1"}}"#).is_err());
    }
}
