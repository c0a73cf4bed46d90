use super::record::FlowRecord;

struct DemoFlow {
    protocol: &'static str,
    risk: &'static str,
    vulnerability: Option<&'static str>,
    destination_host: &'static str,
    port: u16,
}

const DEMO_FLOWS: &[DemoFlow] = &[
    DemoFlow {
        protocol: "TLS",
        risk: "High",
        vulnerability: Some("Shor's Algorithm"),
        destination_host: "93.184.216.34",
        port: 443,
    },
    DemoFlow {
        protocol: "TLS",
        risk: "Medium",
        vulnerability: Some("Shor's Algorithm"),
        destination_host: "93.184.216.35",
        port: 443,
    },
    DemoFlow {
        protocol: "TLS",
        risk: "Low",
        vulnerability: Some("Grover's Algorithm"),
        destination_host: "93.184.216.34",
        port: 443,
    },
    DemoFlow {
        protocol: "SSH",
        risk: "High",
        vulnerability: Some("Shor's Algorithm"),
        destination_host: "10.0.0.5",
        port: 22,
    },
    DemoFlow {
        protocol: "IKE",
        risk: "Medium",
        vulnerability: Some("Shor's Algorithm"),
        destination_host: "10.0.0.1",
        port: 500,
    },
    DemoFlow {
        protocol: "HTTP",
        risk: "None",
        vulnerability: None,
        destination_host: "10.0.0.80",
        port: 80,
    },
    DemoFlow {
        protocol: "TLS",
        risk: "None",
        vulnerability: None,
        destination_host: "10.0.0.80",
        port: 8443,
    },
];

/// Synthetic scan used when no report is given: a handful of LAN clients
/// talking to a few servers, plus one flow whose source the capture could
/// not attribute.
pub(super) fn demo_flow_records() -> Vec<FlowRecord> {
    let mut records = DEMO_FLOWS
        .iter()
        .enumerate()
        .map(|(index, flow)| FlowRecord {
            source: Some(format!("192.168.1.{}:{}", 10 + (index % 4), 50000 + index)),
            destination: Some(format!("{}:{}", flow.destination_host, flow.port)),
            protocol: Some(flow.protocol.to_owned()),
            risk: Some(flow.risk.to_owned()),
            vulnerability_type: flow.vulnerability.map(str::to_owned),
            port: Some(u64::from(flow.port)),
        })
        .collect::<Vec<_>>();

    records.push(FlowRecord {
        source: Some("Unknown".to_owned()),
        destination: Some("10.0.0.5:22".to_owned()),
        protocol: Some("SSH".to_owned()),
        risk: Some("Low".to_owned()),
        vulnerability_type: None,
        port: None,
    });

    records
}
