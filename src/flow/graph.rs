use std::collections::HashMap;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

use super::record::{Endpoint, FlowRecord, RiskLevel};

pub const DEFAULT_PROTOCOL: &str = "Unknown";
pub const DEFAULT_VULNERABILITY: &str = "None";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Client,
    Server,
    Router,
    Unknown,
}

impl NodeKind {
    pub const ALL: [Self; 4] = [Self::Client, Self::Server, Self::Router, Self::Unknown];

    pub fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
            Self::Router => "router",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub connection_count: u32,
    pub vulnerable_connection_count: u32,
}

impl Node {
    fn new(address: &str, kind: NodeKind) -> Self {
        Self {
            id: address.to_owned(),
            kind,
            label: address.to_owned(),
            connection_count: 0,
            vulnerable_connection_count: 0,
        }
    }

    pub fn vulnerable_ratio(&self) -> f32 {
        if self.connection_count == 0 {
            0.0
        } else {
            self.vulnerable_connection_count as f32 / self.connection_count as f32
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub protocol: String,
    pub port: u16,
    pub is_vulnerable: bool,
    pub risk_level: RiskLevel,
    pub vulnerability_label: String,
}

impl Edge {
    pub fn is_incident_to(&self, node_id: &str) -> bool {
        self.source_id == node_id || self.target_id == node_id
    }
}

/// Payload shown (and copied) for the current selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectionDetails {
    Node {
        address: String,
        kind: NodeKind,
        connection_count: u32,
        vulnerable_connection_count: u32,
    },
    Edge {
        protocol: String,
        port: u16,
        risk_level: RiskLevel,
        vulnerability_label: String,
    },
}

#[derive(Clone, Debug, Default)]
pub struct TopologyGraph {
    pub nodes: IndexMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl TopologyGraph {
    /// Builds the graph from scratch. Nodes keep first-encounter order and
    /// their kind is decided by the role they were first seen in.
    pub fn from_flows(records: &[FlowRecord]) -> Self {
        let mut nodes: IndexMap<String, Node> = IndexMap::new();
        let mut edges = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let source = Endpoint::parse_or_unknown(record.source.as_deref());
            let destination = Endpoint::parse_or_unknown(record.destination.as_deref());
            let risk_level = record.risk_level();
            let is_vulnerable = risk_level.is_vulnerable();

            touch_node(&mut nodes, &source.address, NodeKind::Client, is_vulnerable);
            if destination.address != source.address {
                touch_node(&mut nodes, &destination.address, NodeKind::Server, is_vulnerable);
            }

            let port = record
                .port
                .and_then(|port| u16::try_from(port).ok())
                .unwrap_or(destination.port);

            edges.push(Edge {
                id: format!("flow-{index}"),
                source_id: source.address,
                target_id: destination.address,
                protocol: non_empty_or(record.protocol.as_deref(), DEFAULT_PROTOCOL),
                port,
                is_vulnerable,
                risk_level,
                vulnerability_label: non_empty_or(
                    record.vulnerability_type.as_deref(),
                    DEFAULT_VULNERABILITY,
                ),
            });
        }

        Self { nodes, edges }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.is_incident_to(node_id))
    }

    pub fn node_details(&self, id: &str) -> Option<SelectionDetails> {
        self.nodes.get(id).map(|node| SelectionDetails::Node {
            address: node.id.clone(),
            kind: node.kind,
            connection_count: node.connection_count,
            vulnerable_connection_count: node.vulnerable_connection_count,
        })
    }

    pub fn edge_details(&self, id: &str) -> Option<SelectionDetails> {
        self.edge(id).map(|edge| SelectionDetails::Edge {
            protocol: edge.protocol.clone(),
            port: edge.port,
            risk_level: edge.risk_level,
            vulnerability_label: edge.vulnerability_label.clone(),
        })
    }
}

fn touch_node(
    nodes: &mut IndexMap<String, Node>,
    address: &str,
    kind_if_new: NodeKind,
    is_vulnerable: bool,
) {
    let node = match nodes.entry(address.to_owned()) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => entry.insert(Node::new(address, kind_if_new)),
    };

    node.connection_count += 1;
    if is_vulnerable {
        node.vulnerable_connection_count += 1;
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_owned()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlowSummary {
    pub session_count: usize,
    pub vulnerable_count: usize,
    pub safe_count: usize,
    pub protocol_counts: Vec<(String, usize)>,
}

impl FlowSummary {
    pub fn from_graph(graph: &TopologyGraph) -> Self {
        let session_count = graph.edge_count();
        let vulnerable_count = graph.edges.iter().filter(|edge| edge.is_vulnerable).count();

        let mut by_protocol: HashMap<&str, usize> = HashMap::new();
        for edge in &graph.edges {
            *by_protocol.entry(edge.protocol.as_str()).or_default() += 1;
        }

        let mut protocol_counts = by_protocol
            .into_iter()
            .map(|(protocol, count)| (protocol.to_owned(), count))
            .collect::<Vec<_>>();
        protocol_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            session_count,
            vulnerable_count,
            safe_count: session_count - vulnerable_count,
            protocol_counts,
        }
    }
}
