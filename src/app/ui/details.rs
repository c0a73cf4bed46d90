use eframe::egui::{RichText, Ui};

use crate::flow::SelectionDetails;

use super::super::graph::Selection;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(details) = self.controller.details(&self.topology.graph) else {
            match self.controller.selection() {
                Selection::None => ui.label("Click a host or a flow in the graph."),
                _ => ui.label("Selected element is not part of the current graph."),
            };
            return;
        };

        let mut pending_selection = None;
        match &details {
            SelectionDetails::Node {
                address,
                kind,
                connection_count,
                vulnerable_connection_count,
            } => {
                ui.label(RichText::new(address.as_str()).strong());
                ui.label(format!("Kind: {}", kind.label()));
                ui.label(format!("Connections: {connection_count}"));
                ui.label(format!("Vulnerable connections: {vulnerable_connection_count}"));

                ui.separator();
                ui.label(RichText::new("Flows").strong());
                for edge in self.topology.graph.incident_edges(address) {
                    let peer = if edge.source_id == *address {
                        format!("-> {}", edge.target_id)
                    } else {
                        format!("<- {}", edge.source_id)
                    };
                    let text = format!("{peer}  {}:{}  {}", edge.protocol, edge.port, edge.risk_level.label());
                    if ui.link(text).clicked() {
                        pending_selection = Some(Selection::Edge(edge.id.clone()));
                    }
                }
            }
            SelectionDetails::Edge {
                protocol,
                port,
                risk_level,
                vulnerability_label,
            } => {
                ui.label(RichText::new(format!("{protocol}:{port}")).strong());
                ui.label(format!("Risk: {}", risk_level.label()));
                ui.label(format!("Vulnerability: {vulnerability_label}"));

                let endpoints = self
                    .controller
                    .selection()
                    .edge_id()
                    .and_then(|edge_id| self.topology.graph.edge(edge_id));
                if let Some(edge) = endpoints {
                    ui.separator();
                    ui.horizontal(|ui| {
                        if ui.link(edge.source_id.as_str()).clicked() {
                            pending_selection = Some(Selection::Node(edge.source_id.clone()));
                        }
                        ui.label("->");
                        if ui.link(edge.target_id.as_str()).clicked() {
                            pending_selection = Some(Selection::Node(edge.target_id.clone()));
                        }
                    });
                }
            }
        }

        ui.separator();
        if ui.button("Copy as JSON").clicked() {
            match serde_json::to_string_pretty(&details) {
                Ok(json) => ui.ctx().copy_text(json),
                Err(error) => log::warn!("could not serialize selection details: {error}"),
            }
        }

        if let Some(selection) = pending_selection {
            self.controller.select(selection);
        }
    }
}
