use eframe::egui::Color32;

use crate::config::Theme;
use crate::flow::{Node, NodeKind};

pub(super) const ALERT_RATIO: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Palette {
    pub(super) background: Color32,
    pub(super) edge_safe: Color32,
    pub(super) edge_vulnerable: Color32,
    pub(super) edge_selected: Color32,
    pub(super) node_alert: Color32,
    pub(super) node_caution: Color32,
    pub(super) node_client: Color32,
    pub(super) node_server: Color32,
    pub(super) node_router: Color32,
    pub(super) node_unknown: Color32,
    pub(super) node_outline: Color32,
    pub(super) search_ring: Color32,
    pub(super) label: Color32,
}

pub(super) fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            background: Color32::from_rgb(19, 23, 29),
            edge_safe: Color32::from_rgba_unmultiplied(120, 134, 150, 170),
            edge_vulnerable: Color32::from_rgb(226, 92, 84),
            edge_selected: Color32::from_rgb(245, 206, 93),
            node_alert: Color32::from_rgb(232, 72, 72),
            node_caution: Color32::from_rgb(241, 164, 64),
            node_client: Color32::from_rgb(86, 156, 236),
            node_server: Color32::from_rgb(92, 196, 132),
            node_router: Color32::from_rgb(176, 128, 232),
            node_unknown: Color32::from_rgb(140, 140, 140),
            node_outline: Color32::from_rgba_unmultiplied(15, 15, 15, 190),
            search_ring: Color32::from_rgb(103, 196, 255),
            label: Color32::from_gray(238),
        },
        Theme::Light => Palette {
            background: Color32::from_rgb(246, 247, 249),
            edge_safe: Color32::from_rgba_unmultiplied(96, 108, 122, 170),
            edge_vulnerable: Color32::from_rgb(200, 48, 40),
            edge_selected: Color32::from_rgb(214, 150, 0),
            node_alert: Color32::from_rgb(211, 47, 47),
            node_caution: Color32::from_rgb(237, 137, 0),
            node_client: Color32::from_rgb(33, 110, 206),
            node_server: Color32::from_rgb(46, 150, 86),
            node_router: Color32::from_rgb(130, 80, 200),
            node_unknown: Color32::from_rgb(120, 120, 120),
            node_outline: Color32::from_rgba_unmultiplied(40, 40, 40, 150),
            search_ring: Color32::from_rgb(0, 120, 212),
            label: Color32::from_gray(30),
        },
    }
}

pub(super) fn kind_color(kind: NodeKind, palette: &Palette) -> Color32 {
    match kind {
        NodeKind::Client => palette.node_client,
        NodeKind::Server => palette.node_server,
        NodeKind::Router => palette.node_router,
        NodeKind::Unknown => palette.node_unknown,
    }
}

pub(super) fn node_fill(node: &Node, palette: &Palette) -> Color32 {
    if node.vulnerable_ratio() > ALERT_RATIO {
        palette.node_alert
    } else if node.vulnerable_connection_count > 0 {
        palette.node_caution
    } else {
        kind_color(node.kind, palette)
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}
