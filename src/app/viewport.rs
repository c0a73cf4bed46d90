use eframe::egui::{Pos2, Vec2};

pub(in crate::app) const MIN_ZOOM: f32 = 0.2;
pub(in crate::app) const MAX_ZOOM: f32 = 5.0;
const ZOOM_STEP: f32 = 1.2;

/// Scale + translate between layout (world) coordinates and canvas-local
/// screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewportTransform {
    zoom: f32,
    pan: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub(in crate::app) fn zoom(&self) -> f32 {
        self.zoom
    }

    pub(in crate::app) fn pan(&self) -> Vec2 {
        self.pan
    }

    pub(in crate::app) fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (world * self.zoom + self.pan).to_pos2()
    }

    pub(in crate::app) fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.pan) / self.zoom
    }

    pub(in crate::app) fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub(in crate::app) fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub(in crate::app) fn reset(&mut self) {
        *self = Self::default();
    }
}
