use egui::{Pos2, Rect, Vec2};

use crate::page::ViewBox;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 5.0;
/// Extra pan travel allowed past the strictly visible area, in container
/// pixels, so edges can be pulled comfortably into reach.
pub const PAN_SLACK: f32 = 100.0;

/// Zoom and pan applied to the artwork inside its container.
///
/// The transform works in a container-centered space: translation is in
/// container pixels relative to the container center, and scaling happens
/// about that center. Mapping into artwork coordinates then normalizes by
/// the container size and re-anchors at the viewBox center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub scale: f32,
    pub translation: Vec2,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::ZERO,
        }
    }
}

impl CanvasTransform {
    /// Maps a container-space position (e.g. a tap) to artwork coordinates,
    /// undoing pan and zoom before normalizing into the viewBox.
    pub fn container_to_artwork(&self, pos: Pos2, container: Rect, view_box: &ViewBox) -> Pos2 {
        let rel = pos - container.center();
        let unscaled = (rel - self.translation) / self.scale;
        Pos2::new(
            (unscaled.x / container.width()) * view_box.width
                + view_box.width / 2.0
                + view_box.min_x,
            (unscaled.y / container.height()) * view_box.height
                + view_box.height / 2.0
                + view_box.min_y,
        )
    }

    /// Inverse of [`Self::container_to_artwork`].
    pub fn artwork_to_container(&self, pos: Pos2, container: Rect, view_box: &ViewBox) -> Pos2 {
        let unscaled = Vec2::new(
            (pos.x - view_box.min_x - view_box.width / 2.0) / view_box.width * container.width(),
            (pos.y - view_box.min_y - view_box.height / 2.0) / view_box.height
                * container.height(),
        );
        container.center() + unscaled * self.scale + self.translation
    }

    /// Clamps the scale to its bounds and the translation to what keeps the
    /// artwork reachable. At 1x the artwork exactly fills the container, so
    /// the only allowed pan is the slack margin; zooming in earns extra
    /// travel equal to the overflow on each side.
    pub fn constrain(&mut self, container: Rect) {
        if container.width() <= 0.0 || container.height() <= 0.0 {
            return;
        }
        self.scale = self.scale.clamp(MIN_ZOOM, MAX_ZOOM);
        let max_x = ((container.width() * self.scale - container.width()) / 2.0).max(0.0)
            + PAN_SLACK;
        let max_y = ((container.height() * self.scale - container.height()) / 2.0).max(0.0)
            + PAN_SLACK;
        self.translation.x = self.translation.x.clamp(-max_x, max_x);
        self.translation.y = self.translation.y.clamp(-max_y, max_y);
    }

    /// Scales by `factor` while keeping the artwork point under `pivot`
    /// fixed on screen. Used for scroll-wheel zoom.
    pub fn zoom_about(&mut self, factor: f32, pivot: Pos2, container: Rect) {
        let rel = pivot - container.center();
        let target = (self.scale * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = target / self.scale;
        self.translation = rel - (rel - self.translation) * ratio;
        self.scale = target;
        self.constrain(container);
    }

    /// Converts an artwork-unit stroke width to on-screen pixels at the
    /// current zoom.
    pub fn stroke_screen_width(
        &self,
        artwork_width: f32,
        container: Rect,
        view_box: &ViewBox,
    ) -> f32 {
        artwork_width * (average_dimension(container) / view_box_average(view_box)) * self.scale
    }
}

/// Converts a brush width chosen in container pixels to artwork units, so a
/// stroke keeps its size relative to the artwork it was drawn on.
pub fn brush_width_to_artwork(width_px: f32, container: Rect, view_box: &ViewBox) -> f32 {
    width_px * (view_box_average(view_box) / average_dimension(container))
}

fn average_dimension(rect: Rect) -> f32 {
    (rect.width() + rect.height()) / 2.0
}

fn view_box_average(view_box: &ViewBox) -> f32 {
    (view_box.width + view_box.height) / 2.0
}
