use std::path::PathBuf;
use std::sync::Arc;

use egui::{ColorImage, Context, Event, Rect};
#[cfg(not(target_arch = "wasm32"))]
use egui::{UserData, ViewportCommand};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::ExportError;
use crate::util::time;

/// Saves the colored canvas as a PNG so the artwork can be shared.
///
/// The canvas is painted straight into the frame, so the pixels have to
/// come from the backend: a screenshot of the viewport is requested, the
/// backend delivers it as an input event a frame or two later, and the
/// canvas rectangle is cut out of that frame.
#[derive(Default)]
pub struct ArtworkExporter {
    pending: bool,
    canvas_rect: Option<Rect>,
}

impl ArtworkExporter {
    /// Records where the canvas landed this frame, in ui points.
    pub fn note_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    /// True between a capture request and the frame that answers it.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Asks the backend to capture the next frame. The pixels come back
    /// through [`Self::take_screenshot`].
    #[cfg(not(target_arch = "wasm32"))]
    pub fn request_capture(&mut self, ctx: &Context) {
        if self.pending {
            return;
        }
        self.pending = true;
        ctx.send_viewport_cmd(ViewportCommand::Screenshot(UserData::default()));
        log::info!("Requested a canvas capture");
    }

    // Placeholder implementation: the web backend cannot capture frames
    #[cfg(target_arch = "wasm32")]
    pub fn request_capture(&mut self, _ctx: &Context) {
        log::warn!("Artwork export is not supported on WASM");
    }

    /// Picks up the screenshot if the backend delivered one this frame.
    pub fn take_screenshot(&mut self, ctx: &Context) -> Option<Arc<ColorImage>> {
        if !self.pending {
            return None;
        }
        let screenshot = ctx.input(|i| {
            i.events.iter().find_map(|event| match event {
                Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        if screenshot.is_some() {
            self.pending = false;
        }
        screenshot
    }

    /// Cuts the canvas out of a captured frame and writes it to the working
    /// directory as `<page id>-<timestamp>.png`.
    pub fn save(
        &self,
        frame: &ColorImage,
        pixels_per_point: f32,
        page_id: &str,
    ) -> Result<PathBuf, ExportError> {
        let rect = self.canvas_rect.ok_or(ExportError::EmptyCapture)?;
        let canvas = crop_to_rect(frame, rect, pixels_per_point);
        let bytes = encode_png(&canvas)?;

        let name = file_name(page_id);
        let path = std::env::current_dir()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|_| PathBuf::from(&name));
        std::fs::write(&path, bytes).map_err(|source| ExportError::Write {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }
}

/// Cuts a rectangle given in ui points out of a frame of physical pixels.
/// The cut is clamped to the frame, so a canvas touching the window edge
/// cannot read out of range.
fn crop_to_rect(frame: &ColorImage, rect: Rect, pixels_per_point: f32) -> ColorImage {
    let [width, height] = frame.size;
    let clamp_x = |x: f32| ((x * pixels_per_point).round().max(0.0) as usize).min(width);
    let clamp_y = |y: f32| ((y * pixels_per_point).round().max(0.0) as usize).min(height);
    let (left, right) = (clamp_x(rect.min.x), clamp_x(rect.max.x));
    let (top, bottom) = (clamp_y(rect.min.y), clamp_y(rect.max.y));

    let mut pixels = Vec::with_capacity((right - left) * (bottom - top));
    for y in top..bottom {
        let row = y * width;
        pixels.extend_from_slice(&frame.pixels[row + left..row + right]);
    }
    ColorImage {
        size: [right - left, bottom - top],
        pixels,
    }
}

fn encode_png(image: &ColorImage) -> Result<Vec<u8>, ExportError> {
    if image.pixels.is_empty() {
        return Err(ExportError::EmptyCapture);
    }
    let mut raw = Vec::with_capacity(image.pixels.len() * 4);
    for pixel in &image.pixels {
        raw.extend_from_slice(&pixel.to_array());
    }
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        &raw,
        image.size[0] as u32,
        image.size[1] as u32,
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}

fn file_name(page_id: &str) -> String {
    format!("{}-{}.png", page_id, time::timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Color32};

    fn gradient(width: usize, height: usize) -> ColorImage {
        let pixels = (0..width * height)
            .map(|i| Color32::from_rgb((i % 256) as u8, (i / 256) as u8, 7))
            .collect();
        ColorImage {
            size: [width, height],
            pixels,
        }
    }

    #[test]
    fn test_crop_maps_ui_points_to_physical_pixels() {
        let frame = gradient(8, 8);
        let rect = Rect::from_min_max(pos2(1.0, 1.0), pos2(3.0, 2.0));
        let cut = crop_to_rect(&frame, rect, 2.0);
        assert_eq!(cut.size, [4, 2]);
        // Top-left of the cut is frame pixel (2, 2), bottom-right (5, 3).
        assert_eq!(cut.pixels[0], frame.pixels[2 * 8 + 2]);
        assert_eq!(cut.pixels[7], frame.pixels[3 * 8 + 5]);
    }

    #[test]
    fn test_crop_is_clamped_to_the_frame() {
        let frame = gradient(4, 4);
        let rect = Rect::from_min_max(pos2(-10.0, 2.0), pos2(100.0, 100.0));
        let cut = crop_to_rect(&frame, rect, 1.0);
        assert_eq!(cut.size, [4, 2]);
        assert_eq!(cut.pixels[0], frame.pixels[2 * 4]);
    }

    #[test]
    fn test_encode_png_round_trips_the_pixels() {
        let frame = gradient(3, 2);
        let bytes = encode_png(&frame).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, frame.pixels[0].to_array());
        assert_eq!(decoded.get_pixel(2, 1).0, frame.pixels[5].to_array());
    }

    #[test]
    fn test_encode_png_rejects_an_empty_capture() {
        let frame = ColorImage {
            size: [0, 0],
            pixels: Vec::new(),
        };
        assert!(matches!(encode_png(&frame), Err(ExportError::EmptyCapture)));
    }

    #[test]
    fn test_save_requires_a_canvas_rect() {
        let exporter = ArtworkExporter::default();
        let result = exporter.save(&gradient(4, 4), 1.0, "page");
        assert!(matches!(result, Err(ExportError::EmptyCapture)));
    }

    #[test]
    fn test_export_file_name_carries_the_page_id() {
        let name = file_name("butterfly-aurora");
        assert!(name.starts_with("butterfly-aurora-"));
        assert!(name.ends_with(".png"));
    }
}
