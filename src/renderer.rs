// src/renderer.rs
use std::collections::{HashMap, HashSet};

use egui::{pos2, Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke};
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule as LyonFillRule, FillTessellator, FillVertex,
    VertexBuffers,
};

use crate::canvas::geometry::{self, PageGeometry, RegionOutline};
use crate::canvas::gesture::StrokeSession;
use crate::canvas::transform::CanvasTransform;
use crate::color;
use crate::page::{ColoringPage, FillRule, ViewBox};
use crate::session::ColoringSession;

/// Border width in artwork units for regions that do not declare one.
const DEFAULT_REGION_STROKE: f32 = 1.5;

/// Everything needed to draw one frame of the canvas.
pub struct Scene<'a> {
    pub page: &'a ColoringPage,
    pub geometry: &'a PageGeometry,
    pub session: &'a ColoringSession,
    pub transform: &'a CanvasTransform,
    /// The stroke being drawn right now, rendered unclipped above the rest.
    pub preview: Option<&'a StrokeSession>,
    /// Region highlighted as the clip target for new brush strokes.
    pub armed_region: Option<&'a str>,
}

/// Paints pages into an egui painter.
///
/// Region fills are tessellated once per page in artwork coordinates and
/// cached; only the cheap artwork-to-container vertex mapping runs each
/// frame. Brush stroke flattening is cached per stroke id and pruned when
/// undo or erase drops a stroke.
#[derive(Default)]
pub struct Renderer {
    page_id: Option<String>,
    fills: HashMap<String, VertexBuffers<[f32; 2], u32>>,
    stroke_cache: HashMap<String, Vec<Pos2>>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops cached page data, forcing a rebuild on the next frame. Needed
    /// when a page is replaced under an unchanged id.
    pub fn invalidate(&mut self) {
        self.page_id = None;
        self.fills.clear();
        self.stroke_cache.clear();
    }

    pub fn render(&mut self, painter: &Painter, container: Rect, scene: &Scene<'_>) {
        self.ensure_page(scene.page);

        painter.rect_filled(container, 12.0, color::SURFACE_ALT);
        painter.rect_stroke(container, 12.0, Stroke::new(1.0, color::BORDER));

        let view_box = &scene.page.view_box;

        // Fill and border per region, in document order, so later regions
        // draw over earlier ones just like the source SVG.
        for region in &scene.page.paths {
            let fill = scene
                .session
                .color_map
                .get(&region.id)
                .map(|hex| color::parse_hex_or_surface(hex))
                .unwrap_or(color::SURFACE);
            if let Some(buffers) = self.fills.get(&region.id) {
                painter.add(Shape::mesh(map_fill_mesh(
                    buffers,
                    fill,
                    scene.transform,
                    container,
                    view_box,
                )));
            }
            if let Some(outline) = scene.geometry.outline(&region.id) {
                let width = scene.transform.stroke_screen_width(
                    region.stroke_width.unwrap_or(DEFAULT_REGION_STROKE),
                    container,
                    view_box,
                );
                let stroke = Stroke::new(width, color::BORDER);
                paint_outline(painter, outline, stroke, scene.transform, container, view_box);
            }
        }

        for stroke in &scene.session.brush_strokes {
            let points = self
                .stroke_cache
                .entry(stroke.id.clone())
                .or_insert_with(|| geometry::stroke_points(&stroke.d));
            if points.len() < 2 {
                continue;
            }
            let runs = match stroke
                .clip_path_id
                .as_deref()
                .and_then(|id| scene.geometry.outline(id))
            {
                Some(outline) => geometry::clip_polyline(points, outline),
                None => vec![points.clone()],
            };
            let width = scene
                .transform
                .stroke_screen_width(stroke.width, container, view_box);
            let paint = Stroke::new(width, color::parse_hex_or_surface(&stroke.color));
            for run in runs {
                if run.len() < 2 {
                    continue;
                }
                painter.add(Shape::line(
                    map_points(&run, scene.transform, container, view_box),
                    paint,
                ));
            }
        }

        if let Some(preview) = scene.preview {
            if preview.points.len() >= 2 {
                let width = scene
                    .transform
                    .stroke_screen_width(preview.width, container, view_box);
                let paint = Stroke::new(width, color::parse_hex_or_surface(&preview.color));
                painter.add(Shape::line(
                    map_points(&preview.points, scene.transform, container, view_box),
                    paint,
                ));
            }
        }

        if let Some(outline) = scene.armed_region.and_then(|id| scene.geometry.outline(id)) {
            let stroke = Stroke::new(2.0, color::ACCENT);
            paint_outline(painter, outline, stroke, scene.transform, container, view_box);
        }

        let live: HashSet<&str> = scene
            .session
            .brush_strokes
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        self.stroke_cache.retain(|id, _| live.contains(id.as_str()));
    }

    fn ensure_page(&mut self, page: &ColoringPage) {
        if self.page_id.as_deref() == Some(page.id.as_str()) {
            return;
        }
        self.fills.clear();
        self.stroke_cache.clear();
        for region in &page.paths {
            match geometry::build_path(&region.d) {
                Ok(path) => {
                    if let Some(buffers) =
                        tessellate_region(&path, region.fill_rule.unwrap_or_default())
                    {
                        self.fills.insert(region.id.clone(), buffers);
                    }
                }
                Err(err) => {
                    log::warn!("Not tessellating region {:?}: {}", region.id, err);
                }
            }
        }
        self.page_id = Some(page.id.clone());
    }
}

fn tessellate_region(
    path: &lyon_path::Path,
    rule: FillRule,
) -> Option<VertexBuffers<[f32; 2], u32>> {
    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let options = FillOptions::default()
        .with_tolerance(geometry::FLATTEN_TOLERANCE)
        .with_fill_rule(match rule {
            FillRule::Nonzero => LyonFillRule::NonZero,
            FillRule::Evenodd => LyonFillRule::EvenOdd,
        });
    let mut tessellator = FillTessellator::new();
    let result = tessellator.tessellate_path(
        path.as_slice(),
        &options,
        &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex<'_>| {
            let p = vertex.position();
            [p.x, p.y]
        }),
    );
    match result {
        Ok(()) => Some(buffers),
        Err(err) => {
            log::warn!("Fill tessellation failed: {:?}", err);
            None
        }
    }
}

fn map_fill_mesh(
    buffers: &VertexBuffers<[f32; 2], u32>,
    fill: Color32,
    transform: &CanvasTransform,
    container: Rect,
    view_box: &ViewBox,
) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.vertices.reserve(buffers.vertices.len());
    for v in &buffers.vertices {
        let p = transform.artwork_to_container(pos2(v[0], v[1]), container, view_box);
        mesh.colored_vertex(p, fill);
    }
    mesh.indices.extend_from_slice(&buffers.indices);
    mesh
}

fn paint_outline(
    painter: &Painter,
    outline: &RegionOutline,
    stroke: Stroke,
    transform: &CanvasTransform,
    container: Rect,
    view_box: &ViewBox,
) {
    for ring in &outline.rings {
        if ring.points.len() < 2 {
            continue;
        }
        let mapped = map_points(&ring.points, transform, container, view_box);
        let shape = if ring.closed {
            Shape::closed_line(mapped, stroke)
        } else {
            Shape::line(mapped, stroke)
        };
        painter.add(shape);
    }
}

fn map_points(
    points: &[Pos2],
    transform: &CanvasTransform,
    container: Rect,
    view_box: &ViewBox,
) -> Vec<Pos2> {
    points
        .iter()
        .map(|p| transform.artwork_to_container(*p, container, view_box))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tessellate_square_produces_triangles() {
        let path = geometry::build_path("M 0 0 L 10 0 L 10 10 L 0 10 Z").unwrap();
        let buffers = tessellate_region(&path, FillRule::Nonzero).unwrap();
        assert!(buffers.vertices.len() >= 4);
        assert!(!buffers.indices.is_empty());
        assert_eq!(buffers.indices.len() % 3, 0);
        for v in &buffers.vertices {
            assert!((0.0..=10.0).contains(&v[0]));
            assert!((0.0..=10.0).contains(&v[1]));
        }
    }

    #[test]
    fn test_even_odd_ring_tessellates_around_the_hole() {
        let d = "M 0 0 L 20 0 L 20 20 L 0 20 Z M 5 5 L 15 5 L 15 15 L 5 15 Z";
        let path = geometry::build_path(d).unwrap();
        let buffers = tessellate_region(&path, FillRule::Evenodd).unwrap();
        // A ring needs more triangles than the two a plain square takes.
        assert!(buffers.indices.len() / 3 > 2);
    }
}
