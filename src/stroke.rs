use crate::util::time;
use uuid::Uuid;

/// A committed freehand stroke in page-local coordinates.
///
/// The `d` string is SVG path data (`M x y L x y ...`) accumulated while the
/// gesture ran. `width` is the brush thickness converted to artwork units at
/// capture time, so the stroke keeps its size relative to the page. Strokes
/// are never edited after completion; undo replaces the whole list.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushStroke {
    pub id: String,
    pub d: String,
    pub color: String,
    pub width: f32,
    /// Region the stroke is visually confined to, if one was armed.
    pub clip_path_id: Option<String>,
}

impl BrushStroke {
    pub fn new(d: String, color: String, width: f32, clip_path_id: Option<String>) -> Self {
        Self {
            id: next_stroke_id(),
            d,
            color,
            width,
            clip_path_id,
        }
    }
}

/// Stroke identifiers are time plus randomness, unique within a session.
pub fn next_stroke_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("brush-{}-{}", time::timestamp_millis(), &suffix[..7])
}
