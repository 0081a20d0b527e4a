pub mod history;

use std::collections::HashMap;

use crate::stroke::BrushStroke;
use history::{History, HistoryEntry};

pub const DEFAULT_BRUSH_WIDTH: f32 = 8.0;
pub const MIN_BRUSH_WIDTH: f32 = 2.0;
pub const MAX_BRUSH_WIDTH: f32 = 30.0;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Fill,
    Erase,
    Brush,
    Eyedropper,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Fill, Tool::Erase, Tool::Brush, Tool::Eyedropper];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Fill => "Fill",
            Tool::Erase => "Eraser",
            Tool::Brush => "Brush",
            Tool::Eyedropper => "Eyedropper",
        }
    }
}

/// Everything that can happen to a coloring session. The session mutates
/// only through [`ColoringSession::dispatch`], so every state change flows
/// through one place.
#[derive(Debug, Clone)]
pub enum Action {
    SetColor(String),
    SetTool(Tool),
    SetBrushWidth(f32),
    PaintPath { path_id: String },
    AddBrushStroke(BrushStroke),
    Undo,
    Redo,
    Reset,
    ResetWithColor(String),
}

/// Mutable per-page coloring state: region fills, brush strokes, the active
/// tool and color, and a linear undo history of snapshots.
///
/// Tool and color selections are not undoable; paints, strokes, and clears
/// are. Undo and redo restore snapshots without ever shrinking the history,
/// so a full undo walk followed by redos round-trips the state.
#[derive(Debug, Clone)]
pub struct ColoringSession {
    pub selected_color: String,
    pub active_tool: Tool,
    pub color_map: HashMap<String, String>,
    pub brush_strokes: Vec<BrushStroke>,
    pub brush_width: f32,
    history: History,
}

impl Default for ColoringSession {
    fn default() -> Self {
        Self::new("#FFFFFF")
    }
}

impl ColoringSession {
    pub fn new(default_color: &str) -> Self {
        Self::fresh(default_color.to_owned(), DEFAULT_BRUSH_WIDTH)
    }

    fn fresh(selected_color: String, brush_width: f32) -> Self {
        Self {
            selected_color,
            active_tool: Tool::Fill,
            color_map: HashMap::new(),
            brush_strokes: Vec::new(),
            brush_width,
            history: History::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::SetColor(color) => self.selected_color = color,
            Action::SetTool(tool) => self.active_tool = tool,
            Action::SetBrushWidth(width) => self.brush_width = width,
            Action::PaintPath { path_id } => {
                if self.active_tool == Tool::Erase {
                    self.color_map.remove(&path_id);
                } else {
                    self.color_map.insert(path_id, self.selected_color.clone());
                }
                self.snapshot();
            }
            Action::AddBrushStroke(stroke) => {
                self.brush_strokes.push(stroke);
                self.snapshot();
            }
            Action::Undo => {
                if let Some(entry) = self.history.undo() {
                    self.color_map = entry.color_map.clone();
                    self.brush_strokes = entry.brush_strokes.clone();
                }
            }
            Action::Redo => {
                if let Some(entry) = self.history.redo() {
                    self.color_map = entry.color_map.clone();
                    self.brush_strokes = entry.brush_strokes.clone();
                }
            }
            Action::Reset => {
                self.color_map.clear();
                self.brush_strokes.clear();
                self.snapshot();
            }
            Action::ResetWithColor(color) => {
                // Switching pages: a hard reinit that also wipes the
                // history, keeping only the brush width setting.
                *self = Self::fresh(color, self.brush_width);
            }
        }
    }

    fn snapshot(&mut self) {
        self.history.push(HistoryEntry {
            color_map: self.color_map.clone(),
            brush_strokes: self.brush_strokes.clone(),
        });
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selections_do_not_touch_history() {
        let mut session = ColoringSession::new("#FF6B6B");
        session.dispatch(Action::SetColor("#4ECDC4".to_owned()));
        session.dispatch(Action::SetTool(Tool::Brush));
        session.dispatch(Action::SetBrushWidth(12.0));

        assert_eq!(session.selected_color, "#4ECDC4");
        assert_eq!(session.active_tool, Tool::Brush);
        assert_eq!(session.brush_width, 12.0);
        assert_eq!(session.history_len(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_paint_assigns_selected_color_and_snapshots() {
        let mut session = ColoringSession::new("#FF6B6B");
        session.dispatch(Action::PaintPath {
            path_id: "wing".to_owned(),
        });

        assert_eq!(session.color_map.get("wing").unwrap(), "#FF6B6B");
        assert_eq!(session.history_len(), 2);
        assert_eq!(session.history_index(), 1);
    }

    #[test]
    fn test_erase_on_absent_region_still_snapshots() {
        let mut session = ColoringSession::new("#FF6B6B");
        session.dispatch(Action::SetTool(Tool::Erase));
        session.dispatch(Action::PaintPath {
            path_id: "nowhere".to_owned(),
        });

        assert!(session.color_map.is_empty());
        assert_eq!(session.history_len(), 2);
    }

    #[test]
    fn test_reset_is_undoable() {
        let mut session = ColoringSession::new("#FF6B6B");
        session.dispatch(Action::PaintPath {
            path_id: "wing".to_owned(),
        });
        session.dispatch(Action::Reset);
        assert!(session.color_map.is_empty());

        session.dispatch(Action::Undo);
        assert_eq!(session.color_map.get("wing").unwrap(), "#FF6B6B");
    }

    #[test]
    fn test_reset_with_color_reinitializes_but_keeps_brush_width() {
        let mut session = ColoringSession::new("#FF6B6B");
        session.dispatch(Action::SetBrushWidth(20.0));
        session.dispatch(Action::SetTool(Tool::Erase));
        session.dispatch(Action::PaintPath {
            path_id: "wing".to_owned(),
        });
        session.dispatch(Action::ResetWithColor("#F97316".to_owned()));

        assert_eq!(session.selected_color, "#F97316");
        assert_eq!(session.active_tool, Tool::Fill);
        assert!(session.color_map.is_empty());
        assert!(session.brush_strokes.is_empty());
        assert_eq!(session.brush_width, 20.0);
        assert_eq!(session.history_len(), 1);
        assert!(!session.can_undo());
    }
}
