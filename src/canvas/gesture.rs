use std::collections::HashMap;
use std::fmt::Write as _;

use egui::{pos2, Pos2, Rect, TouchPhase, Vec2};

use crate::page::ViewBox;
use crate::session::Tool;
use crate::stroke::BrushStroke;

use super::transform::{self, CanvasTransform};

/// Tuning knobs for gesture recognition.
#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// Maximum travel in container pixels for a press to still count as a tap.
    pub tap_slop: f32,
    /// Minimum initial finger spread for a pinch to produce scale changes.
    pub min_pinch_spread: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 5.0,
            min_pinch_spread: 1.0,
        }
    }
}

/// Everything the gesture controller needs from the canvas for one event:
/// where the artwork sits, the transform to steer, and the brush settings
/// to capture into a new stroke.
pub struct GestureContext<'a> {
    pub container: Rect,
    pub view_box: &'a ViewBox,
    pub transform: &'a mut CanvasTransform,
    pub tool: Tool,
    pub brush_color: &'a str,
    pub brush_width: f32,
    pub clip_path_id: Option<&'a str>,
}

/// A recognized gesture, reported once it completes.
#[derive(Debug)]
pub enum GestureEvent {
    /// A press that released within the tap slop, in container coordinates.
    Tap(Pos2),
    /// A finished brush stroke, already in artwork coordinates.
    StrokeFinished(BrushStroke),
}

/// An in-progress brush stroke accumulated in artwork coordinates. The `d`
/// string grows one `L` command per sampled point; nothing is committed
/// until the finger lifts.
#[derive(Debug, Clone)]
pub struct StrokeSession {
    pub d: String,
    pub points: Vec<Pos2>,
    pub color: String,
    pub width: f32,
    pub clip_path_id: Option<String>,
}

impl StrokeSession {
    fn begin(at: Pos2, color: String, width: f32, clip_path_id: Option<String>) -> Self {
        Self {
            d: format!("M {} {}", at.x, at.y),
            points: vec![at],
            color,
            width,
            clip_path_id,
        }
    }

    fn extend(&mut self, to: Pos2) {
        if self.points.last() == Some(&to) {
            return;
        }
        let _ = write!(self.d, " L {} {}", to.x, to.y);
        self.points.push(to);
    }

    fn finish(self) -> BrushStroke {
        BrushStroke::new(self.d, self.color, self.width, self.clip_path_id)
    }
}

#[derive(Debug, Clone, Copy)]
struct PinchSession {
    initial_distance: f32,
    start_midpoint: Pos2,
    start_scale: f32,
    start_translation: Vec2,
}

#[derive(Debug)]
enum GestureState {
    Idle,
    /// One pointer down. Stays a tap candidate until it travels past the
    /// slop, then becomes a pan (or a brush stroke in brush mode).
    SinglePointer {
        /// Touch id driving this gesture, or `None` for the mouse.
        pointer_id: Option<u64>,
        origin: Pos2,
        max_travel: f32,
        start_translation: Vec2,
        stroke: Option<StrokeSession>,
    },
    /// Two fingers down. The pinch owns the interaction until every finger
    /// lifts; a remaining single finger cannot start a new gesture.
    Pinch(PinchSession),
}

#[derive(Debug, Clone, Copy)]
struct TouchRecord {
    pos: Pos2,
    active: bool,
}

/// Turns raw touch and pointer input into taps, brush strokes, pans, and
/// pinches. Pans and pinches steer the transform directly; taps and
/// finished strokes are queued as [`GestureEvent`]s for the caller.
pub struct GestureController {
    config: GestureConfig,
    state: GestureState,
    touches: HashMap<u64, TouchRecord>,
    events: Vec<GestureEvent>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            touches: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn handle_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        pos: Pos2,
        ctx: &mut GestureContext<'_>,
    ) {
        match phase {
            TouchPhase::Start => {
                self.touches.insert(id, TouchRecord { pos, active: true });
                match self.active_touch_count() {
                    1 => self.begin_single(Some(id), pos, ctx),
                    2 => self.begin_pinch(ctx),
                    // Extra fingers never steal an ongoing pinch.
                    _ => {}
                }
            }
            TouchPhase::Move => {
                if let Some(record) = self.touches.get_mut(&id) {
                    record.pos = pos;
                }
                if self.owns_single_pointer(id) {
                    self.single_moved(pos, ctx);
                } else if matches!(self.state, GestureState::Pinch(_)) {
                    self.pinch_moved(ctx);
                }
            }
            TouchPhase::End => {
                if let Some(record) = self.touches.get_mut(&id) {
                    record.pos = pos;
                    record.active = false;
                }
                if self.owns_single_pointer(id) {
                    self.single_released();
                }
                if self.active_touch_count() == 0 {
                    self.touches.clear();
                    self.state = GestureState::Idle;
                }
            }
            TouchPhase::Cancel => {
                self.touches.remove(&id);
                self.state = GestureState::Idle;
            }
        }
    }

    /// Mouse press fallback. Ignored while any touch gesture is live so
    /// emulated pointer events cannot double-drive a gesture.
    pub fn pointer_pressed(&mut self, pos: Pos2, ctx: &mut GestureContext<'_>) {
        if self.touch_active() || !matches!(self.state, GestureState::Idle) {
            return;
        }
        self.begin_single(None, pos, ctx);
    }

    pub fn pointer_moved(&mut self, pos: Pos2, ctx: &mut GestureContext<'_>) {
        if matches!(
            &self.state,
            GestureState::SinglePointer {
                pointer_id: None,
                ..
            }
        ) {
            self.single_moved(pos, ctx);
        }
    }

    pub fn pointer_released(&mut self) {
        if matches!(
            &self.state,
            GestureState::SinglePointer {
                pointer_id: None,
                ..
            }
        ) {
            self.single_released();
        }
    }

    /// Queued gestures since the last call.
    pub fn take_events(&mut self) -> Vec<GestureEvent> {
        std::mem::take(&mut self.events)
    }

    /// The stroke being drawn right now, once it is past the tap slop.
    pub fn active_stroke(&self) -> Option<&StrokeSession> {
        match &self.state {
            GestureState::SinglePointer {
                stroke: Some(stroke),
                max_travel,
                ..
            } if *max_travel > self.config.tap_slop => Some(stroke),
            _ => None,
        }
    }

    /// True while any finger is down. The canvas uses this to keep frame
    /// level zoom/scroll input from fighting an active touch gesture.
    pub fn touch_active(&self) -> bool {
        self.active_touch_count() > 0
    }

    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.touches.clear();
        self.events.clear();
    }

    fn begin_single(&mut self, pointer_id: Option<u64>, pos: Pos2, ctx: &mut GestureContext<'_>) {
        let stroke = if ctx.tool == Tool::Brush {
            let at = ctx
                .transform
                .container_to_artwork(pos, ctx.container, ctx.view_box);
            let width =
                transform::brush_width_to_artwork(ctx.brush_width, ctx.container, ctx.view_box);
            Some(StrokeSession::begin(
                at,
                ctx.brush_color.to_owned(),
                width,
                ctx.clip_path_id.map(str::to_owned),
            ))
        } else {
            None
        };
        self.state = GestureState::SinglePointer {
            pointer_id,
            origin: pos,
            max_travel: 0.0,
            start_translation: ctx.transform.translation,
            stroke,
        };
    }

    fn begin_pinch(&mut self, ctx: &mut GestureContext<'_>) {
        // The second finger discards any stroke in progress and converts a
        // pan into a pinch seeded from the current transform.
        let positions = self.active_positions();
        if positions.len() != 2 {
            return;
        }
        self.state = GestureState::Pinch(PinchSession {
            initial_distance: (positions[1] - positions[0]).length(),
            start_midpoint: midpoint(positions[0], positions[1]),
            start_scale: ctx.transform.scale,
            start_translation: ctx.transform.translation,
        });
    }

    fn single_moved(&mut self, pos: Pos2, ctx: &mut GestureContext<'_>) {
        let GestureState::SinglePointer {
            origin,
            max_travel,
            start_translation,
            stroke,
            ..
        } = &mut self.state
        else {
            return;
        };
        *max_travel = (*max_travel).max((pos - *origin).length());
        if *max_travel <= self.config.tap_slop {
            return;
        }
        if let Some(stroke) = stroke {
            let at = ctx
                .transform
                .container_to_artwork(pos, ctx.container, ctx.view_box);
            stroke.extend(at);
        } else {
            ctx.transform.translation = *start_translation + (pos - *origin);
            ctx.transform.constrain(ctx.container);
        }
    }

    fn single_released(&mut self) {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let GestureState::SinglePointer {
            origin,
            max_travel,
            stroke,
            ..
        } = state
        else {
            return;
        };
        if max_travel <= self.config.tap_slop {
            self.events.push(GestureEvent::Tap(origin));
            return;
        }
        if let Some(stroke) = stroke {
            if stroke.points.len() >= 2 {
                self.events.push(GestureEvent::StrokeFinished(stroke.finish()));
            }
        }
    }

    fn pinch_moved(&mut self, ctx: &mut GestureContext<'_>) {
        let positions = self.active_positions();
        if positions.len() != 2 {
            return;
        }
        let GestureState::Pinch(session) = &self.state else {
            return;
        };
        if session.initial_distance < self.config.min_pinch_spread {
            return;
        }
        let k = (positions[1] - positions[0]).length() / session.initial_distance;
        if !k.is_finite() || k <= 0.0 {
            return;
        }
        let drift = midpoint(positions[0], positions[1]) - session.start_midpoint;
        ctx.transform.scale = session.start_scale * k;
        ctx.transform.translation = session.start_translation - drift * (1.0 - 1.0 / k);
        ctx.transform.constrain(ctx.container);
    }

    fn owns_single_pointer(&self, id: u64) -> bool {
        matches!(
            &self.state,
            GestureState::SinglePointer {
                pointer_id: Some(pid),
                ..
            } if *pid == id
        )
    }

    fn active_touch_count(&self) -> usize {
        self.touches.values().filter(|t| t.active).count()
    }

    fn active_positions(&self) -> Vec<Pos2> {
        self.touches
            .values()
            .filter(|t| t.active)
            .map(|t| t.pos)
            .collect()
    }
}

fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    pos2((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}
