pub mod geometry;
pub mod gesture;
pub mod transform;

use egui::{vec2, Event, Response, Sense, TouchPhase, Ui, Vec2};

use crate::page::ColoringPage;
use crate::renderer::{Renderer, Scene};
use crate::session::{Action, ColoringSession, Tool};

use geometry::PageGeometry;
use gesture::{GestureContext, GestureController, GestureEvent};
use transform::CanvasTransform;

/// The interactive coloring surface: a square artwork area that owns the
/// zoom/pan transform, recognizes gestures, routes taps to the session,
/// and hands the frame to the renderer.
#[derive(Default)]
pub struct ColoringCanvas {
    transform: CanvasTransform,
    gestures: GestureController,
    /// Region armed as the clip target for new brush strokes, toggled by
    /// tapping in brush mode.
    armed_region: Option<String>,
}

impl ColoringCanvas {
    pub fn show(
        &mut self,
        ui: &mut Ui,
        page: &ColoringPage,
        geometry: &PageGeometry,
        session: &mut ColoringSession,
        renderer: &mut Renderer,
    ) -> Response {
        let side = ui.available_width().min(ui.available_height()).max(0.0);
        let (rect, response) = ui.allocate_exact_size(vec2(side, side), Sense::click_and_drag());

        let touches: Vec<(u64, TouchPhase, egui::Pos2)> = ui.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    Event::Touch {
                        id, phase, pos, ..
                    } => Some((id.0, *phase, *pos)),
                    _ => None,
                })
                .collect()
        });

        {
            let mut ctx = GestureContext {
                container: rect,
                view_box: &page.view_box,
                transform: &mut self.transform,
                tool: session.active_tool,
                brush_color: &session.selected_color,
                brush_width: session.brush_width,
                clip_path_id: self.armed_region.as_deref(),
            };

            for (id, phase, pos) in touches {
                // New fingers only count when they land on the canvas;
                // ongoing gestures may wander outside it.
                if matches!(phase, TouchPhase::Start) && !rect.contains(pos) {
                    continue;
                }
                self.gestures.handle_touch(id, phase, pos, &mut ctx);
            }

            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.gestures.pointer_pressed(pos, &mut ctx);
                }
            }
            if response.dragged() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.gestures.pointer_moved(pos, &mut ctx);
                }
            }
            if response.drag_stopped() {
                self.gestures.pointer_released();
            }
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.gestures.pointer_pressed(pos, &mut ctx);
                    self.gestures.pointer_released();
                }
            }
        }

        // Scroll-wheel zoom and pan for desktop; skipped while fingers are
        // down so a touch pinch is not applied twice.
        if response.hovered() && !self.gestures.touch_active() {
            let (zoom, scroll, hover) =
                ui.input(|i| (i.zoom_delta(), i.raw_scroll_delta, i.pointer.hover_pos()));
            if (zoom - 1.0).abs() > f32::EPSILON {
                self.transform
                    .zoom_about(zoom, hover.unwrap_or_else(|| rect.center()), rect);
            } else if scroll != Vec2::ZERO {
                self.transform.translation += scroll;
                self.transform.constrain(rect);
            }
        }

        for event in self.gestures.take_events() {
            match event {
                GestureEvent::Tap(pos) => {
                    let artwork = self.transform.container_to_artwork(pos, rect, &page.view_box);
                    let hit = geometry.hit_test(artwork).map(str::to_owned);
                    match session.active_tool {
                        Tool::Fill | Tool::Erase => {
                            if let Some(path_id) = hit {
                                session.dispatch(Action::PaintPath { path_id });
                            }
                        }
                        Tool::Eyedropper => {
                            let picked = hit
                                .as_deref()
                                .and_then(|id| session.color_map.get(id))
                                .cloned();
                            if let Some(color) = picked {
                                session.dispatch(Action::SetColor(color));
                            }
                        }
                        Tool::Brush => {
                            // Tap on a region arms it as the clip target;
                            // tap on empty space disarms.
                            self.armed_region = hit;
                        }
                    }
                }
                GestureEvent::StrokeFinished(stroke) => {
                    session.dispatch(Action::AddBrushStroke(stroke));
                }
            }
        }

        let painter = ui.painter_at(rect);
        let scene = Scene {
            page,
            geometry,
            session,
            transform: &self.transform,
            preview: self.gestures.active_stroke(),
            armed_region: self.armed_region.as_deref(),
        };
        renderer.render(&painter, rect, &scene);

        response
    }

    /// Current zoom factor, for the header readout.
    pub fn zoom(&self) -> f32 {
        self.transform.scale
    }

    /// Back to the identity view, dropping any in-flight gesture and the
    /// armed clip target. Called when switching pages.
    pub fn reset_view(&mut self) {
        self.transform = CanvasTransform::default();
        self.gestures.reset();
        self.armed_region = None;
    }
}
