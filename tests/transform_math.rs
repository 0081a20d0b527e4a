use egui::{pos2, vec2, Pos2, Rect, TouchPhase, Vec2};
use tintbook::canvas::gesture::{GestureContext, GestureController};
use tintbook::canvas::transform::{self, CanvasTransform, MAX_ZOOM, MIN_ZOOM, PAN_SLACK};
use tintbook::{Tool, ViewBox};

fn container() -> Rect {
    Rect::from_min_size(pos2(100.0, 50.0), vec2(300.0, 300.0))
}

fn view_box() -> ViewBox {
    "0 0 300 300".parse().unwrap()
}

fn assert_pos_eq(a: Pos2, b: Pos2) {
    assert!(
        (a.x - b.x).abs() < 0.001 && (a.y - b.y).abs() < 0.001,
        "{a:?} != {b:?}"
    );
}

#[test]
fn test_identity_maps_container_corners_to_view_box_corners() {
    let transform = CanvasTransform::default();
    let rect = container();
    let vb = view_box();

    assert_pos_eq(
        transform.container_to_artwork(rect.center(), rect, &vb),
        pos2(150.0, 150.0),
    );
    assert_pos_eq(
        transform.container_to_artwork(rect.min, rect, &vb),
        pos2(0.0, 0.0),
    );
    assert_pos_eq(
        transform.container_to_artwork(rect.max, rect, &vb),
        pos2(300.0, 300.0),
    );
}

#[test]
fn test_offset_view_box_shifts_the_mapping() {
    let transform = CanvasTransform::default();
    let rect = container();
    let vb: ViewBox = "10 20 300 300".parse().unwrap();

    // The container center lands on the viewBox center
    assert_pos_eq(
        transform.container_to_artwork(rect.center(), rect, &vb),
        pos2(160.0, 170.0),
    );
}

#[test]
fn test_zoomed_and_panned_mapping_follows_the_inverse_order() {
    let transform = CanvasTransform {
        scale: 2.0,
        translation: vec2(40.0, -30.0),
    };
    let rect = container();
    let vb = view_box();

    // Walk the forward math by hand for one point
    let pos = pos2(280.0, 170.0);
    let rel = pos - rect.center(); // (30, -30)
    let unscaled = (rel - transform.translation) / transform.scale; // (-5, 0)
    let expected = pos2(
        unscaled.x / 300.0 * 300.0 + 150.0,
        unscaled.y / 300.0 * 300.0 + 150.0,
    );

    assert_pos_eq(transform.container_to_artwork(pos, rect, &vb), expected);
}

#[test]
fn test_artwork_container_round_trip() {
    let transform = CanvasTransform {
        scale: 3.2,
        translation: vec2(-55.0, 120.0),
    };
    let rect = container();
    let vb = view_box();

    for &p in &[
        pos2(0.0, 0.0),
        pos2(150.0, 150.0),
        pos2(299.0, 1.0),
        pos2(42.5, 260.25),
    ] {
        let there = transform.artwork_to_container(p, rect, &vb);
        let back = transform.container_to_artwork(there, rect, &vb);
        assert_pos_eq(back, p);
    }
}

#[test]
fn test_constrain_clamps_scale_and_translation() {
    let rect = container();

    let mut transform = CanvasTransform {
        scale: 9.0,
        translation: Vec2::ZERO,
    };
    transform.constrain(rect);
    assert!((transform.scale - MAX_ZOOM).abs() < 0.001);

    transform.scale = 0.1;
    transform.constrain(rect);
    assert!((transform.scale - MIN_ZOOM).abs() < 0.001);

    // At minimum zoom there is no overflow, so only the slack is allowed
    transform.translation = vec2(500.0, -500.0);
    transform.constrain(rect);
    assert!((transform.translation.x - PAN_SLACK).abs() < 0.001);
    assert!((transform.translation.y + PAN_SLACK).abs() < 0.001);

    // Zooming to 2x earns half a container of extra travel per side
    transform.scale = 2.0;
    transform.translation = vec2(-10_000.0, 0.0);
    transform.constrain(rect);
    assert!((transform.translation.x + (150.0 + PAN_SLACK)).abs() < 0.001);
}

#[test]
fn test_constrain_ignores_an_empty_container() {
    let mut transform = CanvasTransform {
        scale: 50.0,
        translation: vec2(9999.0, 9999.0),
    };
    transform.constrain(Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 0.0)));

    // Nothing to clamp against, nothing changed
    assert!((transform.scale - 50.0).abs() < 0.001);
}

#[test]
fn test_zoom_about_keeps_the_pivot_fixed() {
    let mut transform = CanvasTransform::default();
    let rect = container();
    let vb = view_box();
    let pivot = pos2(180.0, 120.0);

    let before = transform.container_to_artwork(pivot, rect, &vb);
    transform.zoom_about(1.5, pivot, rect);
    let after = transform.container_to_artwork(pivot, rect, &vb);

    assert_pos_eq(before, after);
    assert!((transform.scale - 1.5).abs() < 0.001);
}

#[test]
fn test_brush_width_mapping_and_its_inverse() {
    let rect = container();
    let vb: ViewBox = "0 0 150 150".parse().unwrap();

    // Container average 300, viewBox average 150: halve on capture
    let artwork = transform::brush_width_to_artwork(8.0, rect, &vb);
    assert!((artwork - 4.0).abs() < 0.001);

    // Rendering at 2x zoom doubles it back and applies the zoom
    let t = CanvasTransform {
        scale: 2.0,
        translation: Vec2::ZERO,
    };
    let on_screen = t.stroke_screen_width(artwork, rect, &vb);
    assert!((on_screen - 16.0).abs() < 0.001);
}

#[test]
fn test_pinch_applies_the_midpoint_drift_formula() {
    let vb = view_box();
    let rect = container();
    let mut transform = CanvasTransform::default();
    let mut gestures = GestureController::default();
    let mut ctx = GestureContext {
        container: rect,
        view_box: &vb,
        transform: &mut transform,
        tool: Tool::Fill,
        brush_color: "#FF6B6B",
        brush_width: 8.0,
        clip_path_id: None,
    };

    // Two fingers 100 apart around (250, 200)
    gestures.handle_touch(1, TouchPhase::Start, pos2(200.0, 200.0), &mut ctx);
    gestures.handle_touch(2, TouchPhase::Start, pos2(300.0, 200.0), &mut ctx);

    // Spread to 200 while the midpoint drifts +30 in x
    gestures.handle_touch(1, TouchPhase::Move, pos2(180.0, 200.0), &mut ctx);
    gestures.handle_touch(2, TouchPhase::Move, pos2(380.0, 200.0), &mut ctx);

    // scale = 1 * (200 / 100), translation = -drift * (1 - 1/k)
    assert!((transform.scale - 2.0).abs() < 0.001);
    assert!((transform.translation.x - (-30.0 * 0.5)).abs() < 0.001);
    assert!(transform.translation.y.abs() < 0.001);
}

#[test]
fn test_pinch_scale_is_clamped_at_the_bounds() {
    let vb = view_box();
    let rect = container();
    let mut transform = CanvasTransform::default();
    let mut gestures = GestureController::default();
    let mut ctx = GestureContext {
        container: rect,
        view_box: &vb,
        transform: &mut transform,
        tool: Tool::Fill,
        brush_color: "#FF6B6B",
        brush_width: 8.0,
        clip_path_id: None,
    };

    gestures.handle_touch(1, TouchPhase::Start, pos2(240.0, 200.0), &mut ctx);
    gestures.handle_touch(2, TouchPhase::Start, pos2(260.0, 200.0), &mut ctx);

    // A huge spread cannot push the scale past its ceiling
    gestures.handle_touch(1, TouchPhase::Move, pos2(100.0, 200.0), &mut ctx);
    gestures.handle_touch(2, TouchPhase::Move, pos2(400.0, 200.0), &mut ctx);
    assert!((ctx.transform.scale - MAX_ZOOM).abs() < 0.001);

    // And pinching almost closed bottoms out at the floor
    gestures.handle_touch(1, TouchPhase::Move, pos2(249.0, 200.0), &mut ctx);
    gestures.handle_touch(2, TouchPhase::Move, pos2(251.0, 200.0), &mut ctx);
    assert!((transform.scale - MIN_ZOOM).abs() < 0.001);
}

#[test]
fn test_single_finger_pan_moves_and_clamps() {
    let vb = view_box();
    let rect = container();
    let mut transform = CanvasTransform::default();
    let mut gestures = GestureController::default();
    let mut ctx = GestureContext {
        container: rect,
        view_box: &vb,
        transform: &mut transform,
        tool: Tool::Fill,
        brush_color: "#FF6B6B",
        brush_width: 8.0,
        clip_path_id: None,
    };

    gestures.handle_touch(1, TouchPhase::Start, pos2(250.0, 200.0), &mut ctx);
    gestures.handle_touch(1, TouchPhase::Move, pos2(310.0, 200.0), &mut ctx);
    assert!((ctx.transform.translation.x - 60.0).abs() < 0.001);

    // Way past the edge: clamped to the slack at 1x
    gestures.handle_touch(1, TouchPhase::Move, pos2(900.0, 200.0), &mut ctx);
    assert!((ctx.transform.translation.x - PAN_SLACK).abs() < 0.001);

    gestures.handle_touch(1, TouchPhase::End, pos2(900.0, 200.0), &mut ctx);
    // A pan is not a tap and commits nothing
    assert!(gestures.take_events().is_empty());
}
