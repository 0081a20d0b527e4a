use tintbook::stroke::BrushStroke;
use tintbook::{Action, ColoringSession, Tool};

// Helper to paint a region with the currently selected color
fn paint(session: &mut ColoringSession, region: &str) {
    session.dispatch(Action::PaintPath {
        path_id: region.to_owned(),
    });
}

#[test]
fn test_paint_undo_redo_walk() {
    let mut session = ColoringSession::new("#FF6B6B");

    // Paint two regions with two different colors
    paint(&mut session, "left-wing-top");
    session.dispatch(Action::SetColor("#4ECDC4".to_owned()));
    paint(&mut session, "right-wing-top");

    assert_eq!(session.color_map.len(), 2);
    assert_eq!(session.color_map.get("left-wing-top").unwrap(), "#FF6B6B");
    assert_eq!(session.color_map.get("right-wing-top").unwrap(), "#4ECDC4");
    assert_eq!(session.history_len(), 3);
    assert_eq!(session.history_index(), 2);

    // Undo the second paint
    session.dispatch(Action::Undo);
    assert_eq!(session.color_map.len(), 1);
    assert!(session.color_map.get("right-wing-top").is_none());

    // Undo the first paint
    session.dispatch(Action::Undo);
    assert!(session.color_map.is_empty());
    assert!(!session.can_undo());

    // Redo both; the exact colors come back
    session.dispatch(Action::Redo);
    session.dispatch(Action::Redo);
    assert_eq!(session.color_map.get("left-wing-top").unwrap(), "#FF6B6B");
    assert_eq!(session.color_map.get("right-wing-top").unwrap(), "#4ECDC4");
    assert!(!session.can_redo());

    // The walk never changed the history length
    assert_eq!(session.history_len(), 3);
}

#[test]
fn test_undo_redo_at_bounds_never_mutate() {
    let mut session = ColoringSession::new("#FF6B6B");
    paint(&mut session, "body");

    // Redo with nothing to redo
    session.dispatch(Action::Redo);
    assert_eq!(session.history_index(), 1);
    assert_eq!(session.color_map.len(), 1);

    // Undo past the beginning
    session.dispatch(Action::Undo);
    session.dispatch(Action::Undo);
    session.dispatch(Action::Undo);
    assert_eq!(session.history_index(), 0);
    assert_eq!(session.history_len(), 2);
    assert!(session.color_map.is_empty());
}

#[test]
fn test_painting_after_undo_discards_the_redo_branch() {
    let mut session = ColoringSession::new("#FF6B6B");
    paint(&mut session, "a");
    paint(&mut session, "b");

    session.dispatch(Action::Undo);
    assert!(session.can_redo());

    // A new paint replaces the abandoned future
    paint(&mut session, "c");
    assert!(!session.can_redo());
    assert_eq!(session.history_len(), 3);
    assert_eq!(session.color_map.len(), 2);
    assert!(session.color_map.contains_key("a"));
    assert!(session.color_map.contains_key("c"));
    assert!(!session.color_map.contains_key("b"));

    // Redo still does nothing
    session.dispatch(Action::Redo);
    assert_eq!(session.history_index(), 2);
}

#[test]
fn test_repainting_the_same_region_still_records_a_step() {
    let mut session = ColoringSession::new("#FF6B6B");
    paint(&mut session, "moon");
    paint(&mut session, "moon");

    assert_eq!(session.history_len(), 3);

    // One undo leaves the region painted; the second clears it
    session.dispatch(Action::Undo);
    assert_eq!(session.color_map.get("moon").unwrap(), "#FF6B6B");
    session.dispatch(Action::Undo);
    assert!(session.color_map.is_empty());
}

#[test]
fn test_erase_then_undo_restores_the_fill() {
    let mut session = ColoringSession::new("#FF6B6B");
    paint(&mut session, "head");

    session.dispatch(Action::SetTool(Tool::Erase));
    paint(&mut session, "head");
    assert!(session.color_map.is_empty());

    session.dispatch(Action::Undo);
    assert_eq!(session.color_map.get("head").unwrap(), "#FF6B6B");
}

#[test]
fn test_brush_strokes_participate_in_history() {
    let mut session = ColoringSession::new("#FF6B6B");
    let stroke = BrushStroke::new(
        "M 10 10 L 20 20 L 30 10".to_owned(),
        "#4ECDC4".to_owned(),
        4.0,
        None,
    );
    let stroke_id = stroke.id.clone();
    session.dispatch(Action::AddBrushStroke(stroke));

    assert_eq!(session.brush_strokes.len(), 1);
    assert_eq!(session.history_len(), 2);

    session.dispatch(Action::Undo);
    assert!(session.brush_strokes.is_empty());

    // Redo brings back the identical stroke, id included
    session.dispatch(Action::Redo);
    assert_eq!(session.brush_strokes.len(), 1);
    assert_eq!(session.brush_strokes[0].id, stroke_id);
    assert_eq!(session.brush_strokes[0].d, "M 10 10 L 20 20 L 30 10");
}

#[test]
fn test_clear_is_one_undoable_step() {
    let mut session = ColoringSession::new("#FF6B6B");
    paint(&mut session, "a");
    paint(&mut session, "b");
    session.dispatch(Action::AddBrushStroke(BrushStroke::new(
        "M 0 0 L 5 5".to_owned(),
        "#FF6B6B".to_owned(),
        4.0,
        None,
    )));

    session.dispatch(Action::Reset);
    assert!(session.color_map.is_empty());
    assert!(session.brush_strokes.is_empty());

    session.dispatch(Action::Undo);
    assert_eq!(session.color_map.len(), 2);
    assert_eq!(session.brush_strokes.len(), 1);
}

#[test]
fn test_page_switch_reinit_cannot_be_undone() {
    let mut session = ColoringSession::new("#FF6B6B");
    session.dispatch(Action::SetBrushWidth(14.0));
    paint(&mut session, "a");

    session.dispatch(Action::ResetWithColor("#F97316".to_owned()));
    assert_eq!(session.selected_color, "#F97316");
    assert_eq!(session.active_tool, Tool::Fill);
    assert_eq!(session.brush_width, 14.0);
    assert!(!session.can_undo());
    assert!(!session.can_redo());

    session.dispatch(Action::Undo);
    assert!(session.color_map.is_empty());
    assert_eq!(session.history_len(), 1);
}
