use canvas_editor::element::{FontStyle, ObjectKind, TextAlign};
use canvas_editor::{
    ActiveTool, Editor, EditorConfig, EditorError, HistoryEntry, MemoryImageLoader, SessionState,
    TextOptions,
};
use egui::{Color32, Vec2};
use std::cell::Cell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_editor() -> Editor {
    Editor::init(
        Vec2::new(640.0, 480.0),
        Vec2::new(1280.0, 720.0),
        EditorConfig::default(),
        Box::new(MemoryImageLoader::new()),
    )
}

fn workspace_count(editor: &Editor) -> usize {
    editor
        .canvas()
        .list_objects()
        .iter()
        .filter(|object| object.is_named("clip"))
        .count()
}

#[test]
fn test_font_size_only_changes_text() {
    init_logging();
    let mut editor = new_editor();
    let text = editor.add_text("Title", &TextOptions::default());
    let rect = editor.add_rectangle();
    let rect_before = editor.canvas().object(rect).unwrap().clone();
    editor.select(&[text, rect]);

    editor.change_font_size(48.0);

    let text = editor.canvas().object(text).unwrap();
    assert_eq!(text.text().unwrap().font_size, 48.0);
    assert_eq!(editor.canvas().object(rect).unwrap(), &rect_before);
}

#[test]
fn test_text_properties_roundtrip_through_getters() {
    init_logging();
    let mut editor = new_editor();
    editor.add_text("Body", &TextOptions::default());

    editor.change_font_family("Georgia");
    editor.change_font_weight(700);
    editor.change_font_style(FontStyle::Italic);
    editor.change_text_align(TextAlign::Center);
    editor.change_font_underline(true);
    editor.change_font_linethrough(true);

    assert_eq!(editor.get_active_font_family(), "Georgia");
    assert_eq!(editor.get_active_font_weight(), 700);
    assert_eq!(editor.get_active_font_style(), FontStyle::Italic);
    assert_eq!(editor.get_active_text_align(), TextAlign::Center);
    assert!(editor.get_active_font_underline());
    assert!(editor.get_active_font_linethrough());
}

#[test]
fn test_getters_use_first_selected_object() {
    init_logging();
    let mut editor = new_editor();
    let first = editor.add_circle();
    editor.change_opacity(0.5);
    editor.change_stroke_dash_array(&[5.0, 5.0]);
    let second = editor.add_rectangle();
    editor.change_opacity(0.9);

    editor.select(&[first, second]);
    assert_eq!(editor.get_active_opacity(), 0.5);
    assert_eq!(editor.get_active_stroke_dash_array(), vec![5.0, 5.0]);

    editor.clear_selection();
    assert_eq!(editor.get_active_opacity(), 0.9);
}

#[test]
fn test_workspace_survives_any_command_sequence() {
    init_logging();
    let mut editor = new_editor();
    let workspace = editor.get_workspace().unwrap().id;

    let a = editor.add_triangle();
    let b = editor.add_inverse_triangle();
    let c = editor.add_diamond();
    editor.select(&[workspace, a]);
    editor.delete();
    assert_eq!(workspace_count(&editor), 1);

    for _ in 0..4 {
        editor.select(&[c]);
        editor.send_backwards();
        editor.select(&[b]);
        editor.bring_forward();
    }
    editor.select(&[b, c]);
    editor.copy();
    editor.paste();
    editor.delete();

    assert_eq!(workspace_count(&editor), 1);
    assert_eq!(editor.canvas().index_of(workspace), Some(0));
    assert!(editor.canvas().object(a).is_none());
}

#[test]
fn test_clear_selection_callback_fires_on_empty_selection() {
    init_logging();
    let mut editor = new_editor();
    let cleared = Rc::new(Cell::new(0));
    let counter = Rc::clone(&cleared);
    editor.set_clear_selection_callback(Some(Box::new(move || counter.set(counter.get() + 1))));

    let id = editor.add_circle();
    assert_eq!(cleared.get(), 0);
    editor.select(&[id]);
    editor.clear_selection();
    assert_eq!(cleared.get(), 1);

    editor.select(&[id]);
    editor.delete();
    assert_eq!(cleared.get(), 2);
}

#[test]
fn test_save_callback_sees_every_entry() {
    init_logging();
    let mut editor = new_editor();
    let saved = Rc::new(Cell::new(0));
    let counter = Rc::clone(&saved);
    editor.set_save_callback(Some(Box::new(move |_entry: &HistoryEntry| {
        counter.set(counter.get() + 1);
        Ok(())
    })));

    editor.add_rectangle();
    editor.change_fill_color(Color32::RED);
    editor.delete();
    assert_eq!(saved.get(), 3);
    assert_eq!(editor.history().len(), 4);
}

#[test]
fn test_change_background_on_workspace() {
    init_logging();
    let mut editor = new_editor();
    editor.change_background(Color32::from_rgb(0xfa, 0xfa, 0xfa));
    assert_eq!(
        editor.get_workspace().unwrap().fill,
        Some(Color32::from_rgb(0xfa, 0xfa, 0xfa))
    );
    assert!(editor.can_undo());
}

#[test]
fn test_change_background_from_colour_string() {
    init_logging();
    let mut editor = new_editor();
    editor.change_background_str("#3b82f6").unwrap();
    assert_eq!(
        editor.get_workspace().unwrap().fill,
        Some(Color32::from_rgb(0x3b, 0x82, 0xf6))
    );
    let len = editor.history().len();

    assert!(matches!(
        editor.change_background_str("chartreuse-ish"),
        Err(EditorError::InvalidColor(_))
    ));
    assert_eq!(editor.history().len(), len);
    assert_eq!(
        editor.get_workspace().unwrap().fill,
        Some(Color32::from_rgb(0x3b, 0x82, 0xf6))
    );
}

#[test]
fn test_nan_opacity_leaves_history_navigable() {
    init_logging();
    let mut editor = new_editor();
    editor.add_circle();
    editor.change_opacity(f32::NAN);
    editor.add_rectangle();

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(editor.canvas().len(), 1);
    assert!(editor.redo());
    assert_eq!(editor.get_active_opacity(), 1.0);
}

#[test]
fn test_inverse_triangle_points_down() {
    init_logging();
    let mut editor = new_editor();
    let id = editor.add_inverse_triangle();
    match &editor.canvas().object(id).unwrap().kind {
        ObjectKind::Polygon { points } => {
            assert_eq!(points.len(), 3);
            assert_eq!(points[2].y, 400.0);
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn test_session_state_tracks_tool_and_defaults() {
    init_logging();
    let mut editor = new_editor();
    editor.set_active_tool(ActiveTool::Fill);
    editor.change_fill_color(Color32::GOLD);

    let json = editor.session_state().to_json().unwrap();
    let session = SessionState::from_json(&json).unwrap();
    assert_eq!(session.active_tool, ActiveTool::Fill);
    assert_eq!(session.defaults.fill, Color32::GOLD);
}

#[test]
fn test_dispose_consumes_editor() {
    init_logging();
    let mut editor = new_editor();
    editor.add_circle();
    editor.dispose();
}
