//! The command surface a host UI talks to.
//!
//! Every object-mutating command ends in [`Editor::commit`], which drains the
//! scene events and records at most one history entry for the whole command.

mod images;
mod properties;
mod shapes;

use egui::{Color32, Context, Pos2, Vec2};
use log::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::element::{DrawableObject, ObjectId, factory};
use crate::error::EditorResult;
use crate::history::{HistoryManager, SaveCallback};
use crate::loader::{ImageLoadFuture, ImageLoader};
use crate::render::{DisplayList, SceneRenderer};
use crate::scene::Canvas;
use crate::selection::{ClearSelectionCallback, SelectionTracker};
use crate::style::parse_color;
use crate::tool::{ActiveTool, SessionState};
use crate::viewport::ViewportController;

struct PendingImage {
    src: String,
    future: ImageLoadFuture,
}

pub struct Editor {
    canvas: Canvas,
    history: HistoryManager,
    tracker: SelectionTracker,
    viewport: ViewportController,
    clipboard: Clipboard,
    renderer: SceneRenderer,
    loader: Box<dyn ImageLoader>,
    pending_images: Vec<PendingImage>,
    session: SessionState,
    config: EditorConfig,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("canvas", &self.canvas)
            .field("history", &self.history)
            .field("tracker", &self.tracker)
            .field("pending_images", &self.pending_images.len())
            .field("session", &self.session)
            .finish()
    }
}

impl Editor {
    /// Build an editor around a fresh surface.
    ///
    /// The workspace is inserted and centred, the surface is sized to the
    /// container, the workspace becomes the clip and the history is seeded
    /// with the resulting scene.
    pub fn init(
        surface_size: Vec2,
        container_size: Vec2,
        config: EditorConfig,
        loader: Box<dyn ImageLoader>,
    ) -> Self {
        let (mut canvas, subscription) =
            Canvas::with_subscriber(surface_size, config.handles, config.workspace.name.as_str());
        let mut tracker = SelectionTracker::new(subscription);

        let workspace = factory::create_workspace(
            &config.workspace.name,
            config.workspace.size(),
            config.workspace.background,
        );
        let workspace_id = canvas.add_object(workspace);
        canvas.center_object(workspace_id);
        canvas.set_clip_path(Some(workspace_id));

        let viewport = ViewportController::new(config.viewport, container_size);
        viewport.auto_zoom(&mut canvas);

        let defaults = config.defaults.clone();
        canvas.brush_mut().set_color(defaults.stroke_color);
        canvas.brush_mut().set_width(defaults.stroke_width);

        tracker.sync(&mut canvas);
        tracker.take_save_request();

        let mut history = HistoryManager::new(config.history.max_entries);
        history.seed(&canvas);
        info!("Editor initialised with a {:?} workspace", config.workspace.size());

        Self {
            canvas,
            history,
            tracker,
            viewport,
            clipboard: Clipboard::new(config.paste_offset),
            renderer: SceneRenderer::default(),
            loader,
            pending_images: Vec::new(),
            session: SessionState {
                active_tool: ActiveTool::Select,
                defaults,
            },
            config,
        }
    }

    /// Drain scene events and record one history entry if the command changed anything
    fn commit(&mut self) {
        self.tracker.sync(&mut self.canvas);
        if self.tracker.take_save_request() {
            self.history.save(&self.canvas);
        }
    }

    // --- accessors ---

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn session_state(&self) -> &SessionState {
        &self.session
    }

    pub fn set_save_callback(&mut self, callback: Option<SaveCallback>) {
        self.history.set_save_callback(callback);
    }

    pub fn set_clear_selection_callback(&mut self, callback: Option<ClearSelectionCallback>) {
        self.tracker.set_clear_callback(callback);
    }

    /// Shapes for the host to paint this frame
    pub fn display_list(&mut self, ctx: &Context) -> DisplayList {
        self.renderer.build(&self.canvas, ctx)
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo(&mut self.canvas);
        self.tracker.sync(&mut self.canvas);
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo(&mut self.canvas);
        self.tracker.sync(&mut self.canvas);
        moved
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Record the current scene explicitly
    pub fn save(&mut self) -> bool {
        self.tracker.sync(&mut self.canvas);
        self.tracker.take_save_request();
        self.history.save(&self.canvas)
    }

    /// Defer history entries until [`Editor::end_gesture`], e.g. during a drag
    pub fn begin_gesture(&mut self) {
        self.history.begin_batch();
    }

    pub fn end_gesture(&mut self) -> bool {
        self.commit();
        self.history.end_batch(&self.canvas)
    }

    /// Commit an edit of one object, such as the end of a move or a text change.
    /// An edit leaving a non-finite number behind is discarded.
    pub fn modify_object(&mut self, id: ObjectId, edit: impl FnOnce(&mut DrawableObject)) -> bool {
        let Some(mut edited) = self.canvas.object(id).cloned() else {
            return false;
        };
        edit(&mut edited);
        edited.refresh_text_metrics();
        if !edited.is_finite() {
            warn!("Discarding edit of {id}: non-finite value");
            return false;
        }
        let modified = self.canvas.modify_object(id, |object| *object = edited);
        self.commit();
        modified
    }

    // --- viewport ---

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in(&mut self.canvas);
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out(&mut self.canvas);
    }

    pub fn auto_zoom(&mut self) {
        self.viewport.auto_zoom(&mut self.canvas);
    }

    /// The sizing container changed dimensions
    pub fn resize_container(&mut self, container: Vec2) {
        self.viewport.resize(&mut self.canvas, container);
    }

    // --- workspace ---

    pub fn get_workspace(&self) -> Option<&DrawableObject> {
        self.canvas.find_workspace()
    }

    pub fn change_background(&mut self, color: Color32) {
        let Some(id) = self.canvas.find_workspace().map(|workspace| workspace.id) else {
            return;
        };
        self.canvas.modify_object(id, |workspace| workspace.fill = Some(color));
        self.commit();
    }

    /// Like [`Editor::change_background`], for a colour such as `#f4f4f5` or `white`
    pub fn change_background_str(&mut self, value: &str) -> EditorResult<()> {
        let color = parse_color(value)?;
        self.change_background(color);
        Ok(())
    }

    pub fn change_size(&mut self, size: Vec2) {
        if !size.is_finite() {
            warn!("Ignoring non-finite workspace size {size:?}");
            return;
        }
        let Some(id) = self.canvas.find_workspace().map(|workspace| workspace.id) else {
            return;
        };
        self.canvas.modify_object(id, |workspace| workspace.size = size);
        self.viewport.auto_zoom(&mut self.canvas);
        self.commit();
    }

    // --- drawing ---

    pub fn enable_drawing_mode(&mut self) {
        self.canvas.discard_active_object();
        self.canvas.set_drawing_mode(true);
        let defaults = &self.session.defaults;
        let brush = self.canvas.brush_mut();
        brush.set_width(defaults.stroke_width);
        brush.set_color(defaults.stroke_color);
        self.tracker.sync(&mut self.canvas);
    }

    pub fn disable_drawing_mode(&mut self) {
        self.canvas.set_drawing_mode(false);
    }

    /// Start a freehand stroke at a screen position. Ignored outside drawing mode.
    pub fn begin_freehand(&mut self, screen_point: Pos2) {
        if !self.canvas.is_drawing_mode() {
            return;
        }
        let point = self.canvas.viewport().screen_to_scene(screen_point);
        let brush = self.canvas.brush_mut();
        brush.reset();
        brush.add_point(point);
    }

    pub fn extend_freehand(&mut self, screen_point: Pos2) {
        if !self.canvas.is_drawing_mode() || !self.canvas.brush().is_drawing() {
            return;
        }
        let point = self.canvas.viewport().screen_to_scene(screen_point);
        self.canvas.brush_mut().add_point(point);
    }

    /// Finish the stroke, adding it to the scene as a path
    pub fn end_freehand(&mut self) -> Option<ObjectId> {
        if !self.canvas.is_drawing_mode() {
            return None;
        }
        let path = self.canvas.brush_mut().finish()?;
        let id = self.canvas.add_object(path);
        self.commit();
        Some(id)
    }

    // --- clipboard ---

    pub fn copy(&mut self) -> usize {
        self.clipboard.copy(&self.canvas)
    }

    pub fn paste(&mut self) -> Vec<ObjectId> {
        let ids = self.clipboard.paste(&mut self.canvas);
        self.commit();
        ids
    }

    // --- selection ---

    pub fn select(&mut self, ids: &[ObjectId]) {
        self.canvas.set_active_objects(ids);
        self.tracker.sync(&mut self.canvas);
    }

    pub fn clear_selection(&mut self) {
        self.canvas.discard_active_object();
        self.tracker.sync(&mut self.canvas);
    }

    /// The current selection, in selection order
    pub fn selected_objects(&self) -> Vec<&DrawableObject> {
        self.tracker
            .selection()
            .iter()
            .filter_map(|id| self.canvas.object(*id))
            .collect()
    }

    /// Remove every selected object. Records exactly one history entry.
    pub fn delete(&mut self) {
        let ids = self.canvas.active_ids().to_vec();
        for id in ids {
            self.canvas.remove_object(id);
        }
        self.canvas.discard_active_object();
        self.commit();
    }

    // --- layering ---

    pub fn bring_forward(&mut self) {
        let ids = self.canvas.active_ids().to_vec();
        for id in ids.into_iter().rev() {
            self.canvas.bring_forward(id);
        }
        self.pin_workspace();
        self.commit();
    }

    pub fn send_backwards(&mut self) {
        let ids = self.canvas.active_ids().to_vec();
        for id in ids {
            self.canvas.send_backwards(id);
        }
        self.pin_workspace();
        self.commit();
    }

    fn pin_workspace(&mut self) {
        if let Some(id) = self.canvas.find_workspace().map(|workspace| workspace.id) {
            self.canvas.send_to_back(id);
        }
    }

    // --- session ---

    /// Switch tools, entering or leaving drawing mode as needed
    pub fn set_active_tool(&mut self, tool: ActiveTool) {
        let previous = self.session.active_tool;
        if previous == tool {
            return;
        }
        if tool.is_drawing() {
            self.enable_drawing_mode();
        }
        if previous.is_drawing() {
            self.disable_drawing_mode();
        }
        debug!("Active tool {previous:?} -> {tool:?}");
        self.session.active_tool = tool;
    }

    /// Insert an object centred on the workspace and select it
    fn add_to_canvas(&mut self, mut object: DrawableObject) -> ObjectId {
        if let Some(center) = self.canvas.find_workspace().map(DrawableObject::center) {
            object.set_center(center);
        }
        let id = self.canvas.add_object(object);
        self.canvas.set_active_object(id);
        self.commit();
        id
    }

    // --- teardown ---

    /// Tear the editor down. Pending image loads are dropped unresolved.
    pub fn dispose(mut self) {
        info!(
            "Disposing editor ({} history entries, {} pending image loads)",
            self.history.len(),
            self.pending_images.len()
        );
        self.pending_images.clear();
        self.canvas.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryImageLoader;

    fn editor() -> Editor {
        Editor::init(
            Vec2::new(100.0, 100.0),
            Vec2::new(1000.0, 800.0),
            EditorConfig::default(),
            Box::new(MemoryImageLoader::new()),
        )
    }

    #[test]
    fn test_init_seeds_history_with_workspace() {
        let editor = editor();
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
        assert_eq!(editor.canvas().len(), 1);
        let workspace = editor.get_workspace().unwrap();
        assert_eq!(workspace.size, Vec2::new(900.0, 1200.0));
        assert_eq!(editor.canvas().clip_path(), Some(workspace.id));
        assert_eq!(editor.canvas().size(), Vec2::new(1000.0, 800.0));
    }

    #[test]
    fn test_add_shape_is_centred_selected_and_saved() {
        let mut editor = editor();
        let id = editor.add_rectangle();
        let workspace_center = editor.get_workspace().unwrap().center();

        assert_eq!(editor.canvas().object(id).unwrap().center(), workspace_center);
        assert_eq!(editor.selected_objects()[0].id, id);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_delete_records_one_entry() {
        let mut editor = editor();
        let a = editor.add_circle();
        let b = editor.add_triangle();
        editor.select(&[a, b]);
        let before = editor.history().len();

        editor.delete();
        assert_eq!(editor.history().len(), before + 1);
        assert_eq!(editor.canvas().len(), 1);
        assert!(editor.selected_objects().is_empty());
    }

    #[test]
    fn test_delete_with_empty_selection_records_nothing() {
        let mut editor = editor();
        editor.delete();
        assert_eq!(editor.history().len(), 1);
        assert_eq!(editor.canvas().len(), 1);
    }

    #[test]
    fn test_change_size_keeps_workspace_fitted() {
        let mut editor = editor();
        editor.change_size(Vec2::new(500.0, 500.0));
        assert_eq!(editor.get_workspace().unwrap().size, Vec2::new(500.0, 500.0));
        let expected = 0.85 * (1000.0f32 / 500.0).min(800.0 / 500.0);
        assert!((editor.canvas().get_zoom() - expected).abs() < 1e-5);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_undo_then_redo_roundtrip() {
        let mut editor = editor();
        editor.change_background(Color32::RED);
        assert!(editor.undo());
        assert_eq!(editor.get_workspace().unwrap().fill, Some(Color32::WHITE));
        assert!(editor.redo());
        assert_eq!(editor.get_workspace().unwrap().fill, Some(Color32::RED));
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_gesture_records_single_entry() {
        let mut editor = editor();
        let id = editor.add_diamond();
        let before = editor.history().len();

        editor.begin_gesture();
        for _ in 0..20 {
            editor.modify_object(id, |object| object.translate(Vec2::new(1.0, 0.0)));
        }
        assert_eq!(editor.history().len(), before);
        assert!(editor.end_gesture());
        assert_eq!(editor.history().len(), before + 1);
    }

    #[test]
    fn test_non_finite_edit_is_discarded() {
        let mut editor = editor();
        let id = editor.add_diamond();
        let position = editor.canvas().object(id).unwrap().position;

        assert!(!editor.modify_object(id, |object| object.translate(Vec2::new(f32::NAN, 0.0))));
        assert_eq!(editor.canvas().object(id).unwrap().position, position);
        assert_eq!(editor.history().len(), 2);

        editor.add_circle();
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.canvas().len(), 1);
    }

    #[test]
    fn test_freehand_creates_path() {
        let mut editor = editor();
        editor.set_active_tool(ActiveTool::Draw);
        assert!(editor.canvas().is_drawing_mode());

        editor.begin_freehand(Pos2::new(10.0, 10.0));
        editor.extend_freehand(Pos2::new(20.0, 30.0));
        editor.extend_freehand(Pos2::new(40.0, 35.0));
        let id = editor.end_freehand().unwrap();

        let path = editor.canvas().object(id).unwrap();
        assert_eq!(path.stroke, Some(editor.session_state().defaults.stroke_color));
        assert_eq!(editor.history().len(), 2);

        editor.set_active_tool(ActiveTool::Select);
        assert!(!editor.canvas().is_drawing_mode());
        editor.begin_freehand(Pos2::new(0.0, 0.0));
        assert!(editor.end_freehand().is_none());
    }

    #[test]
    fn test_layering_keeps_workspace_at_bottom() {
        let mut editor = editor();
        let a = editor.add_rectangle();
        let _b = editor.add_circle();
        editor.select(&[a]);
        for _ in 0..3 {
            editor.send_backwards();
        }
        let workspace = editor.get_workspace().unwrap().id;
        assert_eq!(editor.canvas().index_of(workspace), Some(0));
        assert_eq!(editor.canvas().index_of(a), Some(1));

        editor.bring_forward();
        assert_eq!(editor.canvas().index_of(a), Some(2));
        assert_eq!(editor.canvas().index_of(workspace), Some(0));
    }
}
