//! The scene adapter: owns the drawable objects, the active selection and the
//! viewport transform, and emits typed events for every structural change.
//!
//! Every mutating method finishes with a render pass before returning.
//! Methods that need the workspace quietly do nothing when it is missing.

use egui::{Pos2, Rect, Vec2};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::element::{DrawableObject, ObjectId, PencilBrush};
use crate::event::{EventBus, EventHandler, EventOrigin, SceneEvent, Subscription};
use crate::snapshot::{ObjectRecord, SceneSnapshot};
use crate::style::HandleStyle;
use crate::tool::{STROKE_COLOR, STROKE_WIDTH};

/// Maps scene coordinates onto the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub zoom: f32,
    pub pan: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub fn scene_to_screen(&self, point: Pos2) -> Pos2 {
        Pos2::new(point.x * self.zoom + self.pan.x, point.y * self.zoom + self.pan.y)
    }

    pub fn screen_to_scene(&self, point: Pos2) -> Pos2 {
        Pos2::new(
            (point.x - self.pan.x) / self.zoom,
            (point.y - self.pan.y) / self.zoom,
        )
    }

    pub fn scene_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_max(self.scene_to_screen(rect.min), self.scene_to_screen(rect.max))
    }
}

pub struct Canvas {
    /// Bottom-most first
    objects: Vec<DrawableObject>,
    active: Vec<ObjectId>,
    size: Vec2,
    viewport: ViewportTransform,
    clip_path: Option<ObjectId>,
    workspace_name: String,
    handles: HandleStyle,
    drawing_mode: bool,
    brush: PencilBrush,
    render_count: u64,
    events: EventBus,
    disposed: bool,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("objects", &self.objects.len())
            .field("active", &self.active)
            .field("size", &self.size)
            .field("viewport", &self.viewport)
            .field("drawing_mode", &self.drawing_mode)
            .field("render_count", &self.render_count)
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl Canvas {
    /// Create an empty surface of the given physical size
    pub fn new(size: Vec2, handles: HandleStyle, workspace_name: impl Into<String>) -> Self {
        Self::with_bus(size, handles, workspace_name.into(), EventBus::new())
    }

    /// Like [`Canvas::new`], also handing back the event subscription
    pub fn with_subscriber(
        size: Vec2,
        handles: HandleStyle,
        workspace_name: impl Into<String>,
    ) -> (Self, Subscription) {
        let (events, subscription) = EventBus::with_subscriber();
        (Self::with_bus(size, handles, workspace_name.into(), events), subscription)
    }

    fn with_bus(size: Vec2, handles: HandleStyle, workspace_name: String, events: EventBus) -> Self {
        Self {
            objects: Vec::new(),
            active: Vec::new(),
            size,
            viewport: ViewportTransform::default(),
            clip_path: None,
            workspace_name,
            handles,
            drawing_mode: false,
            brush: PencilBrush::new(STROKE_COLOR, STROKE_WIDTH),
            render_count: 0,
            events,
            disposed: false,
        }
    }

    // --- events ---

    pub fn subscribe(&mut self) -> Option<Subscription> {
        self.events.subscribe()
    }

    pub fn dispatch_events(&mut self, subscription: &Subscription, handler: &mut dyn EventHandler) {
        self.events.dispatch(subscription, handler);
    }

    // --- queries ---

    pub fn list_objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Direct mutable access. The caller is responsible for calling [`Canvas::render_all`].
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut DrawableObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    /// The single object tagged as the workspace, matched by name
    pub fn find_workspace(&self) -> Option<&DrawableObject> {
        self.objects
            .iter()
            .find(|object| object.is_named(&self.workspace_name))
    }

    pub fn workspace_mut(&mut self) -> Option<&mut DrawableObject> {
        let name = self.workspace_name.clone();
        self.objects.iter_mut().find(|object| object.is_named(&name))
    }

    pub fn is_workspace(&self, id: ObjectId) -> bool {
        self.find_workspace().is_some_and(|workspace| workspace.id == id)
    }

    // --- structure ---

    /// Add an object on top of the stack and stamp the handle style onto it
    pub fn add_object(&mut self, object: DrawableObject) -> ObjectId {
        let id = self.insert(object, EventOrigin::User);
        self.render_all();
        id
    }

    fn insert(&mut self, mut object: DrawableObject, origin: EventOrigin) -> ObjectId {
        object.handles = self.handles;
        let id = object.id;
        trace!("Adding {} {}", object.kind.type_name(), id);
        self.objects.push(object);
        self.events.emit(SceneEvent::ObjectAdded { id, origin });
        id
    }

    /// Remove an object. The workspace can never be removed this way.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<DrawableObject> {
        if self.is_workspace(id) {
            warn!("Refusing to remove the workspace");
            return None;
        }
        let index = self.index_of(id)?;
        let removed = self.objects.remove(index);
        if self.active.contains(&id) {
            self.active.retain(|active| *active != id);
            self.events.emit(SceneEvent::SelectionChanged(self.active.clone()));
        }
        self.events.emit(SceneEvent::ObjectRemoved {
            id,
            origin: EventOrigin::User,
        });
        self.render_all();
        Some(removed)
    }

    /// Apply a committed edit to an object and announce it
    pub fn modify_object(&mut self, id: ObjectId, edit: impl FnOnce(&mut DrawableObject)) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        edit(object);
        self.events.emit(SceneEvent::ObjectModified { id });
        self.render_all();
        true
    }

    // --- selection ---

    /// Selected objects, in selection order
    pub fn active_objects(&self) -> Vec<&DrawableObject> {
        self.active.iter().filter_map(|id| self.object(*id)).collect()
    }

    pub fn active_ids(&self) -> &[ObjectId] {
        &self.active
    }

    pub fn set_active_object(&mut self, id: ObjectId) {
        self.set_active_objects(&[id]);
    }

    /// Replace the selection. Unknown and non-selectable objects are ignored.
    pub fn set_active_objects(&mut self, ids: &[ObjectId]) {
        let mut selection: Vec<ObjectId> = Vec::with_capacity(ids.len());
        for id in ids {
            let selectable = self.object(*id).is_some_and(|object| object.selectable);
            if selectable && !selection.contains(id) {
                selection.push(*id);
            }
        }
        if selection != self.active {
            self.active = selection;
            self.events.emit(SceneEvent::SelectionChanged(self.active.clone()));
        }
        self.render_all();
    }

    pub fn discard_active_object(&mut self) {
        if !self.active.is_empty() {
            self.active.clear();
            self.events.emit(SceneEvent::SelectionChanged(Vec::new()));
        }
        self.render_all();
    }

    // --- layering ---

    /// Move one step towards the top. Returns false when already on top.
    /// A move counts as a modification of the object.
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        let moved = match self.index_of(id) {
            Some(index) if index + 1 < self.objects.len() => {
                self.objects.swap(index, index + 1);
                self.events.emit(SceneEvent::ObjectModified { id });
                true
            }
            _ => false,
        };
        self.render_all();
        moved
    }

    /// Move one step towards the bottom. Returns false when already at the bottom.
    pub fn send_backwards(&mut self, id: ObjectId) -> bool {
        let moved = match self.index_of(id) {
            Some(index) if index > 0 => {
                self.objects.swap(index, index - 1);
                self.events.emit(SceneEvent::ObjectModified { id });
                true
            }
            _ => false,
        };
        self.render_all();
        moved
    }

    pub fn send_to_back(&mut self, id: ObjectId) {
        if let Some(index) = self.index_of(id).filter(|index| *index > 0) {
            let object = self.objects.remove(index);
            self.objects.insert(0, object);
            self.events.emit(SceneEvent::ObjectModified { id });
        }
        self.render_all();
    }

    // --- serialization ---

    /// Dump every object, bottom-most first
    pub fn serialize(&self) -> SceneSnapshot {
        SceneSnapshot::new(self.objects.iter().map(ObjectRecord::from_object).collect())
    }

    /// Dump the given objects in stacking order
    pub fn serialize_objects(&self, ids: &[ObjectId]) -> Vec<ObjectRecord> {
        self.objects
            .iter()
            .filter(|object| ids.contains(&object.id))
            .map(ObjectRecord::from_object)
            .collect()
    }

    /// Replace the whole scene with the snapshot contents.
    ///
    /// The current objects are discarded, not patched. Events emitted here
    /// carry [`EventOrigin::Restore`].
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        debug!("Restoring scene with {} objects", snapshot.objects.len());
        if !self.active.is_empty() {
            self.active.clear();
            self.events.emit(SceneEvent::SelectionChanged(Vec::new()));
        }
        for object in std::mem::take(&mut self.objects) {
            self.events.emit(SceneEvent::ObjectRemoved {
                id: object.id,
                origin: EventOrigin::Restore,
            });
        }
        for record in &snapshot.objects {
            self.insert(record.to_object(self.handles), EventOrigin::Restore);
        }
        self.clip_path = self.find_workspace().map(|workspace| workspace.id);
        self.render_all();
    }

    // --- rendering ---

    /// Synchronous render pass
    pub fn render_all(&mut self) {
        if self.disposed {
            return;
        }
        self.render_count += 1;
        trace!("Render pass {}", self.render_count);
    }

    /// Number of render passes performed so far
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    // --- clip ---

    pub fn set_clip_path(&mut self, id: Option<ObjectId>) {
        self.clip_path = id;
        self.render_all();
    }

    pub fn clip_path(&self) -> Option<ObjectId> {
        self.clip_path
    }

    /// Scene-space rectangle everything is clipped to, if any
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_path
            .and_then(|id| self.object(id))
            .map(DrawableObject::bounds)
    }

    // --- surface & viewport ---

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_dimensions(&mut self, size: Vec2) {
        self.size = size;
        self.render_all();
    }

    /// Centre of the surface in screen coordinates
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.size.x / 2.0, self.size.y / 2.0)
    }

    pub fn viewport(&self) -> ViewportTransform {
        self.viewport
    }

    pub fn set_viewport_transform(&mut self, viewport: ViewportTransform) {
        self.viewport = viewport;
        self.render_all();
    }

    pub fn get_zoom(&self) -> f32 {
        self.viewport.zoom
    }

    /// Zoom so that the scene point under `point` (screen space) stays put
    pub fn zoom_to_point(&mut self, point: Pos2, zoom: f32) {
        let anchor = self.viewport.screen_to_scene(point);
        self.viewport.zoom = zoom;
        self.viewport.pan = Vec2::new(point.x - anchor.x * zoom, point.y - anchor.y * zoom);
        self.render_all();
    }

    pub fn center_point_of(&self, id: ObjectId) -> Option<Pos2> {
        self.object(id).map(DrawableObject::center)
    }

    /// Move an object so its centre sits on `point` (scene space)
    pub fn center_on(&mut self, id: ObjectId, point: Pos2) {
        if let Some(object) = self.object_mut(id) {
            object.set_center(point);
        }
        self.render_all();
    }

    /// Centre an object in the visible part of the surface
    pub fn center_object(&mut self, id: ObjectId) {
        let point = self.viewport.screen_to_scene(self.center());
        self.center_on(id, point);
    }

    // --- drawing mode ---

    pub fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
        if !enabled {
            self.brush.reset();
        }
        self.render_all();
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn brush(&self) -> &PencilBrush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut PencilBrush {
        &mut self.brush
    }

    // --- teardown ---

    /// Release every object and stop emitting events
    pub fn dispose(&mut self) {
        debug!("Disposing canvas with {} objects", self.objects.len());
        self.events.close();
        self.objects.clear();
        self.active.clear();
        self.clip_path = None;
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
