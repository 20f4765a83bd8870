use log::debug;

use crate::element::{DrawableObject, ObjectId};
use crate::scene::Canvas;
use crate::snapshot::ObjectRecord;
use crate::style::HandleStyle;

/// In-process copy buffer.
///
/// Stores serialized records rather than live objects, so the buffer is
/// unaffected by later edits to the originals. Each paste moves the buffer
/// by `offset`, making repeated pastes cascade.
#[derive(Debug, Clone)]
pub struct Clipboard {
    buffer: Vec<ObjectRecord>,
    offset: f32,
}

impl Clipboard {
    pub fn new(offset: f32) -> Self {
        Self {
            buffer: Vec::new(),
            offset,
        }
    }

    /// Copy the active objects. An empty selection leaves the buffer as it was.
    pub fn copy(&mut self, canvas: &Canvas) -> usize {
        let ids: Vec<ObjectId> = canvas
            .active_ids()
            .iter()
            .copied()
            .filter(|id| !canvas.is_workspace(*id))
            .collect();
        if ids.is_empty() {
            return 0;
        }
        self.buffer = canvas.serialize_objects(&ids);
        debug!("Copied {} objects", self.buffer.len());
        self.buffer.len()
    }

    /// Insert a fresh copy of the buffer and select it. Returns the new ids.
    pub fn paste(&mut self, canvas: &mut Canvas) -> Vec<ObjectId> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        for record in &mut self.buffer {
            record.left += self.offset;
            record.top += self.offset;
        }

        canvas.discard_active_object();
        let ids: Vec<ObjectId> = self
            .buffer
            .iter()
            .map(|record| {
                let object = DrawableObject {
                    id: ObjectId::new(),
                    ..record.to_object(HandleStyle::default())
                };
                canvas.add_object(object)
            })
            .collect();
        canvas.set_active_objects(&ids);
        debug!("Pasted {} objects", ids.len());
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use crate::tool::StyleDefaults;
    use egui::{Color32, Vec2};

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(Vec2::new(800.0, 600.0), HandleStyle::default(), "clip");
        canvas.add_object(factory::create_workspace(
            "clip",
            Vec2::new(900.0, 1200.0),
            Color32::WHITE,
        ));
        canvas
    }

    #[test]
    fn test_empty_paste_is_noop() {
        let mut canvas = canvas();
        let mut clipboard = Clipboard::new(10.0);
        assert!(clipboard.paste(&mut canvas).is_empty());
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_pastes_cascade() {
        let mut canvas = canvas();
        let source = canvas.add_object(factory::create_rectangle(&StyleDefaults::default()));
        canvas.set_active_object(source);
        let origin = canvas.object(source).unwrap().position;

        let mut clipboard = Clipboard::new(10.0);
        assert_eq!(clipboard.copy(&canvas), 1);
        let first = clipboard.paste(&mut canvas);
        let second = clipboard.paste(&mut canvas);

        assert_ne!(first[0], source);
        assert_ne!(first[0], second[0]);
        assert_eq!(canvas.object(first[0]).unwrap().position, origin + Vec2::splat(10.0));
        assert_eq!(canvas.object(second[0]).unwrap().position, origin + Vec2::splat(20.0));
        assert_eq!(canvas.active_ids(), second.as_slice());
    }
}
