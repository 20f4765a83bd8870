use futures::FutureExt;
use log::{debug, warn};

use super::{Editor, PendingImage};
use crate::element::{ImageFilter, ObjectId, factory};
use crate::error::EditorResult;
use crate::loader::LoadedImage;

impl Editor {
    /// Start loading an image. It is added to the scene by a later
    /// [`Editor::poll_image_loads`] once its pixels are available.
    pub fn add_image(&mut self, src: &str) {
        debug!("Loading image {src}");
        self.pending_images.push(PendingImage {
            src: src.to_string(),
            future: self.loader.load(src),
        });
    }

    pub fn pending_image_loads(&self) -> usize {
        self.pending_images.len()
    }

    /// Insert every image whose load has finished. Failed loads are logged
    /// and dropped. Returns the ids of the inserted objects.
    pub fn poll_image_loads(&mut self) -> Vec<ObjectId> {
        let mut finished = Vec::new();
        self.pending_images.retain_mut(|pending| match (&mut pending.future).now_or_never() {
            Some(result) => {
                finished.push((pending.src.clone(), result));
                false
            }
            None => true,
        });

        let mut inserted = Vec::new();
        for (src, result) in finished {
            match result {
                Ok(loaded) => inserted.push(self.insert_image(loaded)),
                Err(err) => warn!("Dropping image {src}: {err}"),
            }
        }
        inserted
    }

    /// Scale to fit inside the workspace, centre on it and select.
    ///
    /// The image keeps its aspect ratio and is fitted on both axes: it takes
    /// the workspace width unless that would make it taller than the
    /// workspace, in which case it takes the workspace height instead.
    fn insert_image(&mut self, loaded: LoadedImage) -> ObjectId {
        let mut object = factory::create_image(&loaded.src, loaded.size());
        if let Some(workspace) = self.canvas.find_workspace() {
            let available = workspace.bounds().size();
            object.scale_to_width(available.x);
            if object.bounds().height() > available.y {
                object.scale_to_height(available.y);
            }
        }
        self.renderer.insert_bitmap(loaded.src, loaded.pixels);
        self.add_to_canvas(object)
    }

    /// Set the filter of every selected image by name; `"none"` clears it.
    pub fn change_image_filter(&mut self, value: &str) -> EditorResult<()> {
        let filter = ImageFilter::parse_optional(value)?;
        self.set_image_filter(filter);
        Ok(())
    }

    /// Replace the filter of every selected image. Other objects are skipped.
    pub fn set_image_filter(&mut self, filter: Option<ImageFilter>) {
        let ids: Vec<ObjectId> = self
            .canvas
            .active_objects()
            .into_iter()
            .filter(|object| object.is_image())
            .map(|object| object.id)
            .collect();
        for id in ids {
            self.canvas.modify_object(id, |object| {
                if let Some(props) = object.image_mut() {
                    props.filter = filter;
                }
            });
        }
        self.commit();
    }
}

#[cfg(test)]
mod tests {
    use egui::Vec2;

    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use crate::element::ImageFilter;
    use crate::error::EditorError;
    use crate::loader::{MemoryImageLoader, encode_png};
    
    fn editor_with_asset() -> Editor {
        let loader = MemoryImageLoader::new();
        loader.insert("photo.png", encode_png(300, 200, [10, 20, 30, 255]).unwrap());
        Editor::init(
            Vec2::new(800.0, 600.0),
            Vec2::new(800.0, 600.0),
            EditorConfig::default(),
            Box::new(loader),
        )
    }

    #[test]
    fn test_image_fits_workspace() {
        let mut editor = editor_with_asset();
        editor.add_image("photo.png");
        assert_eq!(editor.pending_image_loads(), 1);
        assert_eq!(editor.canvas().len(), 1);

        let ids = editor.poll_image_loads();
        assert_eq!(ids.len(), 1);
        assert_eq!(editor.pending_image_loads(), 0);

        let image = editor.canvas().object(ids[0]).unwrap();
        // 900x1200 workspace, limited by width
        assert!((image.bounds().width() - 900.0).abs() < 1e-3);
        assert!((image.bounds().height() - 600.0).abs() < 1e-3);
        assert_eq!(image.center(), editor.get_workspace().unwrap().center());
        assert_eq!(editor.selected_objects()[0].id, ids[0]);
        assert_eq!(editor.history().len(), 2);
    }

    #[test]
    fn test_tall_image_fits_workspace_height() {
        let loader = MemoryImageLoader::new();
        loader.insert("tall.png", encode_png(100, 400, [0, 0, 0, 255]).unwrap());
        let mut editor = Editor::init(
            Vec2::new(800.0, 600.0),
            Vec2::new(800.0, 600.0),
            EditorConfig::default(),
            Box::new(loader),
        );
        editor.add_image("tall.png");
        let id = editor.poll_image_loads()[0];

        let bounds = editor.canvas().object(id).unwrap().bounds();
        assert!((bounds.height() - 1200.0).abs() < 1e-3);
        assert!((bounds.width() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_failed_load_is_dropped() {
        let mut editor = editor_with_asset();
        editor.add_image("missing.png");
        assert!(editor.poll_image_loads().is_empty());
        assert_eq!(editor.pending_image_loads(), 0);
        assert_eq!(editor.canvas().len(), 1);
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn test_filter_only_touches_images() {
        let mut editor = editor_with_asset();
        editor.add_image("photo.png");
        let image = editor.poll_image_loads()[0];
        let rect = editor.add_rectangle();
        editor.select(&[image, rect]);

        editor.change_image_filter("sepia").unwrap();
        let props = editor.canvas().object(image).unwrap().image().unwrap();
        assert_eq!(props.filter, Some(ImageFilter::Sepia));

        editor.change_image_filter("invert").unwrap();
        let props = editor.canvas().object(image).unwrap().image().unwrap();
        assert_eq!(props.filter, Some(ImageFilter::Invert));

        editor.change_image_filter("none").unwrap();
        assert_eq!(editor.canvas().object(image).unwrap().image().unwrap().filter, None);

        assert!(matches!(
            editor.change_image_filter("posterize"),
            Err(EditorError::UnknownFilter(_))
        ));
    }
}
