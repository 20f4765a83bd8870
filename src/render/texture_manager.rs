use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::element::{ImageFilter, ObjectId};

/// Errors that can occur while producing a texture
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("No bitmap loaded for {0}")]
    MissingBitmap(String),
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

type CacheKey = (ObjectId, u64);

/// Caches the uploaded textures of image objects.
///
/// Entries are keyed by object and a content version, so changing the
/// source or the filter of an image picks a new texture without explicit
/// invalidation. Least recently used entries are evicted past the limit.
pub struct TextureManager {
    texture_cache: HashMap<CacheKey, TextureHandle>,
    last_used: HashMap<CacheKey, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

/// Content version of an image object's texture
pub fn texture_version(src: &str, filter: Option<ImageFilter>) -> u64 {
    let mut hasher = DefaultHasher::new();
    src.hash(&mut hasher);
    filter.map(|filter| filter.name()).hash(&mut hasher);
    hasher.finish()
}

/// Convert decoded pixels to an egui image, optionally filtered
pub fn to_color_image(
    pixels: &RgbaImage,
    filter: Option<ImageFilter>,
) -> Result<ColorImage, TextureGenerationError> {
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(TextureGenerationError::InvalidDimensions);
    }
    let filtered;
    let source = match filter {
        Some(filter) => {
            filtered = filter.apply(pixels);
            &filtered
        }
        None => pixels,
    };
    let size = [source.width() as usize, source.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, source.as_raw()))
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size: max_cache_size.max(1),
        }
    }

    /// Call once at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    pub fn get_or_create_texture<F>(
        &mut self,
        object_id: ObjectId,
        texture_version: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (object_id, texture_version);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        let image = generator()?;
        self.make_room();

        let name = format!("object_{}_v{:x}", object_id, texture_version);
        let handle = ctx.load_texture(&name, image, TextureOptions::LINEAR);
        let id = handle.id();

        self.texture_cache.insert(cache_key, handle);
        self.last_used.insert(cache_key, self.current_frame);
        Ok(id)
    }

    pub fn invalidate_object(&mut self, object_id: ObjectId) {
        self.texture_cache.retain(|(id, _), _| *id != object_id);
        self.last_used.retain(|(id, _), _| *id != object_id);
    }

    /// Evict least recently used entries so one more fits
    fn make_room(&mut self) {
        if self.texture_cache.len() < self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> =
            self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = self.texture_cache.len() + 1 - self.max_cache_size;
        for (key, _) in entries.into_iter().take(to_remove) {
            self.texture_cache.remove(&key);
            self.last_used.remove(&key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    pub fn contains(&self, object_id: ObjectId, version: u64) -> bool {
        self.texture_cache.contains_key(&(object_id, version))
    }
}
