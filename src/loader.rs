//! Asynchronous bitmap loading for image objects.
//!
//! Loaders hand back a future; the editor keeps it and polls it from its own
//! loop, so nothing here needs an executor or a second thread.

use egui::Vec2;
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use image::RgbaImage;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{EditorError, EditorResult};

/// A decoded bitmap and the source it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub src: String,
    pub pixels: RgbaImage,
}

impl LoadedImage {
    /// Decode any format the `image` crate understands
    pub fn from_bytes(src: impl Into<String>, bytes: &[u8]) -> EditorResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        let pixels = decoded.to_rgba8();
        let src = src.into();
        debug!("Decoded {src}: {}x{}", pixels.width(), pixels.height());
        Ok(Self { src, pixels })
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }
}

pub type ImageLoadFuture = LocalBoxFuture<'static, EditorResult<LoadedImage>>;

/// Resolves an image source to pixels
pub trait ImageLoader {
    fn load(&self, src: &str) -> ImageLoadFuture;
}

/// Reads images from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageLoader;

impl ImageLoader for FileImageLoader {
    fn load(&self, src: &str) -> ImageLoadFuture {
        let src = src.to_string();
        async move {
            #[cfg(not(target_arch = "wasm32"))]
            {
                let bytes = std::fs::read(&src).map_err(|err| EditorError::AssetLoad {
                    source_name: src.clone(),
                    reason: err.to_string(),
                })?;
                LoadedImage::from_bytes(src, &bytes)
            }

            #[cfg(target_arch = "wasm32")]
            {
                Err(EditorError::AssetLoad {
                    source_name: src,
                    reason: "file system access is not available on the web".to_string(),
                })
            }
        }
        .boxed_local()
    }
}

/// Serves encoded images from a shared in-memory map.
///
/// Clones share the same map, so assets can be registered after the loader
/// has been handed to the editor.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageLoader {
    assets: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, src: impl Into<String>, bytes: Vec<u8>) {
        self.assets.write().insert(src.into(), bytes);
    }

    pub fn remove(&self, src: &str) -> Option<Vec<u8>> {
        self.assets.write().remove(src)
    }

    pub fn contains(&self, src: &str) -> bool {
        self.assets.read().contains_key(src)
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, src: &str) -> ImageLoadFuture {
        let assets = Arc::clone(&self.assets);
        let src = src.to_string();
        async move {
            let bytes = assets.read().get(&src).cloned();
            match bytes {
                Some(bytes) => LoadedImage::from_bytes(src, &bytes),
                None => Err(EditorError::AssetLoad {
                    source_name: src,
                    reason: "no such asset".to_string(),
                }),
            }
        }
        .boxed_local()
    }
}

/// Encode a solid-colour PNG, handy for seeding a [`MemoryImageLoader`]
pub fn encode_png(width: u32, height: u32, rgba: [u8; 4]) -> EditorResult<Vec<u8>> {
    let pixels = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut bytes = std::io::Cursor::new(Vec::new());
    pixels.write_to(&mut bytes, image::ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_memory_loader_decodes_png() {
        let loader = MemoryImageLoader::new();
        loader.insert("red.png", encode_png(4, 3, [255, 0, 0, 255]).unwrap());

        let loaded = block_on(loader.load("red.png")).unwrap();
        assert_eq!(loaded.size(), Vec2::new(4.0, 3.0));
        assert_eq!(loaded.pixels.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_missing_asset_is_an_error() {
        let loader = MemoryImageLoader::new();
        assert!(matches!(
            block_on(loader.load("missing.png")),
            Err(EditorError::AssetLoad { .. })
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let loader = MemoryImageLoader::new();
        loader.insert("bad.png", vec![1, 2, 3]);
        assert!(matches!(
            block_on(loader.load("bad.png")),
            Err(EditorError::ImageDecode(_))
        ));
    }

    #[test]
    #[cfg(not(target_arch = "wasm32"))]
    fn test_file_loader_reports_missing_file() {
        let result = block_on(FileImageLoader.load("/definitely/not/here.png"));
        assert!(matches!(result, Err(EditorError::AssetLoad { .. })));
    }
}
