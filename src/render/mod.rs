mod display_list;
mod texture_manager;

pub use display_list::{DisplayList, SceneRenderer};
pub use texture_manager::{TextureGenerationError, TextureManager, texture_version, to_color_image};
