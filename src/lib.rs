#![warn(clippy::all, rust_2018_idioms)]

pub mod clipboard;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod history;
pub mod loader;
pub mod render;
pub mod scene;
pub mod selection;
pub mod snapshot;
pub mod style;
pub mod tool;
pub mod util;
pub mod viewport;

pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{DrawableObject, ImageFilter, ObjectId, ObjectKind, TextOptions};
pub use error::{EditorError, EditorResult};
pub use history::{HistoryEntry, HistoryManager};
pub use loader::{FileImageLoader, ImageLoader, LoadedImage, MemoryImageLoader};
pub use render::{DisplayList, SceneRenderer};
pub use scene::Canvas;
pub use snapshot::SceneSnapshot;
pub use tool::{ActiveTool, SessionState, StyleDefaults};
