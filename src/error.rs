use thiserror::Error;

/// Errors surfaced by the explicitly fallible editor APIs.
///
/// Expected edge cases (no workspace, empty selection, history boundaries,
/// failed image loads) are handled as no-ops and never show up here.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Failed to (de)serialize: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Failed to load asset {source_name}: {reason}")]
    AssetLoad { source_name: String, reason: String },

    #[error("Unknown image filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
