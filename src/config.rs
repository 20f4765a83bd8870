use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::style::HandleStyle;
use crate::tool::StyleDefaults;

pub const WORKSPACE_NAME: &str = "clip";
pub const WORKSPACE_WIDTH: f32 = 900.0;
pub const WORKSPACE_HEIGHT: f32 = 1200.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub width: f32,
    pub height: f32,
    pub background: Color32,
    /// Name tagging the workspace object inside the scene
    pub name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            width: WORKSPACE_WIDTH,
            height: WORKSPACE_HEIGHT,
            background: Color32::WHITE,
            name: WORKSPACE_NAME.to_string(),
        }
    }
}

impl WorkspaceConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Fraction of the container the workspace fills after auto-zoom
    pub padding: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 0.85,
            min_zoom: 0.2,
            max_zoom: 5.0,
            zoom_step: 0.05,
        }
    }
}

impl ViewportConfig {
    /// Clamp into `[min_zoom, max_zoom]`. Never panics, even for bounds that
    /// [`ViewportConfig::validate`] would reject.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }

    pub fn validate(&self) -> EditorResult<()> {
        let finite = [self.padding, self.min_zoom, self.max_zoom, self.zoom_step]
            .iter()
            .all(|value| value.is_finite());
        if !finite {
            return Err(EditorError::InvalidConfig(
                "viewport values must be finite".to_string(),
            ));
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(EditorError::InvalidConfig(format!(
                "zoom range {}..{} is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_step <= 0.0 || self.padding <= 0.0 {
            return Err(EditorError::InvalidConfig(format!(
                "zoom step {} and padding {} must be positive",
                self.zoom_step, self.padding
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Oldest entries are dropped past this many. `None` keeps everything.
    pub max_entries: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: Some(100),
        }
    }
}

/// Everything the editor needs to know up front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub workspace: WorkspaceConfig,
    pub viewport: ViewportConfig,
    pub history: HistoryConfig,
    pub handles: HandleStyle,
    pub defaults: StyleDefaults,
    pub paste_offset: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            workspace: WorkspaceConfig::default(),
            viewport: ViewportConfig::default(),
            history: HistoryConfig::default(),
            handles: HandleStyle::default(),
            defaults: StyleDefaults::default(),
            paste_offset: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse a config, filling missing fields with defaults. Values that
    /// would break the viewport are rejected.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.viewport.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config =
            EditorConfig::from_json(r#"{"viewport":{"max_zoom":3.0},"paste_offset":20.0}"#).unwrap();
        assert_eq!(config.viewport.max_zoom, 3.0);
        assert_eq!(config.viewport.min_zoom, 0.2);
        assert_eq!(config.paste_offset, 20.0);
        assert_eq!(config.workspace, WorkspaceConfig::default());
        assert_eq!(config.history.max_entries, Some(100));
    }

    #[test]
    fn test_rejects_unusable_viewport() {
        for json in [
            r#"{"viewport":{"min_zoom":6.0}}"#,
            r#"{"viewport":{"zoom_step":0.0}}"#,
            r#"{"viewport":{"min_zoom":-1.0}}"#,
        ] {
            assert!(
                matches!(EditorConfig::from_json(json), Err(EditorError::InvalidConfig(_))),
                "{json} should be rejected"
            );
        }

        let nan = ViewportConfig {
            max_zoom: f32::NAN,
            ..ViewportConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_clamp_zoom_tolerates_inverted_bounds() {
        let inverted = ViewportConfig {
            min_zoom: 6.0,
            ..ViewportConfig::default()
        };
        assert_eq!(inverted.clamp_zoom(1.0), 5.0);
        assert_eq!(ViewportConfig::default().clamp_zoom(10.0), 5.0);
        assert_eq!(ViewportConfig::default().clamp_zoom(0.01), 0.2);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(EditorConfig::from_json("{not json").is_err());
    }
}
