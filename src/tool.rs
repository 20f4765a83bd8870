use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::{FontStyle, TextAlign};
use crate::error::EditorResult;

pub const FILL_COLOR: Color32 = Color32::BLACK;
pub const STROKE_COLOR: Color32 = Color32::BLACK;
pub const STROKE_WIDTH: f32 = 2.0;
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_SIZE: f32 = 32.0;
pub const FONT_WEIGHT: u16 = 400;

/// The interaction mode currently selected in the editor chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveTool {
    #[default]
    Select,
    Shapes,
    Text,
    Images,
    Draw,
    Fill,
    StrokeColor,
    StrokeWidth,
    Font,
    Opacity,
    Filter,
    Settings,
}

impl ActiveTool {
    /// Whether this tool puts the canvas into freehand drawing mode
    pub fn is_drawing(&self) -> bool {
        matches!(self, ActiveTool::Draw)
    }
}

/// Shared style values seeding new objects and backing the property getters
/// when nothing is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub fill: Color32,
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub stroke_dash_array: Vec<f32>,
    pub opacity: f32,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub underline: bool,
    pub linethrough: bool,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill: FILL_COLOR,
            stroke_color: STROKE_COLOR,
            stroke_width: STROKE_WIDTH,
            stroke_dash_array: Vec::new(),
            opacity: 1.0,
            font_family: FONT_FAMILY.to_string(),
            font_size: FONT_SIZE,
            font_weight: FONT_WEIGHT,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            underline: false,
            linethrough: false,
        }
    }
}

/// Editor session state that lives outside of scene snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub active_tool: ActiveTool,
    pub defaults: StyleDefaults,
}

impl SessionState {
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_json() {
        let session = SessionState {
            active_tool: ActiveTool::StrokeWidth,
            defaults: StyleDefaults {
                stroke_dash_array: vec![5.0, 5.0],
                ..StyleDefaults::default()
            },
        };
        let json = session.to_json().unwrap();
        assert!(json.contains("\"stroke-width\""));
        assert_eq!(SessionState::from_json(&json).unwrap(), session);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let session = SessionState::from_json(r#"{"active_tool":"draw"}"#).unwrap();
        assert!(session.active_tool.is_drawing());
        assert_eq!(session.defaults, StyleDefaults::default());
    }
}
