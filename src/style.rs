use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    #[default]
    Circle,
    Rect,
}

/// Styling of the selection handles drawn around an active object.
///
/// Passed to the scene at construction and stamped onto every object as it
/// is added, so each instance carries its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleStyle {
    pub corner_color: Color32,
    pub corner_style: CornerStyle,
    pub corner_stroke_color: Color32,
    pub border_color: Color32,
    pub border_scale_factor: f32,
    pub border_opacity_when_moving: f32,
    pub transparent_corners: bool,
}

impl Default for HandleStyle {
    fn default() -> Self {
        let accent = Color32::from_rgb(0x3b, 0x82, 0xf6);
        Self {
            corner_color: Color32::WHITE,
            corner_style: CornerStyle::Circle,
            corner_stroke_color: accent,
            border_color: accent,
            border_scale_factor: 1.5,
            border_opacity_when_moving: 1.0,
            transparent_corners: false,
        }
    }
}

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a handful of CSS colour names.
pub fn parse_color(value: &str) -> EditorResult<Color32> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "white" => return Ok(Color32::WHITE),
        "black" => return Ok(Color32::BLACK),
        "transparent" => return Ok(Color32::TRANSPARENT),
        "red" => return Ok(Color32::RED),
        "green" => return Ok(Color32::GREEN),
        "blue" => return Ok(Color32::BLUE),
        _ => {}
    }
    Color32::from_hex(trimmed).map_err(|_| EditorError::InvalidColor(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("white").unwrap(), Color32::WHITE);
        assert_eq!(parse_color("#3b82f6").unwrap(), Color32::from_rgb(0x3b, 0x82, 0xf6));
        assert!(matches!(parse_color("not-a-color"), Err(EditorError::InvalidColor(_))));
    }

    #[test]
    fn test_default_handle_style() {
        let style = HandleStyle::default();
        assert_eq!(style.corner_color, Color32::WHITE);
        assert_eq!(style.corner_style, CornerStyle::Circle);
        assert!(!style.transparent_corners);
    }
}
