use serde::{Deserialize, Serialize};

/// Line height multiplier applied to the font size when laying out a textbox
pub const LINE_HEIGHT: f32 = 1.16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Text-only attributes of a textbox
#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub underline: bool,
    pub linethrough: bool,
}

impl TextProps {
    /// Height taken by the text content at the current font size
    pub fn layout_height(&self) -> f32 {
        let lines = self.text.lines().count().max(1) as f32;
        lines * self.font_size * LINE_HEIGHT
    }
}

/// Per-call overrides for `add_text`; unset fields fall back to session defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOptions {
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub width: Option<f32>,
}
