use egui::Color32;
use log::warn;

use super::Editor;
use crate::element::{DrawableObject, FontStyle, TextAlign, TextProps};

/// Numeric setters drop non-finite input; such a value could not be restored
/// from a history entry.
fn finite(property: &str, value: f32) -> Option<f32> {
    if value.is_finite() {
        Some(value)
    } else {
        warn!("Ignoring non-finite {property}: {value}");
        None
    }
}

/// Property getters read the first selected object and fall back to the
/// session defaults. Setters update the defaults as well as every selected
/// object the property applies to.
impl Editor {
    fn first_selected(&self) -> Option<&DrawableObject> {
        self.selected_objects().into_iter().next()
    }

    fn first_selected_text(&self) -> Option<&TextProps> {
        self.first_selected().and_then(DrawableObject::text)
    }

    /// Apply `edit` to every selected object, then record one entry
    fn edit_selection(&mut self, mut edit: impl FnMut(&mut DrawableObject)) {
        let ids = self.canvas.active_ids().to_vec();
        for id in ids {
            self.canvas.modify_object(id, &mut edit);
        }
        self.canvas.render_all();
        self.commit();
    }

    /// Like [`Editor::edit_selection`] but only touches text objects
    fn edit_selected_text(&mut self, mut edit: impl FnMut(&mut TextProps)) {
        let ids: Vec<_> = self
            .canvas
            .active_objects()
            .into_iter()
            .filter(|object| object.is_text())
            .map(|object| object.id)
            .collect();
        for id in ids {
            self.canvas.modify_object(id, |object| {
                if let Some(props) = object.text_mut() {
                    edit(props);
                }
                object.refresh_text_metrics();
            });
        }
        self.canvas.render_all();
        self.commit();
    }

    // --- fill ---

    pub fn get_active_fill_color(&self) -> Color32 {
        self.first_selected()
            .and_then(|object| object.fill)
            .unwrap_or(self.session.defaults.fill)
    }

    pub fn change_fill_color(&mut self, color: Color32) {
        self.session.defaults.fill = color;
        self.edit_selection(|object| object.fill = Some(color));
    }

    // --- stroke ---

    pub fn get_active_stroke_color(&self) -> Color32 {
        self.first_selected()
            .and_then(|object| object.stroke)
            .unwrap_or(self.session.defaults.stroke_color)
    }

    /// Text has no outline, so text objects take the colour as their fill
    pub fn change_stroke_color(&mut self, color: Color32) {
        self.session.defaults.stroke_color = color;
        self.canvas.brush_mut().set_color(color);
        self.edit_selection(|object| {
            if object.is_text() {
                object.fill = Some(color);
            } else {
                object.stroke = Some(color);
            }
        });
    }

    pub fn get_active_stroke_width(&self) -> f32 {
        self.first_selected()
            .map(|object| object.stroke_width)
            .unwrap_or(self.session.defaults.stroke_width)
    }

    /// Also sets the freehand brush width
    pub fn change_stroke_width(&mut self, width: f32) {
        let Some(width) = finite("stroke width", width) else {
            return;
        };
        let width = width.max(0.0);
        self.session.defaults.stroke_width = width;
        self.canvas.brush_mut().set_width(width);
        self.edit_selection(|object| object.stroke_width = width);
    }

    pub fn get_active_stroke_dash_array(&self) -> Vec<f32> {
        self.first_selected()
            .map(|object| object.stroke_dash_array.clone())
            .unwrap_or_else(|| self.session.defaults.stroke_dash_array.clone())
    }

    pub fn change_stroke_dash_array(&mut self, dash_array: &[f32]) {
        if dash_array.iter().any(|dash| finite("dash length", *dash).is_none()) {
            return;
        }
        self.session.defaults.stroke_dash_array = dash_array.to_vec();
        self.edit_selection(|object| object.stroke_dash_array = dash_array.to_vec());
    }

    // --- opacity ---

    pub fn get_active_opacity(&self) -> f32 {
        self.first_selected()
            .map(|object| object.opacity)
            .unwrap_or(self.session.defaults.opacity)
    }

    pub fn change_opacity(&mut self, opacity: f32) {
        let Some(opacity) = finite("opacity", opacity) else {
            return;
        };
        let opacity = opacity.clamp(0.0, 1.0);
        self.session.defaults.opacity = opacity;
        self.edit_selection(|object| object.opacity = opacity);
    }

    // --- text ---

    pub fn get_active_font_family(&self) -> String {
        self.first_selected_text()
            .map(|props| props.font_family.clone())
            .unwrap_or_else(|| self.session.defaults.font_family.clone())
    }

    pub fn change_font_family(&mut self, family: &str) {
        self.session.defaults.font_family = family.to_string();
        self.edit_selected_text(|props| props.font_family = family.to_string());
    }

    pub fn get_active_font_size(&self) -> f32 {
        self.first_selected_text()
            .map(|props| props.font_size)
            .unwrap_or(self.session.defaults.font_size)
    }

    pub fn change_font_size(&mut self, size: f32) {
        let Some(size) = finite("font size", size) else {
            return;
        };
        self.session.defaults.font_size = size;
        self.edit_selected_text(|props| props.font_size = size);
    }

    pub fn get_active_font_weight(&self) -> u16 {
        self.first_selected_text()
            .map(|props| props.font_weight)
            .unwrap_or(self.session.defaults.font_weight)
    }

    pub fn change_font_weight(&mut self, weight: u16) {
        self.session.defaults.font_weight = weight;
        self.edit_selected_text(|props| props.font_weight = weight);
    }

    pub fn get_active_font_style(&self) -> FontStyle {
        self.first_selected_text()
            .map(|props| props.font_style)
            .unwrap_or(self.session.defaults.font_style)
    }

    pub fn change_font_style(&mut self, style: FontStyle) {
        self.session.defaults.font_style = style;
        self.edit_selected_text(|props| props.font_style = style);
    }

    pub fn get_active_text_align(&self) -> TextAlign {
        self.first_selected_text()
            .map(|props| props.text_align)
            .unwrap_or(self.session.defaults.text_align)
    }

    pub fn change_text_align(&mut self, align: TextAlign) {
        self.session.defaults.text_align = align;
        self.edit_selected_text(|props| props.text_align = align);
    }

    pub fn get_active_font_underline(&self) -> bool {
        self.first_selected_text()
            .map(|props| props.underline)
            .unwrap_or(self.session.defaults.underline)
    }

    pub fn change_font_underline(&mut self, underline: bool) {
        self.session.defaults.underline = underline;
        self.edit_selected_text(|props| props.underline = underline);
    }

    pub fn get_active_font_linethrough(&self) -> bool {
        self.first_selected_text()
            .map(|props| props.linethrough)
            .unwrap_or(self.session.defaults.linethrough)
    }

    pub fn change_font_linethrough(&mut self, linethrough: bool) {
        self.session.defaults.linethrough = linethrough;
        self.edit_selected_text(|props| props.linethrough = linethrough);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EditorConfig;
    use crate::editor::Editor;
    use crate::element::TextOptions;
    use crate::loader::MemoryImageLoader;
    use egui::{Color32, Vec2};

    fn editor() -> Editor {
        Editor::init(
            Vec2::new(800.0, 600.0),
            Vec2::new(800.0, 600.0),
            EditorConfig::default(),
            Box::new(MemoryImageLoader::new()),
        )
    }

    #[test]
    fn test_getters_fall_back_to_defaults() {
        let editor = editor();
        assert_eq!(editor.get_active_fill_color(), Color32::BLACK);
        assert_eq!(editor.get_active_stroke_width(), 2.0);
        assert_eq!(editor.get_active_font_size(), 32.0);
        assert_eq!(editor.get_active_font_family(), "Arial");
        assert_eq!(editor.get_active_opacity(), 1.0);
    }

    #[test]
    fn test_stroke_color_on_text_sets_fill() {
        let mut editor = editor();
        let text = editor.add_text("hi", &TextOptions::default());
        editor.change_stroke_color(Color32::RED);

        let object = editor.canvas().object(text).unwrap();
        assert_eq!(object.fill, Some(Color32::RED));
        assert_eq!(object.stroke, None);
        assert_eq!(editor.canvas().brush().color(), Color32::RED);
    }

    #[test]
    fn test_setter_updates_defaults_without_selection() {
        let mut editor = editor();
        editor.change_fill_color(Color32::BLUE);
        assert_eq!(editor.history().len(), 1);
        let id = editor.add_circle();
        assert_eq!(editor.canvas().object(id).unwrap().fill, Some(Color32::BLUE));
    }

    #[test]
    fn test_stroke_width_also_sets_brush() {
        let mut editor = editor();
        let id = editor.add_rectangle();
        editor.change_stroke_width(7.0);
        assert_eq!(editor.get_active_stroke_width(), 7.0);
        assert_eq!(editor.canvas().object(id).unwrap().stroke_width, 7.0);
        assert_eq!(editor.canvas().brush().width(), 7.0);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let mut editor = editor();
        let circle = editor.add_circle();
        let text = editor.add_text("hi", &TextOptions::default());
        editor.select(&[circle, text]);
        let len = editor.history().len();

        editor.change_opacity(f32::NAN);
        editor.change_stroke_width(f32::INFINITY);
        editor.change_font_size(f32::NAN);
        editor.change_stroke_dash_array(&[4.0, f32::NAN]);

        assert_eq!(editor.history().len(), len);
        assert_eq!(editor.get_active_opacity(), 1.0);
        assert_eq!(editor.canvas().object(text).unwrap().text().unwrap().font_size, 32.0);
        assert!(editor.canvas().object(circle).unwrap().stroke_dash_array.is_empty());

        editor.add_rectangle();
        assert!(editor.undo());
        assert!(editor.undo());
        assert_eq!(editor.canvas().len(), 2);
    }

    #[test]
    fn test_font_size_grows_textbox() {
        let mut editor = editor();
        let text = editor.add_text("hi", &TextOptions::default());
        let before = editor.canvas().object(text).unwrap().size.y;
        editor.change_font_size(64.0);
        let after = editor.canvas().object(text).unwrap().size.y;
        assert!((after - before * 2.0).abs() < 1e-3);
        assert_eq!(editor.get_active_font_size(), 64.0);
    }
}
