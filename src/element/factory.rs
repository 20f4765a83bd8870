//! Constructors for every object kind with the editor's default presets.

use egui::{Color32, Pos2, Vec2};

use super::common::localize_points;
use super::{DrawableObject, ImageProps, ObjectKind, Shadow, TextOptions, TextProps};
use crate::tool::StyleDefaults;

pub const PRESET_LEFT: f32 = 100.0;
pub const PRESET_TOP: f32 = 100.0;
pub const RECTANGLE_SIZE: Vec2 = Vec2::new(400.0, 400.0);
pub const SOFT_RECTANGLE_RADIUS: f32 = 10.0;
pub const CIRCLE_RADIUS: f32 = 225.0;
pub const TRIANGLE_SIZE: Vec2 = Vec2::new(400.0, 400.0);
pub const DIAMOND_SIZE: Vec2 = Vec2::new(600.0, 600.0);
pub const TEXTBOX_WIDTH: f32 = 400.0;

fn styled(kind: ObjectKind, size: Vec2, defaults: &StyleDefaults) -> DrawableObject {
    let mut object = DrawableObject::new(kind, size);
    object.position = Pos2::new(PRESET_LEFT, PRESET_TOP);
    object.fill = Some(defaults.fill);
    object.stroke = Some(defaults.stroke_color);
    object.stroke_width = defaults.stroke_width;
    object.stroke_dash_array = defaults.stroke_dash_array.clone();
    object.opacity = defaults.opacity;
    object
}

pub fn create_rectangle(defaults: &StyleDefaults) -> DrawableObject {
    styled(ObjectKind::Rect { rx: 0.0, ry: 0.0 }, RECTANGLE_SIZE, defaults)
}

pub fn create_soft_rectangle(defaults: &StyleDefaults) -> DrawableObject {
    styled(
        ObjectKind::Rect {
            rx: SOFT_RECTANGLE_RADIUS,
            ry: SOFT_RECTANGLE_RADIUS,
        },
        RECTANGLE_SIZE,
        defaults,
    )
}

pub fn create_circle(defaults: &StyleDefaults) -> DrawableObject {
    styled(
        ObjectKind::Circle { radius: CIRCLE_RADIUS },
        Vec2::splat(CIRCLE_RADIUS * 2.0),
        defaults,
    )
}

pub fn create_triangle(defaults: &StyleDefaults) -> DrawableObject {
    styled(ObjectKind::Triangle, TRIANGLE_SIZE, defaults)
}

/// Triangle pointing down, built as a polygon
pub fn create_inverse_triangle(defaults: &StyleDefaults) -> DrawableObject {
    let (w, h) = (TRIANGLE_SIZE.x, TRIANGLE_SIZE.y);
    let points = vec![Pos2::new(0.0, 0.0), Pos2::new(w, 0.0), Pos2::new(w / 2.0, h)];
    styled(ObjectKind::Polygon { points }, TRIANGLE_SIZE, defaults)
}

pub fn create_diamond(defaults: &StyleDefaults) -> DrawableObject {
    let (w, h) = (DIAMOND_SIZE.x, DIAMOND_SIZE.y);
    let points = vec![
        Pos2::new(w / 2.0, 0.0),
        Pos2::new(w, h / 2.0),
        Pos2::new(w / 2.0, h),
        Pos2::new(0.0, h / 2.0),
    ];
    styled(ObjectKind::Polygon { points }, DIAMOND_SIZE, defaults)
}

/// Textbox filled with the session fill colour; options override the defaults.
pub fn create_text(text: &str, defaults: &StyleDefaults, options: &TextOptions) -> DrawableObject {
    let props = TextProps {
        text: text.to_string(),
        font_family: options
            .font_family
            .clone()
            .unwrap_or_else(|| defaults.font_family.clone()),
        font_size: options.font_size.unwrap_or(defaults.font_size),
        font_weight: options.font_weight.unwrap_or(defaults.font_weight),
        font_style: options.font_style.unwrap_or(defaults.font_style),
        text_align: options.text_align.unwrap_or(defaults.text_align),
        underline: defaults.underline,
        linethrough: defaults.linethrough,
    };
    let size = Vec2::new(options.width.unwrap_or(TEXTBOX_WIDTH), props.layout_height());
    let mut object = DrawableObject::new(ObjectKind::Textbox(props), size);
    object.position = Pos2::new(PRESET_LEFT, PRESET_TOP);
    object.fill = Some(defaults.fill);
    object.opacity = defaults.opacity;
    object.stroke_width = 0.0;
    object
}

/// Image object sized to its bitmap; no stroke.
pub fn create_image(src: &str, natural_size: Vec2) -> DrawableObject {
    let props = ImageProps {
        src: src.to_string(),
        natural_size,
        filter: None,
    };
    let mut object = DrawableObject::new(ObjectKind::Image(props), natural_size);
    object.stroke_width = 0.0;
    object
}

/// Freehand path from absolute scene points
pub fn create_path(points: &[Pos2], color: Color32, width: f32) -> DrawableObject {
    let (origin, size, local) = localize_points(points);
    let mut object = DrawableObject::new(ObjectKind::Path { points: local }, size);
    object.position = origin;
    object.stroke = Some(color);
    object.stroke_width = width;
    object
}

/// The workspace: a non-selectable background rectangle tagged with `name`.
pub fn create_workspace(name: &str, size: Vec2, background: Color32) -> DrawableObject {
    let mut object = DrawableObject::new(ObjectKind::Rect { rx: 0.0, ry: 0.0 }, size).with_name(name);
    object.fill = Some(background);
    object.stroke_width = 0.0;
    object.selectable = false;
    object.has_controls = false;
    object.shadow = Some(Shadow {
        color: Color32::from_rgba_unmultiplied(0, 0, 0, 204),
        blur: 5.0,
    });
    object
}
