use egui::epaint::Shadow as PaintShadow;
use egui::text::{LayoutJob, TextFormat};
use egui::{Align, Color32, Context, FontFamily, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};
use image::RgbaImage;
use log::warn;
use std::collections::HashMap;

use super::texture_manager::{TextureManager, texture_version, to_color_image};
use crate::element::{DrawableObject, FontStyle, ObjectKind, TextAlign};
use crate::scene::{Canvas, ViewportTransform};
use crate::style::CornerStyle;

const CIRCLE_SEGMENTS: usize = 64;
const CORNER_SIZE: f32 = 13.0;
const ROTATION_HANDLE_OFFSET: f32 = 40.0;
const PLACEHOLDER_COLOR: Color32 = Color32::from_gray(200);

/// Shapes for one frame, in screen space.
///
/// `background` holds the workspace, `clipped` everything painted on it and
/// `overlay` the selection handles.
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    pub background: Vec<Shape>,
    pub clipped: Vec<Shape>,
    pub clip_rect: Option<Rect>,
    pub overlay: Vec<Shape>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.background.len() + self.clipped.len() + self.overlay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand everything to an egui painter
    pub fn paint(self, painter: &Painter) {
        painter.extend(self.background);
        match self.clip_rect {
            Some(clip) => painter.with_clip_rect(clip.intersect(painter.clip_rect())).extend(self.clipped),
            None => painter.extend(self.clipped),
        }
        painter.extend(self.overlay);
    }
}

/// Turns a canvas into egui shapes, keeping decoded bitmaps and textures around
/// between frames.
#[derive(Debug)]
pub struct SceneRenderer {
    textures: TextureManager,
    bitmaps: HashMap<String, RgbaImage>,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(64)
    }
}

impl SceneRenderer {
    pub fn new(max_textures: usize) -> Self {
        Self {
            textures: TextureManager::new(max_textures),
            bitmaps: HashMap::new(),
        }
    }

    pub fn insert_bitmap(&mut self, src: impl Into<String>, pixels: RgbaImage) {
        self.bitmaps.insert(src.into(), pixels);
    }

    pub fn bitmap(&self, src: &str) -> Option<&RgbaImage> {
        self.bitmaps.get(src)
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// Build this frame's display list. Must be called while `ctx` has fonts,
    /// i.e. from inside a frame.
    pub fn build(&mut self, canvas: &Canvas, ctx: &Context) -> DisplayList {
        self.textures.begin_frame();
        let transform = canvas.viewport();
        let workspace_id = canvas.find_workspace().map(|workspace| workspace.id);

        let mut list = DisplayList {
            clip_rect: canvas
                .clip_rect()
                .map(|rect| transform.scene_rect_to_screen(rect)),
            ..DisplayList::default()
        };

        for object in canvas.list_objects() {
            let target = if Some(object.id) == workspace_id {
                &mut list.background
            } else {
                &mut list.clipped
            };
            self.push_object(object, &transform, ctx, target);
        }

        for object in canvas.active_objects() {
            if object.has_controls {
                push_handles(object, &transform, &mut list.overlay);
            }
        }
        list
    }

    fn push_object(
        &mut self,
        object: &DrawableObject,
        transform: &ViewportTransform,
        ctx: &Context,
        shapes: &mut Vec<Shape>,
    ) {
        let zoom = transform.zoom;
        let screen_rect = transform.scene_rect_to_screen(object.bounds());

        if let Some(shadow) = object.shadow {
            let paint_shadow = PaintShadow {
                offset: Vec2::ZERO,
                blur: shadow.blur * zoom,
                spread: 0.0,
                color: shadow.color.gamma_multiply(object.opacity),
            };
            shapes.push(paint_shadow.as_shape(screen_rect, 0.0).into());
        }

        let fill = object.fill.map(|color| color.gamma_multiply(object.opacity));
        let stroke = object
            .stroke
            .filter(|_| object.stroke_width > 0.0)
            .map(|color| Stroke::new(object.stroke_width * zoom, color.gamma_multiply(object.opacity)));

        match &object.kind {
            ObjectKind::Rect { rx, .. } if object.angle == 0.0 => {
                let rounding = rx * object.scale.x * zoom;
                if let Some(fill) = fill {
                    shapes.push(Shape::rect_filled(screen_rect, rounding, fill));
                }
                if let Some(stroke) = stroke {
                    let outline = outline(object, transform);
                    push_outline(object, outline, stroke, zoom, rounding == 0.0, screen_rect, shapes);
                }
            }
            ObjectKind::Path { .. } => {
                if let Some(stroke) = stroke {
                    let points = outline(object, transform);
                    if object.stroke_dash_array.is_empty() {
                        shapes.push(Shape::line(points, stroke));
                    } else {
                        let (dash, gap) = dash_pattern(&object.stroke_dash_array, zoom);
                        shapes.extend(Shape::dashed_line(&points, stroke, dash, gap));
                    }
                }
            }
            ObjectKind::Textbox(props) => {
                let color = fill.unwrap_or(Color32::TRANSPARENT);
                let font_size = props.font_size * object.scale.y * zoom;
                let family = match props.font_family.to_ascii_lowercase().as_str() {
                    "monospace" | "courier" | "courier new" => FontFamily::Monospace,
                    _ => FontFamily::Proportional,
                };
                let line = |on: bool| if on { Stroke::new((font_size / 15.0).max(1.0), color) } else { Stroke::NONE };
                let format = TextFormat {
                    font_id: FontId::new(font_size, family),
                    color,
                    italics: props.font_style != FontStyle::Normal,
                    underline: line(props.underline),
                    strikethrough: line(props.linethrough),
                    ..TextFormat::default()
                };
                let mut job = LayoutJob::default();
                job.append(&props.text, 0.0, format);
                job.wrap.max_width = screen_rect.width();
                let (halign, anchor_x) = match props.text_align {
                    TextAlign::Left | TextAlign::Justify => (Align::LEFT, screen_rect.left()),
                    TextAlign::Center => (Align::Center, screen_rect.center().x),
                    TextAlign::Right => (Align::RIGHT, screen_rect.right()),
                };
                job.halign = halign;
                let galley = ctx.fonts(|fonts| fonts.layout_job(job));
                shapes.push(Shape::galley(Pos2::new(anchor_x, screen_rect.top()), galley, color));
            }
            ObjectKind::Image(props) => {
                let texture = match self.bitmaps.get(&props.src) {
                    Some(pixels) => {
                        let version = texture_version(&props.src, props.filter);
                        let filter = props.filter;
                        self.textures
                            .get_or_create_texture(object.id, version, || to_color_image(pixels, filter), ctx)
                            .map_err(|err| warn!("No texture for {}: {err}", props.src))
                            .ok()
                    }
                    None => None,
                };
                match texture {
                    Some(texture) => {
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        let tint = Color32::WHITE.gamma_multiply(object.opacity);
                        shapes.push(Shape::image(texture, screen_rect, uv, tint));
                    }
                    None => shapes.push(Shape::rect_filled(screen_rect, 0.0, PLACEHOLDER_COLOR)),
                }
                if let Some(stroke) = stroke {
                    shapes.push(Shape::rect_stroke(screen_rect, 0.0, stroke));
                }
            }
            _ => {
                let points = outline(object, transform);
                if let Some(fill) = fill {
                    shapes.push(Shape::convex_polygon(points.clone(), fill, Stroke::NONE));
                }
                if let Some(stroke) = stroke {
                    push_outline(object, points, stroke, zoom, false, screen_rect, shapes);
                }
            }
        }
    }
}

fn dash_pattern(dash_array: &[f32], zoom: f32) -> (f32, f32) {
    let dash = dash_array.first().copied().unwrap_or(1.0).max(0.5);
    let gap = dash_array.get(1).copied().unwrap_or(dash).max(0.5);
    (dash * zoom, gap * zoom)
}

fn push_outline(
    object: &DrawableObject,
    mut points: Vec<Pos2>,
    stroke: Stroke,
    zoom: f32,
    axis_aligned: bool,
    screen_rect: Rect,
    shapes: &mut Vec<Shape>,
) {
    if object.stroke_dash_array.is_empty() {
        if axis_aligned {
            shapes.push(Shape::rect_stroke(screen_rect, 0.0, stroke));
        } else {
            shapes.push(Shape::closed_line(points, stroke));
        }
        return;
    }
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    let (dash, gap) = dash_pattern(&object.stroke_dash_array, zoom);
    shapes.extend(Shape::dashed_line(&points, stroke, dash, gap));
}

/// Outline of an object in screen space, rotation applied
fn outline(object: &DrawableObject, transform: &ViewportTransform) -> Vec<Pos2> {
    let size = object.size;
    let local: Vec<Pos2> = match &object.kind {
        ObjectKind::Circle { radius } => (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let t = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                Pos2::new(radius + radius * t.cos(), radius + radius * t.sin())
            })
            .collect(),
        ObjectKind::Triangle => vec![
            Pos2::new(size.x / 2.0, 0.0),
            Pos2::new(size.x, size.y),
            Pos2::new(0.0, size.y),
        ],
        ObjectKind::Polygon { points } | ObjectKind::Path { points } => points.clone(),
        ObjectKind::Rect { .. } | ObjectKind::Textbox(_) | ObjectKind::Image(_) => vec![
            Pos2::ZERO,
            Pos2::new(size.x, 0.0),
            Pos2::new(size.x, size.y),
            Pos2::new(0.0, size.y),
        ],
    };

    let center = object.center();
    let (sin, cos) = object.angle.to_radians().sin_cos();
    local
        .into_iter()
        .map(|point| {
            let scene = object.position + point.to_vec2() * object.scale;
            let offset = scene - center;
            let rotated = center + Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos);
            transform.scene_to_screen(rotated)
        })
        .collect()
}

/// Border, corner handles and rotation handle around a selected object
fn push_handles(object: &DrawableObject, transform: &ViewportTransform, shapes: &mut Vec<Shape>) {
    let style = object.handles;
    let rect = transform.scene_rect_to_screen(object.bounds());
    shapes.push(Shape::rect_stroke(
        rect,
        0.0,
        Stroke::new(style.border_scale_factor, style.border_color),
    ));

    let top_center = Pos2::new(rect.center().x, rect.top());
    let rotation = Pos2::new(rect.center().x, rect.top() - ROTATION_HANDLE_OFFSET);
    shapes.push(Shape::line_segment(
        [top_center, rotation],
        Stroke::new(style.border_scale_factor, style.border_color),
    ));

    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.left_bottom(),
        rect.right_bottom(),
        Pos2::new(rect.left(), rect.center().y),
        Pos2::new(rect.right(), rect.center().y),
        top_center,
        Pos2::new(rect.center().x, rect.bottom()),
        rotation,
    ];
    let stroke = Stroke::new(1.0, style.corner_stroke_color);
    for corner in corners {
        match style.corner_style {
            CornerStyle::Circle => {
                if !style.transparent_corners {
                    shapes.push(Shape::circle_filled(corner, CORNER_SIZE / 2.0, style.corner_color));
                }
                shapes.push(Shape::circle_stroke(corner, CORNER_SIZE / 2.0, stroke));
            }
            CornerStyle::Rect => {
                let handle = Rect::from_center_size(corner, Vec2::splat(CORNER_SIZE));
                if !style.transparent_corners {
                    shapes.push(Shape::rect_filled(handle, 0.0, style.corner_color));
                }
                shapes.push(Shape::rect_stroke(handle, 0.0, stroke));
            }
        }
    }
}
