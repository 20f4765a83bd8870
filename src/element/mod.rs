use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

mod common;
pub mod factory;
pub(crate) mod image;
pub(crate) mod stroke;
pub(crate) mod text;

pub use common::calculate_bounds;
pub use self::image::{ImageFilter, ImageProps};
pub use stroke::PencilBrush;
pub use text::{FontStyle, TextAlign, TextOptions, TextProps};

use crate::style::HandleStyle;

/// Stable identity of a drawable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drop shadow drawn behind an object (used by the workspace).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color32,
    pub blur: f32,
}

/// Kind-specific payload of a drawable object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Rect { rx: f32, ry: f32 },
    Circle { radius: f32 },
    Triangle,
    /// Points are local to the object's top-left corner.
    Polygon { points: Vec<Pos2> },
    Textbox(TextProps),
    Image(ImageProps),
    /// Freehand stroke; points are local to the object's top-left corner.
    Path { points: Vec<Pos2> },
}

impl ObjectKind {
    /// Get the kind as the string used in snapshots
    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Rect { .. } => "rect",
            ObjectKind::Circle { .. } => "circle",
            ObjectKind::Triangle => "triangle",
            ObjectKind::Polygon { .. } => "polygon",
            ObjectKind::Textbox(_) => "textbox",
            ObjectKind::Image(_) => "image",
            ObjectKind::Path { .. } => "path",
        }
    }
}

/// A shape, text, image or path placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableObject {
    pub id: ObjectId,
    /// Tag used to find special objects such as the workspace.
    pub name: Option<String>,
    pub kind: ObjectKind,
    /// Top-left corner in scene coordinates.
    pub position: Pos2,
    /// Unscaled width and height.
    pub size: Vec2,
    pub scale: Vec2,
    /// Rotation in degrees.
    pub angle: f32,
    pub fill: Option<Color32>,
    pub stroke: Option<Color32>,
    pub stroke_width: f32,
    pub stroke_dash_array: Vec<f32>,
    pub opacity: f32,
    pub selectable: bool,
    pub has_controls: bool,
    pub shadow: Option<Shadow>,
    /// Runtime-only handle styling, never part of a snapshot.
    pub handles: HandleStyle,
}

impl DrawableObject {
    /// Create a new object of the given kind with neutral styling
    pub fn new(kind: ObjectKind, size: Vec2) -> Self {
        Self {
            id: ObjectId::new(),
            name: None,
            kind,
            position: Pos2::ZERO,
            size,
            scale: Vec2::new(1.0, 1.0),
            angle: 0.0,
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            stroke_dash_array: Vec::new(),
            opacity: 1.0,
            selectable: true,
            has_controls: true,
            shadow: None,
            handles: HandleStyle::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Bounding rectangle in scene coordinates, scale applied
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position, self.size * self.scale)
    }

    pub fn center(&self) -> Pos2 {
        self.bounds().center()
    }

    /// Move the object so its bounding box is centred on `center`
    pub fn set_center(&mut self, center: Pos2) {
        let scaled = self.size * self.scale;
        self.position = center - scaled / 2.0;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Uniformly scale so the scaled height matches `height`
    pub fn scale_to_height(&mut self, height: f32) {
        if self.size.y > 0.0 {
            let factor = height / self.size.y;
            self.scale = Vec2::splat(factor);
        }
    }

    /// Uniformly scale so the scaled width matches `width`
    pub fn scale_to_width(&mut self, width: f32) {
        if self.size.x > 0.0 {
            let factor = width / self.size.x;
            self.scale = Vec2::splat(factor);
        }
    }

    /// Whether every numeric field can be written to and read back from a snapshot
    pub fn is_finite(&self) -> bool {
        let geometry = self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.size.is_finite()
            && self.scale.is_finite()
            && self.angle.is_finite()
            && self.stroke_width.is_finite()
            && self.opacity.is_finite()
            && self.stroke_dash_array.iter().all(|dash| dash.is_finite())
            && self.shadow.is_none_or(|shadow| shadow.blur.is_finite());
        let payload = match &self.kind {
            ObjectKind::Rect { rx, ry } => rx.is_finite() && ry.is_finite(),
            ObjectKind::Circle { radius } => radius.is_finite(),
            ObjectKind::Triangle => true,
            ObjectKind::Polygon { points } | ObjectKind::Path { points } => {
                points.iter().all(|point| point.x.is_finite() && point.y.is_finite())
            }
            ObjectKind::Textbox(props) => props.font_size.is_finite(),
            ObjectKind::Image(props) => props.natural_size.is_finite(),
        };
        geometry && payload
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Textbox(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            ObjectKind::Textbox(props) => Some(props),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.kind {
            ObjectKind::Textbox(props) => Some(props),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageProps> {
        match &self.kind {
            ObjectKind::Image(props) => Some(props),
            _ => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageProps> {
        match &mut self.kind {
            ObjectKind::Image(props) => Some(props),
            _ => None,
        }
    }

    /// Recompute the textbox height after a font or content change.
    pub(crate) fn refresh_text_metrics(&mut self) {
        if let ObjectKind::Textbox(props) = &self.kind {
            self.size.y = props.layout_height();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_set_center() {
        let mut obj = DrawableObject::new(ObjectKind::Triangle, Vec2::new(100.0, 50.0));
        obj.position = Pos2::new(10.0, 20.0);
        assert_eq!(obj.center(), Pos2::new(60.0, 45.0));

        obj.set_center(Pos2::new(0.0, 0.0));
        assert_eq!(obj.position, Pos2::new(-50.0, -25.0));
    }

    #[test]
    fn test_scaled_bounds() {
        let mut obj = DrawableObject::new(ObjectKind::Rect { rx: 0.0, ry: 0.0 }, Vec2::new(200.0, 100.0));
        obj.scale_to_height(50.0);
        let bounds = obj.bounds();
        assert!((bounds.width() - 100.0).abs() < 0.001);
        assert!((bounds.height() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_non_finite_fields_are_detected() {
        let mut obj = DrawableObject::new(ObjectKind::Circle { radius: 10.0 }, Vec2::new(20.0, 20.0));
        assert!(obj.is_finite());
        obj.opacity = f32::NAN;
        assert!(!obj.is_finite());

        let mut path = DrawableObject::new(
            ObjectKind::Path {
                points: vec![Pos2::ZERO, Pos2::new(f32::INFINITY, 0.0)],
            },
            Vec2::new(10.0, 10.0),
        );
        assert!(!path.is_finite());
        path.kind = ObjectKind::Path { points: vec![Pos2::ZERO] };
        assert!(path.is_finite());
    }

    #[test]
    fn test_kind_helpers() {
        let text = factory::create_text("hi", &crate::tool::StyleDefaults::default(), &TextOptions::default());
        assert!(text.is_text());
        assert!(!text.is_image());
        assert_eq!(text.kind.type_name(), "textbox");
    }
}
