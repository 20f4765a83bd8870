//! Serialized form of the scene used for history entries and the clipboard.
//!
//! Only the keys listed in [`SNAPSHOT_KEYS`] are ever written. Runtime-only
//! state (selection, handle styling, decoded pixels) stays out of the format.
//! Bump [`SNAPSHOT_VERSION`] whenever the key set or its meaning changes.

use egui::{Color32, Pos2, Vec2};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::element::{
    DrawableObject, FontStyle, ImageFilter, ImageProps, ObjectId, ObjectKind, Shadow, TextAlign,
    TextProps,
};
use crate::error::{EditorError, EditorResult};
use crate::style::HandleStyle;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Every key an object record may contain.
pub const SNAPSHOT_KEYS: &[&str] = &[
    "id",
    "name",
    "type",
    "left",
    "top",
    "width",
    "height",
    "scaleX",
    "scaleY",
    "angle",
    "fill",
    "stroke",
    "strokeWidth",
    "strokeDashArray",
    "opacity",
    "selectable",
    "hasControls",
    "shadow",
    "rx",
    "ry",
    "radius",
    "points",
    "text",
    "fontFamily",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "textAlign",
    "underline",
    "linethrough",
    "src",
    "naturalSize",
    "filter",
];

/// Kind-specific keys, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum RecordKind {
    Rect {
        rx: f32,
        ry: f32,
    },
    Circle {
        radius: f32,
    },
    Triangle,
    Polygon {
        points: Vec<Pos2>,
    },
    Textbox {
        text: String,
        font_family: String,
        font_size: f32,
        font_weight: u16,
        font_style: FontStyle,
        text_align: TextAlign,
        underline: bool,
        linethrough: bool,
    },
    Image {
        src: String,
        natural_size: Vec2,
        filter: Option<ImageFilter>,
    },
    Path {
        points: Vec<Pos2>,
    },
}

/// Property dump of one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: RecordKind,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub angle: f32,
    pub fill: Option<Color32>,
    pub stroke: Option<Color32>,
    pub stroke_width: f32,
    pub stroke_dash_array: Vec<f32>,
    pub opacity: f32,
    pub selectable: bool,
    pub has_controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

impl ObjectRecord {
    pub fn from_object(object: &DrawableObject) -> Self {
        let kind = match &object.kind {
            ObjectKind::Rect { rx, ry } => RecordKind::Rect { rx: *rx, ry: *ry },
            ObjectKind::Circle { radius } => RecordKind::Circle { radius: *radius },
            ObjectKind::Triangle => RecordKind::Triangle,
            ObjectKind::Polygon { points } => RecordKind::Polygon {
                points: points.clone(),
            },
            ObjectKind::Textbox(props) => RecordKind::Textbox {
                text: props.text.clone(),
                font_family: props.font_family.clone(),
                font_size: props.font_size,
                font_weight: props.font_weight,
                font_style: props.font_style,
                text_align: props.text_align,
                underline: props.underline,
                linethrough: props.linethrough,
            },
            ObjectKind::Image(props) => RecordKind::Image {
                src: props.src.clone(),
                natural_size: props.natural_size,
                filter: props.filter,
            },
            ObjectKind::Path { points } => RecordKind::Path {
                points: points.clone(),
            },
        };

        Self {
            id: object.id,
            name: object.name.clone(),
            kind,
            left: object.position.x,
            top: object.position.y,
            width: object.size.x,
            height: object.size.y,
            scale_x: object.scale.x,
            scale_y: object.scale.y,
            angle: object.angle,
            fill: object.fill,
            stroke: object.stroke,
            stroke_width: object.stroke_width,
            stroke_dash_array: object.stroke_dash_array.clone(),
            opacity: object.opacity,
            selectable: object.selectable,
            has_controls: object.has_controls,
            shadow: object.shadow,
        }
    }

    /// Rebuild a live object, stamping the given handle style on it
    pub fn to_object(&self, handles: HandleStyle) -> DrawableObject {
        let kind = match &self.kind {
            RecordKind::Rect { rx, ry } => ObjectKind::Rect { rx: *rx, ry: *ry },
            RecordKind::Circle { radius } => ObjectKind::Circle { radius: *radius },
            RecordKind::Triangle => ObjectKind::Triangle,
            RecordKind::Polygon { points } => ObjectKind::Polygon {
                points: points.clone(),
            },
            RecordKind::Textbox {
                text,
                font_family,
                font_size,
                font_weight,
                font_style,
                text_align,
                underline,
                linethrough,
            } => ObjectKind::Textbox(TextProps {
                text: text.clone(),
                font_family: font_family.clone(),
                font_size: *font_size,
                font_weight: *font_weight,
                font_style: *font_style,
                text_align: *text_align,
                underline: *underline,
                linethrough: *linethrough,
            }),
            RecordKind::Image {
                src,
                natural_size,
                filter,
            } => ObjectKind::Image(ImageProps {
                src: src.clone(),
                natural_size: *natural_size,
                filter: *filter,
            }),
            RecordKind::Path { points } => ObjectKind::Path {
                points: points.clone(),
            },
        };

        DrawableObject {
            id: self.id,
            name: self.name.clone(),
            kind,
            position: Pos2::new(self.left, self.top),
            size: Vec2::new(self.width, self.height),
            scale: Vec2::new(self.scale_x, self.scale_y),
            angle: self.angle,
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
            stroke_dash_array: self.stroke_dash_array.clone(),
            opacity: self.opacity,
            selectable: self.selectable,
            has_controls: self.has_controls,
            shadow: self.shadow,
            handles,
        }
    }
}

/// The whole scene, bottom-most object first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub version: u32,
    pub objects: Vec<ObjectRecord>,
}

impl SceneSnapshot {
    pub fn new(objects: Vec<ObjectRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            objects,
        }
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot, rejecting versions this build does not understand
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let snapshot: SceneSnapshot = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                "Rejecting snapshot version {} (current {})",
                snapshot.version, SNAPSHOT_VERSION
            );
            return Err(EditorError::UnsupportedSnapshotVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{TextOptions, factory};
    use crate::tool::StyleDefaults;

    fn sample_objects() -> Vec<DrawableObject> {
        let defaults = StyleDefaults::default();
        let mut image = factory::create_image("assets/cat.png", Vec2::new(640.0, 480.0));
        if let Some(props) = image.image_mut() {
            props.filter = Some(ImageFilter::Sepia);
        }
        vec![
            factory::create_workspace("clip", Vec2::new(900.0, 1200.0), Color32::WHITE),
            factory::create_soft_rectangle(&defaults),
            factory::create_diamond(&defaults),
            factory::create_text("Hello", &defaults, &TextOptions::default()),
            image,
            factory::create_path(&[Pos2::new(0.0, 0.0), Pos2::new(5.0, 8.0)], Color32::RED, 3.0),
        ]
    }

    #[test]
    fn test_record_roundtrip_preserves_objects() {
        for object in sample_objects() {
            let record = ObjectRecord::from_object(&object);
            assert_eq!(record.to_object(object.handles), object);
        }
    }

    #[test]
    fn test_only_whitelisted_keys_are_written() {
        let records = sample_objects().iter().map(ObjectRecord::from_object).collect();
        let json = SceneSnapshot::new(records).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        for object in value["objects"].as_array().unwrap() {
            for key in object.as_object().unwrap().keys() {
                assert!(SNAPSHOT_KEYS.contains(&key.as_str()), "unexpected key {key}");
            }
        }
    }

    #[test]
    fn test_json_roundtrip_is_stable() {
        let records = sample_objects().iter().map(ObjectRecord::from_object).collect();
        let json = SceneSnapshot::new(records).to_json().unwrap();
        let parsed = SceneSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.to_json().unwrap(), json);
    }

    #[test]
    fn test_rejects_future_version() {
        let json = r#"{"version":99,"objects":[]}"#;
        assert!(matches!(
            SceneSnapshot::from_json(json),
            Err(EditorError::UnsupportedSnapshotVersion { found: 99, .. })
        ));
    }
}
