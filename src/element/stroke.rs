use egui::{Color32, Pos2};

use super::{DrawableObject, factory};

/// Freehand brush used while drawing mode is enabled.
///
/// Points accumulate while the pointer is down and are turned into a
/// path object when the stroke is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct PencilBrush {
    points: Vec<Pos2>,
    color: Color32,
    width: f32,
}

impl PencilBrush {
    pub fn new(color: Color32, width: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            width,
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        // Skip duplicates from pointer events that did not move
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn is_drawing(&self) -> bool {
        !self.points.is_empty()
    }

    /// Drop any in-progress points
    pub fn reset(&mut self) {
        self.points.clear();
    }

    /// Finish the stroke, returning a path object if at least two points were recorded
    pub fn finish(&mut self) -> Option<DrawableObject> {
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            return None;
        }
        Some(factory::create_path(&points, self.color, self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectKind;

    #[test]
    fn test_single_point_stroke_is_discarded() {
        let mut brush = PencilBrush::new(Color32::RED, 3.0);
        brush.add_point(Pos2::new(1.0, 1.0));
        brush.add_point(Pos2::new(1.0, 1.0));
        assert_eq!(brush.points().len(), 1);
        assert!(brush.finish().is_none());
        assert!(!brush.is_drawing());
    }

    #[test]
    fn test_finish_builds_path() {
        let mut brush = PencilBrush::new(Color32::RED, 3.0);
        brush.add_point(Pos2::new(10.0, 10.0));
        brush.add_point(Pos2::new(30.0, 20.0));
        let path = brush.finish().unwrap();
        assert_eq!(path.position, Pos2::new(10.0, 10.0));
        assert_eq!(path.stroke, Some(Color32::RED));
        assert_eq!(path.stroke_width, 3.0);
        assert!(matches!(path.kind, ObjectKind::Path { ref points } if points.len() == 2));
    }
}
