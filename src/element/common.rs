use egui::{Pos2, Rect, Vec2};

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Convert absolute points into points local to their bounding box.
///
/// Returns the top-left corner, the box size and the shifted points.
pub(crate) fn localize_points(points: &[Pos2]) -> (Pos2, Vec2, Vec<Pos2>) {
    let bounds = calculate_bounds(points, 0.0);
    if points.is_empty() {
        return (Pos2::ZERO, Vec2::ZERO, Vec::new());
    }
    let origin = bounds.min;
    let local = points.iter().map(|p| Pos2::ZERO + (*p - origin)).collect();
    (origin, bounds.size(), local)
}
