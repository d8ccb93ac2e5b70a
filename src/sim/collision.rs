//! Collision predicates for the dodge field
//!
//! Two overlap tests cover the whole game: the player circle against
//! axis-aligned obstacle rectangles, and against circular pickups.

use glam::Vec2;

/// Circle vs axis-aligned rectangle overlap
///
/// Clamps the circle center to the rectangle bounds and compares the
/// clamped point's distance against the radius. Touching counts (`<=`):
/// a rectangle whose closest point sits at exactly `radius` from the
/// center is a hit.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_pos: Vec2, rect_size: Vec2) -> bool {
    let closest = center.clamp(rect_pos, rect_pos + rect_size);
    center.distance_squared(closest) <= radius * radius
}

/// Circle vs circle overlap, strict (`<`): touching exactly at the sum of
/// radii does not count
pub fn circle_circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}
