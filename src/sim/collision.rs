//! Collision detection against axis-aligned obstacles
//!
//! Everything in the world that blocks movement is an axis-aligned
//! rectangle. Agents are circles; line-of-sight and path probes are
//! segments. All checks are O(obstacles) and side-effect free.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Obstacle;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Strict containment (points on the border are outside)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }

    /// Grow the rectangle by `by` on every side
    pub fn inflate(&self, by: f32) -> Rect {
        Rect::new(self.x - by, self.y - by, self.w + by * 2.0, self.h + by * 2.0)
    }

    /// Closest point of the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Circle vs rectangle overlap.
///
/// The centre is clamped into the rectangle and the squared distance is
/// compared to r². Touching exactly at distance r is *not* an overlap.
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    // Cheap AABB reject first
    if center.x + radius < rect.x
        || center.x - radius > rect.x + rect.w
        || center.y + radius < rect.y
        || center.y - radius > rect.y + rect.h
    {
        return false;
    }
    let closest = rect.closest_point(center);
    center.distance_squared(closest) < radius * radius
}

/// True if a circle at `center` overlaps any obstacle
pub fn hits_any(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| circle_intersects_rect(center, radius, &o.rect))
}

/// Segment vs segment intersection (inclusive of endpoints)
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d = (a2 - a1).perp_dot(b2 - b1);
    if d.abs() < 1e-9 {
        // Parallel (or collinear) - treated as non-crossing
        return false;
    }
    let t = (b1 - a1).perp_dot(b2 - b1) / d;
    let u = (b1 - a1).perp_dot(a2 - a1) / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Segment vs rectangle.
///
/// True iff the start point lies inside the rectangle or the segment
/// crosses one of its four edges.
pub fn segment_intersects_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let lo = a.min(b);
    let hi = a.max(b);
    if hi.x < rect.x || lo.x > rect.x + rect.w || hi.y < rect.y || lo.y > rect.y + rect.h {
        return false;
    }
    if rect.contains(a) {
        return true;
    }

    let tl = rect.min();
    let br = rect.max();
    let tr = Vec2::new(br.x, tl.y);
    let bl = Vec2::new(tl.x, br.y);

    segments_intersect(a, b, tl, tr)
        || segments_intersect(a, b, tr, br)
        || segments_intersect(a, b, br, bl)
        || segments_intersect(a, b, bl, tl)
}

/// True if the straight path from `a` to `b` is clear for a circle of
/// `radius` (obstacles are inflated by the radius)
pub fn path_clear(a: Vec2, b: Vec2, radius: f32, obstacles: &[Obstacle]) -> bool {
    !obstacles
        .iter()
        .any(|o| segment_intersects_rect(a, b, &o.rect.inflate(radius)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(circle_intersects_rect(Vec2::new(50.0, 50.0), 1.0, &rect));
    }

    #[test]
    fn test_circle_near_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        // 10px from the right edge
        assert!(!circle_intersects_rect(Vec2::new(110.0, 50.0), 8.0, &rect));
        assert!(circle_intersects_rect(Vec2::new(110.0, 50.0), 12.0, &rect));
        // Exactly touching is not an overlap
        assert!(!circle_intersects_rect(Vec2::new(110.0, 50.0), 10.0, &rect));
    }

    #[test]
    fn test_circle_corner() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Diagonal distance to corner (100,100) is ~14.1
        assert!(!circle_intersects_rect(Vec2::new(110.0, 110.0), 14.0, &rect));
        assert!(circle_intersects_rect(Vec2::new(110.0, 110.0), 14.5, &rect));
    }

    #[test]
    fn test_segment_crossing() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(segment_intersects_rect(
            Vec2::new(0.0, 20.0),
            Vec2::new(50.0, 20.0),
            &rect
        ));
        assert!(!segment_intersects_rect(
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, 0.0),
            &rect
        ));
    }

    #[test]
    fn test_segment_starting_inside() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        // Fully inside, never crosses an edge
        assert!(segment_intersects_rect(
            Vec2::new(15.0, 15.0),
            Vec2::new(16.0, 16.0),
            &rect
        ));
    }

    #[test]
    fn test_path_clear() {
        let walls = [Obstacle::wall(40.0, -50.0, 20.0, 100.0)];
        assert!(!path_clear(Vec2::ZERO, Vec2::new(100.0, 0.0), 5.0, &walls));
        assert!(path_clear(Vec2::ZERO, Vec2::new(0.0, 100.0), 5.0, &walls));
        // Passing 8px above the wall's top is blocked once inflated by 10
        assert!(!path_clear(
            Vec2::new(0.0, -58.0),
            Vec2::new(100.0, -58.0),
            10.0,
            &walls
        ));
    }

    proptest! {
        #[test]
        fn prop_center_inside_always_hits(
            x in 0.5f32..99.5,
            y in 0.5f32..99.5,
            r in 0.01f32..50.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            prop_assert!(circle_intersects_rect(Vec2::new(x, y), r, &rect));
        }

        #[test]
        fn prop_far_circle_never_hits(
            gap in 0.01f32..500.0,
            r in 0.1f32..50.0,
            y in -20.0f32..120.0,
        ) {
            let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
            let center = Vec2::new(100.0 + r + gap, y);
            prop_assert!(!circle_intersects_rect(center, r, &rect));
        }
    }
}
