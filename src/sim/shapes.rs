//! Collision primitives
//!
//! Circles and axis-aligned rectangles in world space. Touching edges count
//! as a miss; only strict overlap is a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned rectangle stored as min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its centre and full size
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Rectangle from its bottom-left corner and full size
    pub fn from_corner(corner: Vec2, size: Vec2) -> Self {
        Self {
            min: corner,
            max: corner + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Strict circle/circle overlap
#[inline]
pub fn circles_overlap(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) < reach * reach
}

/// Strict circle/rectangle overlap
///
/// Measures from the circle centre to the nearest point of the rectangle, so a
/// centre inside the rectangle always hits.
#[inline]
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let nearest = rect.clamp_point(circle.center);
    circle.center.distance_squared(nearest) < circle.radius * circle.radius
}

/// Strict rectangle/rectangle overlap
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

/// Any collidable shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle(Circle),
    Rect(Rect),
}

impl Shape {
    /// Overlap test dispatching on both shape kinds
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Circle(a), Shape::Circle(b)) => circles_overlap(a, b),
            (Shape::Circle(c), Shape::Rect(r)) | (Shape::Rect(r), Shape::Circle(c)) => {
                circle_rect_overlap(c, r)
            }
            (Shape::Rect(a), Shape::Rect(b)) => rects_overlap(a, b),
        }
    }

    /// Vertical centre, used to decide which way an evasive nudge goes
    pub fn center_y(&self) -> f32 {
        match self {
            Shape::Circle(c) => c.center.y,
            Shape::Rect(r) => r.center().y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        assert!(circles_overlap(&a, &b));

        // Exactly touching is a miss
        let c = Circle::new(Vec2::new(20.0, 0.0), 10.0);
        assert!(!circles_overlap(&a, &c));
    }

    #[test]
    fn test_circle_rect_overlap_edges_and_corners() {
        let rect = Rect::from_corner(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0));

        // Beside the right edge
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(105.0, 25.0), 8.0), &rect));
        assert!(!circle_rect_overlap(&Circle::new(Vec2::new(110.0, 25.0), 8.0), &rect));

        // Near the top-right corner: 6,6 away is ~8.49 from the corner
        assert!(!circle_rect_overlap(&Circle::new(Vec2::new(106.0, 56.0), 8.0), &rect));
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(104.0, 54.0), 8.0), &rect));

        // Centre inside
        assert!(circle_rect_overlap(&Circle::new(Vec2::new(50.0, 25.0), 1.0), &rect));
    }

    #[test]
    fn test_rects_overlap() {
        let a = Rect::from_center(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Rect::from_center(Vec2::new(8.0, 8.0), Vec2::new(10.0, 10.0));
        let c = Rect::from_center(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        assert!(rects_overlap(&a, &b));
        assert!(!rects_overlap(&a, &c));
    }

    #[test]
    fn test_shape_dispatch_is_symmetric() {
        let circle = Shape::Circle(Circle::new(Vec2::new(0.0, 0.0), 5.0));
        let rect = Shape::Rect(Rect::from_center(Vec2::new(6.0, 0.0), Vec2::new(4.0, 4.0)));
        assert!(circle.overlaps(&rect));
        assert!(rect.overlaps(&circle));
        assert_eq!(rect.center_y(), 0.0);
    }
}
