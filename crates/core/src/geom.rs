//! 2D geometry primitives shared by map generation and rendering.

use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn len(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance_to(self, other: Self) -> f32 {
        (other - self).len()
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }

    pub fn cross(self, other: Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, factor: f32) -> Self {
        Self { x: self.x * factor, y: self.y * factor }
    }
}

/// Axis-aligned rectangle with its origin at the lower-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Square rectangle centered on a point.
    pub fn centered_square(center: Vec2, side: f32) -> Self {
        Self { x: center.x - side / 2.0, y: center.y - side / 2.0, width: side, height: side }
    }

    pub fn right(self) -> f32 {
        self.x + self.width
    }

    pub fn top(self) -> f32 {
        self.y + self.height
    }

    pub fn area(self) -> f32 {
        self.width * self.height
    }

    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }

    pub fn overlaps(self, other: Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.top()
            && self.top() > other.y
    }

    pub fn edges(self) -> [Segment; 4] {
        let bl = Vec2::new(self.x, self.y);
        let br = Vec2::new(self.right(), self.y);
        let tl = Vec2::new(self.x, self.top());
        let tr = Vec2::new(self.right(), self.top());
        [
            Segment::new(bl, br),
            Segment::new(br, tr),
            Segment::new(tr, tl),
            Segment::new(tl, bl),
        ]
    }
}

/// Line segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn midpoint(self) -> Vec2 {
        self.start.midpoint(self.end)
    }

    /// Intersection point of two segments, if any.
    ///
    /// Collinear overlapping segments report the midpoint of the overlap.
    pub fn intersection(self, other: Self) -> Option<Vec2> {
        let r = self.end - self.start;
        let s = other.end - other.start;
        let offset = other.start - self.start;
        let r_cross_s = r.cross(s);

        if r_cross_s == 0.0 {
            if offset.cross(r) != 0.0 {
                // Parallel, never touching.
                return None;
            }
            let r_len_sq = r.dot(r);
            if r_len_sq == 0.0 {
                return None;
            }
            let t0 = offset.dot(r) / r_len_sq;
            let t1 = t0 + s.dot(r) / r_len_sq;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            let overlap_lo = lo.max(0.0);
            let overlap_hi = hi.min(1.0);
            if overlap_lo > overlap_hi {
                return None;
            }
            let mid_t = (overlap_lo + overlap_hi) / 2.0;
            return Some(self.start + r * mid_t);
        }

        let t = offset.cross(s) / r_cross_s;
        let u = offset.cross(r) / r_cross_s;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            return Some(self.start + r * t);
        }
        None
    }

    pub fn intersects(self, other: Self) -> bool {
        self.intersection(other).is_some()
    }

    pub fn intersects_rect(self, rect: Rect) -> bool {
        if rect.contains(self.start) || rect.contains(self.end) {
            return true;
        }
        rect.edges().iter().any(|edge| self.intersects(*edge))
    }
}

/// Smallest rectangle containing all points, padded per axis.
///
/// Returns `None` for an empty point set.
pub fn bounds_of(points: impl IntoIterator<Item = Vec2>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for point in points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

pub fn extend_bounds(bounds: Rect, horizontal: f32, vertical: f32) -> Rect {
    Rect::new(
        bounds.x - horizontal,
        bounds.y - vertical,
        bounds.width + horizontal * 2.0,
        bounds.height + vertical * 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect_at_the_expected_point() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));
        let b = Segment::new(Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0));
        let hit = a.intersection(b).expect("diagonals must cross");
        assert!((hit.x - 1.0).abs() < 1e-6);
        assert!((hit.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0));
        let b = Segment::new(Vec2::new(0.0, 1.0), Vec2::new(2.0, 1.0));
        assert!(!a.intersects(b));
    }

    #[test]
    fn collinear_overlapping_segments_report_a_hit() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0));
        let b = Segment::new(Vec2::new(2.0, 0.0), Vec2::new(6.0, 0.0));
        let hit = a.intersection(b).expect("overlap must be a hit");
        assert!((hit.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn collinear_disjoint_segments_miss() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let b = Segment::new(Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0));
        assert!(!a.intersects(b));
    }

    #[test]
    fn segments_that_stop_short_do_not_intersect() {
        let a = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Segment::new(Vec2::new(3.0, 0.0), Vec2::new(3.0, 5.0));
        assert!(!a.intersects(b));
    }

    #[test]
    fn segment_fully_inside_a_rect_counts_as_intersecting() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let inner = Segment::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));
        assert!(inner.intersects_rect(rect));
    }

    #[test]
    fn segment_crossing_a_rect_edge_intersects() {
        let rect = Rect::new(2.0, 2.0, 2.0, 2.0);
        let crossing = Segment::new(Vec2::new(0.0, 3.0), Vec2::new(10.0, 3.0));
        assert!(crossing.intersects_rect(rect));
        let outside = Segment::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        assert!(!outside.intersects_rect(rect));
    }

    #[test]
    fn rect_overlap_is_strict_on_edges() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let touching = Rect::new(2.0, 0.0, 2.0, 2.0);
        let overlapping = Rect::new(1.5, 1.5, 2.0, 2.0);
        assert!(!a.overlaps(touching));
        assert!(a.overlaps(overlapping));
    }

    #[test]
    fn bounds_of_points_with_extension_covers_all_points() {
        let points = [Vec2::new(-1.0, 2.0), Vec2::new(5.0, -3.0), Vec2::new(2.0, 7.0)];
        let bounds = bounds_of(points).expect("non-empty");
        assert_eq!(bounds, Rect::new(-1.0, -3.0, 6.0, 10.0));
        let extended = extend_bounds(bounds, 2.0, 1.0);
        assert_eq!(extended, Rect::new(-3.0, -4.0, 10.0, 12.0));
    }

    #[test]
    fn centered_square_is_centered() {
        let rect = Rect::centered_square(Vec2::new(1.0, 1.0), 4.0);
        assert_eq!(rect, Rect::new(-1.0, -1.0, 4.0, 4.0));
        assert!(rect.contains(Vec2::new(1.0, 1.0)));
    }
}
