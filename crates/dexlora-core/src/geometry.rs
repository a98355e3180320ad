#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in document coordinates (CSS pixels, origin at top-left).
///
/// `x`/`y` are signed so elements scrolled above or left of the viewport can
/// be represented without clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area in square pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && (x as i64) < self.right() && y >= self.y && (y as i64) < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if (x as i64) < right && (y as i64) < bottom {
            Some(Rect::new(
                x,
                y,
                (right - x as i64) as u32,
                (bottom - y as i64) as u32,
            ))
        } else {
            None
        }
    }

    /// Fraction of this rectangle's area covered by `other`, in `[0.0, 1.0]`.
    ///
    /// Zero-area rectangles always report `0.0`.
    pub fn coverage_by(&self, other: &Rect) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        match self.intersection_opt(other) {
            Some(inter) => inter.area() as f64 / self.area() as f64,
            None => 0.0,
        }
    }

    /// Translate by a signed offset.
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 5, 5);
        assert!(a.intersection(&b).is_empty());
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.intersection_opt(&b), None);
    }

    #[test]
    fn partial_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Rect::new(5, 0, 5, 5));
        assert!((a.coverage_by(&b) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn empty_rect_has_zero_coverage() {
        let a = Rect::new(0, 0, 0, 10);
        assert_eq!(a.coverage_by(&Rect::from_size(100, 100)), 0.0);
    }

    #[test]
    fn contains_respects_exclusive_edges() {
        let r = Rect::new(-5, -5, 10, 10);
        assert!(r.contains(-5, -5));
        assert!(r.contains(4, 4));
        assert!(!r.contains(5, 0));
    }

    #[test]
    fn offset_moves_origin_only() {
        let r = Rect::new(1, 2, 3, 4).offset(10, -20);
        assert_eq!(r, Rect::new(11, -18, 3, 4));
    }
}
