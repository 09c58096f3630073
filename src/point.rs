//! Coordinates and the rasterisation quantum.

use crate::fsize;

/// A 2D coordinate, as given by a caller or produced by the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: fsize,
    pub y: fsize,
}

impl Point2D {
    #[inline]
    pub fn new(x: fsize, y: fsize) -> Self {
        Self { x, y }
    }
}

/// Snap `v` to the nearest multiple of `epsilon`.
///
/// Every coordinate the algorithm stores -- inputs, intersections,
/// split points -- goes through this so that two values which differ
/// only by rounding noise compare equal.
#[inline]
pub(crate) fn rasterize(v: fsize, epsilon: fsize) -> fsize {
    epsilon * (v / epsilon).round()
}

/// Rasterise both components of `c`, snapping near-zero results to
/// exact zero so `-0.0` and accumulated rounding dust don't produce
/// spurious distinct points at the origin.
#[inline]
pub(crate) fn rasterize_point(c: Point2D, epsilon: fsize) -> Point2D {
    let mut x = rasterize(c.x, epsilon);
    let mut y = rasterize(c.y, epsilon);
    if x.abs() < epsilon {
        x = 0.0;
    }
    if y.abs() < epsilon {
        y = 0.0;
    }
    Point2D { x, y }
}

/// Lexicographic compare on rasterised coordinates: x first, then y.
#[inline]
pub(crate) fn lex_cmp(a: Point2D, b: Point2D) -> std::cmp::Ordering {
    a.x.partial_cmp(&b.x)
        .expect("non-finite coordinate")
        .then_with(|| a.y.partial_cmp(&b.y).expect("non-finite coordinate"))
}
