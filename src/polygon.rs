use crate::bbox::{calculate_bounding_box, Bbox};
use crate::driver;
use crate::error::BoolError;
use crate::point::Point2D;
use crate::{BoolConfig, Loc, Operation};

/// A path vertex: a coordinate plus the opaque location tag the caller
/// attached to it. The tag is propagated through splits and
/// intersections verbatim and is never interpreted by the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub coord: Point2D,
    pub loc: Loc,
}

impl PathPoint {
    pub fn new(coord: Point2D, loc: Loc) -> Self {
        Self { coord, loc }
    }
}

impl From<Point2D> for PathPoint {
    fn from(coord: Point2D) -> Self {
        Self { coord, loc: Loc::default() }
    }
}

/// Orientation of an assembled path. Outer boundaries are clockwise,
/// holes counter-clockwise (§6), so a downstream triangulator can
/// derive consistent normals without re-deriving topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

/// A single closed loop of vertices (last point implicitly connects
/// back to the first). Input paths may self-touch, overlap edges with
/// other paths, or carry either winding; output paths are simple,
/// pairwise disjoint except at shared vertices, and correctly oriented.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub points: Vec<PathPoint>,
}

impl Path {
    pub fn new(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: impl IntoIterator<Item = Point2D>) -> Self {
        Self {
            points: coords.into_iter().map(PathPoint::from).collect(),
        }
    }

    pub fn coords(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.points.iter().map(|p| p.coord)
    }

    pub fn winding(&self) -> WindingOrder {
        let coords: Vec<Point2D> = self.coords().collect();
        if crate::utils::path_signed_area(&coords) > 0.0 {
            WindingOrder::Clockwise
        } else {
            WindingOrder::CounterClockwise
        }
    }

    /// A hole is any assembled path whose winding is the opposite of an
    /// outer boundary's (§6: outer CW, holes CCW).
    pub fn is_hole(&self) -> bool {
        self.winding() == WindingOrder::CounterClockwise
    }
}

/// A set of closed paths, treated as a planar region under the
/// even-odd / orientation convention described in §6. A hole is just
/// another path in the same set, oriented the other way round from its
/// containing outer boundary.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    pub paths: Vec<Path>,
}

impl Polygon {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn empty() -> Self {
        Self { paths: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Bounding box of every point across every path. Used only as an
    /// optimisation hint by the driver, never for correctness.
    pub fn bounding_box(&self) -> Bbox {
        let all_points: Vec<Point2D> = self.paths.iter().flat_map(|p| p.coords()).collect();
        calculate_bounding_box(&all_points)
    }

    /// Region covered by `self` but not `other`.
    pub fn subtract(&self, other: &Self) -> Result<Self, BoolError> {
        driver::boolean(self, other, Operation::Subtract, &BoolConfig::default())
    }

    /// Region covered by both `self` and `other`.
    pub fn intersect(&self, other: &Self) -> Result<Self, BoolError> {
        driver::boolean(self, other, Operation::Intersect, &BoolConfig::default())
    }

    /// Region covered by `self` or `other` (or both).
    pub fn union(&self, other: &Self) -> Result<Self, BoolError> {
        driver::boolean(self, other, Operation::Union, &BoolConfig::default())
    }

    /// Region covered by exactly one of `self`, `other`.
    pub fn xor(&self, other: &Self) -> Result<Self, BoolError> {
        driver::boolean(self, other, Operation::Xor, &BoolConfig::default())
    }
}
