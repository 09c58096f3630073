//! C8: the driver.
//!
//! Runs the sweep to completion: extract the next event from Q, insert
//! left events into S and check their new neighbours for intersection,
//! classify and hand off right events to the assembler. A few trivial
//! cases are shortcut before the sweep ever starts, mirroring the
//! original's `OPT` levels 1 through 3 (level 4, a bulk tail-emission
//! optimisation, is dropped -- the original itself documents it as
//! buggy).

use crate::arena::Pool;
use crate::assembler::Assembler;
use crate::classify;
use crate::config::BoolConfig;
use crate::error::Result;
use crate::event::{load_edge, Event};
use crate::fsize;
use crate::intersect::check_intersection;
use crate::polygon::Polygon;
use crate::queue::{EventQueue, SweepStatus};
use crate::registry::PointRegistry;

/// Which boolean operation a sweep computes (§4.C6/C8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Region covered by either input.
    Union,
    /// Region covered by both inputs.
    Intersect,
    /// Region covered by the first input but not the second.
    Subtract,
    /// Region covered by exactly one input.
    Xor,
}

/// Run the plane sweep and assemble the result. This is the sole entry
/// point every [`Polygon`] combinator funnels through.
pub fn boolean(a: &Polygon, b: &Polygon, op: Operation, config: &BoolConfig) -> Result<Polygon> {
    if a.is_empty() || b.is_empty() {
        tracing::debug!(?op, a_empty = a.is_empty(), b_empty = b.is_empty(), "empty-input shortcut");
        return Ok(match op {
            Operation::Intersect => Polygon::empty(),
            Operation::Subtract => a.clone(),
            Operation::Union | Operation::Xor => {
                if a.is_empty() {
                    b.clone()
                } else {
                    a.clone()
                }
            }
        });
    }

    let bbox_a = a.bounding_box();
    let bbox_b = b.bounding_box();
    if !bbox_a.overlaps(&bbox_b) {
        tracing::debug!(?op, "disjoint-bounding-box shortcut");
        return Ok(match op {
            Operation::Intersect => Polygon::empty(),
            Operation::Subtract => a.clone(),
            Operation::Union | Operation::Xor => {
                let mut paths = a.paths.clone();
                paths.extend(b.paths.clone());
                Polygon::new(paths)
            }
        });
    }

    let pool = Pool::new(config.arena_capacity_hint);
    let mut registry = PointRegistry::new(&pool, config.epsilon);
    let mut q = EventQueue::new();

    load_polygon(&pool, &mut registry, &mut q, a, 0);
    load_polygon(&pool, &mut registry, &mut q, b, 1);
    tracing::debug!(queue_len = q.len(), "event queue loaded");

    // OPT>=3: once the sweep line crosses past the region that could
    // still contribute, stop early. Intersect needs both inputs still
    // in play; subtract only needs A still in play.
    let min_max_x = bbox_a.right.min(bbox_b.right);

    let mut s = SweepStatus::new();
    let mut assembler = Assembler::new();

    while let Some(e) = q.pop_min() {
        match op {
            Operation::Intersect if e.p.coord.x > min_max_x => break,
            Operation::Subtract if e.p.coord.x > bbox_a.right => break,
            _ => {}
        }

        tracing::trace!(x = e.p.coord.x, y = e.p.coord.y, left = e.left.get(), "pop event");
        if e.left.get() {
            handle_left(&pool, &mut registry, &mut q, &mut s, e, config.epsilon);
        } else {
            handle_right(&pool, &mut registry, &mut q, &mut s, &mut assembler, e, op, config.epsilon);
        }
    }
    tracing::debug!("sweep finished");

    let paths = assembler.assemble()?;
    tracing::debug!(path_count = paths.len(), "chain assembly finished");
    Ok(Polygon::new(paths))
}

fn load_polygon<'a>(pool: &'a Pool, registry: &mut PointRegistry<'a>, q: &mut EventQueue<'a>, poly: &Polygon, poly_id: usize) {
    for path in &poly.paths {
        let pts = &path.points;
        let n = pts.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let j = (i + 1) % n;
            if let Some((e1, e2)) = load_edge(pool, registry, pts[i].coord, pts[j].coord, pts[i].loc, pts[j].loc, poly_id) {
                q.insert(e1);
                q.insert(e2);
            }
        }
    }
}

fn handle_left<'a>(
    pool: &'a Pool,
    registry: &mut PointRegistry<'a>,
    q: &mut EventQueue<'a>,
    s: &mut SweepStatus<'a>,
    e: &'a Event<'a>,
    eps: fsize,
) {
    s.insert(e);
    let prev = s.predecessor(e);
    match prev {
        None => e.below.set(0),
        Some(p) => e.below.set(p.below.get() ^ p.owner.get()),
    }

    if let Some(next) = s.successor(e) {
        check_intersection(pool, registry, q, s, e, next, eps);
    }
    // `e` may have been evicted and re-queued by the check above.
    if s.contains(e) {
        if let Some(p) = prev {
            check_intersection(pool, registry, q, s, p, e, eps);
        }
    }
}

fn handle_right<'a>(
    pool: &'a Pool,
    registry: &mut PointRegistry<'a>,
    q: &mut EventQueue<'a>,
    s: &mut SweepStatus<'a>,
    assembler: &mut Assembler<'a>,
    e: &'a Event<'a>,
    op: Operation,
    eps: fsize,
) {
    let sli = e.other.get().expect("other not yet linked");
    let next = s.successor(sli);
    let prev = s.predecessor(sli);
    s.remove(sli);

    let below = sli.below.get();
    let above = below ^ sli.owner.get();
    let below_in = classify::is_inside(op, below);
    let above_in = classify::is_inside(op, above);
    if below_in != above_in {
        e.below_in.set(below_in);
        sli.below_in.set(below_in);
        assembler.add_edge(e);
    }

    if let (Some(p), Some(n)) = (prev, next) {
        check_intersection(pool, registry, q, s, p, n, eps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point2D;
    use crate::polygon::{Path, WindingOrder};

    fn square(pts: &[(fsize, fsize)]) -> Path {
        Path::from_coords(pts.iter().map(|&(x, y)| Point2D::new(x, y)))
    }

    fn poly(paths: Vec<Path>) -> Polygon {
        Polygon::new(paths)
    }

    /// `actual` and `expected` describe the same closed ring iff one is
    /// a cyclic rotation of the other in the same walking direction --
    /// the chain assembler may seed a ring at any of its points, not
    /// necessarily the one an example happens to list first.
    fn assert_same_ring(actual: &[Point2D], expected: &[(fsize, fsize)]) {
        assert_eq!(actual.len(), expected.len(), "actual={actual:?} expected={expected:?}");
        let n = expected.len();
        let close = |a: Point2D, b: (fsize, fsize)| (a.x - b.0).abs() < 1e-4 && (a.y - b.1).abs() < 1e-4;
        let start = (0..n)
            .find(|&i| close(actual[i], expected[0]))
            .unwrap_or_else(|| panic!("expected start point not found: actual={actual:?} expected={expected:?}"));
        for i in 0..n {
            assert!(
                close(actual[(start + i) % n], expected[i]),
                "ring mismatch at rotation {start}: actual={actual:?} expected={expected:?}"
            );
        }
    }

    fn path_coords(p: &Path) -> Vec<Point2D> {
        p.coords().collect()
    }

    #[test]
    fn scenario_1_disjoint_squares_union() {
        let a = poly(vec![square(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])]);
        let b = poly(vec![square(&[(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)])]);
        let r = boolean(&a, &b, Operation::Union, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 2);
        assert_same_ring(&path_coords(&r.paths[0]), &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_same_ring(&path_coords(&r.paths[1]), &[(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)]);
    }

    #[test]
    fn scenario_2_identical_squares_intersect() {
        let a = poly(vec![square(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])]);
        let b = a.clone();
        let r = boolean(&a, &b, Operation::Intersect, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 1);
        assert_same_ring(&path_coords(&r.paths[0]), &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        assert_eq!(r.paths[0].winding(), WindingOrder::Clockwise);
    }

    #[test]
    fn scenario_3_square_with_hole_via_subtract() {
        let a = poly(vec![square(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)])]);
        let b = poly(vec![square(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)])]);
        let r = boolean(&a, &b, Operation::Subtract, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 2);

        let outer = r.paths.iter().find(|p| p.winding() == WindingOrder::Clockwise).unwrap();
        let hole = r.paths.iter().find(|p| p.winding() == WindingOrder::CounterClockwise).unwrap();
        assert_same_ring(&path_coords(outer), &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_same_ring(&path_coords(hole), &[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)]);
    }

    #[test]
    fn scenario_4_edge_sharing_squares_union() {
        let a = poly(vec![square(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])]);
        let b = poly(vec![square(&[(2.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0)])]);
        let r = boolean(&a, &b, Operation::Union, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 1);
        assert_same_ring(&path_coords(&r.paths[0]), &[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        // The shared edge (2,0)-(2,2) must not survive into the result.
        assert!(!r.paths[0].coords().any(|p| (p.x - 2.0).abs() < 1e-4 && p.y > 0.0 && p.y < 2.0));
    }

    #[test]
    fn scenario_5_crossing_squares_xor() {
        let a = poly(vec![square(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])]);
        let b = poly(vec![square(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)])]);
        let r = boolean(&a, &b, Operation::Xor, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 2);
        for path in &r.paths {
            assert_eq!(path.points.len(), 6, "each L-shape has 6 vertices");
            assert_eq!(path.winding(), WindingOrder::Clockwise);
        }
        let total_area: fsize = r.paths.iter().map(|p| crate::utils::path_signed_area(&path_coords(p))).sum();
        // area(A) + area(B) - 2*area(A∩B) = 4 + 4 - 2*1
        assert!((total_area - 6.0).abs() < 1e-3, "total_area={total_area}");
    }

    #[test]
    fn scenario_6_degenerate_input_self_cancels() {
        // A path whose closing edge collapses to a point and whose two
        // remaining edges retrace the same segment in both directions
        // -- it owns no net area or boundary.
        let a = poly(vec![square(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])]);
        let r = boolean(&a, &a, Operation::Union, &BoolConfig::default()).unwrap();
        assert!(r.is_empty(), "degenerate self-overlapping path must cancel to empty: {r:?}");
    }

    #[test]
    fn empty_input_shortcut_union_returns_other() {
        let a = poly(vec![square(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])]);
        let empty = Polygon::empty();
        let r = boolean(&a, &empty, Operation::Union, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 1);
        assert_same_ring(&path_coords(&r.paths[0]), &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    }

    #[test]
    fn empty_input_shortcut_intersect_is_empty() {
        let a = poly(vec![square(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])]);
        let empty = Polygon::empty();
        let r = boolean(&a, &empty, Operation::Intersect, &BoolConfig::default()).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn disjoint_bbox_shortcut_subtract_returns_a_unchanged() {
        let a = poly(vec![square(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])]);
        let b = poly(vec![square(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0)])]);
        let r = boolean(&a, &b, Operation::Subtract, &BoolConfig::default()).unwrap();
        assert_eq!(r.paths.len(), 1);
        assert_same_ring(&path_coords(&r.paths[0]), &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    }

    #[test]
    fn self_identities() {
        let a = poly(vec![square(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])]);
        let cfg = BoolConfig::default();

        let u = boolean(&a, &a, Operation::Union, &cfg).unwrap();
        assert_eq!(u.paths.len(), 1);
        assert_same_ring(&path_coords(&u.paths[0]), &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);

        let i = boolean(&a, &a, Operation::Intersect, &cfg).unwrap();
        assert_eq!(i.paths.len(), 1);
        assert_same_ring(&path_coords(&i.paths[0]), &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);

        let s = boolean(&a, &a, Operation::Subtract, &cfg).unwrap();
        assert!(s.is_empty());

        let x = boolean(&a, &a, Operation::Xor, &cfg).unwrap();
        assert!(x.is_empty());
    }

    #[test]
    fn commutative_union_and_intersect() {
        let a = poly(vec![square(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)])]);
        let b = poly(vec![square(&[(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)])]);
        let cfg = BoolConfig::default();

        let area = |r: &Polygon| -> fsize { r.paths.iter().map(|p| crate::utils::path_signed_area(&path_coords(p))).sum() };

        let u_ab = boolean(&a, &b, Operation::Union, &cfg).unwrap();
        let u_ba = boolean(&b, &a, Operation::Union, &cfg).unwrap();
        assert!((area(&u_ab) - area(&u_ba)).abs() < 1e-3);

        let i_ab = boolean(&a, &b, Operation::Intersect, &cfg).unwrap();
        let i_ba = boolean(&b, &a, Operation::Intersect, &cfg).unwrap();
        assert!((area(&i_ab) - area(&i_ba)).abs() < 1e-3);
    }
}
