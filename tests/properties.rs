//! Property-based tests for the quantified invariants in the boolean
//! core's testable-properties section: commutativity, the self-
//! operation identities, and XOR = UNION - INTERSECT.
//!
//! Grounded in `rgeometry`'s use of `proptest` to check algebraic
//! properties of polygon operations over randomly generated inputs --
//! the closest pack example exercising property-based testing over
//! polygon-shaped data. Inputs here are restricted to axis-aligned
//! rectangles: generating arbitrary simple (non-self-intersecting)
//! polygons is its own hard problem, and rectangles are exactly the
//! shapes for which an independent, purely arithmetic area oracle is
//! trivial to write -- which is what every property below compares the
//! boolean core's output against.

use planarbool::{boolean, fsize, BoolConfig, Operation, Path, Point2D, Polygon};
use proptest::prelude::*;

type Rect = (f64, f64, f64, f64); // (x0, y0, x1, y1), x0<x1, y0<y1

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-5i32..5, 1i32..4, -5i32..5, 1i32..4).prop_map(|(x0, w, y0, h)| {
        (x0 as f64, y0 as f64, (x0 + w) as f64, (y0 + h) as f64)
    })
}

fn rect_polygon(r: Rect) -> Polygon {
    let (x0, y0, x1, y1) = r;
    let path = Path::from_coords([
        Point2D::new(x0 as fsize, y0 as fsize),
        Point2D::new(x1 as fsize, y0 as fsize),
        Point2D::new(x1 as fsize, y1 as fsize),
        Point2D::new(x0 as fsize, y1 as fsize),
    ]);
    Polygon::new(vec![path])
}

fn rect_area(r: Rect) -> f64 {
    (r.2 - r.0).max(0.0) * (r.3 - r.1).max(0.0)
}

fn rect_overlap(a: Rect, b: Rect) -> Option<Rect> {
    let x0 = a.0.max(b.0);
    let x1 = a.2.min(b.2);
    let y0 = a.1.max(b.1);
    let y1 = a.3.min(b.3);
    if x1 > x0 && y1 > y0 {
        Some((x0, y0, x1, y1))
    } else {
        None
    }
}

/// Independent area oracle: does not call into any of the crate's own
/// area-computation code, so this can't tautologically agree with a
/// bug shared between production and test code.
fn signed_area(path: &Path) -> f64 {
    let n = path.points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for i in 0..n {
        let a = path.points[i].coord;
        let b = path.points[(i + 1) % n].coord;
        sum += (a.x as f64) * (b.y as f64) - (b.x as f64) * (a.y as f64);
    }
    sum * 0.5
}

fn polygon_area(poly: &Polygon) -> f64 {
    poly.paths.iter().map(signed_area).sum()
}

const TOL: f64 = 1e-2;

proptest! {
    #[test]
    fn union_area_matches_inclusion_exclusion(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let r = boolean(&pa, &pb, Operation::Union, &BoolConfig::default()).unwrap();
        let overlap = rect_overlap(a, b).map(rect_area).unwrap_or(0.0);
        let expected = rect_area(a) + rect_area(b) - overlap;
        prop_assert!((polygon_area(&r) - expected).abs() < TOL);
    }

    #[test]
    fn intersect_area_matches_analytic_overlap(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let r = boolean(&pa, &pb, Operation::Intersect, &BoolConfig::default()).unwrap();
        let expected = rect_overlap(a, b).map(rect_area).unwrap_or(0.0);
        prop_assert!((polygon_area(&r) - expected).abs() < TOL);
    }

    #[test]
    fn subtract_area_matches_analytic_difference(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let r = boolean(&pa, &pb, Operation::Subtract, &BoolConfig::default()).unwrap();
        let overlap = rect_overlap(a, b).map(rect_area).unwrap_or(0.0);
        let expected = rect_area(a) - overlap;
        prop_assert!((polygon_area(&r) - expected).abs() < TOL);
    }

    #[test]
    fn xor_equals_union_minus_intersect(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let cfg = BoolConfig::default();
        let u = boolean(&pa, &pb, Operation::Union, &cfg).unwrap();
        let i = boolean(&pa, &pb, Operation::Intersect, &cfg).unwrap();
        let x = boolean(&pa, &pb, Operation::Xor, &cfg).unwrap();
        prop_assert!((polygon_area(&x) - (polygon_area(&u) - polygon_area(&i))).abs() < TOL);
    }

    #[test]
    fn union_and_intersect_are_commutative(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let cfg = BoolConfig::default();
        let u_ab = boolean(&pa, &pb, Operation::Union, &cfg).unwrap();
        let u_ba = boolean(&pb, &pa, Operation::Union, &cfg).unwrap();
        prop_assert!((polygon_area(&u_ab) - polygon_area(&u_ba)).abs() < TOL);

        let i_ab = boolean(&pa, &pb, Operation::Intersect, &cfg).unwrap();
        let i_ba = boolean(&pb, &pa, Operation::Intersect, &cfg).unwrap();
        prop_assert!((polygon_area(&i_ab) - polygon_area(&i_ba)).abs() < TOL);

        let x_ab = boolean(&pa, &pb, Operation::Xor, &cfg).unwrap();
        let x_ba = boolean(&pb, &pa, Operation::Xor, &cfg).unwrap();
        prop_assert!((polygon_area(&x_ab) - polygon_area(&x_ba)).abs() < TOL);
    }

    #[test]
    fn self_operation_identities(a in rect_strategy()) {
        let pa = rect_polygon(a);
        let cfg = BoolConfig::default();

        let u = boolean(&pa, &pa, Operation::Union, &cfg).unwrap();
        prop_assert!((polygon_area(&u) - rect_area(a)).abs() < TOL);

        let i = boolean(&pa, &pa, Operation::Intersect, &cfg).unwrap();
        prop_assert!((polygon_area(&i) - rect_area(a)).abs() < TOL);

        let s = boolean(&pa, &pa, Operation::Subtract, &cfg).unwrap();
        prop_assert!(s.is_empty());

        let x = boolean(&pa, &pa, Operation::Xor, &cfg).unwrap();
        prop_assert!(x.is_empty());
    }

    #[test]
    fn union_is_idempotent(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let cfg = BoolConfig::default();
        let once = boolean(&pa, &pb, Operation::Union, &cfg).unwrap();
        let twice = boolean(&once, &pb, Operation::Union, &cfg).unwrap();
        prop_assert!((polygon_area(&once) - polygon_area(&twice)).abs() < TOL);
    }

    #[test]
    fn subtract_is_idempotent(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let cfg = BoolConfig::default();
        let once = boolean(&pa, &pb, Operation::Subtract, &cfg).unwrap();
        let twice = boolean(&once, &pb, Operation::Subtract, &cfg).unwrap();
        prop_assert!((polygon_area(&once) - polygon_area(&twice)).abs() < TOL);
    }

    #[test]
    fn every_output_path_has_at_least_three_vertices(a in rect_strategy(), b in rect_strategy()) {
        let pa = rect_polygon(a);
        let pb = rect_polygon(b);
        let cfg = BoolConfig::default();
        for op in [Operation::Union, Operation::Intersect, Operation::Subtract, Operation::Xor] {
            let r = boolean(&pa, &pb, op, &cfg).unwrap();
            for path in &r.paths {
                prop_assert!(path.points.len() >= 3);
            }
        }
    }
}
