//! C5: the intersection engine.
//!
//! Given two neighbours `el` (lower) and `eh` (upper) in the sweep
//! status S, detects whether their edges overlap or cross and resolves
//! it by splitting (`divide_segment`) or, when rounding places the
//! crossing exactly on an already-active left endpoint, by evicting
//! that edge from S and re-queuing it (§4.C5).
//!
//! Ported from the original `check_intersection`/`find_intersection`/
//! `ev4_overlap`/`divide_segment` (see `csg2-bool.c` in the retrieved
//! original source): same two-phase structure (coordinate-based
//! overlap screen first, numeric line intersection second), same five
//! overlap configurations and owner/below XOR propagation.

use std::cmp::Ordering;

use crate::arena::Pool;
use crate::event::{self, ev_cmp, Event, Mask};
use crate::fsize;
use crate::point::{lex_cmp, rasterize, Point2D};
use crate::queue::{EventQueue, SweepStatus};
use crate::registry::{PointRegistry, Pt};

enum Intersection<'a> {
    None,
    Collinear,
    At(&'a Pt),
}

#[inline]
fn leq(a: fsize, b: fsize, eps: fsize) -> bool {
    a <= b + eps
}

#[inline]
fn geq(a: fsize, b: fsize, eps: fsize) -> bool {
    a >= b - eps
}

fn dim_between(a: fsize, b: fsize, c: fsize, eps: fsize) -> bool {
    if a < c {
        leq(a, b, eps) && leq(b, c, eps)
    } else {
        geq(a, b, eps) && geq(b, c, eps)
    }
}

/// Is `b` on the segment `a--c`, collinear and within bounds?
fn coord_between(a: Point2D, b: Point2D, c: Point2D, eps: fsize) -> bool {
    if !dim_between(a.x, b.x, c.x, eps) {
        return false;
    }
    if !dim_between(a.y, b.y, c.y, eps) {
        return false;
    }
    let dx = c.x - a.x;
    let dy = c.y - a.y;
    if dx.abs() > dy.abs() {
        let t = (b.x - a.x) / dx;
        let y = a.y + t * dy;
        (y - b.y).abs() <= eps
    } else {
        let t = (b.y - a.y) / dy;
        let x = a.x + t * dx;
        (x - b.x).abs() <= eps
    }
}

fn pt_between(a: &Pt, b: &Pt, c: &Pt, eps: fsize) -> bool {
    if std::ptr::eq(a, b) || std::ptr::eq(b, c) {
        return true;
    }
    coord_between(a.coord, b.coord, c.coord, eps)
}

/// The coordinate-based overlap screen (§4.C5 step 1): does either
/// interior point of one segment lie strictly between the endpoints of
/// the other, in one of the eight geometric cases? Pure-touching at a
/// shared endpoint is excluded by construction (`pt_between` treats
/// shared endpoints as trivially "between").
fn ev4_overlap<'a>(el: &'a Event<'a>, ol: &'a Event<'a>, eh: &'a Event<'a>, oh: &'a Event<'a>, eps: fsize) -> bool {
    if pt_between(el.p, eh.p, ol.p, eps) {
        if pt_between(el.p, oh.p, ol.p, eps) {
            return true;
        }
        if pt_between(eh.p, ol.p, oh.p, eps) {
            return !std::ptr::eq(ol.p, eh.p);
        }
    }
    if pt_between(eh.p, el.p, oh.p, eps) {
        if pt_between(eh.p, ol.p, oh.p, eps) {
            return true;
        }
        if pt_between(el.p, oh.p, ol.p, eps) {
            return !std::ptr::eq(oh.p, el.p);
        }
    }
    false
}

fn make_point(swap: bool, axis_x: fsize, axis_y: fsize) -> Point2D {
    if swap {
        Point2D::new(axis_y, axis_x)
    } else {
        Point2D::new(axis_x, axis_y)
    }
}

/// Solve the two line formulas `y = a*x + b` (or swapped) for their
/// crossing point. Ported from the original `intersection_point`: the
/// formula closer to a slope of +-1 is kept as the reference axis to
/// keep the division numerically stable.
fn intersection_point(mut ka: fsize, mut kb: fsize, mut ks: bool, mut ma: fsize, mut mb: fsize, mut ms: bool) -> Point2D {
    if ka.abs() < ma.abs() {
        std::mem::swap(&mut ka, &mut ma);
        std::mem::swap(&mut kb, &mut mb);
        std::mem::swap(&mut ks, &mut ms);
    }
    if ks != ms {
        if ma == 0.0 {
            return make_point(ks, mb, (ka * mb) + kb);
        }
        ka = 1.0 / ka;
        kb *= -ka;
        ks = ms;
    }
    let q = (mb - kb) / (ka - ma);
    make_point(ks, q, (ka * q) + kb)
}

/// §4.C5 step 2: compute the intersection of `el` and `eh` on their
/// *original* line formulas (never on already-rasterised derived
/// points, so errors don't accumulate), then rasterise and validate it
/// lies within both segments' bounding intervals.
fn find_intersection<'a>(
    el: &'a Event<'a>,
    eh: &'a Event<'a>,
    registry: &mut PointRegistry<'a>,
    eps: fsize,
) -> Intersection<'a> {
    let p0 = el.p;
    let p0b = el.other.get().expect("other not yet linked").p;
    let p1 = eh.p;
    let p1b = eh.other.get().expect("other not yet linked").p;

    let l0 = el.line.get();
    let l1 = eh.line.get();

    if l0.swap == l1.swap && (l0.a - l1.a).abs() <= eps {
        return if (l0.b - l1.b).abs() <= eps {
            Intersection::Collinear
        } else {
            Intersection::None
        };
    }

    let i_orig = intersection_point(l0.a, l0.b, l0.swap, l1.a, l1.b, l1.swap);
    let mut i = Point2D::new(rasterize(i_orig.x, eps), rasterize(i_orig.y, eps));

    if !dim_between(p0.coord.x, i.x, p0b.coord.x, eps)
        || !dim_between(p0.coord.y, i.y, p0b.coord.y, eps)
        || !dim_between(p1.coord.x, i.x, p1b.coord.x, eps)
        || !dim_between(p1.coord.y, i.y, p1b.coord.y, eps)
    {
        return Intersection::None;
    }

    // Nudge `i` so that its lex order relative to each edge's left
    // point matches that edge's own endpoint order; without this a
    // rounding-adjacent intersection could compare as lying "before"
    // an edge's own left point, which later code assumes is impossible.
    match lex_cmp(p0.coord, i) {
        Ordering::Equal => return Intersection::At(p0),
        Ordering::Greater => i.x = rasterize(i_orig.x + 1.5 * eps, eps),
        Ordering::Less => {}
    }
    match lex_cmp(p1.coord, i) {
        Ordering::Equal => return Intersection::At(p1),
        Ordering::Greater => i.x = rasterize(i_orig.x + 1.5 * eps, eps),
        Ordering::Less => {}
    }

    Intersection::At(registry.intern(i, p0.loc))
}

/// Splits `e` at `p`: `e`'s right half becomes `e--r`, `e.other`'s left
/// half becomes `l--other`. Both halves inherit `e`'s (resp. `other`'s)
/// owner/below/line state and are re-queued.
fn divide_segment<'a>(pool: &'a Pool, q: &mut EventQueue<'a>, e: &'a Event<'a>, p: &'a Pt) {
    debug_assert!(e.left.get());
    let o = e.other.get().expect("other not yet linked");
    debug_assert!(!std::ptr::eq(p, e.p));
    debug_assert!(!std::ptr::eq(p, o.p));

    let r = event::new_event(pool, p, false, e, e.owner.get(), e.below.get(), e.line.get());
    let l = event::new_event(pool, p, true, o, o.owner.get(), o.below.get(), o.line.get());

    o.other.set(Some(l));
    e.other.set(Some(r));

    // The unprocessed part (l--o) may have its apparent order flipped
    // by rounding; fix it by swapping which of the two plays "left".
    if ev_cmp(l, o) == Ordering::Greater {
        o.left.set(true);
        l.left.set(false);
    }
    debug_assert!(ev_cmp(e, r) == Ordering::Less);

    q.insert(l);
    q.insert(r);
    tracing::trace!(x = p.coord.x, y = p.coord.y, "divide_segment split");
}

fn intersection_add_ev<'a>(sev: &mut [Option<&'a Event<'a>>; 4], cnt: &mut usize, e1: &'a Event<'a>, e2: &'a Event<'a>) {
    if std::ptr::eq(e1.p, e2.p) {
        sev[*cnt] = None;
        *cnt += 1;
    } else if ev_cmp(e1, e2) == Ordering::Greater {
        sev[*cnt] = Some(e2);
        *cnt += 1;
        sev[*cnt] = Some(e1);
        *cnt += 1;
    } else {
        sev[*cnt] = Some(e1);
        *cnt += 1;
        sev[*cnt] = Some(e2);
        *cnt += 1;
    }
}

/// §4.C5: given `el` (lower) and `eh` (upper), adjacent in S, resolve
/// any crossing or overlap between their edges.
pub(crate) fn check_intersection<'a>(
    pool: &'a Pool,
    registry: &mut PointRegistry<'a>,
    q: &mut EventQueue<'a>,
    s: &mut SweepStatus<'a>,
    el: &'a Event<'a>,
    eh: &'a Event<'a>,
    eps: fsize,
) {
    let ol = el.other.get().expect("other not yet linked");
    let oh = eh.other.get().expect("other not yet linked");

    tracing::trace!("check_intersection(el, eh)");

    if !ev4_overlap(el, ol, eh, oh, eps) {
        match find_intersection(el, eh, registry, eps) {
            Intersection::None | Intersection::Collinear => {}
            Intersection::At(ip) => {
                tracing::trace!(x = ip.coord.x, y = ip.coord.y, "crossing found");
                // Lines meeting at a single shared endpoint need no split.
                if std::ptr::eq(el.p, eh.p) || std::ptr::eq(ol.p, oh.p) {
                    return;
                }
                if std::ptr::eq(ip, el.p) {
                    s.remove(el);
                    q.insert(el);
                } else if !std::ptr::eq(ip, ol.p) {
                    divide_segment(pool, q, el, ip);
                }
                if std::ptr::eq(ip, eh.p) {
                    s.remove(eh);
                    q.insert(eh);
                } else if !std::ptr::eq(ip, oh.p) {
                    divide_segment(pool, q, eh, ip);
                }
            }
        }
        return;
    }

    // Overlap: enumerate the (up to) four distinct endpoints in sweep order.
    tracing::trace!("overlap found");
    let mut sev: [Option<&Event<'_>>; 4] = [None; 4];
    let mut cnt = 0usize;
    intersection_add_ev(&mut sev, &mut cnt, el, eh);
    intersection_add_ev(&mut sev, &mut cnt, ol, oh);

    let owner: Mask = eh.owner.get() ^ el.owner.get();
    let below: Mask = el.below.get();
    let above: Mask = below ^ owner;

    match cnt {
        2 => {
            // el--ol and eh--oh coincide entirely.
            eh.owner.set(owner);
            oh.owner.set(owner);
            eh.below.set(below);
            el.owner.set(0);
            ol.owner.set(0);
        }
        3 => {
            let mid = sev[1].expect("middle endpoint always present");
            mid.owner.set(0);
            mid.other.get().expect("other not yet linked").owner.set(0);

            let (sh, shl) = match sev[0] {
                Some(s0) => (s0, s0),
                None => {
                    let s2 = sev[2].expect("one of sev[0]/sev[2] present");
                    (s2, s2.other.get().expect("other not yet linked"))
                }
            };
            sh.other.get().expect("other not yet linked").owner.set(owner);
            sh.other.get().expect("other not yet linked").below.set(below);
            if std::ptr::eq(shl, el) {
                eh.below.set(above);
            }
            divide_segment(pool, q, shl, mid.p);
        }
        4 => {
            let s0 = sev[0].unwrap();
            let s1 = sev[1].unwrap();
            let s2 = sev[2].unwrap();
            let s3 = sev[3].unwrap();
            if !std::ptr::eq(s0, s3.other.get().expect("other not yet linked")) {
                s1.owner.set(0);
                if std::ptr::eq(s1, eh) {
                    s1.below.set(above);
                }
                s2.owner.set(owner);
                s2.below.set(below);
                divide_segment(pool, q, s0, s1.p);
                divide_segment(pool, q, s1, s2.p);
            } else {
                s1.owner.set(0);
                s2.owner.set(0);
                if std::ptr::eq(s1, eh) {
                    s1.below.set(above);
                    s2.below.set(above);
                }
                divide_segment(pool, q, s0, s1.p);
                let s3o = s3.other.get().expect("other not yet linked");
                s3o.owner.set(owner);
                s3o.below.set(below);
                divide_segment(pool, q, s3o, s2.p);
            }
        }
        _ => unreachable!("overlap must yield 2, 3 or 4 endpoints"),
    }
}
