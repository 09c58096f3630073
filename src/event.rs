//! C2/C3/C4: events, their construction, and the two comparators that
//! order the event queue (Q) and the sweep status (S).

use std::cell::Cell;
use std::cmp::Ordering;

use crate::arena::Pool;
use crate::fsize;
use crate::registry::{PointRegistry, Pt};
use crate::utils::calculate_signed_area3;
use crate::Loc;

pub(crate) type Mask = usize;

/// Cached line formula for an edge: `y = a*x + b` if `!swap`,
/// `x = a*y + b` if `swap`. Keeping `|a| <= 1` (by choosing the axis
/// with the larger coordinate spread) is what pins the numerical
/// stability of intersection computation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line {
    pub a: fsize,
    pub b: fsize,
    pub swap: bool,
}

impl Line {
    fn from_points(p0: &Pt, p1: &Pt) -> Self {
        let dx = p1.coord.x - p0.coord.x;
        let dy = p1.coord.y - p0.coord.y;
        let swap = dx.abs() < dy.abs();
        let (run, rise) = if swap { (dy, dx) } else { (dx, dy) };
        let a = rise / run;
        debug_assert!((-1.0..=1.0).contains(&a), "line slope out of [-1,1]: {a}");
        let (x0, y0) = if swap {
            (p0.coord.y, p0.coord.x)
        } else {
            (p0.coord.x, p0.coord.y)
        };
        let b = y0 - a * x0;
        Line { a, b, swap }
    }
}

/// One endpoint of an edge, queued for the sweep.
///
/// All mutable state lives behind `Cell` so the arena can hand out
/// plain shared references (`&'a Event<'a>`) to every structure that
/// needs to touch an event -- Q, S, the end store, the chain -- without
/// any of them claiming ownership. This realizes the same
/// "back-pointer bounded by the arena" idea the original models with
/// raw pointers, without needing `unsafe` on this side.
pub(crate) struct Event<'a> {
    pub p: &'a Pt,
    pub other: Cell<Option<&'a Event<'a>>>,
    pub left: Cell<bool>,
    /// Mask of polygon IDs that own this edge. A bit toggles once per
    /// occurrence, so a self-overlapping path still gets correct
    /// parity instead of merely "is owned".
    pub owner: Cell<Mask>,
    /// Mask of which polygons the region just below this edge is
    /// inside of. Only meaningful while the edge is in S.
    pub below: Cell<Mask>,
    pub line: Cell<Line>,
    /// Whether this event's point has already been pushed into an
    /// output path.
    pub used: Cell<bool>,
    /// Whether this (left) event currently sits in the sweep status S.
    /// Maintained by `queue::SweepStatus::insert`/`remove` so membership
    /// can be answered in O(1) instead of scanning S.
    pub in_s: Cell<bool>,
    /// Recorded at classification time: which side of the edge was
    /// "inside" under the active operation, used by the assembler to
    /// pick a walk direction for the chain this edge seeds or joins.
    pub below_in: Cell<bool>,
    /// The two ring-neighbour slots used by the chain assembler (C7).
    /// A fresh event has both unset ("is an end"); `chain::join` fills
    /// one free slot on each side it connects. Once both slots are
    /// filled the node is interior to a ring and `chain::step` walks
    /// either direction from it. See `crate::chain` for the operations.
    pub ring: [Cell<Option<&'a Event<'a>>>; 2],
}

impl<'a> Event<'a> {
    /// Point of `self`'s edge that is lexicographically smaller.
    pub fn left_point(&self) -> &'a Pt {
        if self.left.get() {
            self.p
        } else {
            self.other.get().expect("other not yet linked").p
        }
    }

    /// Point of `self`'s edge that is lexicographically larger.
    pub fn right_point(&self) -> &'a Pt {
        if self.left.get() {
            self.other.get().expect("other not yet linked").p
        } else {
            self.p
        }
    }

    /// Is the point `o` below the supporting line of this edge?
    #[inline]
    pub fn below(&self, o: &Pt) -> bool {
        let other = self.other.get().expect("other not yet linked");
        if self.left.get() {
            calculate_signed_area3(&self.p.coord, &other.p.coord, &o.coord) > 0.0
        } else {
            calculate_signed_area3(&other.p.coord, &self.p.coord, &o.coord) > 0.0
        }
    }

    #[inline]
    pub fn above(&self, o: &Pt) -> bool {
        !self.below(o)
    }
}

/// Sign of the triangle (a1, a2, b): whether `b` sits below (`<0`),
/// on (`0`) or above (`>0`) the directed line `a1 -> a2`.
fn pt2_pt_cmp(a1: &Pt, a2: &Pt, b: &Pt) -> Ordering {
    calculate_signed_area3(&a1.coord, &a2.coord, &b.coord)
        .partial_cmp(&0.0)
        .expect("non-finite coordinate")
}

/// C3: event queue order.
///
/// 1. Distinct points compare lexicographically.
/// 2. Same point: right events precede left events (edges close
///    before new ones open at a shared vertex).
/// 3. Same point, same direction: the edge whose other endpoint lies
///    below the other's supporting line comes first. Collinear,
///    same-direction ties may compare equal -- the split logic handles
///    that idempotently.
pub(crate) fn ev_cmp(e1: &Event<'_>, e2: &Event<'_>) -> Ordering {
    if !std::ptr::eq(e1.p, e2.p) {
        return crate::point::lex_cmp(e1.p.coord, e2.p.coord);
    }
    // Right (`!left`) sorts before left.
    let dir = e1.left.get().cmp(&e2.left.get());
    if dir != Ordering::Equal {
        return dir;
    }
    let o2 = e2.other.get().expect("other not yet linked");
    pt2_pt_cmp(e1.left_point(), e1.right_point(), o2.p)
}

/// Core of the sweep-status comparator, ported verbatim (including its
/// asymmetry in rounding-edge cases) from the original `__seg_cmp`.
/// Not exposed directly -- see [`seg_cmp`] for the argument-order
/// convention callers must use.
fn seg_cmp_raw(e1: &Event<'_>, e2: &Event<'_>) -> Ordering {
    debug_assert!(e1.left.get() && e2.left.get(), "only left events are ordered in S");
    if std::ptr::eq(e1, e2) {
        return Ordering::Equal;
    }
    let o1 = e1.other.get().expect("other not yet linked");
    let o2 = e2.other.get().expect("other not yet linked");

    let e1_p_cmp = pt2_pt_cmp(e1.p, o1.p, e2.p);
    let e1_o_cmp = pt2_pt_cmp(e1.p, o1.p, o2.p);

    if e1_p_cmp != Ordering::Equal || e1_o_cmp != Ordering::Equal {
        if e1_p_cmp == Ordering::Equal {
            return e1_o_cmp;
        }
        if ev_cmp(e1, e2) == Ordering::Greater {
            return if pt2_pt_cmp(e2.p, o2.p, e1.p) != Ordering::Less {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        return if e1_p_cmp != Ordering::Greater {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Collinear.
    if std::ptr::eq(e1.p, e2.p) {
        return (e1 as *const Event<'_> as usize).cmp(&(e2 as *const Event<'_> as usize));
    }
    ev_cmp(e1, e2)
}

/// C4: sweep status order, bottom (small) to top (large) at the
/// current sweep x.
///
/// This comparator is **asymmetric** by construction in rounding-edge
/// cases -- `seg_cmp(a, b)` is not guaranteed to equal `-seg_cmp(b,
/// a)`. The original documents this explicitly rather than attempting
/// to "fix" it (see the design notes): `seg_cmp(new, existing)` is
/// defined as the negation of `seg_cmp_raw(existing, new)`, i.e. the
/// comparator always treats the edge being inserted as the reference
/// edge. Every insertion into S MUST call this with the new edge
/// first; do not symmetrise it with a different tie-break.
pub(crate) fn seg_cmp(new: &Event<'_>, existing: &Event<'_>) -> Ordering {
    seg_cmp_raw(existing, new).reverse()
}

/// Allocate a fresh left/right event pair for the edge `(p1, p2)`
/// owned by `poly_id`, or `None` if the two coordinates rasterise to
/// the same point (a degenerate, structurally-dropped edge).
pub(crate) fn load_edge<'a>(
    pool: &'a Pool,
    registry: &mut PointRegistry<'a>,
    p1: crate::point::Point2D,
    p2: crate::point::Point2D,
    loc1: Loc,
    loc2: Loc,
    poly_id: usize,
) -> Option<(&'a Event<'a>, &'a Event<'a>)> {
    let pt1 = registry.intern(p1, loc1);
    let pt2 = registry.intern(p2, loc2);
    if std::ptr::eq(pt1, pt2) {
        tracing::debug!("dropping degenerate edge at {:?}", pt1.coord);
        return None;
    }

    let (first, second, first_is_left) = match crate::point::lex_cmp(pt1.coord, pt2.coord) {
        Ordering::Less => (pt1, pt2, true),
        _ => (pt1, pt2, false),
    };
    let line = Line::from_points(first, second);

    let owner: Mask = 1 << poly_id;
    let ev1: &Event<'a> = pool.alloc(Event {
        p: pt1,
        other: Cell::new(None),
        left: Cell::new(first_is_left),
        owner: Cell::new(owner),
        below: Cell::new(0),
        line: Cell::new(line),
        used: Cell::new(false),
        in_s: Cell::new(false),
        below_in: Cell::new(false),
        ring: [Cell::new(None), Cell::new(None)],
    });
    let ev2: &Event<'a> = pool.alloc(Event {
        p: pt2,
        other: Cell::new(Some(ev1)),
        left: Cell::new(!first_is_left),
        owner: Cell::new(owner),
        below: Cell::new(0),
        line: Cell::new(line),
        used: Cell::new(false),
        in_s: Cell::new(false),
        below_in: Cell::new(false),
        ring: [Cell::new(None), Cell::new(None)],
    });
    ev1.other.set(Some(ev2));

    Some((ev1, ev2))
}

/// Allocate a single, freshly-linked event. Used by [`crate::intersect`]
/// when `divide_segment` splits an edge into two new halves; `other`
/// must be linked up by the caller afterwards (the two halves of a
/// split are mutually referential).
pub(crate) fn new_event<'a>(
    pool: &'a Pool,
    p: &'a Pt,
    left: bool,
    other: &'a Event<'a>,
    owner: Mask,
    below: Mask,
    line: Line,
) -> &'a Event<'a> {
    pool.alloc(Event {
        p,
        other: Cell::new(Some(other)),
        left: Cell::new(left),
        owner: Cell::new(owner),
        below: Cell::new(below),
        line: Cell::new(line),
        used: Cell::new(false),
        in_s: Cell::new(false),
        below_in: Cell::new(false),
        ring: [Cell::new(None), Cell::new(None)],
    })
}
