//! C7: the chain assembler.
//!
//! Weaves emitted right-endpoint edges into closed, correctly oriented
//! paths (§4.C7), using the End store to find where a new edge attaches
//! and the chain ring (`crate::chain`) to thread it in. Ported from the
//! original `chain_add`/`path_make`/`poly_make`.

use crate::chain;
use crate::error::{BoolError, Result};
use crate::event::Event;
use crate::polygon::{Path, PathPoint};
use crate::queue::EndStore;

pub(crate) struct Assembler<'a> {
    end: EndStore<'a>,
    /// One entry per closed ring, recorded at the moment it closed.
    seeds: Vec<&'a Event<'a>>,
}

fn insert_or_extract<'a>(end: &mut EndStore<'a>, e: &'a Event<'a>) -> Option<&'a Event<'a>> {
    if let Some(existing) = end.get(e.p) {
        end.remove(e.p);
        Some(existing)
    } else {
        end.insert(e.p, e);
        None
    }
}

impl<'a> Assembler<'a> {
    pub(crate) fn new() -> Self {
        Self {
            end: EndStore::new(),
            seeds: Vec::new(),
        }
    }

    /// §4.C7: add one emitted right-endpoint edge `e` (with `e.other`
    /// its already-removed-from-S left partner `sli`) to the assembly.
    pub(crate) fn add_edge(&mut self, e: &'a Event<'a>) {
        let sli = e.other.get().expect("other not yet linked");
        debug_assert!(!e.left.get() && sli.left.get());

        // Search by `sli`'s point first (it is known to come first in
        // sweep order), then by `e`'s point, mirroring the original's
        // "insert-or-extract" dance through the End store.
        let o1 = insert_or_extract(&mut self.end, sli);
        let o2 = insert_or_extract(&mut self.end, e);

        match (o1, o2) {
            (None, None) => {
                // Neither end seen before: a fresh two-node chain.
                sli.p.path_cnt.set(sli.p.path_cnt.get() + 1);
                e.p.path_cnt.set(e.p.path_cnt.get() + 1);
                chain::join(sli, e);
            }
            (Some(o1), Some(o2)) => {
                // Both ends seen: this edge closes a ring.
                chain::join(o1, o2);
                self.seeds.push(o2);
                tracing::trace!("ring closed");
            }
            (Some(o1), None) => {
                e.p.path_cnt.set(e.p.path_cnt.get() + 1);
                chain::join(o1, e);
            }
            (None, Some(o2)) => {
                sli.p.path_cnt.set(sli.p.path_cnt.get() + 1);
                chain::join(o2, sli);
            }
        }
    }

    /// Walk every closed ring's seed into a [`Path`], assigning output
    /// point indices lazily on first use. Consumes the assembler.
    pub(crate) fn assemble(self) -> Result<Vec<Path>> {
        debug_assert!(self.end.is_empty(), "some chains are still open at end of sweep");
        let mut next_idx = 0usize;
        let mut paths = Vec::with_capacity(self.seeds.len());
        for seed in &self.seeds {
            if seed.used.get() {
                continue;
            }
            let points = path_make(seed, &mut next_idx);
            if points.len() < 3 {
                return Err(BoolError::Invariant("assembled chain has fewer than 3 points"));
            }
            paths.push(Path::new(points));
        }
        Ok(paths)
    }
}

fn push_point<'a>(points: &mut Vec<PathPoint>, e: &'a Event<'a>, next_idx: &mut usize) {
    debug_assert!(!e.used.get(), "event visited twice while walking a chain ring");
    e.used.set(true);
    if e.p.idx.get().is_none() {
        e.p.idx.set(Some(*next_idx));
        *next_idx += 1;
    }
    points.push(PathPoint::new(e.p.coord, e.p.loc));
}

/// Walk the ring seeded by the closing event `e0`, in the direction
/// `e0.below_in` dictates (§4.C7's orientation rule), collecting one
/// [`PathPoint`] per distinct ring node.
fn path_make<'a>(e0: &'a Event<'a>, next_idx: &mut usize) -> Vec<PathPoint> {
    let other = e0.other.get().expect("other not yet linked");
    let n0 = chain::step(e0, 0).expect("chain ring is too short or misformed");
    let n1 = chain::step(e0, 1).expect("chain ring is too short or misformed");

    // Make `e1` the neighbour that is e0's own edge-partner, and `ex`
    // the other (far) ring neighbour.
    let (mut e0, mut e1, _ex) = if std::ptr::eq(n0.p, other.p) {
        (e0, n0, n1)
    } else {
        debug_assert!(std::ptr::eq(n1.p, other.p));
        (e0, n1, n0)
    };

    // §4.C7 orientation rule: "if below_in, walk e1->e0->...; else e0->e1->...".
    if e0.below_in.get() {
        std::mem::swap(&mut e0, &mut e1);
    }

    let mut points = Vec::new();
    push_point(&mut points, e0, next_idx);
    push_point(&mut points, e1, next_idx);

    let mut prev = e0;
    let mut cur = e1;
    loop {
        let a = chain::step(cur, 0);
        let b = chain::step(cur, 1);
        let next = match a {
            Some(a) if std::ptr::eq(a, prev) => b,
            _ => a,
        };
        let next = next.expect("chain ring is too short or misformed");
        if std::ptr::eq(next, e0) {
            break;
        }
        push_point(&mut points, next, next_idx);
        prev = cur;
        cur = next;
    }

    points
}
