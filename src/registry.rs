//! C1: the point registry.
//!
//! Canonicalises 2D coordinates to shared point identities. Two
//! requests for the same rasterised coordinate always return the same
//! `&'a Pt`, so downstream comparisons can use pointer equality.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::arena::Pool;
use crate::fsize;
use crate::point::{rasterize_point, Point2D};
use crate::Loc;

/// The canonical identity of a coordinate within one boolean run.
///
/// Lives in the arena until the run's pool is dropped. `idx` and
/// `path_cnt` are the only mutable fields: the registry itself never
/// changes a point once interned, but chain assembly later assigns an
/// output index on first use and tallies how many times the point is
/// used across the assembled paths.
#[derive(Debug)]
pub(crate) struct Pt {
    pub coord: Point2D,
    /// Opaque source-location tag, propagated only, never inspected.
    pub loc: Loc,
    /// Output index, assigned lazily on first use by the assembler.
    pub idx: Cell<Option<usize>>,
    /// Number of times this point is used in the resulting polygon.
    pub path_cnt: Cell<usize>,
}

/// Total order on `fsize` sufficient for ordering rasterised,
/// necessarily-finite coordinates inside a `BTreeMap` key.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrdKey(fsize);

impl Eq for OrdKey {}
impl PartialOrd for OrdKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OrdKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).expect("non-finite coordinate")
    }
}

pub(crate) struct PointRegistry<'a> {
    pool: &'a Pool,
    epsilon: fsize,
    by_coord: BTreeMap<(OrdKey, OrdKey), &'a Pt>,
}

impl<'a> PointRegistry<'a> {
    pub(crate) fn new(pool: &'a Pool, epsilon: fsize) -> Self {
        Self {
            pool,
            epsilon,
            by_coord: BTreeMap::new(),
        }
    }

    /// Rasterise `coord`, then insert-or-return the canonical `Pt` for
    /// it. `loc` is only used the first time a coordinate is seen.
    pub(crate) fn intern(&mut self, coord: Point2D, loc: Loc) -> &'a Pt {
        let coord = rasterize_point(coord, self.epsilon);
        let key = (OrdKey(coord.x), OrdKey(coord.y));
        if let Some(p) = self.by_coord.get(&key) {
            // `get` returns `&'b &'a Pt` where `'b` is this call's borrow
            // of `&mut self`. `&'a Pt` is `Copy`, so copy it out rather
            // than returning the short-lived reference to the map slot.
            return *p;
        }
        let p = self.pool.alloc(Pt {
            coord,
            loc,
            idx: Cell::new(None),
            path_cnt: Cell::new(0),
        });
        self.by_coord.insert(key, p);
        p
    }
}
