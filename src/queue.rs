//! C3/C4: the ordered dictionaries the sweep runs on.
//!
//! Q and S are both "ordered dictionary, not heap" per the data model:
//! no dynamic resizing on the hot path, deterministic iteration so the
//! same input always walks the same order. Q's order (`ev_cmp`) is a
//! normal (if occasionally tied) order, so a `BTreeSet` with a thin
//! `Ord` wrapper is a direct fit. S's order (`seg_cmp`) is documented as
//! asymmetric in rounding-edge cases and *requires* that every
//! comparison be made with the query edge as the left operand (see
//! [`crate::event::seg_cmp`]). S is also backed by a `BTreeSet`, via the
//! `SegKey` wrapper below: every `BTreeSet` operation (`insert`,
//! `remove`, `range`) compares its query argument against already-stored
//! keys in a fixed order and never compares two stored keys to each
//! other, so routing `Ord::cmp` through `seg_cmp(self, other)` reproduces
//! that calling convention exactly while giving S the O(log n)
//! insert/remove/predecessor/successor the spec's complexity budget (§1)
//! requires, instead of an O(n) linear scan. In-S membership is tracked
//! on `Event::in_s` directly for O(1) `contains`.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::event::{ev_cmp, seg_cmp, Event};

#[derive(Clone, Copy)]
struct EventKey<'a>(&'a Event<'a>);

impl<'a> PartialEq for EventKey<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl<'a> Eq for EventKey<'a> {}
impl<'a> PartialOrd for EventKey<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<'a> Ord for EventKey<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = ev_cmp(self.0, other.0);
        if by_value != Ordering::Equal {
            return by_value;
        }
        // `ev_cmp` permits ties among collinear, same-direction events;
        // break them by arena address so Q stays a true set (every
        // distinct Event gets a distinct slot) without disturbing the
        // sweep-order semantics those ties are allowed to share.
        (self.0 as *const Event<'_> as usize).cmp(&(other.0 as *const Event<'_> as usize))
    }
}

/// The event queue Q: events awaiting processing, in sweep order.
pub(crate) struct EventQueue<'a> {
    set: BTreeSet<EventKey<'a>>,
}

impl<'a> EventQueue<'a> {
    pub(crate) fn new() -> Self {
        Self { set: BTreeSet::new() }
    }

    pub(crate) fn insert(&mut self, e: &'a Event<'a>) {
        self.set.insert(EventKey(e));
    }

    pub(crate) fn remove(&mut self, e: &'a Event<'a>) -> bool {
        self.set.remove(&EventKey(e))
    }

    pub(crate) fn pop_min(&mut self) -> Option<&'a Event<'a>> {
        let key = *self.set.iter().next()?;
        self.set.remove(&key);
        Some(key.0)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.set.len()
    }
}

/// Key wrapper ordering events by `seg_cmp`, so S can be backed by a
/// `BTreeSet` instead of a linearly-scanned `Vec`.
///
/// `seg_cmp(a, b)` is documented as asymmetric in rounding-edge cases:
/// the original always evaluates it with the edge being inserted (or
/// looked up) as the left operand. Every `BTreeSet` operation used here
/// -- `insert`, `remove`, `range` -- descends the tree comparing the
/// *query* key (the argument passed to that call) against keys already
/// stored, in that fixed order; it never compares two already-stored
/// keys against each other. So defining `Ord::cmp(self, other)` as
/// `seg_cmp(self.0, other.0)` and always building the query side of any
/// operation as `self` reproduces the required "new/query first"
/// calling convention exactly, while giving S the O(log n) search,
/// insert and remove the spec's complexity budget (§1) requires.
#[derive(Clone, Copy)]
struct SegKey<'a>(&'a Event<'a>);

impl<'a> PartialEq for SegKey<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl<'a> Eq for SegKey<'a> {}
impl<'a> PartialOrd for SegKey<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<'a> Ord for SegKey<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_value = seg_cmp(self.0, other.0);
        if by_value != Ordering::Equal {
            return by_value;
        }
        // `seg_cmp` permits collinear, same-direction events to compare
        // equal; break the tie by arena address so distinct events never
        // collapse onto the same `BTreeSet` slot.
        (self.0 as *const Event<'_> as usize).cmp(&(other.0 as *const Event<'_> as usize))
    }
}

/// The sweep status S: currently-open left events, ordered bottom to
/// top at the sweep line. Backed by a `BTreeSet` for O(log n)
/// insert/remove/predecessor/successor; membership is tracked
/// separately on `Event::in_s` so `contains` is O(1) rather than a tree
/// search.
pub(crate) struct SweepStatus<'a> {
    set: BTreeSet<SegKey<'a>>,
}

impl<'a> SweepStatus<'a> {
    pub(crate) fn new() -> Self {
        Self { set: BTreeSet::new() }
    }

    pub(crate) fn insert(&mut self, e: &'a Event<'a>) {
        self.set.insert(SegKey(e));
        e.in_s.set(true);
    }

    pub(crate) fn remove(&mut self, e: &'a Event<'a>) {
        self.set.remove(&SegKey(e));
        e.in_s.set(false);
    }

    pub(crate) fn contains(&self, e: &'a Event<'a>) -> bool {
        e.in_s.get()
    }

    /// The event immediately below `e` in S, if any.
    pub(crate) fn predecessor(&self, e: &'a Event<'a>) -> Option<&'a Event<'a>> {
        self.set.range(..SegKey(e)).next_back().map(|k| k.0)
    }

    /// The event immediately above `e` in S, if any.
    pub(crate) fn successor(&self, e: &'a Event<'a>) -> Option<&'a Event<'a>> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.set.range((Excluded(SegKey(e)), Unbounded)).next().map(|k| k.0)
    }
}

/// Point identity used as a `HashMap` key: the arena address of the
/// canonical `Pt`, which is stable for the lifetime of one boolean run.
type PtAddr = usize;

fn addr(p: &crate::registry::Pt) -> PtAddr {
    p as *const crate::registry::Pt as usize
}

/// The End store: maps a Point to the unique dangling chain-endpoint
/// Event there. Lookup-only; iteration order is never observed, so a
/// hash map is fine (unlike Q and S, nothing here needs sweep order).
pub(crate) struct EndStore<'a> {
    by_point: HashMap<PtAddr, &'a Event<'a>>,
}

impl<'a> EndStore<'a> {
    pub(crate) fn new() -> Self {
        Self { by_point: HashMap::new() }
    }

    pub(crate) fn get(&self, p: &crate::registry::Pt) -> Option<&'a Event<'a>> {
        self.by_point.get(&addr(p)).copied()
    }

    pub(crate) fn insert(&mut self, p: &crate::registry::Pt, e: &'a Event<'a>) {
        self.by_point.insert(addr(p), e);
    }

    pub(crate) fn remove(&mut self, p: &crate::registry::Pt) {
        self.by_point.remove(&addr(p));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_point.is_empty()
    }
}
