//! Chain ring: the doubly-linked structure the assembler threads
//! emitted edges into (§3 "Chain ring", §4.C7).
//!
//! Each [`Event`] carries two ring slots (see `Event::ring`). A fresh
//! event has both unset -- it is a free "end". `join` fills one free
//! slot on each of the two nodes it connects; once both slots on a
//! node are filled it is interior to a ring and `step` can walk either
//! direction from it. This mirrors the original's `cp_ring_t`, but
//! realized as plain arena-bounded back-pointers (`Cell<Option<&Event>>`)
//! rather than an intrusive-list type, per the design notes on shared
//! ownership (§9).

use crate::event::Event;

/// True if `e` still has a free ring slot (is not yet fully interior to
/// a closed ring).
pub(crate) fn is_end<'a>(e: &'a Event<'a>) -> bool {
    e.ring[0].get().is_none() || e.ring[1].get().is_none()
}

fn free_slot<'a>(e: &'a Event<'a>) -> usize {
    if e.ring[0].get().is_none() {
        0
    } else {
        1
    }
}

/// Join two free ring ends, linking them together. Both `a` and `b`
/// must satisfy [`is_end`]; panics (a broken-invariant bug) otherwise.
pub(crate) fn join<'a>(a: &'a Event<'a>, b: &'a Event<'a>) {
    debug_assert!(is_end(a) && is_end(b), "chain::join requires two free ends");
    a.ring[free_slot(a)].set(Some(b));
    b.ring[free_slot(b)].set(Some(a));
}

/// Step to the ring neighbour in slot `dir` (0 or 1) from `e`.
pub(crate) fn step<'a>(e: &'a Event<'a>, dir: usize) -> Option<&'a Event<'a>> {
    e.ring[dir].get()
}
