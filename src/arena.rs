//! The scoped arena every `Point` and `Event` is allocated from.
//!
//! One `Pool` backs exactly one call to [`crate::boolean`]. It is
//! dropped -- releasing every `Point` and `Event` in one bulk stroke --
//! when that call returns; nothing allocated from it is ever observed
//! to outlive the call.

use bumpalo::Bump;

pub(crate) struct Pool {
    bump: Bump,
}

impl Pool {
    pub(crate) fn new(capacity_hint: Option<usize>) -> Self {
        let bump = match capacity_hint {
            // Rough per-event footprint; just avoids a realloc in the
            // common case, it is not load-bearing for correctness.
            Some(n) => Bump::with_capacity(n * 128),
            None => Bump::new(),
        };
        Self { bump }
    }

    #[inline]
    pub(crate) fn alloc<T>(&self, value: T) -> &T {
        self.bump.alloc(value)
    }
}
