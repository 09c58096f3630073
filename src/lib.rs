//! `planarbool` does boolean operations on sets of 2D polygons, with the
//! operations:
//!
//! - Union: resulting polygon(s) contain A or B
//! - Intersect: resulting polygon(s) are contained in both A and B
//! - Subtract: resulting polygon(s) contain A, except for the region
//!   shared with B
//! - Xor: resulting polygon(s) contain exactly one of A, B
//!
//! The core is a Martinez-Rueda-Feito plane sweep: edges from both
//! inputs are loaded into an event queue ordered left to right, a sweep
//! status tracks which edges are currently "open" at the sweep line,
//! and a bitmask classifier decides inside/outside per edge as it
//! closes. Closed edges are threaded into rings by a chain assembler
//! and read back out as oriented paths -- outer boundaries clockwise,
//! holes counter-clockwise.
//!
//! Self-overlapping input (a path that traverses the same edge twice)
//! is tolerated: ownership is tracked as a bitmask that toggles per
//! occurrence rather than a boolean, so an edge crossed an even number
//! of times cancels out instead of double-counting.

mod arena;
mod assembler;
mod bbox;
mod chain;
mod classify;
mod config;
mod driver;
mod error;
mod event;
mod intersect;
mod point;
mod polygon;
mod queue;
mod registry;
mod utils;

/// Coordinate and area-computation precision. `f32` by default; enable
/// the `use_double_precision` feature for `f64`.
#[cfg(not(feature = "use_double_precision"))]
pub type fsize = f32;
#[cfg(feature = "use_double_precision")]
pub type fsize = f64;

/// Opaque source-location tag. The core never inspects it -- it is
/// attached to input points by the caller and carried through splits
/// and intersections verbatim, so a caller can trace an output vertex
/// back to whichever input vertex or edge it came from.
pub type Loc = u32;

pub use bbox::Bbox;
pub use config::BoolConfig;
pub use driver::{boolean, Operation};
pub use error::BoolError;
pub use point::Point2D;
pub use polygon::{Path, PathPoint, Polygon, WindingOrder};
pub use utils::{calculate_signed_area2, calculate_signed_area3};
