//! Error sink for the boolean core.
//!
//! The core recognises two error kinds (see the crate-level docs):
//! structural issues, which are resolved locally and never escalate to
//! `Err`, and internal invariant breaches, which abort the operation.

/// An internal-contract breach. A correctly implemented core never
/// raises this on well-formed input; it exists so the one documented
/// abort path (an assembled chain with fewer than three points) has a
/// typed signal instead of a panic.
#[derive(Debug, thiserror::Error)]
pub enum BoolError {
    #[error("internal invariant broken: {0}")]
    Invariant(&'static str),
}

pub(crate) type Result<T> = std::result::Result<T, BoolError>;
