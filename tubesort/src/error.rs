//! Error type shared by the game model, the search and the level loaders.

use crate::engine::Color;
use thiserror::Error;

/// Every failure the crate can report.
///
/// All of them are detected eagerly when a value is built or an operation is
/// invoked. None of them is transient, so callers never need to retry.
#[derive(Debug, Error)]
pub enum TubeSortError {
    /// A required value is missing or out of its domain (zero capacity, zero tile size, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tiles handed to a tube do not fit into it.
    #[error("tiles with a total size of {size} exceed the tube capacity of {capacity}")]
    CapacityExceeded { size: u32, capacity: u32 },

    /// A color does not occur exactly once per tube capacity in a starting layout.
    #[error("color {color:?} occurs with a total size of {total}, expected {capacity}")]
    ColorImbalance {
        color: Color,
        total: u32,
        capacity: u32,
    },

    #[error("tube index {index} is out of range for {len} tubes")]
    IndexOutOfRange { index: usize, len: usize },

    /// A pour was requested that the legality rules forbid.
    #[error("illegal move: cannot pour {from} into {to}")]
    IllegalMove { from: String, to: String },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Something that should be unreachable happened; this is always a bug.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TubeSortError>;
