use thiserror::Error;

use crate::dtype::DataType;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("cannot allocate {bytes} bytes: {reason}")]
    Allocation { bytes: usize, reason: String },
    #[error("view of {size} bytes at offset {offset} exceeds base of {base_size} bytes")]
    OutOfBounds {
        offset: usize,
        size: usize,
        base_size: usize,
    },
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("data type mismatch: expected {expected}, got {got}")]
    DataTypeMismatch { expected: DataType, got: DataType },
    #[error("cannot broadcast shapes {a:?} and {b:?}")]
    BroadcastError { a: Vec<usize>, b: Vec<usize> },
    #[error("invalid shape {0:?}: every tensor needs at least one dimension, all > 0")]
    InvalidShape(Vec<usize>),
    #[error("allocation {allocation} backing handle {handle} has been released")]
    Released { handle: u64, allocation: usize },
    #[error("handle {0} is a view and does not own its memory")]
    NotOwning(u64),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TensorError>;
