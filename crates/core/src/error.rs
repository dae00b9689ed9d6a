//! Error types for texel

use thiserror::Error;

/// Main error type for texel operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid grid dimensions: {shape:?} ({reason})")]
    InvalidDimensions { shape: Vec<usize>, reason: String },

    #[error("Index out of bounds: {index:?} in grid of shape {shape:?}")]
    IndexOutOfBounds { index: Vec<usize>, shape: Vec<usize> },

    #[error("Region (start {start:?}, size {size:?}) lies outside grid of shape {shape:?}")]
    RegionOutOfBounds {
        start: Vec<usize>,
        size: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for texel operations
pub type Result<T> = std::result::Result<T, Error>;
