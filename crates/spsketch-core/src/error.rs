//! Error types for sketch construction
//!
//! Every failure is a caller-input error and is reported synchronously.
//! The taxonomy has three kinds:
//!
//! - **`InvalidArgument`**: resolution, dimension or `row_ptr` length is wrong
//! - **`MalformedStructure`**: the row pointer array breaks the CSR invariants
//! - **`ColumnOutOfRange`**: a column index falls outside `[0, nrows)`
//!
//! # Examples
//!
//! ```
//! use spsketch_core::{compute_sketch, ErrorKind};
//!
//! let err = compute_sketch::<i64>(&[0, 0], &[], 1, 0).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! ```

use thiserror::Error;

/// Top-level error type for sketch construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// Bad scalar arguments or array lengths
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    /// Row pointer array violates the CSR invariants
    #[error("Malformed structure: {0}")]
    MalformedStructure(#[from] StructureError),

    /// A column index lies outside the square matrix
    #[error(
        "Column index out of range: {col} at position {position} (row {row}) is not in [0, {ncols})"
    )]
    ColumnOutOfRange {
        row: usize,
        position: usize,
        col: i128,
        ncols: usize,
    },
}

/// Flat classification of [`SketchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    MalformedStructure,
    ColumnOutOfRange,
}

/// Argument errors, detected before any output is allocated
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("resolution must be positive, got {value}")]
    NonPositiveResolution { value: i128 },

    #[error("matrix dimension must be positive, got {value}")]
    NonPositiveDimension { value: i128 },

    #[error("dimension {value} is too large to address")]
    DimensionTooLarge { value: i128 },

    #[error("row_ptr has length {len}, expected {expected}")]
    RowPtrLength { len: usize, expected: usize },

    #[error("coarsening factor {factor} must be positive and divide resolution {resolution}")]
    InvalidCoarsenFactor { factor: usize, resolution: usize },

    #[error(
        "cannot merge sketches: resolution {left}/{right}, block size {left_block}/{right_block}"
    )]
    MergeMismatch {
        left: usize,
        right: usize,
        left_block: usize,
        right_block: usize,
    },
}

/// Structural errors in the row pointer array
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("row_ptr[0] must be 0, got {value}")]
    FirstOffsetNonZero { value: i128 },

    #[error("row_ptr[{row}] is negative: {value}")]
    NegativeOffset { row: usize, value: i128 },

    #[error("row_ptr not non-decreasing at row {row}: {curr} > {next}")]
    RowPtrDecreasing { row: usize, curr: i128, next: i128 },

    #[error("row_ptr last element {last} does not match nnz {nnz}")]
    NnzMismatch { last: i128, nnz: usize },
}

/// Result type alias for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;

impl SketchError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SketchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SketchError::MalformedStructure(_) => ErrorKind::MalformedStructure,
            SketchError::ColumnOutOfRange { .. } => ErrorKind::ColumnOutOfRange,
        }
    }

    /// Position in `col_index` of the offending entry, if any
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn column_position(&self) -> Option<usize> {
        match self {
            SketchError::ColumnOutOfRange { position, .. } => Some(*position),
            _ => None,
        }
    }
}
