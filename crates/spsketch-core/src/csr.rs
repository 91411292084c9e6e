//! Validated read-only view over a square CSR sparsity structure
//!
//! The sketch only needs the structure of the matrix, so this view borrows
//! the row pointer and column index arrays and never touches values.
//!
//! # Format
//!
//! For an R×R sparse matrix with nnz non-zeros:
//! - `row_ptr`: length R+1. Row `i` occupies `col_indices[row_ptr[i]..row_ptr[i+1]]`
//! - `col_indices`: length nnz, one column id per non-zero
//!
//! # Examples
//!
//! ```
//! use spsketch_core::CsrStructure;
//!
//! // [0 1 0 0]
//! // [1 0 0 1]
//! // [1 0 0 0]
//! // [0 0 0 0]
//! let row_ptr = [0i64, 1, 3, 4, 4];
//! let col_index = [1i64, 0, 3, 0];
//!
//! let csr = CsrStructure::new(&row_ptr, &col_index, 4).unwrap();
//! assert_eq!(csr.nnz(), 4);
//! assert_eq!(csr.row_nnz(1), 2);
//! ```

use crate::error::{ArgumentError, SketchResult, StructureError};
use crate::index::SketchIndex;
use std::ops::Range;

/// Borrowed CSR structure of a square `nrows × nrows` matrix
///
/// Construction checks the row pointer invariants eagerly. Column indices
/// are checked lazily by the scan that reads them.
#[derive(Debug, Clone, Copy)]
pub struct CsrStructure<'a, I> {
    row_ptr: &'a [I],
    col_indices: &'a [I],
    nrows: usize,
}

impl<'a, I: SketchIndex> CsrStructure<'a, I> {
    /// Validate and wrap a CSR structure
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `nrows <= 0` or `row_ptr.len() != nrows + 1`
    /// - `MalformedStructure` if `row_ptr[0] != 0`, an offset is negative,
    ///   `row_ptr` decreases, or `row_ptr[nrows] != col_indices.len()`
    pub fn new(row_ptr: &'a [I], col_indices: &'a [I], nrows: I) -> SketchResult<Self> {
        let nrows = positive_dimension(nrows)?;

        let expected = nrows
            .checked_add(1)
            .ok_or(ArgumentError::DimensionTooLarge {
                value: nrows as i128,
            })?;
        if row_ptr.len() != expected {
            return Err(ArgumentError::RowPtrLength {
                len: row_ptr.len(),
                expected,
            }
            .into());
        }

        let first = row_ptr[0];
        if first.to_index() != Some(0) {
            return Err(StructureError::FirstOffsetNonZero {
                value: first.to_wide(),
            }
            .into());
        }

        for (row, pair) in row_ptr.windows(2).enumerate() {
            let (curr, next) = (pair[0].to_wide(), pair[1].to_wide());
            if next < 0 {
                return Err(StructureError::NegativeOffset {
                    row: row + 1,
                    value: next,
                }
                .into());
            }
            if curr > next {
                return Err(StructureError::RowPtrDecreasing { row, curr, next }.into());
            }
        }

        let last = row_ptr[nrows];
        if last.to_index() != Some(col_indices.len()) {
            return Err(StructureError::NnzMismatch {
                last: last.to_wide(),
                nnz: col_indices.len(),
            }
            .into());
        }

        Ok(Self {
            row_ptr,
            col_indices,
            nrows,
        })
    }

    /// Matrix dimension R (rows and columns)
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of stored (row, col) pairs
    pub fn nnz(&self) -> usize {
        self.col_indices.len()
    }

    pub fn row_ptr(&self) -> &'a [I] {
        self.row_ptr
    }

    pub fn col_indices(&self) -> &'a [I] {
        self.col_indices
    }

    /// Offsets into `col_indices` covered by `row`
    ///
    /// # Panics
    ///
    /// Panics if `row >= nrows`.
    #[inline]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        // Offsets were checked non-negative and bounded by nnz in `new`.
        let start = self.row_ptr[row].to_index().unwrap_or(0);
        let end = self.row_ptr[row + 1].to_index().unwrap_or(start);
        start..end
    }

    /// Number of entries stored in `row`
    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_range(row).len()
    }
}

/// Convert a dimension-like argument, rejecting zero and negatives
pub(crate) fn positive_dimension<I: SketchIndex>(value: I) -> SketchResult<usize> {
    let wide = value.to_wide();
    if wide <= 0 {
        return Err(ArgumentError::NonPositiveDimension { value: wide }.into());
    }
    value
        .to_index()
        .ok_or_else(|| ArgumentError::DimensionTooLarge { value: wide }.into())
}
