//! Block-count reduction of a CSR structure
//!
//! The matrix is split into `n × n` blocks of side `d = ceil(R / n)`.
//! One pass over the rows counts each stored `(row, col)` pair into block
//! `(row / d, col / d)`.
//!
//! # Complexity
//!
//! O(R + nnz) time, O(n²) extra space.
//!
//! # Examples
//!
//! ```
//! use spsketch_core::compute_sketch;
//!
//! // row 0 -> col 1; row 1 -> cols 0, 3; row 2 -> col 0; row 3 -> none
//! let row_ptr = [0i64, 1, 3, 4, 4];
//! let col_index = [1i64, 0, 3, 0];
//!
//! let sketch = compute_sketch(&row_ptr, &col_index, 4, 2).unwrap();
//! assert_eq!(sketch.to_nested(), vec![vec![2, 1], vec![1, 0]]);
//! ```

use crate::config::SketchConfig;
use crate::csr::CsrStructure;
use crate::error::{ArgumentError, SketchError, SketchResult};
use crate::index::SketchIndex;
use crate::progress::{ProgressObserver, Silent};
use crate::sketch::Sketch;
use std::ops::Range;

/// Sketch a square CSR structure at resolution `n`
///
/// Sequential, silent form of [`Sketcher::sketch`]. `grid[i][j]` counts the
/// entries `(r, c)` with `r / d == i` and `c / d == j`, where
/// `d = ceil(nrows / resolution)`. The resolution need not divide `nrows`;
/// the last block row and column then cover the remainder. With
/// `resolution > nrows` the block size is 1 and trailing blocks stay zero.
///
/// # Errors
///
/// Checked in this order:
/// - `InvalidArgument`: `resolution <= 0`, `nrows <= 0`, `row_ptr.len() != nrows + 1`
/// - `MalformedStructure`: see [`CsrStructure::new`]
/// - `ColumnOutOfRange`: the first column index, in scan order, outside `[0, nrows)`
///
/// No sketch is returned on error.
pub fn compute_sketch<I: SketchIndex>(
    row_ptr: &[I],
    col_index: &[I],
    nrows: I,
    resolution: I,
) -> SketchResult<Sketch> {
    let n = positive_resolution(resolution)?;
    let csr = CsrStructure::new(row_ptr, col_index, nrows)?;
    sketch_sequential(&csr, n, None, &Silent)
}

/// Block side length `ceil(nrows / resolution)`
///
/// # Panics
///
/// Panics if `resolution` is zero.
pub fn block_size(nrows: usize, resolution: usize) -> usize {
    nrows.div_ceil(resolution)
}

/// Configured sketch builder
///
/// Carries a [`SketchConfig`] and a [`ProgressObserver`]. Picks the parallel
/// scan when the `parallel` feature is on, the config allows it, and the
/// matrix has at least `min_parallel_rows` rows. Both paths produce the same
/// sketch and report the same error.
///
/// # Examples
///
/// ```
/// use spsketch_core::{CsrStructure, LogProgress, SketchConfig, Sketcher};
///
/// let csr = CsrStructure::new(&[0u32, 2, 3, 3], &[0u32, 2, 1], 3).unwrap();
/// let sketcher = Sketcher::new(SketchConfig::default()).with_progress(LogProgress);
///
/// let sketch = sketcher.sketch(&csr, 2).unwrap();
/// assert_eq!(sketch.to_nested(), vec![vec![2, 1], vec![0, 0]]);
/// ```
#[derive(Debug, Clone)]
pub struct Sketcher<P = Silent> {
    config: SketchConfig,
    observer: P,
}

impl Sketcher<Silent> {
    /// Create a builder with a silent observer
    pub fn new(config: SketchConfig) -> Self {
        Self {
            config,
            observer: Silent,
        }
    }
}

impl Default for Sketcher<Silent> {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}

impl<P: ProgressObserver> Sketcher<P> {
    /// Replace the progress observer
    pub fn with_progress<Q: ProgressObserver>(self, observer: Q) -> Sketcher<Q> {
        Sketcher {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Sketch `csr` at the given resolution
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `resolution <= 0`; `ColumnOutOfRange` for the
    /// first out-of-range column in scan order.
    pub fn sketch<I, N>(&self, csr: &CsrStructure<'_, I>, resolution: N) -> SketchResult<Sketch>
    where
        I: SketchIndex,
        N: SketchIndex,
    {
        let n = positive_resolution(resolution)?;

        if self.use_parallel(csr.nrows()) {
            crate::parallel::par_sketch(csr, n, &self.config, &self.observer)
        } else {
            sketch_sequential(csr, n, self.config.interval(), &self.observer)
        }
    }

    fn use_parallel(&self, nrows: usize) -> bool {
        cfg!(feature = "parallel") && self.config.parallel && nrows >= self.config.min_parallel_rows
    }
}

/// Validate the resolution and check the grid fits in memory addressing
///
/// The `n × n` grid of `u64` cells must stay within `isize::MAX` bytes.
pub(crate) fn positive_resolution<N: SketchIndex>(resolution: N) -> SketchResult<usize> {
    let wide = resolution.to_wide();
    if wide <= 0 {
        return Err(ArgumentError::NonPositiveResolution { value: wide }.into());
    }
    resolution
        .to_index()
        .filter(|&n| grid_bytes(n).is_some_and(|bytes| bytes <= isize::MAX as usize))
        .ok_or_else(|| ArgumentError::DimensionTooLarge { value: wide }.into())
}

fn grid_bytes(n: usize) -> Option<usize> {
    n.checked_mul(n)?.checked_mul(std::mem::size_of::<u64>())
}

pub(crate) fn sketch_sequential<I, P>(
    csr: &CsrStructure<'_, I>,
    n: usize,
    interval: Option<usize>,
    observer: &P,
) -> SketchResult<Sketch>
where
    I: SketchIndex,
    P: ProgressObserver + ?Sized,
{
    let d = block_size(csr.nrows(), n);
    let _span = tracing::debug_span!(
        "sketch",
        nrows = csr.nrows(),
        nnz = csr.nnz(),
        resolution = n,
        block_size = d
    )
    .entered();

    let mut sketch = Sketch::zeros(n, d)?;
    scan_rows(csr, 0..csr.nrows(), interval, observer, &mut sketch)?;
    tracing::debug!(total = sketch.total(), "sketch complete");
    Ok(sketch)
}

/// Accumulate rows `rows` of `csr` into `sketch`
///
/// Stops at the first column outside `[0, nrows)`.
pub(crate) fn scan_rows<I, P>(
    csr: &CsrStructure<'_, I>,
    rows: Range<usize>,
    interval: Option<usize>,
    observer: &P,
    sketch: &mut Sketch,
) -> SketchResult<()>
where
    I: SketchIndex,
    P: ProgressObserver + ?Sized,
{
    let nrows = csr.nrows();
    let d = sketch.block_size();
    let cols = csr.col_indices();

    for row in rows {
        if let Some(k) = interval {
            if row % k == 0 {
                observer.on_progress(row, nrows);
            }
        }

        let si = row / d;
        for position in csr.row_range(row) {
            let raw = cols[position];
            let col = raw
                .to_index()
                .filter(|&c| c < nrows)
                .ok_or_else(|| SketchError::ColumnOutOfRange {
                    row,
                    position,
                    col: raw.to_wide(),
                    ncols: nrows,
                })?;
            sketch.bump(si, col / d);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, StructureError};
    use std::sync::Mutex;

    #[test]
    fn test_block_size() {
        assert_eq!(block_size(4, 2), 2);
        assert_eq!(block_size(10, 3), 4);
        assert_eq!(block_size(3, 10), 1);
        assert_eq!(block_size(100, 1), 100);
    }

    #[test]
    fn test_scenario() {
        let sketch = compute_sketch(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4, 2).unwrap();
        assert_eq!(sketch.resolution(), 2);
        assert_eq!(sketch.block_size(), 2);
        assert_eq!(sketch.as_slice(), &[2, 1, 1, 0]);
    }

    #[test]
    fn test_resolution_checked_before_structure() {
        // both the resolution and row_ptr are wrong; resolution wins
        let err = compute_sketch(&[5i64], &[], 4, 0).unwrap_err();
        assert!(matches!(
            err,
            SketchError::InvalidArgument(ArgumentError::NonPositiveResolution { value: 0 })
        ));
    }

    #[test]
    fn test_negative_resolution() {
        let err = compute_sketch(&[0i32, 0], &[], 1, -1).unwrap_err();
        assert!(matches!(
            err,
            SketchError::InvalidArgument(ArgumentError::NonPositiveResolution { value: -1 })
        ));
    }

    #[test]
    fn test_oversized_resolution() {
        // a 2^31 × 2^31 grid of u64 exceeds the address space
        let err = compute_sketch(&[0u64, 0], &[], 1, 1u64 << 31).unwrap_err();
        assert_eq!(
            err,
            SketchError::InvalidArgument(ArgumentError::DimensionTooLarge { value: 1 << 31 })
        );

        let csr = CsrStructure::new(&[0u64, 0], &[], 1).unwrap();
        let err = Sketcher::default().sketch(&csr, u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            SketchError::InvalidArgument(ArgumentError::DimensionTooLarge { .. })
        ));
    }

    #[test]
    fn test_grid_bytes_limit() {
        assert!(positive_resolution(1usize << 16).is_ok());
        assert!(positive_resolution(usize::MAX).is_err());
        assert_eq!(grid_bytes(usize::MAX), None);
        assert_eq!(grid_bytes(4), Some(128));
    }

    #[test]
    fn test_structure_error_propagates() {
        let err = compute_sketch(&[0i64, 2, 1], &[0i64], 2, 1).unwrap_err();
        assert!(matches!(
            err,
            SketchError::MalformedStructure(StructureError::RowPtrDecreasing { .. })
        ));
    }

    #[test]
    fn test_column_too_large() {
        let err = compute_sketch(&[0i64, 1, 2], &[1i64, 2], 2, 1).unwrap_err();
        assert_eq!(
            err,
            SketchError::ColumnOutOfRange {
                row: 1,
                position: 1,
                col: 2,
                ncols: 2
            }
        );
    }

    #[test]
    fn test_negative_column() {
        let err = compute_sketch(&[0i64, 1], &[-1i64], 1, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnOutOfRange);
    }

    #[test]
    fn test_first_bad_column_reported() {
        let err = compute_sketch(&[0i64, 2, 4], &[0i64, 9, 1, 7], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            SketchError::ColumnOutOfRange {
                position: 1,
                col: 9,
                ..
            }
        ));
    }

    #[test]
    fn test_progress_rows() {
        let rows = Mutex::new(Vec::new());
        let observer = |row: usize, nrows: usize| {
            assert_eq!(nrows, 7);
            rows.lock().unwrap().push(row);
        };
        let row_ptr = [0usize; 8];
        let csr = CsrStructure::new(&row_ptr, &[], 7).unwrap();
        let config = SketchConfig::new()
            .progress_interval(Some(3))
            .parallel(false);

        Sketcher::new(config)
            .with_progress(&observer)
            .sketch(&csr, 1)
            .unwrap();

        assert_eq!(*rows.lock().unwrap(), vec![0, 3, 6]);
    }

    #[test]
    fn test_sketcher_resolution_usize() {
        let csr = CsrStructure::new(&[0i64, 1, 2], &[1i64, 0], 2).unwrap();
        let sketch = Sketcher::default().sketch(&csr, 2usize).unwrap();
        assert_eq!(sketch.to_nested(), vec![vec![0, 1], vec![1, 0]]);

        let err = Sketcher::default().sketch(&csr, 0usize).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
