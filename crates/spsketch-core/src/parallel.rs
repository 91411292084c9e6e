//! Parallel block-count reduction
//!
//! Rows are split into contiguous chunks. Each chunk accumulates into a
//! private `n × n` sketch and the partial sketches are summed through
//! rayon's reduction tree, so no locking is needed.
//!
//! The result is identical to the sequential scan. When several chunks hit
//! an out-of-range column, the one with the smallest `col_index` position
//! wins, which is the error the sequential scan reports.
//!
//! Without the `parallel` feature every entry point falls back to the
//! sequential scan.
//!
//! # Examples
//!
//! ```rust
//! use spsketch_core::{compute_sketch, par_compute_sketch, CsrStructure, Silent, SketchConfig};
//!
//! let row_ptr = [0i64, 1, 3, 4, 4];
//! let col_index = [1i64, 0, 3, 0];
//! let csr = CsrStructure::new(&row_ptr, &col_index, 4).unwrap();
//!
//! let config = SketchConfig::new().num_chunks(Some(3));
//! let par = par_compute_sketch(&csr, 2, &config, &Silent).unwrap();
//! let seq = compute_sketch(&row_ptr, &col_index, 4, 2).unwrap();
//! assert_eq!(par, seq);
//! ```

#![allow(unused_imports)]

use crate::builder::{positive_resolution, sketch_sequential};
use crate::config::SketchConfig;
use crate::csr::CsrStructure;
use crate::error::{SketchError, SketchResult};
use crate::index::SketchIndex;
use crate::progress::ProgressObserver;
use crate::sketch::Sketch;

#[cfg(feature = "parallel")]
use crate::builder::{block_size, scan_rows};

#[cfg(feature = "parallel")]
use scirs2_core::parallel_ops::*;

/// Sketch `csr` at resolution `n` using all worker threads
///
/// Always takes the chunked path when the `parallel` feature is enabled,
/// regardless of `config.parallel` and `config.min_parallel_rows`; use
/// [`Sketcher`](crate::Sketcher) for the adaptive choice.
///
/// # Errors
///
/// Same as [`compute_sketch`](crate::compute_sketch).
pub fn par_compute_sketch<I, N, P>(
    csr: &CsrStructure<'_, I>,
    resolution: N,
    config: &SketchConfig,
    observer: &P,
) -> SketchResult<Sketch>
where
    I: SketchIndex,
    N: SketchIndex,
    P: ProgressObserver + ?Sized,
{
    let n = positive_resolution(resolution)?;
    par_sketch(csr, n, config, observer)
}

#[cfg(feature = "parallel")]
pub(crate) fn par_sketch<I, P>(
    csr: &CsrStructure<'_, I>,
    n: usize,
    config: &SketchConfig,
    observer: &P,
) -> SketchResult<Sketch>
where
    I: SketchIndex,
    P: ProgressObserver + ?Sized,
{
    let nrows = csr.nrows();
    let d = block_size(nrows, n);
    let chunks = config
        .num_chunks
        .unwrap_or_else(default_chunks)
        .clamp(1, nrows);
    let chunk_len = nrows.div_ceil(chunks);
    let interval = config.interval();

    let _span = tracing::debug_span!(
        "par_sketch",
        nrows,
        nnz = csr.nnz(),
        resolution = n,
        block_size = d
    )
    .entered();
    tracing::debug!(chunks, chunk_len, "partitioned rows");

    // the output grid is allocated before any worker starts scanning
    let mut sketch = Sketch::zeros(n, d)?;
    let partial = (0..chunks)
        .into_par_iter()
        .map(|chunk| -> SketchResult<Sketch> {
            let start = (chunk * chunk_len).min(nrows);
            let end = (start + chunk_len).min(nrows);
            let mut local = Sketch::zeros(n, d)?;
            scan_rows(csr, start..end, interval, observer, &mut local)?;
            Ok(local)
        })
        .reduce_with(combine);

    if let Some(partial) = partial {
        sketch.merge(&partial?)?;
    }

    tracing::debug!(total = sketch.total(), "sketch complete");
    Ok(sketch)
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn par_sketch<I, P>(
    csr: &CsrStructure<'_, I>,
    n: usize,
    config: &SketchConfig,
    observer: &P,
) -> SketchResult<Sketch>
where
    I: SketchIndex,
    P: ProgressObserver + ?Sized,
{
    sketch_sequential(csr, n, config.interval(), observer)
}

#[cfg(feature = "parallel")]
fn default_chunks() -> usize {
    rayon::current_num_threads().max(1) * 4
}

/// Merge two partial results
///
/// Allocation failures win over column errors; among column errors the
/// smallest position wins.
#[cfg(feature = "parallel")]
fn combine(a: SketchResult<Sketch>, b: SketchResult<Sketch>) -> SketchResult<Sketch> {
    match (a, b) {
        (Ok(mut a), Ok(b)) => {
            a.merge(&b)?;
            Ok(a)
        }
        (Err(a), Err(b)) => Err(earliest(a, b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}

#[cfg(feature = "parallel")]
fn earliest(a: SketchError, b: SketchError) -> SketchError {
    match (a.column_position(), b.column_position()) {
        (Some(pa), Some(pb)) if pb < pa => b,
        (Some(_), None) => b,
        _ => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::compute_sketch;
    use crate::error::{ArgumentError, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn banded(nrows: usize) -> (Vec<usize>, Vec<usize>) {
        let mut row_ptr = vec![0];
        let mut cols = Vec::new();
        for r in 0..nrows {
            for c in r.saturating_sub(1)..(r + 2).min(nrows) {
                cols.push(c);
            }
            row_ptr.push(cols.len());
        }
        (row_ptr, cols)
    }

    #[test]
    fn test_matches_sequential() {
        let (row_ptr, cols) = banded(97);
        let csr = CsrStructure::new(&row_ptr, &cols, 97).unwrap();
        let seq = compute_sketch(&row_ptr, &cols, 97, 10).unwrap();

        for chunks in [1, 2, 7, 97, 500] {
            let config = SketchConfig::new().num_chunks(Some(chunks));
            let par = par_compute_sketch(&csr, 10, &config, &crate::Silent).unwrap();
            assert_eq!(par, seq, "chunks = {chunks}");
        }
    }

    #[test]
    fn test_earliest_column_error() {
        // bad columns at positions 1 and 5, in different chunks
        let row_ptr = [0i64, 2, 4, 6, 8];
        let cols = [0i64, 9, 1, 2, 3, -2, 0, 1];
        let csr = CsrStructure::new(&row_ptr, &cols, 4).unwrap();
        let seq = compute_sketch(&row_ptr, &cols, 4, 2).unwrap_err();

        let config = SketchConfig::new().num_chunks(Some(4));
        let par = par_compute_sketch(&csr, 2, &config, &crate::Silent).unwrap_err();
        assert_eq!(par.kind(), ErrorKind::ColumnOutOfRange);
        assert_eq!(par, seq);
    }

    #[test]
    fn test_progress_notices() {
        let (row_ptr, cols) = banded(50);
        let csr = CsrStructure::new(&row_ptr, &cols, 50).unwrap();
        let count = AtomicUsize::new(0);
        let observer = |row: usize, _: usize| {
            assert_eq!(row % 10, 0);
            count.fetch_add(1, Ordering::Relaxed);
        };

        let config = SketchConfig::new()
            .progress_interval(Some(10))
            .num_chunks(Some(3));
        par_compute_sketch(&csr, 5, &config, &observer).unwrap();
        assert_eq!(count.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_oversized_resolution() {
        let csr = CsrStructure::new(&[0u64, 0], &[], 1).unwrap();
        let config = SketchConfig::new().num_chunks(Some(2));
        let err = par_compute_sketch(&csr, 1u64 << 31, &config, &crate::Silent).unwrap_err();
        assert_eq!(
            err,
            SketchError::InvalidArgument(ArgumentError::DimensionTooLarge { value: 1 << 31 })
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_default_chunks_follow_pool() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(3)
            .build()
            .unwrap();
        assert_eq!(pool.install(default_chunks), 12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_allocation_error_beats_column_error() {
        let alloc: SketchError = ArgumentError::DimensionTooLarge { value: 9 }.into();
        let column = SketchError::ColumnOutOfRange {
            row: 0,
            position: 0,
            col: 5,
            ncols: 2,
        };
        assert_eq!(earliest(column.clone(), alloc.clone()), alloc);
        assert_eq!(earliest(alloc.clone(), column), alloc);
    }

    #[test]
    fn test_invalid_resolution() {
        let (row_ptr, cols) = banded(4);
        let csr = CsrStructure::new(&row_ptr, &cols, 4).unwrap();
        let err = par_compute_sketch(&csr, -2i64, &SketchConfig::default(), &crate::Silent)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
