//! Progress observers for long scans
//!
//! Observers are purely informational: they never change the sketch.
//! The scan calls [`ProgressObserver::on_progress`] for every row that is a
//! multiple of the configured interval, starting at row 0.
//!
//! # Examples
//!
//! ```
//! use spsketch_core::{CsrStructure, SketchConfig, Sketcher};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let seen = AtomicUsize::new(0);
//! let observer = |_row: usize, _nrows: usize| {
//!     seen.fetch_add(1, Ordering::Relaxed);
//! };
//!
//! let csr = CsrStructure::new(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4).unwrap();
//! let config = SketchConfig::new().progress_interval(Some(2)).parallel(false);
//! Sketcher::new(config).with_progress(&observer).sketch(&csr, 2).unwrap();
//!
//! // rows 0 and 2
//! assert_eq!(seen.load(Ordering::Relaxed), 2);
//! ```

/// Receives progress notices during a scan
///
/// May be called concurrently from worker threads when the parallel path
/// is taken; calls are not ordered by row in that case.
pub trait ProgressObserver: Sync {
    /// Called when the scan reaches `row` out of `nrows`
    fn on_progress(&self, row: usize, nrows: usize);
}

/// Observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ProgressObserver for Silent {
    #[inline]
    fn on_progress(&self, _row: usize, _nrows: usize) {}
}

/// Observer that emits a `tracing` info event per notice
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, row: usize, nrows: usize) {
        tracing::info!(row, nrows, "sketch scan progress");
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Sync,
{
    fn on_progress(&self, row: usize, nrows: usize) {
        self(row, nrows)
    }
}
