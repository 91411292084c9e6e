//! # spsketch-core
//!
//! Dense block-count sketches of large square sparse matrices.
//!
//! A sketch reduces an R×R CSR matrix to an `n × n` grid whose cell `(i, j)`
//! counts the stored entries falling in row-block `i` and column-block `j`.
//! The grid shows where nonzeros concentrate in matrices too large to draw
//! element by element.
//!
//! This crate provides:
//! - [`CsrStructure`]: validated borrowed view over `row_ptr` / `col_index`
//! - [`compute_sketch`]: the single-pass reduction
//! - [`Sketcher`]: configured builder with progress reporting
//! - [`par_compute_sketch`]: chunked parallel reduction (feature `parallel`)
//! - [`Sketch`]: the grid, with coarsening, merging and normalization
//!
//! # Examples
//!
//! ```
//! use spsketch_core::compute_sketch;
//!
//! let sketch = compute_sketch(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4, 2).unwrap();
//! assert_eq!(sketch.to_nested(), vec![vec![2, 1], vec![1, 0]]);
//! ```

pub mod builder;
pub mod config;
pub mod csr;
pub mod error;
pub mod index;
pub mod parallel;
pub mod progress;
pub mod sketch;

// Re-exports
pub use builder::{block_size, compute_sketch, Sketcher};
pub use config::{SketchConfig, DEFAULT_PROGRESS_INTERVAL};
pub use csr::CsrStructure;
pub use error::*;
pub use index::SketchIndex;
pub use parallel::par_compute_sketch;
pub use progress::{LogProgress, ProgressObserver, Silent};
pub use sketch::Sketch;
