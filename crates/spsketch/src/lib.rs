//! # spsketch
//!
//! Dense block-count sketches of large square sparse matrices.
//!
//! This is the meta crate: it re-exports [`spsketch_core`] and adds
//! subscriber setup for the `tracing` events the core emits.
//!
//! ## Quick Start
//!
//! ```
//! use spsketch::prelude::*;
//!
//! // row 0 -> col 1; row 1 -> cols 0, 3; row 2 -> col 0; row 3 -> none
//! let row_ptr = [0i64, 1, 3, 4, 4];
//! let col_index = [1i64, 0, 3, 0];
//!
//! let csr = CsrStructure::new(&row_ptr, &col_index, 4)?;
//! let sketch = Sketcher::new(SketchConfig::from_env()).sketch(&csr, 2)?;
//!
//! assert_eq!(sketch.to_nested(), vec![vec![2, 1], vec![1, 0]]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): chunked multi-threaded scan
//! - `tracing` (default): [`tracing_support::init_tracing`] installs a subscriber

pub use spsketch_core as core;
pub use spsketch_core::*;

pub mod tracing_support;

/// Commonly used items
pub mod prelude {
    pub use spsketch_core::{
        block_size, compute_sketch, par_compute_sketch, CsrStructure, ErrorKind, LogProgress,
        ProgressObserver, Silent, Sketch, SketchConfig, SketchError, SketchIndex, SketchResult,
        Sketcher,
    };

    pub use crate::tracing_support::{init_tracing, TracingConfig, TracingFormat};
}
