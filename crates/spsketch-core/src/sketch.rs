//! Dense `n × n` block-count grid
//!
//! A [`Sketch`] is the output of the reduction: cell `(i, j)` counts the
//! stored entries whose row falls in row-block `i` and whose column falls in
//! column-block `j`. Cells are stored row-major.
//!
//! # Examples
//!
//! ```
//! use spsketch_core::compute_sketch;
//!
//! let sketch = compute_sketch(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4, 2).unwrap();
//!
//! assert_eq!(sketch.block_size(), 2);
//! assert_eq!(sketch.to_nested(), vec![vec![2, 1], vec![1, 0]]);
//! assert_eq!(sketch[(0, 1)], 1);
//! assert_eq!(sketch.total(), 4);
//! ```

use crate::error::{ArgumentError, SketchResult};
use scirs2_core::ndarray_ext::Array2;
use std::ops::Index;

/// Block nonzero counts of a square sparse matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    /// Row-major counts, length `resolution * resolution`
    cells: Vec<u64>,

    /// Grid side length n
    resolution: usize,

    /// Matrix indices per block, d = ceil(R / n)
    block_size: usize,
}

impl Sketch {
    /// Create an all-zero sketch
    ///
    /// Fails with `DimensionTooLarge` when the grid cannot be allocated.
    pub(crate) fn zeros(resolution: usize, block_size: usize) -> SketchResult<Self> {
        let too_large = || ArgumentError::DimensionTooLarge {
            value: resolution as i128,
        };
        let len = resolution.checked_mul(resolution).ok_or_else(too_large)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| too_large())?;
        cells.resize(len, 0);

        Ok(Self {
            cells,
            resolution,
            block_size,
        })
    }

    #[inline]
    pub(crate) fn bump(&mut self, i: usize, j: usize) {
        self.cells[i * self.resolution + j] += 1;
    }

    /// Grid side length
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of matrix rows (and columns) folded into each block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Count at `(i, j)`, or `None` outside the grid
    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        if i < self.resolution && j < self.resolution {
            Some(self.cells[i * self.resolution + j])
        } else {
            None
        }
    }

    /// Counts of row-block `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= resolution`.
    pub fn row(&self, i: usize) -> &[u64] {
        let start = i * self.resolution;
        &self.cells[start..start + self.resolution]
    }

    /// Iterate row-blocks in order
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.cells.chunks_exact(self.resolution)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.cells
    }

    /// Nested `grid[i][j]` form
    pub fn to_nested(&self) -> Vec<Vec<u64>> {
        self.rows().map(<[u64]>::to_vec).collect()
    }

    /// Copy into an `n × n` array
    pub fn to_array(&self) -> Array2<u64> {
        Array2::from_shape_fn((self.resolution, self.resolution), |(i, j)| {
            self.cells[i * self.resolution + j]
        })
    }

    /// Sum of all cells; equals nnz for a valid input
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// Largest cell count
    pub fn max_count(&self) -> u64 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Number of non-empty blocks
    pub fn occupied_blocks(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Counts scaled by the largest cell into `[0, 1]`
    ///
    /// An all-zero sketch maps to all zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use spsketch_core::compute_sketch;
    ///
    /// let sketch = compute_sketch(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4, 2).unwrap();
    /// let shade = sketch.normalized();
    /// assert_eq!(shade[[0, 0]], 1.0);
    /// assert_eq!(shade[[0, 1]], 0.5);
    /// assert_eq!(shade[[1, 1]], 0.0);
    /// ```
    pub fn normalized(&self) -> Array2<f64> {
        let max = self.max_count();
        if max == 0 {
            return Array2::zeros((self.resolution, self.resolution));
        }
        let scale = max as f64;
        self.to_array().mapv(|c| c as f64 / scale)
    }

    /// Sum `factor × factor` supercells into a coarser sketch
    ///
    /// The result has resolution `n / factor` and block size
    /// `block_size * factor`. When `n` divides R, this equals sketching
    /// the matrix directly at the coarser resolution.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `factor` is zero or does not divide the resolution.
    ///
    /// # Examples
    ///
    /// ```
    /// use spsketch_core::compute_sketch;
    ///
    /// let fine = compute_sketch(&[0i64, 1, 3, 4, 4], &[1i64, 0, 3, 0], 4, 4).unwrap();
    /// let coarse = fine.coarsen(2).unwrap();
    /// assert_eq!(coarse.to_nested(), vec![vec![2, 1], vec![1, 0]]);
    /// ```
    pub fn coarsen(&self, factor: usize) -> SketchResult<Sketch> {
        if factor == 0 || self.resolution % factor != 0 {
            return Err(ArgumentError::InvalidCoarsenFactor {
                factor,
                resolution: self.resolution,
            }
            .into());
        }

        let mut out = Sketch::zeros(self.resolution / factor, self.block_size * factor)?;
        for (i, row) in self.rows().enumerate() {
            let base = (i / factor) * out.resolution;
            for (j, &count) in row.iter().enumerate() {
                out.cells[base + j / factor] += count;
            }
        }
        Ok(out)
    }

    /// Add another sketch of the same geometry into this one
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if resolution or block size differ.
    pub fn merge(&mut self, other: &Sketch) -> SketchResult<()> {
        if self.resolution != other.resolution || self.block_size != other.block_size {
            return Err(ArgumentError::MergeMismatch {
                left: self.resolution,
                right: other.resolution,
                left_block: self.block_size,
                right_block: other.block_size,
            }
            .into());
        }
        for (a, &b) in self.cells.iter_mut().zip(&other.cells) {
            *a += b;
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for Sketch {
    type Output = u64;

    fn index(&self, (i, j): (usize, usize)) -> &u64 {
        assert!(
            i < self.resolution && j < self.resolution,
            "sketch index ({i}, {j}) out of bounds for resolution {}",
            self.resolution
        );
        &self.cells[i * self.resolution + j]
    }
}
