//! Integer types accepted for CSR offsets and column indices
//!
//! CSR arrays exported by other tools often use signed 32- or 64-bit
//! offsets, so both signed and unsigned integers are accepted. Negative
//! values are representable and are rejected during validation.

use std::fmt::{Debug, Display};

/// Integer usable as a CSR offset, column index, dimension or resolution
pub trait SketchIndex: Copy + Debug + Display + Send + Sync + 'static {
    /// Convert to `usize`, or `None` if negative or too large
    fn to_index(self) -> Option<usize>;

    /// Lossless widening used in error reports
    fn to_wide(self) -> i128;
}

macro_rules! impl_sketch_index {
    ($($t:ty),*) => {
        $(
            impl SketchIndex for $t {
                #[inline]
                fn to_index(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn to_wide(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_sketch_index!(i32, i64, isize, u32, u64, usize);
