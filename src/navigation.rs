//! Circular next/previous navigation over the catalog.

/// Computes neighbouring image indices, wrapping at both ends.
///
/// Indices are not validated here; callers check them against the catalog
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    size: usize,
}

impl Navigator {
    /// Navigator over a catalog of `size` images. `size` must be non-zero.
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "navigation over an empty catalog");
        Self { size }
    }

    /// Number of images navigated over.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index after `index`, wrapping to 0 past the last image.
    pub fn next(&self, index: usize) -> usize {
        if index + 1 < self.size { index + 1 } else { 0 }
    }

    /// Index before `index`, wrapping to the last image before 0.
    pub fn prev(&self, index: usize) -> usize {
        if index > 0 {
            index - 1
        } else {
            self.size.saturating_sub(1)
        }
    }
}
