//! Cell-index boxes.

use std::fmt;

/// Number of index-space axes. Two-dimensional problems use a single
/// cell along the third axis.
pub const SPACEDIM: usize = 3;

/// Inclusive range of cell indices along each axis.
///
/// A box with `hi[d] < lo[d]` along any axis is empty.
///
/// # Example
///
/// ```
/// use abl_forcing::types::IndexBox;
///
/// let bx = IndexBox::new([0, 0, 0], [7, 7, 3]);
/// assert_eq!(bx.num_cells(), 8 * 8 * 4);
///
/// // One-cell-thick slice at the bottom of the box
/// let bottom = bx.bdry_lo(2);
/// assert_eq!(bottom.small_end(2), 0);
/// assert_eq!(bottom.big_end(2), 0);
/// assert_eq!(bottom.num_cells(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IndexBox {
    lo: [i32; SPACEDIM],
    hi: [i32; SPACEDIM],
}

impl IndexBox {
    /// Create a box from inclusive low and high corners.
    pub const fn new(lo: [i32; SPACEDIM], hi: [i32; SPACEDIM]) -> Self {
        Self { lo, hi }
    }

    /// Box covering `[0, n)` cells along each axis.
    pub fn from_dims(n: [usize; SPACEDIM]) -> Self {
        Self::new(
            [0, 0, 0],
            [n[0] as i32 - 1, n[1] as i32 - 1, n[2] as i32 - 1],
        )
    }

    /// Low corner.
    #[inline]
    pub fn lo(&self) -> [i32; SPACEDIM] {
        self.lo
    }

    /// High corner (inclusive).
    #[inline]
    pub fn hi(&self) -> [i32; SPACEDIM] {
        self.hi
    }

    /// Low index along `dir`.
    #[inline]
    pub fn small_end(&self, dir: usize) -> i32 {
        self.lo[dir]
    }

    /// High index along `dir` (inclusive).
    #[inline]
    pub fn big_end(&self, dir: usize) -> i32 {
        self.hi[dir]
    }

    /// Number of cells along `dir`.
    #[inline]
    pub fn len(&self, dir: usize) -> usize {
        if self.hi[dir] < self.lo[dir] {
            0
        } else {
            (self.hi[dir] - self.lo[dir] + 1) as usize
        }
    }

    /// Number of cells along each axis.
    pub fn dims(&self) -> [usize; SPACEDIM] {
        [self.len(0), self.len(1), self.len(2)]
    }

    /// Total number of cells.
    pub fn num_cells(&self) -> usize {
        self.len(0) * self.len(1) * self.len(2)
    }

    /// Whether the box contains no cells.
    pub fn is_empty(&self) -> bool {
        (0..SPACEDIM).any(|d| self.hi[d] < self.lo[d])
    }

    /// Whether cell `(i, j, k)` lies inside the box.
    #[inline]
    pub fn contains(&self, i: i32, j: i32, k: i32) -> bool {
        i >= self.lo[0]
            && i <= self.hi[0]
            && j >= self.lo[1]
            && j <= self.hi[1]
            && k >= self.lo[2]
            && k <= self.hi[2]
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        other.is_empty()
            || (self.contains(other.lo[0], other.lo[1], other.lo[2])
                && self.contains(other.hi[0], other.hi[1], other.hi[2]))
    }

    /// Grow the box by `n` cells on every side.
    pub fn grow(&self, n: i32) -> Self {
        Self::new(
            [self.lo[0] - n, self.lo[1] - n, self.lo[2] - n],
            [self.hi[0] + n, self.hi[1] + n, self.hi[2] + n],
        )
    }

    /// Intersection with another box (possibly empty).
    pub fn intersect(&self, other: &IndexBox) -> Self {
        let mut lo = [0; SPACEDIM];
        let mut hi = [0; SPACEDIM];
        for d in 0..SPACEDIM {
            lo[d] = self.lo[d].max(other.lo[d]);
            hi[d] = self.hi[d].min(other.hi[d]);
        }
        Self::new(lo, hi)
    }

    /// One-cell-thick slice at the low end of the box along `dir`.
    ///
    /// These are the cells adjacent to the low face of the box.
    pub fn bdry_lo(&self, dir: usize) -> Self {
        let mut hi = self.hi;
        hi[dir] = self.lo[dir];
        Self::new(self.lo, hi)
    }

    /// Split the box into sub-boxes with at most `max_size` cells per axis.
    pub fn chop(&self, max_size: usize) -> Vec<IndexBox> {
        let max_size = max_size.max(1) as i32;
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }

        let mut k = self.lo[2];
        while k <= self.hi[2] {
            let k_hi = (k + max_size - 1).min(self.hi[2]);
            let mut j = self.lo[1];
            while j <= self.hi[1] {
                let j_hi = (j + max_size - 1).min(self.hi[1]);
                let mut i = self.lo[0];
                while i <= self.hi[0] {
                    let i_hi = (i + max_size - 1).min(self.hi[0]);
                    out.push(IndexBox::new([i, j, k], [i_hi, j_hi, k_hi]));
                    i = i_hi + 1;
                }
                j = j_hi + 1;
            }
            k = k_hi + 1;
        }
        out
    }

    /// Iterate over all `(i, j, k)` in the box, `i` fastest.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, i32)> {
        let bx = *self;
        let empty = bx.is_empty();
        (bx.lo[2]..=bx.hi[2])
            .filter(move |_| !empty)
            .flat_map(move |k| {
                (bx.lo[1]..=bx.hi[1])
                    .flat_map(move |j| (bx.lo[0]..=bx.hi[0]).map(move |i| (i, j, k)))
            })
    }
}

impl fmt::Display for IndexBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(({},{},{}) ({},{},{}))",
            self.lo[0], self.lo[1], self.lo[2], self.hi[0], self.hi[1], self.hi[2]
        )
    }
}
