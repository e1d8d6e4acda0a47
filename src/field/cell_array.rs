//! Dense cell-centered storage over one index box.

use crate::types::IndexBox;

/// Cell-centered multi-component array over an [`IndexBox`].
///
/// Layout is cell-major: the `ncomp` components of a cell are contiguous,
/// cells are ordered with `i` fastest, then `j`, then `k`. A row of cells
/// (fixed `j`, `k`) is therefore one contiguous slice, which is the unit of
/// work handed to parallel loops.
///
/// # Example
///
/// ```
/// use abl_forcing::field::CellArray;
/// use abl_forcing::types::IndexBox;
///
/// let mut a = CellArray::new(IndexBox::from_dims([4, 4, 2]), 3);
/// a.add(1, 2, 0, 1, 0.5);
/// a.add(1, 2, 0, 1, 0.25);
/// assert_eq!(a.get(1, 2, 0, 1), 0.75);
/// assert_eq!(a.cell(1, 2, 0), &[0.0, 0.75, 0.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CellArray {
    bx: IndexBox,
    ncomp: usize,
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl CellArray {
    /// Zero-initialized array over `bx` with `ncomp` components per cell.
    pub fn new(bx: IndexBox, ncomp: usize) -> Self {
        Self::filled(bx, ncomp, 0.0)
    }

    /// Array with every component of every cell set to `value`.
    pub fn filled(bx: IndexBox, ncomp: usize, value: f64) -> Self {
        Self {
            bx,
            ncomp,
            nx: bx.len(0),
            ny: bx.len(1),
            data: vec![value; bx.num_cells() * ncomp],
        }
    }

    /// Box covered by this array (including any ghost cells).
    #[inline]
    pub fn index_box(&self) -> &IndexBox {
        &self.bx
    }

    /// Number of components per cell.
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    /// Number of values in one row of cells.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.nx * self.ncomp
    }

    /// Offset of the first component of cell `(i, j, k)`.
    #[inline(always)]
    fn offset(&self, i: i32, j: i32, k: i32) -> usize {
        debug_assert!(
            self.bx.contains(i, j, k),
            "cell ({}, {}, {}) outside {}",
            i,
            j,
            k,
            self.bx
        );
        let lo = self.bx.lo();
        let ii = (i - lo[0]) as usize;
        let jj = (j - lo[1]) as usize;
        let kk = (k - lo[2]) as usize;
        ((kk * self.ny + jj) * self.nx + ii) * self.ncomp
    }

    /// Value of component `n` at cell `(i, j, k)`.
    #[inline(always)]
    pub fn get(&self, i: i32, j: i32, k: i32, n: usize) -> f64 {
        self.data[self.offset(i, j, k) + n]
    }

    /// Set component `n` at cell `(i, j, k)`.
    #[inline(always)]
    pub fn set(&mut self, i: i32, j: i32, k: i32, n: usize, value: f64) {
        let idx = self.offset(i, j, k) + n;
        self.data[idx] = value;
    }

    /// Add `value` to component `n` at cell `(i, j, k)`.
    #[inline(always)]
    pub fn add(&mut self, i: i32, j: i32, k: i32, n: usize, value: f64) {
        let idx = self.offset(i, j, k) + n;
        self.data[idx] += value;
    }

    /// All components of cell `(i, j, k)`.
    #[inline]
    pub fn cell(&self, i: i32, j: i32, k: i32) -> &[f64] {
        let start = self.offset(i, j, k);
        &self.data[start..start + self.ncomp]
    }

    /// All components of cell `(i, j, k)`, mutable.
    #[inline]
    pub fn cell_mut(&mut self, i: i32, j: i32, k: i32) -> &mut [f64] {
        let start = self.offset(i, j, k);
        &mut self.data[start..start + self.ncomp]
    }

    /// Set every component of every cell to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Set component `n` of every cell to `value`.
    pub fn fill_component(&mut self, n: usize, value: f64) {
        for cell in self.data.chunks_exact_mut(self.ncomp) {
            cell[n] = value;
        }
    }

    /// Raw storage.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Raw storage, mutable.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Maximum absolute value over all components.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }
}
