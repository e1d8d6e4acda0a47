//! Data-parallel loops over the cells of an index box.
//!
//! The unit of parallel work is one row of cells (fixed `j`, `k`) of the
//! destination array. Rows are disjoint slices, so every lane writes only
//! its own cells and no synchronization is needed. With the `parallel`
//! feature the rows are distributed with Rayon; otherwise the same body
//! runs serially and produces identical results.

use crate::field::CellArray;
use crate::types::IndexBox;

/// Run `f(i, j, k, cell)` for every cell of `bx`, where `cell` holds the
/// components of `(i, j, k)` in `dst`.
///
/// Cells of `bx` that lie outside `dst` are skipped. `f` must only use
/// values it captured by copy or by shared reference.
///
/// # Example
///
/// ```
/// use abl_forcing::field::CellArray;
/// use abl_forcing::parallel::parallel_for;
/// use abl_forcing::types::IndexBox;
///
/// let bx = IndexBox::from_dims([4, 4, 4]);
/// let mut src = CellArray::new(bx, 3);
/// parallel_for(&bx.bdry_lo(2), &mut src, |_, _, _, cell| cell[0] += 1.0);
///
/// assert_eq!(src.get(2, 3, 0, 0), 1.0);
/// assert_eq!(src.get(2, 3, 1, 0), 0.0);
/// ```
pub fn parallel_for<F>(bx: &IndexBox, dst: &mut CellArray, f: F)
where
    F: Fn(i32, i32, i32, &mut [f64]) + Send + Sync,
{
    let abox = *dst.index_box();
    let region = bx.intersect(&abox);
    if region.is_empty() {
        return;
    }

    let ncomp = dst.ncomp();
    let row_len = dst.row_len();
    let ny = abox.len(1);
    let (alo, rlo, rhi) = (abox.lo(), region.lo(), region.hi());

    // Restrict to the k-planes of the region.
    let first_row = (rlo[2] - alo[2]) as usize * ny;
    let last_row = (rhi[2] - alo[2] + 1) as usize * ny;
    let rows = &mut dst.data_mut()[first_row * row_len..last_row * row_len];

    let body = |(r, row): (usize, &mut [f64])| {
        let r = first_row + r;
        let j = alo[1] + (r % ny) as i32;
        let k = alo[2] + (r / ny) as i32;
        if j < rlo[1] || j > rhi[1] {
            return;
        }
        for i in rlo[0]..=rhi[0] {
            let start = (i - alo[0]) as usize * ncomp;
            f(i, j, k, &mut row[start..start + ncomp]);
        }
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        rows.par_chunks_mut(row_len).enumerate().for_each(body);
    }

    #[cfg(not(feature = "parallel"))]
    {
        rows.chunks_mut(row_len).enumerate().for_each(body);
    }
}
