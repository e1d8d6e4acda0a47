//! Level geometry: index domain and physical cell sizes.

use crate::types::{IndexBox, SPACEDIM};

/// Geometry of one AMR level.
///
/// Couples the index-space domain of the level with the physical extent of
/// the problem. Finer levels share the physical extent and have a refined
/// domain, so cell sizes are level dependent.
///
/// # Example
///
/// ```
/// use abl_forcing::mesh::Geometry;
/// use abl_forcing::types::IndexBox;
///
/// let geom = Geometry::new(
///     IndexBox::from_dims([64, 64, 32]),
///     [0.0, 0.0, 0.0],
///     [1280.0, 1280.0, 640.0],
/// );
/// assert_eq!(geom.cell_size(), [20.0, 20.0, 20.0]);
/// assert_eq!(geom.cell_volume(), 8000.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    domain: IndexBox,
    prob_lo: [f64; SPACEDIM],
    prob_hi: [f64; SPACEDIM],
    dx: [f64; SPACEDIM],
}

impl Geometry {
    /// Create a geometry from an index domain and the physical corners.
    ///
    /// # Panics
    ///
    /// Panics if the domain is empty or `prob_hi <= prob_lo` on any axis.
    pub fn new(domain: IndexBox, prob_lo: [f64; SPACEDIM], prob_hi: [f64; SPACEDIM]) -> Self {
        assert!(!domain.is_empty(), "Geometry domain must not be empty");
        let mut dx = [0.0; SPACEDIM];
        for d in 0..SPACEDIM {
            assert!(
                prob_hi[d] > prob_lo[d],
                "prob_hi ({}) must be greater than prob_lo ({}) along axis {}",
                prob_hi[d],
                prob_lo[d],
                d
            );
            dx[d] = (prob_hi[d] - prob_lo[d]) / domain.len(d) as f64;
        }
        Self {
            domain,
            prob_lo,
            prob_hi,
            dx,
        }
    }

    /// Index-space domain of this level.
    #[inline]
    pub fn domain(&self) -> &IndexBox {
        &self.domain
    }

    /// Physical low corner.
    pub fn prob_lo(&self) -> [f64; SPACEDIM] {
        self.prob_lo
    }

    /// Physical high corner.
    pub fn prob_hi(&self) -> [f64; SPACEDIM] {
        self.prob_hi
    }

    /// Cell size along each axis.
    #[inline]
    pub fn cell_size(&self) -> [f64; SPACEDIM] {
        self.dx
    }

    /// Cell volume dx·dy·dz.
    #[inline]
    pub fn cell_volume(&self) -> f64 {
        self.dx.iter().product()
    }

    /// Physical coordinates of the center of cell `(i, j, k)`.
    pub fn cell_center(&self, i: i32, j: i32, k: i32) -> [f64; SPACEDIM] {
        let idx = [i, j, k];
        let mut x = [0.0; SPACEDIM];
        for d in 0..SPACEDIM {
            x[d] = self.prob_lo[d] + (idx[d] - self.domain.small_end(d)) as f64 * self.dx[d]
                + 0.5 * self.dx[d];
        }
        x
    }

    /// Geometry of the next finer level for a given refinement ratio.
    pub fn refine(&self, ratio: i32) -> Self {
        let lo = self.domain.lo();
        let hi = self.domain.hi();
        let fine = IndexBox::new(
            [lo[0] * ratio, lo[1] * ratio, lo[2] * ratio],
            [
                (hi[0] + 1) * ratio - 1,
                (hi[1] + 1) * ratio - 1,
                (hi[2] + 1) * ratio - 1,
            ],
        );
        Self::new(fine, self.prob_lo, self.prob_hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_anisotropic_cells() {
        let geom = Geometry::new(
            IndexBox::from_dims([10, 20, 5]),
            [0.0, 0.0, 0.0],
            [100.0, 100.0, 50.0],
        );
        assert_eq!(geom.cell_size(), [10.0, 5.0, 10.0]);
        assert!((geom.cell_volume() - 500.0).abs() < TOL);
    }

    #[test]
    fn test_cell_center() {
        let geom = Geometry::new(
            IndexBox::from_dims([4, 4, 4]),
            [-2.0, 0.0, 0.0],
            [2.0, 4.0, 8.0],
        );
        let c = geom.cell_center(0, 3, 1);
        assert!((c[0] - (-1.5)).abs() < TOL);
        assert!((c[1] - 3.5).abs() < TOL);
        assert!((c[2] - 3.0).abs() < TOL);
    }

    #[test]
    fn test_refine_halves_cells() {
        let coarse = Geometry::new(
            IndexBox::from_dims([8, 8, 8]),
            [0.0, 0.0, 0.0],
            [80.0, 80.0, 80.0],
        );
        let fine = coarse.refine(2);
        assert_eq!(fine.domain().dims(), [16, 16, 16]);
        assert_eq!(fine.cell_size(), [5.0, 5.0, 5.0]);
        assert!((fine.cell_volume() * 8.0 - coarse.cell_volume()).abs() < TOL);
    }

    #[test]
    #[should_panic(expected = "must be greater than")]
    fn test_inverted_extent_panics() {
        let _ = Geometry::new(
            IndexBox::from_dims([4, 4, 4]),
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 0.0],
        );
    }
}
