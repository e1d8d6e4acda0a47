//! Source term dispatch contract.
//!
//! The integrator calls every source term of an equation once per level,
//! block and field state. A source term only adds into the accumulation
//! buffer it is handed; the fields it was constructed with are read-only.

use crate::error::ForcingError;
use crate::field::{CellArray, FieldState};
use crate::mesh::AmrMesh;
use crate::types::{BlockIndex, IndexBox, LevelIndex};

/// A forcing term of a transport equation.
///
/// Implementations must be thread-safe (`Send + Sync`): blocks of a level
/// may be evaluated concurrently.
pub trait SourceTerm: Send + Sync {
    /// Add this term's contribution for the cells of `bx` into `src`.
    ///
    /// # Arguments
    /// * `lev` - AMR level
    /// * `block` - Block of the level's box array that `src` belongs to
    /// * `bx` - Cells to update
    /// * `fstate` - Time state the right-hand side is evaluated at
    /// * `src` - Accumulation buffer; contributions are added, never assigned
    fn evaluate(
        &self,
        lev: LevelIndex,
        block: BlockIndex,
        bx: &IndexBox,
        fstate: FieldState,
        src: &mut CellArray,
    ) -> Result<(), ForcingError>;

    /// Name of this source term, as used in the input file.
    fn name(&self) -> &'static str;
}

/// Check that `src` has at least `ncomp` components.
pub(crate) fn check_components(
    name: &str,
    src: &CellArray,
    ncomp: usize,
) -> Result<(), ForcingError> {
    if src.ncomp() < ncomp {
        return Err(ForcingError::component_mismatch(name, ncomp, src.ncomp()));
    }
    Ok(())
}

/// Ordered collection of source terms of one equation.
///
/// Evaluating the set evaluates each term in insertion order into the same
/// buffer.
///
/// # Example
///
/// ```
/// use abl_forcing::field::{CellArray, FieldState};
/// use abl_forcing::source::{GravityForcing, SourceTerm, SourceTermSet};
/// use abl_forcing::types::{BlockIndex, IndexBox, LevelIndex, Vector3};
///
/// let mut set = SourceTermSet::new();
/// set.push(Box::new(GravityForcing::new(Vector3::new(0.0, 0.0, -9.81))));
/// set.push(Box::new(GravityForcing::new(Vector3::new(1.0, 0.0, 0.0))));
///
/// let bx = IndexBox::from_dims([2, 2, 2]);
/// let mut src = CellArray::new(bx, 3);
/// set.evaluate(LevelIndex::ZERO, BlockIndex::ZERO, &bx, FieldState::New, &mut src)
///     .unwrap();
///
/// assert_eq!(src.cell(1, 1, 1), &[1.0, 0.0, -9.81]);
/// ```
#[derive(Default)]
pub struct SourceTermSet {
    terms: Vec<Box<dyn SourceTerm>>,
}

impl SourceTermSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source term.
    pub fn push(&mut self, term: Box<dyn SourceTerm>) {
        self.terms.push(term);
    }

    /// Number of source terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Names of the source terms, in evaluation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.terms.iter().map(|t| t.name()).collect()
    }

    /// Evaluate every term on every block of level `lev`.
    ///
    /// `bufs` holds one accumulation buffer per block of the level, in
    /// box-array order. Each block is evaluated over its valid box.
    pub fn apply_level(
        &self,
        mesh: &AmrMesh,
        lev: LevelIndex,
        fstate: FieldState,
        bufs: &mut [CellArray],
    ) -> Result<(), ForcingError> {
        let boxes = mesh.boxes(lev)?;
        if bufs.len() != boxes.len() {
            return Err(ForcingError::BufferCountMismatch {
                level: lev,
                expected: boxes.len(),
                actual: bufs.len(),
            });
        }

        let body = |(b, src): (usize, &mut CellArray)| {
            self.evaluate(lev, BlockIndex::new(b), &boxes[b], fstate, src)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            bufs.par_iter_mut().enumerate().try_for_each(body)
        }

        #[cfg(not(feature = "parallel"))]
        {
            bufs.iter_mut().enumerate().try_for_each(body)
        }
    }
}

impl SourceTerm for SourceTermSet {
    fn evaluate(
        &self,
        lev: LevelIndex,
        block: BlockIndex,
        bx: &IndexBox,
        fstate: FieldState,
        src: &mut CellArray,
    ) -> Result<(), ForcingError> {
        for term in &self.terms {
            term.evaluate(lev, block, bx, fstate, src)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "combined"
    }
}

impl std::fmt::Debug for SourceTermSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTermSet")
            .field("terms", &self.names())
            .finish()
    }
}
