//! Multi-state, multi-level cell-centered fields.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ForcingError;
use crate::mesh::AmrMesh;
use crate::types::{BlockIndex, LevelIndex};

use super::{CellArray, FieldState};

/// Storage of one time state: one `CellArray` per block per level.
#[derive(Clone, Debug)]
pub struct FieldLevels {
    levels: Vec<Vec<CellArray>>,
}

impl FieldLevels {
    fn allocate(mesh: &AmrMesh, ncomp: usize, nghost: i32) -> Self {
        let levels = mesh
            .level_indices()
            .map(|lev| {
                mesh.boxes(lev)
                    .map(|boxes| {
                        boxes
                            .iter()
                            .map(|bx| CellArray::new(bx.grow(nghost), ncomp))
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect();
        Self { levels }
    }

    /// Arrays of all blocks on a level.
    pub fn level(&self, lev: LevelIndex) -> Result<&[CellArray], ForcingError> {
        self.levels
            .get(lev.get())
            .map(Vec::as_slice)
            .ok_or(ForcingError::LevelOutOfRange {
                level: lev,
                num_levels: self.levels.len(),
            })
    }

    /// Arrays of all blocks on a level, mutable.
    pub fn level_mut(&mut self, lev: LevelIndex) -> Result<&mut [CellArray], ForcingError> {
        let num_levels = self.levels.len();
        self.levels
            .get_mut(lev.get())
            .map(Vec::as_mut_slice)
            .ok_or(ForcingError::LevelOutOfRange {
                level: lev,
                num_levels,
            })
    }

    /// Array of one block.
    pub fn array(&self, lev: LevelIndex, block: BlockIndex) -> Result<&CellArray, ForcingError> {
        let arrays = self.level(lev)?;
        arrays.get(block.get()).ok_or(ForcingError::BlockOutOfRange {
            level: lev,
            block,
            num_blocks: arrays.len(),
        })
    }

    /// Array of one block, mutable.
    pub fn array_mut(
        &mut self,
        lev: LevelIndex,
        block: BlockIndex,
    ) -> Result<&mut CellArray, ForcingError> {
        let arrays = self.level_mut(lev)?;
        let num_blocks = arrays.len();
        arrays.get_mut(block.get()).ok_or(ForcingError::BlockOutOfRange {
            level: lev,
            block,
            num_blocks,
        })
    }

    /// Iterate over every array of every level.
    pub fn arrays_mut(&mut self) -> impl Iterator<Item = &mut CellArray> {
        self.levels.iter_mut().flatten()
    }
}

/// Cell-centered field with several time states on every AMR level.
///
/// # Example
///
/// ```
/// use abl_forcing::field::{Field, FieldState};
/// use abl_forcing::mesh::{AmrMesh, Geometry};
/// use abl_forcing::types::{BlockIndex, IndexBox, LevelIndex};
///
/// let geom = Geometry::new(IndexBox::from_dims([8, 8, 4]), [0.0; 3], [80.0, 80.0, 40.0]);
/// let mesh = AmrMesh::single_level(geom, 8);
/// let mut velocity = Field::new("velocity", 3, 1, &[FieldState::New, FieldState::Old], &mesh);
///
/// velocity.fill_state(FieldState::New, &[8.0, 2.0, 0.0]).unwrap();
/// let arr = velocity
///     .array(FieldState::New, LevelIndex::ZERO, BlockIndex::ZERO)
///     .unwrap();
/// assert_eq!(arr.get(0, 0, 0, 0), 8.0);
/// assert!(velocity.state(FieldState::NM1).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    ncomp: usize,
    nghost: i32,
    states: Vec<(FieldState, FieldLevels)>,
}

impl Field {
    /// Allocate a zero-initialized field for every block of `mesh`.
    pub fn new(
        name: impl Into<String>,
        ncomp: usize,
        nghost: i32,
        states: &[FieldState],
        mesh: &AmrMesh,
    ) -> Self {
        let mut allocated: Vec<(FieldState, FieldLevels)> = Vec::with_capacity(states.len());
        for &s in states {
            if allocated.iter().all(|(existing, _)| *existing != s) {
                allocated.push((s, FieldLevels::allocate(mesh, ncomp, nghost)));
            }
        }
        Self {
            name: name.into(),
            ncomp,
            nghost,
            states: allocated,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Components per cell.
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    /// Ghost cells on each side of every block.
    pub fn nghost(&self) -> i32 {
        self.nghost
    }

    /// Whether `fstate` was allocated.
    pub fn has_state(&self, fstate: FieldState) -> bool {
        self.states.iter().any(|(s, _)| *s == fstate)
    }

    /// Allocated states.
    pub fn states(&self) -> impl Iterator<Item = FieldState> + '_ {
        self.states.iter().map(|(s, _)| *s)
    }

    fn unavailable(&self, fstate: FieldState) -> ForcingError {
        ForcingError::FieldStateUnavailable {
            field: self.name.clone(),
            state: fstate,
        }
    }

    /// Storage of one state.
    pub fn state(&self, fstate: FieldState) -> Result<&FieldLevels, ForcingError> {
        self.states
            .iter()
            .find(|(s, _)| *s == fstate)
            .map(|(_, data)| data)
            .ok_or_else(|| self.unavailable(fstate))
    }

    /// Storage of one state, mutable.
    pub fn state_mut(&mut self, fstate: FieldState) -> Result<&mut FieldLevels, ForcingError> {
        let err = self.unavailable(fstate);
        self.states
            .iter_mut()
            .find(|(s, _)| *s == fstate)
            .map(|(_, data)| data)
            .ok_or(err)
    }

    /// Array of one block in one state.
    pub fn array(
        &self,
        fstate: FieldState,
        lev: LevelIndex,
        block: BlockIndex,
    ) -> Result<&CellArray, ForcingError> {
        self.state(fstate)?.array(lev, block)
    }

    /// Array of one block in one state, mutable.
    pub fn array_mut(
        &mut self,
        fstate: FieldState,
        lev: LevelIndex,
        block: BlockIndex,
    ) -> Result<&mut CellArray, ForcingError> {
        self.state_mut(fstate)?.array_mut(lev, block)
    }

    /// Set every cell of a state (ghost cells included) to `values`.
    pub fn fill_state(&mut self, fstate: FieldState, values: &[f64]) -> Result<(), ForcingError> {
        if values.len() != self.ncomp {
            return Err(ForcingError::component_mismatch(
                self.name.clone(),
                self.ncomp,
                values.len(),
            ));
        }
        for arr in self.state_mut(fstate)?.arrays_mut() {
            for (n, &v) in values.iter().enumerate() {
                arr.fill_component(n, v);
            }
        }
        Ok(())
    }

    /// Set every cell of a state from a function of the cell index.
    pub fn fill_state_with<F>(&mut self, fstate: FieldState, f: F) -> Result<(), ForcingError>
    where
        F: Fn(LevelIndex, i32, i32, i32, &mut [f64]),
    {
        let data = self.state_mut(fstate)?;
        for (lev, arrays) in data.levels.iter_mut().enumerate() {
            let lev = LevelIndex::new(lev);
            for arr in arrays.iter_mut() {
                let bx = *arr.index_box();
                for (i, j, k) in bx.iter() {
                    f(lev, i, j, k, arr.cell_mut(i, j, k));
                }
            }
        }
        Ok(())
    }
}

/// Shared, lockable handle to a [`Field`].
///
/// Source terms keep a clone of the handle and take a read lock for the
/// duration of one evaluation; the driver takes the write lock to advance
/// the solution.
#[derive(Clone, Debug)]
pub struct FieldHandle {
    name: Arc<str>,
    inner: Arc<RwLock<Field>>,
}

impl FieldHandle {
    /// Wrap a field.
    pub fn new(field: Field) -> Self {
        Self {
            name: Arc::from(field.name()),
            inner: Arc::new(RwLock::new(field)),
        }
    }

    /// Name of the wrapped field (no lock taken).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire shared read access.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Field>, ForcingError> {
        self.inner
            .read()
            .map_err(|_| ForcingError::LockPoisoned(self.name.to_string()))
    }

    /// Acquire exclusive write access.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Field>, ForcingError> {
        self.inner
            .write()
            .map_err(|_| ForcingError::LockPoisoned(self.name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Geometry;
    use crate::types::IndexBox;

    fn make_mesh() -> AmrMesh {
        let geom = Geometry::new(
            IndexBox::from_dims([8, 8, 4]),
            [0.0; 3],
            [80.0, 80.0, 40.0],
        );
        AmrMesh::single_level(geom, 4)
    }

    #[test]
    fn test_allocation_per_block() {
        let mesh = make_mesh();
        let field = Field::new("density", 1, 2, &[FieldState::New], &mesh);
        let arrays = field
            .state(FieldState::New)
            .unwrap()
            .level(LevelIndex::ZERO)
            .unwrap();

        assert_eq!(arrays.len(), 4);
        let valid = mesh.block_box(LevelIndex::ZERO, BlockIndex::new(1)).unwrap();
        assert_eq!(*arrays[1].index_box(), valid.grow(2));
    }

    #[test]
    fn test_duplicate_states_collapse() {
        let mesh = make_mesh();
        let field = Field::new(
            "velocity",
            3,
            0,
            &[FieldState::New, FieldState::Old, FieldState::New],
            &mesh,
        );
        assert_eq!(field.states().count(), 2);
    }

    #[test]
    fn test_missing_state_error() {
        let mesh = make_mesh();
        let field = Field::new("density", 1, 0, &[FieldState::New], &mesh);
        let err = field.state(FieldState::NPH).unwrap_err();
        assert!(matches!(
            err,
            ForcingError::FieldStateUnavailable { state: FieldState::NPH, .. }
        ));
    }

    #[test]
    fn test_fill_state_component_check() {
        let mesh = make_mesh();
        let mut field = Field::new("velocity", 3, 0, &[FieldState::New], &mesh);
        assert!(field.fill_state(FieldState::New, &[1.0, 2.0]).is_err());
        field.fill_state(FieldState::New, &[1.0, 2.0, 3.0]).unwrap();

        let arr = field
            .array(FieldState::New, LevelIndex::ZERO, BlockIndex::new(3))
            .unwrap();
        let lo = arr.index_box().lo();
        assert_eq!(arr.cell(lo[0], lo[1], lo[2]), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fill_state_with_index_function() {
        let mesh = make_mesh();
        let mut field = Field::new("temperature", 1, 0, &[FieldState::Old], &mesh);
        field
            .fill_state_with(FieldState::Old, |_, _, _, k, cell| cell[0] = 300.0 + k as f64)
            .unwrap();

        let arr = field
            .array(FieldState::Old, LevelIndex::ZERO, BlockIndex::ZERO)
            .unwrap();
        assert_eq!(arr.get(0, 0, 0, 0), 300.0);
        assert_eq!(arr.get(0, 0, 3, 0), 303.0);
    }

    #[test]
    fn test_handle_read_write() {
        let mesh = make_mesh();
        let handle = FieldHandle::new(Field::new("density", 1, 0, &[FieldState::New], &mesh));
        handle
            .write()
            .unwrap()
            .fill_state(FieldState::New, &[1.2])
            .unwrap();

        let guard = handle.read().unwrap();
        let arr = guard
            .array(FieldState::New, LevelIndex::ZERO, BlockIndex::ZERO)
            .unwrap();
        assert_eq!(arr.get(1, 1, 1, 0), 1.2);
        assert_eq!(handle.name(), "density");
    }
}
