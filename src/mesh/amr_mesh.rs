//! Level hierarchy with one box array per level.

use crate::error::ForcingError;
use crate::types::{BlockIndex, IndexBox, LevelIndex};

use super::Geometry;

/// One AMR level: its geometry and the blocks that cover (part of) it.
#[derive(Clone, Debug)]
pub struct AmrLevel {
    geom: Geometry,
    boxes: Vec<IndexBox>,
}

impl AmrLevel {
    /// Create a level from its geometry and block boxes.
    pub fn new(geom: Geometry, boxes: Vec<IndexBox>) -> Self {
        Self { geom, boxes }
    }

    /// Geometry of this level.
    pub fn geom(&self) -> &Geometry {
        &self.geom
    }

    /// Block boxes of this level.
    pub fn boxes(&self) -> &[IndexBox] {
        &self.boxes
    }
}

/// Block-structured AMR mesh.
///
/// Only the parts the source terms consume are modeled: per-level
/// geometry and per-level box arrays. Regridding produces a new mesh.
///
/// # Example
///
/// ```
/// use abl_forcing::mesh::{AmrMesh, Geometry};
/// use abl_forcing::types::{IndexBox, LevelIndex};
///
/// let geom = Geometry::new(
///     IndexBox::from_dims([32, 32, 16]),
///     [0.0; 3],
///     [320.0, 320.0, 160.0],
/// );
/// let mesh = AmrMesh::single_level(geom, 16);
///
/// assert_eq!(mesh.num_levels(), 1);
/// assert_eq!(mesh.boxes(LevelIndex::ZERO).unwrap().len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct AmrMesh {
    levels: Vec<AmrLevel>,
}

impl AmrMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-level mesh with the domain chopped into blocks of at most
    /// `max_grid_size` cells per axis.
    pub fn single_level(geom: Geometry, max_grid_size: usize) -> Self {
        let boxes = geom.domain().chop(max_grid_size);
        let mut mesh = Self::new();
        mesh.push_level(AmrLevel::new(geom, boxes));
        mesh
    }

    /// Append a finer level.
    pub fn push_level(&mut self, level: AmrLevel) -> LevelIndex {
        self.levels.push(level);
        LevelIndex::new(self.levels.len() - 1)
    }

    /// Number of levels.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Iterate over level indices, coarsest first.
    pub fn level_indices(&self) -> impl Iterator<Item = LevelIndex> + ExactSizeIterator {
        LevelIndex::iter(self.levels.len())
    }

    /// Level data.
    pub fn level(&self, lev: LevelIndex) -> Result<&AmrLevel, ForcingError> {
        self.levels
            .get(lev.get())
            .ok_or(ForcingError::LevelOutOfRange {
                level: lev,
                num_levels: self.levels.len(),
            })
    }

    /// Geometry of a level.
    pub fn geom(&self, lev: LevelIndex) -> Result<&Geometry, ForcingError> {
        Ok(self.level(lev)?.geom())
    }

    /// Box array of a level.
    pub fn boxes(&self, lev: LevelIndex) -> Result<&[IndexBox], ForcingError> {
        Ok(self.level(lev)?.boxes())
    }

    /// Box of one block.
    pub fn block_box(&self, lev: LevelIndex, block: BlockIndex) -> Result<IndexBox, ForcingError> {
        let boxes = self.boxes(lev)?;
        boxes
            .get(block.get())
            .copied()
            .ok_or(ForcingError::BlockOutOfRange {
                level: lev,
                block,
                num_blocks: boxes.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_geom() -> Geometry {
        Geometry::new(
            IndexBox::from_dims([16, 16, 8]),
            [0.0; 3],
            [160.0, 160.0, 80.0],
        )
    }

    #[test]
    fn test_single_level_blocks() {
        let mesh = AmrMesh::single_level(make_geom(), 8);
        let boxes = mesh.boxes(LevelIndex::ZERO).unwrap();
        assert_eq!(boxes.len(), 4);
        let total: usize = boxes.iter().map(|b| b.num_cells()).sum();
        assert_eq!(total, 16 * 16 * 8);
    }

    #[test]
    fn test_refined_level() {
        let mut mesh = AmrMesh::single_level(make_geom(), 8);
        let fine_geom = make_geom().refine(2);
        let patch = IndexBox::new([8, 8, 0], [23, 23, 7]);
        let lev = mesh.push_level(AmrLevel::new(fine_geom, vec![patch]));

        assert_eq!(lev, LevelIndex::new(1));
        assert_eq!(mesh.num_levels(), 2);
        assert_eq!(mesh.geom(lev).unwrap().cell_size(), [5.0, 5.0, 5.0]);
        assert_eq!(mesh.block_box(lev, BlockIndex::ZERO).unwrap(), patch);
    }

    #[test]
    fn test_out_of_range() {
        let mesh = AmrMesh::single_level(make_geom(), 8);
        assert!(matches!(
            mesh.geom(LevelIndex::new(3)),
            Err(ForcingError::LevelOutOfRange { num_levels: 1, .. })
        ));
        assert!(matches!(
            mesh.block_box(LevelIndex::ZERO, BlockIndex::new(10)),
            Err(ForcingError::BlockOutOfRange { num_blocks: 4, .. })
        ));
    }
}
