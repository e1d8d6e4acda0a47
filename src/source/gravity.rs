//! Gravitational body force.

use super::traits::check_components;
use super::SourceTerm;
use crate::config::{ConfigError, IncfloConfig};
use crate::error::ForcingError;
use crate::field::{CellArray, FieldState};
use crate::parallel::parallel_for;
use crate::types::{BlockIndex, IndexBox, LevelIndex, Vector3};

/// Constant gravitational acceleration added to every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityForcing {
    gravity: Vector3,
}

impl GravityForcing {
    pub const NAME: &'static str = "GravityForcing";

    pub fn new(gravity: Vector3) -> Self {
        Self { gravity }
    }

    /// Build from `incflo.gravity`.
    pub fn from_config(incflo: &IncfloConfig) -> Result<Self, ConfigError> {
        let gravity = Vector3::from_array(incflo.gravity);
        if !gravity.is_finite() {
            return Err(ConfigError::invalid("incflo.gravity", gravity, "must be finite"));
        }
        Ok(Self::new(gravity))
    }

    /// Gravity vector (m/s²).
    pub fn gravity(&self) -> Vector3 {
        self.gravity
    }
}

impl SourceTerm for GravityForcing {
    fn evaluate(
        &self,
        _lev: LevelIndex,
        _block: BlockIndex,
        bx: &IndexBox,
        _fstate: FieldState,
        src: &mut CellArray,
    ) -> Result<(), ForcingError> {
        check_components(Self::NAME, src, 3)?;

        let g = self.gravity;
        parallel_for(bx, src, move |_, _, _, cell| {
            cell[0] += g.x;
            cell[1] += g.y;
            cell[2] += g.z;
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
