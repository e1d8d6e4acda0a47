//! Wall model settings shared by the wall flux source terms.

use crate::config::{AblConfig, ConfigError};
use crate::types::{IndexBox, SPACEDIM};
use crate::wall_shear::WallShearStressType;

/// Axis along which wall fluxes are applied.
pub const VERTICAL_DIRECTION: usize = 2;

/// Closure and wall orientation of a wall flux source term.
///
/// Built from the `ABL` input section. With `ABL.strict_validation` off an
/// unknown closure name falls back to `default` and a non-vertical wall
/// disables the term, both with a warning; with it on both are errors.
/// A direction outside `[0, 3)` is always an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallFluxSettings {
    kind: WallShearStressType,
    direction: usize,
}

impl WallFluxSettings {
    /// Settings for a wall on the low side of `direction`.
    pub fn new(kind: WallShearStressType, direction: usize) -> Self {
        Self { kind, direction }
    }

    /// Resolve the `ABL` section for source term `term`.
    pub fn from_config(abl: &AblConfig, term: &str) -> Result<Self, ConfigError> {
        let kind = match abl.wall_shear_stress_type.parse::<WallShearStressType>() {
            Ok(kind) => kind,
            Err(err) if abl.strict_validation => {
                return Err(ConfigError::invalid(
                    "ABL.wall_shear_stress_type",
                    &abl.wall_shear_stress_type,
                    err.to_string(),
                ));
            }
            Err(_) => {
                log::warn!(
                    "{}: unknown wall_shear_stress_type '{}', using '{}'",
                    term,
                    abl.wall_shear_stress_type,
                    WallShearStressType::Default
                );
                WallShearStressType::Default
            }
        };

        let direction = usize::try_from(abl.normal_direction)
            .ok()
            .filter(|&d| d < SPACEDIM)
            .ok_or_else(|| {
                ConfigError::invalid(
                    "ABL.normal_direction",
                    abl.normal_direction,
                    "must be 0, 1 or 2",
                )
            })?;

        if direction != VERTICAL_DIRECTION {
            if abl.strict_validation {
                return Err(ConfigError::invalid(
                    "ABL.normal_direction",
                    direction,
                    "wall fluxes are only applied to walls normal to z",
                ));
            }
            log::warn!(
                "{}: normal_direction = {} is not supported, term will have no effect",
                term,
                direction
            );
        }

        Ok(Self::new(kind, direction))
    }

    /// Selected closure.
    pub fn kind(&self) -> WallShearStressType {
        self.kind
    }

    /// Wall-normal axis.
    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Whether the term does anything at all.
    pub fn is_active(&self) -> bool {
        self.direction == VERTICAL_DIRECTION
    }

    /// Cells adjacent to the wall in `bx`, or `None` if `bx` does not touch
    /// the low domain boundary along the wall-normal axis.
    pub fn wall_cells(&self, bx: &IndexBox, domain: &IndexBox) -> Option<IndexBox> {
        let dir = self.direction;
        if !self.is_active() || bx.small_end(dir) != domain.small_end(dir) {
            return None;
        }
        Some(bx.bdry_lo(dir))
    }
}

impl Default for WallFluxSettings {
    fn default() -> Self {
        Self::new(WallShearStressType::Default, VERTICAL_DIRECTION)
    }
}
