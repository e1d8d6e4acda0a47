//! Wall shear stress applied as a momentum sink in the wall-adjacent cells.
//!
//! For every cell next to the bottom wall the local horizontal velocity
//! (u, v) and speed S = √(u² + v²) are turned into wall stresses by the
//! selected closure, and the stresses times the face area per unit volume
//! are removed from the horizontal momentum:
//!
//! - S_x −= τ_xz·Δx·Δy / V
//! - S_y −= τ_yz·Δy·Δy / V
//!
//! The y-component uses Δy·Δy as area factor; on grids with Δx = Δy this is
//! the face area.

use std::sync::Arc;

use super::traits::check_components;
use super::wall_flux::WallFluxSettings;
use super::SourceTerm;
use crate::config::AblConfig;
use crate::error::ForcingError;
use crate::field::{dof_state, phi_state, CellArray, FieldHandle, FieldRepo, FieldState};
use crate::mesh::AmrMesh;
use crate::parallel::parallel_for;
use crate::similarity::SharedMoData;
use crate::types::{BlockIndex, IndexBox, LevelIndex};
use crate::wall_shear::{ShearStress, WallShearModel};

/// Momentum sink from the wall shear stress.
#[derive(Clone, Debug)]
pub struct WallMomentumFluxForcing {
    mesh: Arc<AmrMesh>,
    velocity: FieldHandle,
    density: FieldHandle,
    mo: SharedMoData,
    settings: WallFluxSettings,
}

impl WallMomentumFluxForcing {
    pub const NAME: &'static str = "WallMomentumFluxForcing";

    /// Build on the `velocity` and `density` fields of `repo`.
    pub fn new(repo: &FieldRepo, mo: SharedMoData, abl: &AblConfig) -> Result<Self, ForcingError> {
        let settings = WallFluxSettings::from_config(abl, Self::NAME)?;
        Self::with_settings(repo, mo, settings)
    }

    /// Build with already resolved wall settings.
    pub fn with_settings(
        repo: &FieldRepo,
        mo: SharedMoData,
        settings: WallFluxSettings,
    ) -> Result<Self, ForcingError> {
        let velocity = repo.get_field("velocity")?;
        let density = repo.get_field("density")?;

        let ncomp = velocity.read()?.ncomp();
        if ncomp < 2 {
            return Err(ForcingError::component_mismatch("velocity", 2, ncomp));
        }

        log::info!(
            "{}: wall_shear_stress_type = {}, normal_direction = {}",
            Self::NAME,
            settings.kind(),
            settings.direction()
        );

        Ok(Self {
            mesh: Arc::clone(repo.mesh()),
            velocity,
            density,
            mo,
            settings,
        })
    }

    /// Resolved closure and wall direction.
    pub fn settings(&self) -> &WallFluxSettings {
        &self.settings
    }
}

impl SourceTerm for WallMomentumFluxForcing {
    fn evaluate(
        &self,
        lev: LevelIndex,
        block: BlockIndex,
        bx: &IndexBox,
        fstate: FieldState,
        src: &mut CellArray,
    ) -> Result<(), ForcingError> {
        let geom = self.mesh.geom(lev)?;
        let [dx, dy, _] = geom.cell_size();
        let dv = geom.cell_volume();

        let velocity = self.velocity.read()?;
        let vel = velocity.array(dof_state(fstate), lev, block)?;
        // Density is not used by the stress closures yet.
        let density = self.density.read()?;
        density.array(phi_state(fstate), lev, block)?;

        let Some(wall) = self.settings.wall_cells(bx, geom.domain()) else {
            return Ok(());
        };
        check_components(Self::NAME, src, 3)?;

        let tau = WallShearModel::new(self.settings.kind(), &self.mo.snapshot());
        let area_x = dx * dy / dv;
        let area_y = dy * dy / dv;

        parallel_for(&wall.intersect(vel.index_box()), src, |i, j, k, cell| {
            let u = vel.get(i, j, k, 0);
            let v = vel.get(i, j, k, 1);
            let wspd = (u * u + v * v).sqrt();

            cell[0] -= tau.calc_vel_x(u, wspd) * area_x;
            cell[1] -= tau.calc_vel_y(v, wspd) * area_y;
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
