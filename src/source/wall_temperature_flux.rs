//! Surface heat flux applied as a temperature source in the wall-adjacent
//! cells.
//!
//! S_θ += q·Δx·Δy / V, with q the kinematic heat flux from the wall model.

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

/// Temperature source from the surface heat flux.
#[derive(Clone, Debug)]
pub struct WallTemperatureFluxForcing {
    mesh: Arc<AmrMesh>,
    velocity: FieldHandle,
    temperature: FieldHandle,
    density: FieldHandle,
    mo: SharedMoData,
    settings: WallFluxSettings,
}

impl WallTemperatureFluxForcing {
    pub const NAME: &'static str = "WallTemperatureFluxForcing";

    /// Build on the `velocity`, `temperature` and `density` fields of `repo`.
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
        let temperature = repo.get_field("temperature")?;
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
            temperature,
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

impl SourceTerm for WallTemperatureFluxForcing {
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
        let temperature = self.temperature.read()?;
        let theta = temperature.array(dof_state(fstate), lev, block)?;
        let density = self.density.read()?;
        density.array(phi_state(fstate), lev, block)?;

        let Some(wall) = self.settings.wall_cells(bx, geom.domain()) else {
            return Ok(());
        };
        check_components(Self::NAME, src, 1)?;

        let model = WallShearModel::new(self.settings.kind(), &self.mo.snapshot());
        let area = dx * dy / dv;
        let region = wall.intersect(vel.index_box()).intersect(theta.index_box());

        parallel_for(&region, src, |i, j, k, cell| {
            let u = vel.get(i, j, k, 0);
            let v = vel.get(i, j, k, 1);
            let wspd = (u * u + v * v).sqrt();

            cell[0] += model.calc_theta(wspd, theta.get(i, j, k, 0)) * area;
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Geometry;
    use crate::similarity::MoData;
    use crate::wall_shear::WallShearStressType;

    const TOL: f64 = 1e-12;

    fn make_repo() -> FieldRepo {
        let geom = Geometry::new(IndexBox::from_dims([4, 4, 8]), [0.0; 3], [20.0, 20.0, 20.0]);
        let mut repo = FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 4)));
        let states = [FieldState::New, FieldState::Old];
        let vel = repo.declare_field("velocity", 3, 1, &states).unwrap();
        let temp = repo.declare_field("temperature", 1, 1, &states).unwrap();
        repo.declare_field("density", 1, 1, &states).unwrap();
        for s in states {
            vel.write().unwrap().fill_state(s, &[6.0, 8.0, 0.0]).unwrap();
            temp.write().unwrap().fill_state(s, &[299.0]).unwrap();
        }
        repo
    }

    fn make_mo() -> SharedMoData {
        SharedMoData::new(MoData {
            utau: 0.4,
            vmag_mean: 10.0,
            surf_temp_flux: 0.02,
            ..MoData::default()
        })
    }

    #[test]
    fn test_missing_temperature() {
        let geom = Geometry::new(IndexBox::from_dims([4, 4, 4]), [0.0; 3], [4.0; 3]);
        let mut repo = FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 4)));
        repo.declare_field("velocity", 3, 0, &[FieldState::New]).unwrap();
        repo.declare_field("density", 1, 0, &[FieldState::New]).unwrap();

        assert!(matches!(
            WallTemperatureFluxForcing::new(&repo, make_mo(), &AblConfig::default()),
            Err(ForcingError::FieldNotFound(ref name)) if name == "temperature"
        ));
    }

    #[test]
    fn test_heat_flux_in_bottom_block_only() {
        let repo = make_repo();
        let settings = WallFluxSettings::new(WallShearStressType::Constant, 2);
        let term = WallTemperatureFluxForcing::with_settings(&repo, make_mo(), settings).unwrap();
        let boxes = repo.mesh().boxes(LevelIndex::ZERO).unwrap().to_vec();
        assert_eq!(boxes.len(), 2);

        for (b, bx) in boxes.iter().enumerate() {
            let mut src = CellArray::new(*bx, 1);
            term.evaluate(LevelIndex::ZERO, BlockIndex::new(b), bx, FieldState::Old, &mut src)
                .unwrap();

            for (i, j, k) in bx.iter() {
                // dx = dy = 5, dz = 2.5: q / dz
                let expected = if k == 0 { 0.02 / 2.5 } else { 0.0 };
                assert!((src.get(i, j, k, 0) - expected).abs() < TOL, "block {b}");
            }
        }
    }

    #[test]
    fn test_default_closure_scales_with_speed() {
        let repo = make_repo();
        let term = WallTemperatureFluxForcing::new(&repo, make_mo(), &AblConfig::default()).unwrap();
        let bx = repo.mesh().block_box(LevelIndex::ZERO, BlockIndex::ZERO).unwrap();
        let mut src = CellArray::new(bx, 1);
        term.evaluate(LevelIndex::ZERO, BlockIndex::ZERO, &bx, FieldState::New, &mut src)
            .unwrap();

        // Local speed equals the mean speed
        assert!((src.get(2, 2, 0, 0) - 0.02 / 2.5).abs() < TOL);
    }

    #[test]
    fn test_settings_resolved_at_construction() {
        let repo = make_repo();
        let settings = WallFluxSettings::new(WallShearStressType::Moeng, 2);
        let term = WallTemperatureFluxForcing::with_settings(&repo, make_mo(), settings).unwrap();
        assert_eq!(*term.settings(), settings);
        assert_eq!(term.name(), WallTemperatureFluxForcing::NAME);

        let abl = AblConfig {
            wall_shear_stress_type: "Schumann".to_string(),
            ..AblConfig::default()
        };
        let term = WallTemperatureFluxForcing::new(&repo, make_mo(), &abl).unwrap();
        assert_eq!(term.settings().kind(), WallShearStressType::Schumann);
        assert!(term.settings().is_active());
    }
}
