//! ABL wall function: keeps the surface-layer state in step with the flow.
//!
//! Before the source terms of a time step are evaluated, the wall function
//! averages the horizontal velocity and the temperature over the first cell
//! layer above the bottom wall of level 0 and re-iterates the
//! Monin–Obukhov relations on these means. The result is published through
//! a [`SharedMoData`] handle that the wall source terms read.

use crate::config::{AblConfig, ConfigError, IncfloConfig};
use crate::error::ForcingError;
use crate::field::{dof_state, FieldRepo, FieldState};
use crate::mesh::AmrMesh;
use crate::similarity::{MoData, SharedMoData, SurfaceAlgorithm};
use crate::source::VERTICAL_DIRECTION;
use crate::types::{BlockIndex, LevelIndex, Vector3};

/// Plane averages over the wall-adjacent cell layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallLayerMeans {
    /// Mean velocity
    pub velocity: Vector3,
    /// Mean of the local horizontal speed
    pub hvelmag: f64,
    /// Mean temperature, if a temperature field exists
    pub theta: Option<f64>,
    /// Number of cells averaged
    pub num_cells: usize,
}

/// Owner of the surface-layer state.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use abl_forcing::abl::AblWallFunction;
/// use abl_forcing::config::InputConfig;
/// use abl_forcing::field::{FieldRepo, FieldState};
/// use abl_forcing::mesh::{AmrMesh, Geometry};
/// use abl_forcing::types::IndexBox;
///
/// let geom = Geometry::new(IndexBox::from_dims([8, 8, 8]), [0.0; 3], [80.0, 80.0, 20.0]);
/// let mut repo = FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 8)));
/// let vel = repo.declare_field("velocity", 3, 1, &[FieldState::New]).unwrap();
/// vel.write().unwrap().fill_state(FieldState::New, &[6.0, 0.0, 0.0]).unwrap();
///
/// let cfg = InputConfig::default();
/// let wf = AblWallFunction::new(repo.mesh(), &cfg.abl, &cfg.incflo).unwrap();
/// assert!(wf.update(&repo, FieldState::New).unwrap());
///
/// let mo = wf.mo().snapshot();
/// assert_eq!(mo.vmag_mean, 6.0);
/// assert!(mo.utau > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct AblWallFunction {
    mo: SharedMoData,
    max_iterations: usize,
}

impl AblWallFunction {
    /// Set up the surface layer from the `ABL` and `incflo` sections.
    ///
    /// The reference height defaults to the first cell center of level 0.
    /// At most one of `surface_temp_flux` and `surface_temp` may be given;
    /// with neither, the surface heat flux is zero.
    pub fn new(mesh: &AmrMesh, abl: &AblConfig, incflo: &IncfloConfig) -> Result<Self, ForcingError> {
        let dz = mesh.geom(LevelIndex::ZERO)?.cell_size()[VERTICAL_DIRECTION];
        let zref = abl.reference_height.unwrap_or(0.5 * dz);

        if !(abl.kappa > 0.0) {
            return Err(ConfigError::invalid("ABL.kappa", abl.kappa, "must be positive").into());
        }
        if !(abl.surface_roughness_z0 > 0.0) {
            return Err(ConfigError::invalid(
                "ABL.surface_roughness_z0",
                abl.surface_roughness_z0,
                "must be positive",
            )
            .into());
        }
        if !(zref > abl.surface_roughness_z0) {
            return Err(ConfigError::invalid(
                "ABL.reference_height",
                zref,
                "must exceed the roughness length",
            )
            .into());
        }
        if abl.max_iterations == 0 {
            return Err(ConfigError::invalid("ABL.max_iterations", 0, "must be positive").into());
        }
        if !(abl.tolerance > 0.0 && abl.tolerance.is_finite()) {
            return Err(ConfigError::invalid(
                "ABL.tolerance",
                abl.tolerance,
                "must be positive and finite",
            )
            .into());
        }

        let (alg_type, surf_temp, surf_temp_flux) = match (abl.surface_temp_flux, abl.surface_temp) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::invalid(
                    "ABL.surface_temp",
                    "both surface_temp and surface_temp_flux",
                    "specify only one",
                )
                .into());
            }
            (None, Some(temp)) => (SurfaceAlgorithm::SurfaceTemperature, temp, 0.0),
            (flux, None) => (
                SurfaceAlgorithm::HeatFlux,
                abl.reference_temperature,
                flux.unwrap_or(0.0),
            ),
        };

        let mo = MoData {
            zref,
            z0: abl.surface_roughness_z0,
            kappa: abl.kappa,
            gravity: Vector3::from_array(incflo.gravity).magnitude(),
            theta_mean: abl.reference_temperature,
            surf_temp,
            surf_temp_flux,
            gamma_m: abl.mo_gamma_m,
            beta_m: abl.mo_beta_m,
            gamma_h: abl.mo_gamma_h,
            beta_h: abl.mo_beta_h,
            alpha_h: abl.mo_alpha_h,
            tolerance: abl.tolerance,
            alg_type,
            ..MoData::default()
        };

        log::info!(
            "ABL wall function: zref = {:.4} m, z0 = {:.4} m, {:?}",
            zref,
            mo.z0,
            alg_type
        );

        Ok(Self {
            mo: SharedMoData::new(mo),
            max_iterations: abl.max_iterations,
        })
    }

    /// Handle to the surface-layer state, for the wall source terms.
    pub fn mo(&self) -> &SharedMoData {
        &self.mo
    }

    /// Iteration limit of the flux update.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Average velocity and temperature over the first cell layer of
    /// level 0 at time state `dof_state(fstate)`.
    pub fn wall_layer_means(
        repo: &FieldRepo,
        fstate: FieldState,
    ) -> Result<WallLayerMeans, ForcingError> {
        let lev = LevelIndex::ZERO;
        let mesh = repo.mesh();
        let domain = *mesh.geom(lev)?.domain();
        let wall = domain.bdry_lo(VERTICAL_DIRECTION);
        let state = dof_state(fstate);

        let velocity = repo.get_field("velocity")?;
        let velocity = velocity.read()?;
        let temperature = if repo.field_exists("temperature") {
            Some(repo.get_field("temperature")?)
        } else {
            None
        };
        let temperature = match &temperature {
            Some(handle) => Some(handle.read()?),
            None => None,
        };

        let mut sum_vel = Vector3::zero();
        let mut sum_speed = 0.0;
        let mut sum_theta = 0.0;
        let mut num_cells = 0usize;

        for (b, bx) in mesh.boxes(lev)?.iter().enumerate() {
            let region = bx.intersect(&wall);
            if region.is_empty() {
                continue;
            }
            let block = BlockIndex::new(b);
            let vel = velocity.array(state, lev, block)?;
            let theta = match &temperature {
                Some(t) => Some(t.array(state, lev, block)?),
                None => None,
            };

            for (i, j, k) in region.iter() {
                let cell = vel.cell(i, j, k);
                let v = Vector3::new(cell[0], cell[1], cell.get(2).copied().unwrap_or(0.0));
                sum_vel = sum_vel + v;
                sum_speed += v.horizontal_magnitude();
                if let Some(t) = theta {
                    sum_theta += t.get(i, j, k, 0);
                }
            }
            num_cells += region.num_cells();
        }

        if num_cells == 0 {
            return Ok(WallLayerMeans {
                velocity: Vector3::zero(),
                hvelmag: 0.0,
                theta: None,
                num_cells,
            });
        }

        let n = num_cells as f64;
        Ok(WallLayerMeans {
            velocity: sum_vel * (1.0 / n),
            hvelmag: sum_speed / n,
            theta: temperature.as_ref().map(|_| sum_theta / n),
            num_cells,
        })
    }

    /// Refresh the surface-layer state from the current flow.
    ///
    /// Returns whether the friction velocity converged; non-convergence is
    /// logged but not an error.
    pub fn update(&self, repo: &FieldRepo, fstate: FieldState) -> Result<bool, ForcingError> {
        let means = Self::wall_layer_means(repo, fstate)?;
        if means.num_cells == 0 {
            log::warn!("ABL wall function: no level-0 cells at the bottom wall, state unchanged");
            return Ok(false);
        }

        let max_iterations = self.max_iterations;
        let converged = self.mo.update(|mo| {
            mo.vel_mean = means.velocity;
            mo.vmag_mean = means.hvelmag;
            if let Some(theta) = means.theta {
                mo.theta_mean = theta;
            }
            mo.update_fluxes(max_iterations)
        });
        Ok(converged)
    }
}
