//! Geostrophic forcing for the momentum equation.
//!
//! Drives the flow with the pressure gradient that balances the Coriolis
//! force on a prescribed geostrophic wind U_g:
//!
//! F = −2Ω × U_g
//!
//! With f = 2Ω = 2·(2π/T), latitude φ and the toggle c ∈ {0, 1} for the
//! vertical Coriolis components:
//!
//! - F_x = −f·U_g,y·sinφ + c·f·U_g,z·cosφ
//! - F_y = f·U_g,x·sinφ
//! - F_z = −c·f·U_g,x·cosφ
//!
//! The forcing is uniform, so it is computed once at construction and added
//! to every cell.

use std::f64::consts::PI;

use super::traits::check_components;
use super::SourceTerm;
use crate::config::{ConfigError, CoriolisForcingConfig, GeostrophicForcingConfig, InputConfig};
use crate::error::ForcingError;
use crate::field::{CellArray, FieldState};
use crate::parallel::parallel_for;
use crate::types::{BlockIndex, IndexBox, LevelIndex, Vector3};

/// Uniform geostrophic pressure-gradient forcing.
///
/// # Example
///
/// ```
/// use abl_forcing::config::InputConfig;
/// use abl_forcing::source::GeostrophicForcing;
///
/// let cfg = InputConfig::from_json_str(r#"{
///     "GeostrophicForcing": { "geostrophic_wind": [10.0, 0.0, 0.0], "latitude": 90.0 }
/// }"#).unwrap();
/// let forcing = GeostrophicForcing::from_config(&cfg).unwrap();
///
/// // f·U_x at the pole, one rotation per day
/// let f = 4.0 * std::f64::consts::PI / 86400.0;
/// assert!((forcing.forcing().y - f * 10.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeostrophicForcing {
    coriolis_factor: f64,
    forcing: Vector3,
}

impl GeostrophicForcing {
    pub const NAME: &'static str = "GeostrophicForcing";

    /// Build from the rotation period (s), latitude (degrees) and
    /// geostrophic wind (m/s).
    pub fn new(
        rotational_time_period: f64,
        latitude: f64,
        wind: Vector3,
        three_component: bool,
    ) -> Result<Self, ConfigError> {
        if !(rotational_time_period > 0.0 && rotational_time_period.is_finite()) {
            return Err(ConfigError::invalid(
                "CoriolisForcing.rotational_time_period",
                rotational_time_period,
                "must be positive",
            ));
        }
        if !latitude.is_finite() {
            return Err(ConfigError::invalid(
                "GeostrophicForcing.latitude",
                latitude,
                "must be finite",
            ));
        }
        if !wind.is_finite() {
            return Err(ConfigError::invalid(
                "GeostrophicForcing.geostrophic_wind",
                wind,
                "must be finite",
            ));
        }

        let coriolis_factor = 2.0 * 2.0 * PI / rotational_time_period;
        let (sinphi, cosphi) = latitude.to_radians().sin_cos();
        let toggle = if three_component { 1.0 } else { 0.0 };

        let forcing = Vector3::new(
            -coriolis_factor * wind.y * sinphi + toggle * coriolis_factor * wind.z * cosphi,
            coriolis_factor * wind.x * sinphi,
            -toggle * coriolis_factor * wind.x * cosphi,
        );

        Ok(Self {
            coriolis_factor,
            forcing,
        })
    }

    /// Build from the `CoriolisForcing` and `GeostrophicForcing` sections.
    ///
    /// `geostrophic_wind` needs at least two components; a missing third
    /// component is zero.
    pub fn from_sections(
        coriolis: &CoriolisForcingConfig,
        geostrophic: &GeostrophicForcingConfig,
    ) -> Result<Self, ConfigError> {
        let wind = geostrophic
            .geostrophic_wind
            .as_deref()
            .ok_or_else(|| ConfigError::missing("GeostrophicForcing.geostrophic_wind"))?;
        if wind.len() < 2 {
            return Err(ConfigError::invalid(
                "GeostrophicForcing.geostrophic_wind",
                format!("{wind:?}"),
                "needs at least 2 components",
            ));
        }
        let wind = Vector3::new(wind[0], wind[1], wind.get(2).copied().unwrap_or(0.0));

        let latitude = geostrophic
            .latitude
            .ok_or_else(|| ConfigError::missing("GeostrophicForcing.latitude"))?;

        let forcing = Self::new(
            coriolis.rotational_time_period,
            latitude,
            wind,
            geostrophic.three_component_forcing.is_enabled(),
        )?;

        log::info!(
            "{}: coriolis factor = {:.6e} 1/s, forcing = {}",
            Self::NAME,
            forcing.coriolis_factor,
            forcing.forcing
        );
        Ok(forcing)
    }

    /// Build from the full input configuration.
    pub fn from_config(input: &InputConfig) -> Result<Self, ConfigError> {
        Self::from_sections(&input.coriolis, &input.geostrophic)
    }

    /// f = 2·(2π/T) (1/s).
    pub fn coriolis_factor(&self) -> f64 {
        self.coriolis_factor
    }

    /// Acceleration added to every cell (m/s²).
    pub fn forcing(&self) -> Vector3 {
        self.forcing
    }
}

impl SourceTerm for GeostrophicForcing {
    fn evaluate(
        &self,
        _lev: LevelIndex,
        _block: BlockIndex,
        bx: &IndexBox,
        _fstate: FieldState,
        src: &mut CellArray,
    ) -> Result<(), ForcingError> {
        check_components(Self::NAME, src, 3)?;

        let forcing = self.forcing;
        parallel_for(bx, src, move |_, _, _, cell| {
            cell[0] += forcing.x;
            cell[1] += forcing.y;
            cell[2] += forcing.z;
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
