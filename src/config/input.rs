//! Input file sections consumed by the source terms.
//!
//! The input is a JSON document whose top-level objects mirror the input
//! namespaces of the solver:
//!
//! ```json
//! {
//!   "CoriolisForcing": { "rotational_time_period": 86400.0 },
//!   "GeostrophicForcing": {
//!     "geostrophic_wind": [10.0, 0.0, 0.0],
//!     "latitude": 45.0,
//!     "three_ComponentForcing": false
//!   },
//!   "ABL": { "wall_shear_stress_type": "moeng", "normal_direction": 2 },
//!   "incflo": { "gravity": [0.0, 0.0, -9.81] },
//!   "ICNS": { "source_terms": ["GeostrophicForcing", "WallMomentumFluxForcing"] }
//! }
//! ```
//!
//! Every section is optional at parse time. Mandatory keys are checked when
//! the source term that needs them is constructed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Root of the input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Planetary rotation parameters
    #[serde(rename = "CoriolisForcing", default)]
    pub coriolis: CoriolisForcingConfig,

    /// Geostrophic wind target
    #[serde(rename = "GeostrophicForcing", default)]
    pub geostrophic: GeostrophicForcingConfig,

    /// Surface layer and wall model
    #[serde(rename = "ABL", default)]
    pub abl: AblConfig,

    /// Global flow parameters
    #[serde(rename = "incflo", default)]
    pub incflo: IncfloConfig,

    /// Momentum equation source terms
    #[serde(rename = "ICNS", default)]
    pub icns: EquationConfig,

    /// Temperature equation source terms
    #[serde(rename = "Temperature", default)]
    pub temperature: EquationConfig,
}

impl InputConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `CoriolisForcing` namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoriolisForcingConfig {
    /// Time period for planetary rotation (s)
    #[serde(default = "default_rotational_time_period")]
    pub rotational_time_period: f64,
}

fn default_rotational_time_period() -> f64 {
    86400.0
}

impl Default for CoriolisForcingConfig {
    fn default() -> Self {
        Self {
            rotational_time_period: default_rotational_time_period(),
        }
    }
}

/// Switch for the vertical (three-component) Coriolis forcing.
///
/// Accepts either a boolean or a number in the input; any nonzero number
/// enables it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentToggle {
    /// `true` / `false`
    Flag(bool),
    /// `1` / `0`
    Value(f64),
}

impl ComponentToggle {
    /// Whether three-component forcing is on.
    pub fn is_enabled(&self) -> bool {
        match *self {
            ComponentToggle::Flag(on) => on,
            ComponentToggle::Value(v) => v != 0.0,
        }
    }

    /// Multiplier applied to the vertical Coriolis terms (1.0 or 0.0).
    pub fn factor(&self) -> f64 {
        if self.is_enabled() {
            1.0
        } else {
            0.0
        }
    }
}

impl Default for ComponentToggle {
    fn default() -> Self {
        ComponentToggle::Flag(false)
    }
}

/// `GeostrophicForcing` namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeostrophicForcingConfig {
    /// Geostrophic wind above the capping inversion (m/s), mandatory
    #[serde(default)]
    pub geostrophic_wind: Option<Vec<f64>>,

    /// Latitude in degrees, mandatory
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Enable the vertical Coriolis components
    #[serde(rename = "three_ComponentForcing", default)]
    pub three_component_forcing: ComponentToggle,
}

/// `ABL` namespace: wall model selection and surface-layer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AblConfig {
    /// Wall shear stress closure: constant, default, local, schumann, moeng
    #[serde(default = "default_wall_shear_stress_type")]
    pub wall_shear_stress_type: String,

    /// Axis normal to the wall
    #[serde(default = "default_normal_direction")]
    pub normal_direction: i32,

    /// Reject unknown closures and unsupported wall directions instead of
    /// warning and falling back
    #[serde(default)]
    pub strict_validation: bool,

    /// von Kármán constant
    #[serde(default = "default_kappa")]
    pub kappa: f64,

    /// Aerodynamic roughness length z0 (m)
    #[serde(default = "default_z0")]
    pub surface_roughness_z0: f64,

    /// Height of the similarity-theory reference point (m); defaults to
    /// the first cell center of level 0
    #[serde(default)]
    pub reference_height: Option<f64>,

    /// Prescribed surface kinematic heat flux (K m/s)
    #[serde(default)]
    pub surface_temp_flux: Option<f64>,

    /// Prescribed surface temperature (K)
    #[serde(default)]
    pub surface_temp: Option<f64>,

    /// Reference potential temperature (K)
    #[serde(default = "default_reference_temperature")]
    pub reference_temperature: f64,

    /// Stable-branch slope of phi_m
    #[serde(default = "default_gamma")]
    pub mo_gamma_m: f64,

    /// Unstable-branch coefficient of phi_m
    #[serde(default = "default_beta")]
    pub mo_beta_m: f64,

    /// Stable-branch slope of phi_h
    #[serde(default = "default_gamma")]
    pub mo_gamma_h: f64,

    /// Unstable-branch coefficient of phi_h
    #[serde(default = "default_beta")]
    pub mo_beta_h: f64,

    /// Scaling of phi_h in the stable and unstable branches
    #[serde(default = "default_alpha_h")]
    pub mo_alpha_h: f64,

    /// Iteration limit for the friction velocity update
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence tolerance on the friction velocity (m/s)
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_wall_shear_stress_type() -> String {
    "default".to_string()
}
fn default_normal_direction() -> i32 {
    2
}
fn default_kappa() -> f64 {
    0.41
}
fn default_z0() -> f64 {
    0.1
}
fn default_reference_temperature() -> f64 {
    300.0
}
fn default_gamma() -> f64 {
    5.0
}
fn default_beta() -> f64 {
    16.0
}
fn default_alpha_h() -> f64 {
    1.0
}
fn default_max_iterations() -> usize {
    25
}
fn default_tolerance() -> f64 {
    1.0e-5
}

impl Default for AblConfig {
    fn default() -> Self {
        Self {
            wall_shear_stress_type: default_wall_shear_stress_type(),
            normal_direction: default_normal_direction(),
            strict_validation: false,
            kappa: default_kappa(),
            surface_roughness_z0: default_z0(),
            reference_height: None,
            surface_temp_flux: None,
            surface_temp: None,
            reference_temperature: default_reference_temperature(),
            mo_gamma_m: default_gamma(),
            mo_beta_m: default_beta(),
            mo_gamma_h: default_gamma(),
            mo_beta_h: default_beta(),
            mo_alpha_h: default_alpha_h(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

/// `incflo` namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncfloConfig {
    /// Gravitational acceleration vector (m/s²)
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
}

fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, -9.81]
}

impl Default for IncfloConfig {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
        }
    }
}

/// Source term list of one transport equation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationConfig {
    /// Source term names, applied in order
    #[serde(default)]
    pub source_terms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_defaults() {
        let cfg = InputConfig::from_json_str("{}").unwrap();

        assert_eq!(cfg.coriolis.rotational_time_period, 86400.0);
        assert!(cfg.geostrophic.geostrophic_wind.is_none());
        assert!(cfg.geostrophic.latitude.is_none());
        assert!(!cfg.geostrophic.three_component_forcing.is_enabled());
        assert_eq!(cfg.abl.wall_shear_stress_type, "default");
        assert_eq!(cfg.abl.normal_direction, 2);
        assert!(!cfg.abl.strict_validation);
        assert_eq!(cfg.incflo.gravity, [0.0, 0.0, -9.81]);
        assert!(cfg.icns.source_terms.is_empty());
    }

    #[test]
    fn test_namespaced_keys() {
        let text = r#"{
            "CoriolisForcing": { "rotational_time_period": 43200.0 },
            "GeostrophicForcing": {
                "geostrophic_wind": [10.0, 0.0, 5.0],
                "latitude": 45.0,
                "three_ComponentForcing": 1
            },
            "ABL": { "wall_shear_stress_type": "schumann", "normal_direction": 2 },
            "ICNS": { "source_terms": ["GeostrophicForcing"] }
        }"#;
        let cfg = InputConfig::from_json_str(text).unwrap();

        assert_eq!(cfg.coriolis.rotational_time_period, 43200.0);
        assert_eq!(
            cfg.geostrophic.geostrophic_wind.as_deref(),
            Some(&[10.0, 0.0, 5.0][..])
        );
        assert_eq!(cfg.geostrophic.latitude, Some(45.0));
        assert!(cfg.geostrophic.three_component_forcing.is_enabled());
        assert_eq!(cfg.abl.wall_shear_stress_type, "schumann");
        assert_eq!(cfg.icns.source_terms, vec!["GeostrophicForcing".to_string()]);
    }

    #[test]
    fn test_toggle_variants() {
        assert_eq!(ComponentToggle::Flag(true).factor(), 1.0);
        assert_eq!(ComponentToggle::Flag(false).factor(), 0.0);
        assert_eq!(ComponentToggle::Value(0.0).factor(), 0.0);
        assert_eq!(ComponentToggle::Value(2.5).factor(), 1.0);

        let on: ComponentToggle = serde_json::from_str("true").unwrap();
        assert!(on.is_enabled());
        let off: ComponentToggle = serde_json::from_str("0").unwrap();
        assert!(!off.is_enabled());
    }

    #[test]
    fn test_malformed_json() {
        let err = InputConfig::from_json_str("{ \"ABL\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_preserves_keys() {
        let mut cfg = InputConfig::default();
        cfg.geostrophic.latitude = Some(60.0);
        let text = cfg.to_json_string().unwrap();
        assert!(text.contains("GeostrophicForcing"));
        assert!(text.contains("three_ComponentForcing"));
        let back = InputConfig::from_json_str(&text).unwrap();
        assert_eq!(back.geostrophic.latitude, Some(60.0));
    }

    #[test]
    fn test_missing_file() {
        let err = InputConfig::from_file("/nonexistent/abl_input.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
