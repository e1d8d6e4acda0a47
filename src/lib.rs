//! # abl-forcing
//!
//! Source terms for atmospheric boundary layer (ABL) simulations on
//! block-structured AMR meshes.
//!
//! This crate provides the forcing side of an incompressible ABL solver:
//! - Geostrophic (Coriolis-balanced) pressure gradient forcing
//! - Gravity
//! - Wall shear stress and surface heat flux from Monin–Obukhov similarity
//!   theory, with five interchangeable wall closures
//! - A dispatch contract evaluated per level, block and time state
//! - Minimal AMR mesh and field storage the source terms read from
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use abl_forcing::prelude::*;
//!
//! let geom = Geometry::new(IndexBox::from_dims([16, 16, 8]), [0.0; 3], [160.0, 160.0, 40.0]);
//! let mesh = Arc::new(AmrMesh::single_level(geom, 8));
//! let mut repo = FieldRepo::new(Arc::clone(&mesh));
//! let states = [FieldState::New, FieldState::Old];
//! let vel = repo.declare_field("velocity", 3, 1, &states).unwrap();
//! repo.declare_field("density", 1, 1, &states).unwrap();
//! vel.write().unwrap().fill_state(FieldState::New, &[8.0, 1.0, 0.0]).unwrap();
//!
//! let config = InputConfig::from_json_str(r#"{
//!     "GeostrophicForcing": { "geostrophic_wind": [10.0, 0.0, 0.0], "latitude": 45.0 },
//!     "ABL": { "wall_shear_stress_type": "moeng" },
//!     "ICNS": { "source_terms": ["GeostrophicForcing", "WallMomentumFluxForcing"] }
//! }"#).unwrap();
//!
//! let wall = AblWallFunction::new(&mesh, &config.abl, &config.incflo).unwrap();
//! wall.update(&repo, FieldState::New).unwrap();
//!
//! let ctx = SourceTermContext::new(&config, &repo).with_mo(wall.mo());
//! let sources = momentum_sources(&ctx).unwrap();
//!
//! let lev = LevelIndex::ZERO;
//! let mut bufs: Vec<CellArray> = mesh
//!     .boxes(lev)
//!     .unwrap()
//!     .iter()
//!     .map(|bx| CellArray::new(*bx, 3))
//!     .collect();
//! sources.apply_level(&mesh, lev, FieldState::New, &mut bufs).unwrap();
//! ```

pub mod abl;
pub mod config;
pub mod error;
pub mod field;
pub mod mesh;
pub mod parallel;
pub mod similarity;
pub mod source;
pub mod types;
pub mod wall_shear;

pub use abl::AblWallFunction;
pub use config::{ConfigError, InputConfig};
pub use error::ForcingError;
pub use field::{CellArray, FieldRepo, FieldState};
pub use mesh::{AmrMesh, Geometry};
pub use similarity::{MoData, SharedMoData};
pub use source::{SourceTerm, SourceTermSet};
pub use types::{BlockIndex, IndexBox, LevelIndex, Vector3};
pub use wall_shear::{WallShearModel, WallShearStressType};

/// Commonly used items.
pub mod prelude {
    pub use crate::abl::AblWallFunction;
    pub use crate::config::{ConfigError, InputConfig};
    pub use crate::error::ForcingError;
    pub use crate::field::{dof_state, phi_state, CellArray, FieldRepo, FieldState};
    pub use crate::mesh::{AmrMesh, Geometry};
    pub use crate::similarity::{MoData, SharedMoData};
    pub use crate::source::{
        momentum_sources, temperature_sources, GeostrophicForcing, GravityForcing,
        SourceTerm, SourceTermContext, SourceTermSet, WallMomentumFluxForcing,
        WallTemperatureFluxForcing,
    };
    pub use crate::types::{BlockIndex, IndexBox, LevelIndex, Vector3};
    pub use crate::wall_shear::{ShearStress, WallShearModel, WallShearStressType};
}
