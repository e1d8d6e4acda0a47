//! Source terms for the momentum and temperature equations.
//!
//! Source terms represent forces that are not part of the transport
//! operator:
//! - Geostrophic pressure gradient (Coriolis balance on a target wind)
//! - Gravity
//! - Wall shear stress in the wall-adjacent cells
//! - Surface heat flux in the wall-adjacent cells
//!
//! # Submodules
//!
//! - [`traits`]: Dispatch contract ([`SourceTerm`]) and [`SourceTermSet`]
//! - [`registry`]: Construction by input name

pub mod registry;
pub mod traits;

mod geostrophic;
mod gravity;
mod wall_flux;
mod wall_momentum_flux;
mod wall_temperature_flux;

pub use traits::{SourceTerm, SourceTermSet};

pub use geostrophic::GeostrophicForcing;
pub use gravity::GravityForcing;
pub use registry::{
    make_momentum_source, make_temperature_source, momentum_sources, temperature_sources,
    SourceTermContext,
};
pub use wall_flux::{WallFluxSettings, VERTICAL_DIRECTION};
pub use wall_momentum_flux::WallMomentumFluxForcing;
pub use wall_temperature_flux::WallTemperatureFluxForcing;
