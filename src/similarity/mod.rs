//! Surface-layer similarity theory.
//!
//! - [`MoData`]: Monin–Obukhov state and stability functions
//! - [`SharedMoData`]: handle injected into the wall source terms

mod mo_data;
mod shared;

pub use mo_data::{MoData, SurfaceAlgorithm, L_NEUTRAL, UTAU_MIN};
pub use shared::SharedMoData;
