//! Multi-state field storage.
//!
//! - [`FieldState`] with the [`dof_state`] / [`phi_state`] mapping rules
//! - [`CellArray`]: dense cell-centered array over one block
//! - [`Field`]: every state × level × block of one named quantity
//! - [`FieldHandle`]: shared, lockable field reference held by source terms
//! - [`FieldRepo`]: named field registry

mod cell_array;
#[allow(clippy::module_inception)]
mod field;
mod repo;
mod state;

pub use cell_array::CellArray;
pub use field::{Field, FieldHandle, FieldLevels};
pub use repo::FieldRepo;
pub use state::{dof_state, phi_state, FieldState};
