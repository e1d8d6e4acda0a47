//! Block-structured AMR mesh description.
//!
//! - [`Geometry`]: index domain and cell size of one level
//! - [`AmrMesh`]: level hierarchy with one box array per level
//!
//! The source terms only read from the mesh; box decomposition and
//! regridding belong to the driver.

mod amr_mesh;
mod geometry;

pub use amr_mesh::{AmrLevel, AmrMesh};
pub use geometry::Geometry;
