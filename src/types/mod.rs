//! Strongly-typed domain types for safer APIs.
//!
//! - [`LevelIndex`], [`BlockIndex`]: index newtypes that cannot be mixed up
//! - [`IndexBox`]: inclusive cell-index ranges on three axes
//! - [`Vector3`]: velocity and forcing vectors in channel order
//!
//! # Example
//!
//! ```
//! use abl_forcing::types::{BlockIndex, IndexBox, LevelIndex, Vector3};
//!
//! let lev = LevelIndex::new(0);
//! let block = BlockIndex::new(3);
//! let bx = IndexBox::from_dims([16, 16, 8]);
//! let wind = Vector3::new(10.0, 0.0, 0.0);
//!
//! assert_eq!(bx.num_cells(), 2048);
//! assert_eq!(format!("{lev}/{block}"), "L0/B3");
//! assert_eq!(wind.magnitude(), 10.0);
//! ```

mod index_box;
mod indices;
mod vector;

pub use index_box::{IndexBox, SPACEDIM};
pub use indices::{BlockIndex, LevelIndex};
pub use vector::Vector3;
