//! Input configuration.
//!
//! - [`InputConfig`]: root of the JSON input, one field per namespace
//! - [`ConfigError`]: errors raised while reading or validating it
//!
//! Source terms take the sections they need as explicit arguments; no
//! source term reads global state.

mod error;
mod input;

pub use error::ConfigError;
pub use input::{
    AblConfig, ComponentToggle, CoriolisForcingConfig, EquationConfig, GeostrophicForcingConfig,
    IncfloConfig, InputConfig,
};
