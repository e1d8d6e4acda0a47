//! Wall shear stress closures.
//!
//! The closure is chosen by name in the input (`ABL.wall_shear_stress_type`)
//! and resolved once into a [`WallShearStressType`]. At every evaluation the
//! wall source terms build a [`WallShearModel`] from a snapshot of the
//! surface-layer state and capture it by value in their cell loops.
//!
//! # Example
//!
//! ```
//! use abl_forcing::similarity::MoData;
//! use abl_forcing::wall_shear::{ShearStress, WallShearModel, WallShearStressType};
//!
//! let kind: WallShearStressType = "Moeng".parse().unwrap();
//! let mo = MoData { utau: 0.3, vmag_mean: 6.0, ..MoData::default() };
//! let model = WallShearModel::new(kind, &mo);
//!
//! let tau_xz = model.calc_vel_x(6.0, 6.0);
//! assert!(tau_xz.is_finite());
//! ```

mod models;

use std::fmt;
use std::str::FromStr;

use crate::similarity::MoData;

pub use models::{
    ShearStress, ShearStressConstant, ShearStressDefault, ShearStressLocal, ShearStressMoeng,
    ShearStressSchumann, LOCAL_MAX_ITERS, SPEED_FLOOR,
};

/// Wall shear stress closure selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WallShearStressType {
    /// Fixed friction velocity
    Constant,
    /// Mean log-law drag scaled by the local speed
    #[default]
    Default,
    /// Similarity theory applied to the local wind
    Local,
    /// Schumann (1975)
    Schumann,
    /// Moeng (1984)
    Moeng,
}

impl WallShearStressType {
    /// All closures, in input-name order.
    pub const ALL: [WallShearStressType; 5] = [
        WallShearStressType::Constant,
        WallShearStressType::Default,
        WallShearStressType::Local,
        WallShearStressType::Schumann,
        WallShearStressType::Moeng,
    ];

    /// Input name.
    pub fn as_str(&self) -> &'static str {
        match self {
            WallShearStressType::Constant => "constant",
            WallShearStressType::Default => "default",
            WallShearStressType::Local => "local",
            WallShearStressType::Schumann => "schumann",
            WallShearStressType::Moeng => "moeng",
        }
    }
}

impl fmt::Display for WallShearStressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized closure name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWallShearStressType(pub String);

impl fmt::Display for UnknownWallShearStressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown wall shear stress type '{}' (expected one of: constant, default, local, schumann, moeng)",
            self.0
        )
    }
}

impl std::error::Error for UnknownWallShearStressType {}

impl FromStr for WallShearStressType {
    type Err = UnknownWallShearStressType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| UnknownWallShearStressType(s.to_string()))
    }
}

/// A closure bound to one snapshot of the surface-layer state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WallShearModel {
    Constant(ShearStressConstant),
    Default(ShearStressDefault),
    Local(ShearStressLocal),
    Schumann(ShearStressSchumann),
    Moeng(ShearStressMoeng),
}

impl WallShearModel {
    /// Bind closure `kind` to the state `mo`.
    pub fn new(kind: WallShearStressType, mo: &MoData) -> Self {
        match kind {
            WallShearStressType::Constant => Self::Constant(ShearStressConstant::new(mo)),
            WallShearStressType::Default => Self::Default(ShearStressDefault::new(mo)),
            WallShearStressType::Local => Self::Local(ShearStressLocal::new(mo)),
            WallShearStressType::Schumann => Self::Schumann(ShearStressSchumann::new(mo)),
            WallShearStressType::Moeng => Self::Moeng(ShearStressMoeng::new(mo)),
        }
    }

    /// Closure kind.
    pub fn kind(&self) -> WallShearStressType {
        match self {
            Self::Constant(_) => WallShearStressType::Constant,
            Self::Default(_) => WallShearStressType::Default,
            Self::Local(_) => WallShearStressType::Local,
            Self::Schumann(_) => WallShearStressType::Schumann,
            Self::Moeng(_) => WallShearStressType::Moeng,
        }
    }
}

impl ShearStress for WallShearModel {
    #[inline]
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64 {
        match self {
            Self::Constant(m) => m.calc_vel_x(u, wspd),
            Self::Default(m) => m.calc_vel_x(u, wspd),
            Self::Local(m) => m.calc_vel_x(u, wspd),
            Self::Schumann(m) => m.calc_vel_x(u, wspd),
            Self::Moeng(m) => m.calc_vel_x(u, wspd),
        }
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64 {
        match self {
            Self::Constant(m) => m.calc_vel_y(v, wspd),
            Self::Default(m) => m.calc_vel_y(v, wspd),
            Self::Local(m) => m.calc_vel_y(v, wspd),
            Self::Schumann(m) => m.calc_vel_y(v, wspd),
            Self::Moeng(m) => m.calc_vel_y(v, wspd),
        }
    }

    #[inline]
    fn calc_theta(&self, wspd: f64, theta: f64) -> f64 {
        match self {
            Self::Constant(m) => m.calc_theta(wspd, theta),
            Self::Default(m) => m.calc_theta(wspd, theta),
            Self::Local(m) => m.calc_theta(wspd, theta),
            Self::Schumann(m) => m.calc_theta(wspd, theta),
            Self::Moeng(m) => m.calc_theta(wspd, theta),
        }
    }
}
