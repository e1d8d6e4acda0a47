//! Wall shear stress and heat flux parameterizations.
//!
//! Each model maps the local near-wall wind `(u, v)`, its horizontal speed
//! `S` and (for the heat flux) the local temperature `θ` to a kinematic
//! wall flux, given a snapshot of the Monin–Obukhov state. Notation:
//! u* friction velocity, S̄ mean speed, (ū, v̄) mean velocity, θ̄ mean
//! temperature, θ_s surface temperature, q̄ mean surface heat flux.

use crate::similarity::MoData;

/// Floor applied to speeds before dividing by them (m/s).
pub const SPEED_FLOOR: f64 = 1.0e-6;

/// Iteration limit when re-deriving the surface layer for a local sample.
pub const LOCAL_MAX_ITERS: usize = 10;

/// Common interface of the wall models.
///
/// Implementations are small `Copy` values so they can be captured by
/// value in data-parallel cell loops.
pub trait ShearStress: Copy + Send + Sync {
    /// Wall shear stress τ_xz from the local x-velocity and speed.
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64;

    /// Wall shear stress τ_yz from the local y-velocity and speed.
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64;

    /// Wall heat flux q from the local speed and temperature.
    fn calc_theta(&self, wspd: f64, theta: f64) -> f64;
}

/// τ = u*² · u/S: fixed friction velocity, direction of the local wind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearStressConstant {
    utau2: f64,
    surf_temp_flux: f64,
}

impl ShearStressConstant {
    pub fn new(mo: &MoData) -> Self {
        Self {
            utau2: mo.utau * mo.utau,
            surf_temp_flux: mo.surf_temp_flux,
        }
    }

    #[inline]
    fn stress(&self, u: f64, wspd: f64) -> f64 {
        if wspd < SPEED_FLOOR {
            0.0
        } else {
            self.utau2 * u / wspd
        }
    }
}

impl ShearStress for ShearStressConstant {
    #[inline]
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64 {
        self.stress(u, wspd)
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64 {
        self.stress(v, wspd)
    }

    #[inline]
    fn calc_theta(&self, _wspd: f64, _theta: f64) -> f64 {
        self.surf_temp_flux
    }
}

/// τ = u*² · u·S/S̄²: log-law drag with the mean-state coefficient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearStressDefault {
    utau2: f64,
    wspd_mean: f64,
    surf_temp_flux: f64,
}

impl ShearStressDefault {
    pub fn new(mo: &MoData) -> Self {
        Self {
            utau2: mo.utau * mo.utau,
            wspd_mean: mo.vmag_mean.max(SPEED_FLOOR),
            surf_temp_flux: mo.surf_temp_flux,
        }
    }

    #[inline]
    fn stress(&self, u: f64, wspd: f64) -> f64 {
        self.utau2 * u * wspd / (self.wspd_mean * self.wspd_mean)
    }
}

impl ShearStress for ShearStressDefault {
    #[inline]
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64 {
        self.stress(u, wspd)
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64 {
        self.stress(v, wspd)
    }

    #[inline]
    fn calc_theta(&self, wspd: f64, _theta: f64) -> f64 {
        self.surf_temp_flux * wspd / self.wspd_mean
    }
}

/// Local similarity: u* and the stability correction re-derived from the
/// local wind (and temperature) instead of the plane average.
///
/// τ = u*_loc² · u/S, with u*_loc = κS / (ln(z_ref/z0) − Ψ_m,loc).
///
/// The momentum methods receive no temperature, so the stress re-derives
/// stability from the local speed and the plane-mean θ̄. Only
/// [`calc_theta`](ShearStress::calc_theta) sees the local θ.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearStressLocal {
    mo: MoData,
}

impl ShearStressLocal {
    pub fn new(mo: &MoData) -> Self {
        Self { mo: *mo }
    }

    #[inline]
    fn local(&self, wspd: f64, theta: f64) -> MoData {
        self.mo.localized(wspd, theta, LOCAL_MAX_ITERS)
    }

    #[inline]
    fn stress(&self, u: f64, wspd: f64) -> f64 {
        if wspd < SPEED_FLOOR {
            return 0.0;
        }
        let utau = self.local(wspd, self.mo.theta_mean).utau;
        utau * utau * u / wspd
    }
}

impl ShearStress for ShearStressLocal {
    #[inline]
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64 {
        self.stress(u, wspd)
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64 {
        self.stress(v, wspd)
    }

    /// Heat flux of the locally re-derived surface layer: diagnosed from
    /// θ − θ_s when the surface temperature is prescribed, the prescribed
    /// flux otherwise.
    #[inline]
    fn calc_theta(&self, wspd: f64, theta: f64) -> f64 {
        self.local(wspd.max(SPEED_FLOOR), theta).surf_temp_flux
    }
}

/// Schumann (1975): τ = u*² · u/S̄, magnitude from the mean friction
/// velocity, direction and linear scaling from the local wind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearStressSchumann {
    utau2: f64,
    wspd_mean: f64,
    theta_mean: f64,
    theta_surf: f64,
    surf_temp_flux: f64,
}

impl ShearStressSchumann {
    pub fn new(mo: &MoData) -> Self {
        Self {
            utau2: mo.utau * mo.utau,
            wspd_mean: mo.vmag_mean.max(SPEED_FLOOR),
            theta_mean: mo.theta_mean,
            theta_surf: mo.surf_temp,
            surf_temp_flux: mo.surf_temp_flux,
        }
    }
}

impl ShearStress for ShearStressSchumann {
    #[inline]
    fn calc_vel_x(&self, u: f64, _wspd: f64) -> f64 {
        self.utau2 * u / self.wspd_mean
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, _wspd: f64) -> f64 {
        self.utau2 * v / self.wspd_mean
    }

    /// q = q̄ · (θ − θ_s)/(θ̄ − θ_s); q̄ when the mean air-surface
    /// difference vanishes.
    #[inline]
    fn calc_theta(&self, _wspd: f64, theta: f64) -> f64 {
        let dtheta_mean = self.theta_mean - self.theta_surf;
        if dtheta_mean.abs() < 1.0e-12 {
            self.surf_temp_flux
        } else {
            self.surf_temp_flux * (theta - self.theta_surf) / dtheta_mean
        }
    }
}

/// Moeng (1984): τ = u*² · ((u − ū)·S̄ + S·ū)/S̄², fluctuations about the
/// mean wind plus the mean stress scaled by the local speed.
///
/// Where the local wind is much slower than the mean the fluctuation term
/// can turn the stress against the local velocity; such components are
/// clipped to zero so the wall never accelerates the flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShearStressMoeng {
    utau2: f64,
    u_mean: f64,
    v_mean: f64,
    wspd_mean: f64,
    theta_mean: f64,
    theta_surf: f64,
    term1: f64,
}

impl ShearStressMoeng {
    pub fn new(mo: &MoData) -> Self {
        Self {
            utau2: mo.utau * mo.utau,
            u_mean: mo.vel_mean.x,
            v_mean: mo.vel_mean.y,
            wspd_mean: mo.vmag_mean.max(SPEED_FLOOR),
            theta_mean: mo.theta_mean,
            theta_surf: mo.surf_temp,
            term1: mo.kappa * mo.utau / (mo.alpha_h * mo.heat_log_term()),
        }
    }

    #[inline]
    fn stress(&self, u: f64, u_mean: f64, wspd: f64) -> f64 {
        let tau = self.utau2 * ((u - u_mean) * self.wspd_mean + wspd * u_mean)
            / (self.wspd_mean * self.wspd_mean);
        if tau * u > 0.0 {
            tau
        } else {
            0.0
        }
    }
}

impl ShearStress for ShearStressMoeng {
    #[inline]
    fn calc_vel_x(&self, u: f64, wspd: f64) -> f64 {
        self.stress(u, self.u_mean, wspd)
    }

    #[inline]
    fn calc_vel_y(&self, v: f64, wspd: f64) -> f64 {
        self.stress(v, self.v_mean, wspd)
    }

    /// q = −κu*/(α_h(ln(z_ref/z0) − Ψ_h)) · ((θ − θ̄)·S̄ + (θ̄ − θ_s)·S)/S̄
    #[inline]
    fn calc_theta(&self, wspd: f64, theta: f64) -> f64 {
        let num1 = (theta - self.theta_mean) * self.wspd_mean;
        let num2 = (self.theta_mean - self.theta_surf) * wspd;
        -self.term1 * (num1 + num2) / self.wspd_mean
    }
}
