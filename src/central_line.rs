//! Intersection of the shadow axis with the Earth ellipsoid.
//!
//! Auxiliary elements after the *Explanatory Supplement*, §11.61. The ellipsoid is flattened
//! onto a sphere by scaling the fundamental `y` coordinate by `rho1`; the axis meets the
//! Earth only when `xi² + (eta / rho1)² ≤ 1`, otherwise `zeta` is NaN. This is always the
//! case during a partial eclipse.
use serde::{Deserialize, Serialize};

use crate::{
    besselian::BesselianElements,
    constants::{EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS},
    solar_eclipses::SolarEclipse,
};

/// Point of the central line in the fundamental frame, with the auxiliary elements used to
/// compute it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralLine {
    pub rho1: f64,
    pub rho2: f64,
    pub sin_d1: f64,
    pub cos_d1: f64,
    pub sin_d1d2: f64,
    pub cos_d1d2: f64,
    pub xi: f64,
    pub eta: f64,
    /// NaN when the shadow axis misses the Earth
    pub zeta: f64,
}

impl CentralLine {
    /// Whether the shadow axis meets the Earth ellipsoid.
    pub fn on_earth(&self) -> bool {
        !self.zeta.is_nan()
    }
}

/// Map the shadow axis of `bessel` onto the Earth ellipsoid.
pub fn besselian_central_line(_eclipse: &SolarEclipse, bessel: &BesselianElements) -> CentralLine {
    let a = EARTH_MAJOR_AXIS;
    let b = EARTH_MINOR_AXIS;
    // Square of the eccentricity
    let el2 = 1.0 - b * b / (a * a);

    let rho1 = (1.0 - el2 * bessel.cos_d * bessel.cos_d).sqrt();
    let rho2 = (1.0 - el2 * bessel.cos_d * bessel.sin_d).sqrt();
    let sin_d1 = bessel.sin_d / rho1;
    let cos_d1 = (1.0 - el2).sqrt() * bessel.cos_d / rho1;
    let sin_d1d2 = el2 * bessel.sin_d * bessel.cos_d / (rho1 * rho2);
    let cos_d1d2 = (1.0 - el2).sqrt() / (rho1 * rho2);

    let xi = bessel.x;
    let eta = bessel.y;
    let eta1 = eta / rho1;
    let zeta1_sq = 1.0 - xi * xi - eta1 * eta1;

    let zeta = if zeta1_sq < 0.0 {
        f64::NAN
    } else {
        rho2 * (zeta1_sq.sqrt() * cos_d1d2 - eta1 * sin_d1d2)
    };

    CentralLine {
        rho1,
        rho2,
        sin_d1,
        cos_d1,
        sin_d1d2,
        cos_d1d2,
        xi,
        eta,
        zeta,
    }
}
