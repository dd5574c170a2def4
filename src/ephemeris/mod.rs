//! # Ephemerides
//!
//! Positions of the Moon and of the planets consumed by the eclipse computations.
//!
//! The computations only depend on the two traits of this module:
//!
//! - [`LunarEphemeris`]: geocentric state of the Moon, ecliptic J2000.
//! - [`HeliocentricEphemeris`]: heliocentric state of a [`Body`], ecliptic J2000.
//!
//! Two analytical implementations ship with the crate:
//!
//! - [`elp2000::Elp2000`]: principal terms of the ELP2000-82 lunar theory.
//! - [`vsop87::Vsop87`]: VSOP87 series of the Earth.
//!
//! Both evaluate series referred to the mean ecliptic and equinox of date and rotate the
//! result to the ecliptic J2000. Velocities are obtained by central differences.
use nalgebra::Vector3;
use std::{fmt, str::FromStr};

use crate::{
    constants::JD, ref_system::StateVector, time::TimeStamp, umbra_errors::UmbraError,
};

pub mod elp2000;
pub mod vsop87;

/// Half step, in days, of the central differences giving the velocities.
const VELOCITY_HALF_STEP: f64 = 0.01;

/// Source of geocentric lunar positions.
pub trait LunarEphemeris {
    /// Geocentric state of the Moon in [`Frame::EclipticGeocentric`](crate::ref_system::Frame).
    fn geocentric_ecliptic(&self, time: &TimeStamp) -> StateVector;
}

/// Source of heliocentric planetary positions.
pub trait HeliocentricEphemeris {
    /// Heliocentric state of `body` in [`Frame::EclipticHeliocentric`](crate::ref_system::Frame).
    ///
    /// Return
    /// ------
    /// * [`UmbraError::UnsupportedBody`] when the ephemeris cannot provide `body` at `time`.
    fn for_body(&self, body: Body, time: &TimeStamp) -> Result<StateVector, UmbraError>;
}

/// Bodies with a bundled heliocentric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Earth,
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Earth => write!(f, "earth"),
        }
    }
}

impl FromStr for Body {
    type Err = UmbraError;

    /// Parse a body from its English name, case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earth" => Ok(Body::Earth),
            _ => Err(UmbraError::UnknownBody(s.to_string())),
        }
    }
}

/// Velocity in km/day of a position function of the TDB Julian Date, by central differences.
pub(crate) fn central_difference<F>(position: F, jd_tdb: JD) -> Vector3<f64>
where
    F: Fn(JD) -> Vector3<f64>,
{
    let h = VELOCITY_HALF_STEP;
    (position(jd_tdb + h) - position(jd_tdb - h)) / (2.0 * h)
}
