//! # Reference frames and state vectors
//!
//! Frame tags, the immutable [`StateVector`] and the rotation chain used by the eclipse
//! geometry:
//!
//! ```text
//! ecliptic J2000 ──► equatorial J2000 ──► mean of date ──► true of date ──► fundamental
//! ```
//!
//! Every transform consumes a state vector by reference and returns a new one.
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Radian, MJD, RADEG, T2000, VLIGHT_KM_DAY},
    earth_orientation::{nutation_matrix, obleq, precession_matrix, NutationData},
    time::TimeStamp,
};

/// Reference frame of a [`StateVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    /// Geocentric, ecliptic and equinox J2000
    EclipticGeocentric,
    /// Heliocentric, ecliptic and equinox J2000
    EclipticHeliocentric,
    /// Mean equator and equinox J2000
    J2000,
    /// Mean equator and equinox of date (precession applied)
    MeanOfDate,
    /// True equator and equinox of date (precession and nutation applied)
    TrueOfDate,
    /// Fundamental frame of a solar eclipse, z along the shadow axis
    Fundamental,
}

/// Position (km) and velocity (km/day) of a body at an instant, in a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    pub frame: Frame,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub time: TimeStamp,
}

impl StateVector {
    pub fn new(frame: Frame, position: Vector3<f64>, velocity: Vector3<f64>, time: TimeStamp) -> Self {
        StateVector {
            frame,
            position,
            velocity,
            time,
        }
    }

    /// Apply the same rotation to position and velocity and retag the frame.
    fn rotated(&self, rot: &Matrix3<f64>, frame: Frame) -> Self {
        StateVector {
            frame,
            position: rot * self.position,
            velocity: rot * self.velocity,
            time: self.time,
        }
    }

    /// The opposite vector: position and velocity negated, same frame and time.
    pub fn negated(&self) -> Self {
        StateVector {
            frame: self.frame,
            position: -self.position,
            velocity: -self.velocity,
            time: self.time,
        }
    }

    /// Longitude of the position in the xy plane of the frame, degrees in (−180, 180].
    pub fn longitude(&self) -> Degree {
        self.position.y.atan2(self.position.x) / RADEG
    }

    /// Latitude of the position above the xy plane of the frame, degrees.
    pub fn latitude(&self) -> Degree {
        (self.position.z / self.position.norm()).asin() / RADEG
    }
}

/// Build an active rotation matrix about the X (0), Y (1) or Z (2) axis.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `k`: axis index.
///
/// Returns
/// --------
/// * the matrix rotating a vector by `alpha` about the axis (right-hand rule).
///   The passive rotation of the frame by `alpha` is `rotmt(-alpha, k)`.
///
/// Panics
/// ------
/// * if `k > 2`.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotate the coordinate frame about its first axis by `angle` degrees.
pub fn rotate_cart1(v: &Vector3<f64>, angle: Degree) -> Vector3<f64> {
    rotmt(-angle * RADEG, 0) * v
}

/// Rotate the coordinate frame about its third axis by `angle` degrees.
pub fn rotate_cart3(v: &Vector3<f64>, angle: Degree) -> Vector3<f64> {
    rotmt(-angle * RADEG, 2) * v
}

/// Rotation from the ecliptic to the equatorial frame for an obliquity `eps`.
fn ecliptic_to_equatorial_matrix(eps: Radian) -> Matrix3<f64> {
    rotmt(eps, 0)
}

/// Ecliptic J2000 → equatorial J2000.
pub fn ecliptic_to_equatorial(osv: &StateVector) -> StateVector {
    osv.rotated(&ecliptic_to_equatorial_matrix(obleq(T2000)), Frame::J2000)
}

/// Equatorial J2000 → ecliptic J2000 (geocentric).
pub fn equatorial_to_ecliptic(osv: &StateVector) -> StateVector {
    osv.rotated(
        &ecliptic_to_equatorial_matrix(obleq(T2000)).transpose(),
        Frame::EclipticGeocentric,
    )
}

/// Equatorial J2000 → mean equator and equinox of date, with the date taken from the state.
pub fn equatorial_j2000_to_mod(osv: &StateVector) -> StateVector {
    osv.rotated(&precession_matrix(osv.time.mjd_tt()), Frame::MeanOfDate)
}

/// Mean of date → equatorial J2000.
pub fn mod_to_equatorial_j2000(osv: &StateVector) -> StateVector {
    osv.rotated(
        &precession_matrix(osv.time.mjd_tt()).transpose(),
        Frame::J2000,
    )
}

/// Mean of date → true of date.
pub fn mod_to_tod(osv: &StateVector, nutation: &NutationData) -> StateVector {
    osv.rotated(&nutation_matrix(nutation), Frame::TrueOfDate)
}

/// True of date → mean of date.
pub fn tod_to_mod(osv: &StateVector, nutation: &NutationData) -> StateVector {
    osv.rotated(&nutation_matrix(nutation).transpose(), Frame::MeanOfDate)
}

/// Rotation from the mean ecliptic and equinox of date to the ecliptic and equinox J2000.
///
/// Used by the analytical series which are expressed in the ecliptic of date.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT) of the date frame.
pub fn ecliptic_of_date_to_j2000(tjm: MJD) -> Matrix3<f64> {
    ecliptic_to_equatorial_matrix(obleq(T2000)).transpose()
        * precession_matrix(tjm).transpose()
        * ecliptic_to_equatorial_matrix(obleq(tjm))
}

/// Apply first-order stellar aberration to a geocentric equatorial J2000 target.
///
/// The apparent direction is `û + v/c`, with `v` the heliocentric velocity of the Earth
/// rotated into the equatorial frame. The distance is preserved and the velocity of the target
/// is left untouched.
///
/// Arguments
/// ---------
/// * `target`: target in [`Frame::J2000`].
/// * `earth`: Earth state in [`Frame::EclipticHeliocentric`].
pub fn stellar_aberration(target: &StateVector, earth: &StateVector) -> StateVector {
    let earth_eq = ecliptic_to_equatorial(earth);

    let dist = target.position.norm();
    let apparent = target.position / dist + earth_eq.velocity / VLIGHT_KM_DAY;

    StateVector {
        frame: Frame::J2000,
        position: apparent.normalize() * dist,
        velocity: target.velocity,
        time: target.time,
    }
}

/// Right ascension (radians, [0, 2π)), declination (radians) and norm of a cartesian vector.
pub fn cartesian_to_radec(v: &Vector3<f64>) -> (Radian, Radian, f64) {
    let rho = v.norm();
    let alpha = v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU);
    let delta = (v.z / rho).asin();
    (alpha, delta, rho)
}
