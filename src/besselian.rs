//! # Besselian elements
//!
//! Geometry of the shadow cone of the Moon at one instant, expressed in the fundamental frame:
//!
//! * the `z` axis is parallel to the shadow axis, pointing from the Moon toward the Sun, with
//!   right ascension `a` and declination `d` in the true equator and equinox of date;
//! * the `x` axis lies in the true equator, toward the east;
//! * the `x`/`y` plane through the centre of the Earth is the fundamental plane.
//!
//! Lengths are in equatorial Earth radii and angles in degrees. The elements follow
//! Urban & Seidelmann, *Explanatory Supplement to the Astronomical Almanac*, 3rd ed., §11.3.
//!
//! The apparent Sun is corrected for light time once, with the light time of the geometric
//! distance, then for stellar aberration.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, EARTH_EQUATORIAL_RADIUS, MOON_RADIUS, RADEG, SUN_RADIUS, VLIGHT_KM_DAY},
    earth_orientation::NutationData,
    ephemeris::{Body, HeliocentricEphemeris, LunarEphemeris},
    moon::angle_diff,
    ref_system::{
        ecliptic_to_equatorial, equatorial_j2000_to_mod, mod_to_tod, rotate_cart1, rotate_cart3,
        stellar_aberration, Frame, StateVector,
    },
    solar_eclipses::SolarEclipse,
    time::{gast, TimeStamp},
    umbra::Umbra,
    umbra_errors::UmbraError,
};

/// Besselian elements of a solar eclipse at one instant.
///
/// The `_dot` fields are per-day rates, zero unless computed by [`besselian_solar_with_delta`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BesselianElements {
    /// Right ascension of the shadow axis (deg)
    pub a: Degree,
    /// Declination of the shadow axis (deg)
    pub d: Degree,
    pub sin_d: f64,
    pub cos_d: f64,
    /// Coordinates of the shadow axis in the fundamental plane (Earth radii)
    pub x: f64,
    pub y: f64,
    /// Greenwich hour angle of the shadow axis (deg)
    pub mu: Degree,
    /// Radius of the penumbral cone in the fundamental plane (Earth radii)
    pub l1: f64,
    /// Radius of the umbral cone in the fundamental plane, negative for a total eclipse
    pub l2: f64,
    pub tan_f1: f64,
    pub tan_f2: f64,
    pub a_dot: f64,
    pub d_dot: f64,
    pub x_dot: f64,
    pub y_dot: f64,
    pub mu_dot: f64,
    pub l1_dot: f64,
    pub l2_dot: f64,
}

/// True of date → fundamental frame of a shadow axis at (`a`, `d`) degrees.
///
/// Rotates the frame about its third axis by `a + 90°`, then about its first axis by `90° − d`.
pub fn coord_tod_fund(osv: &StateVector, a: Degree, d: Degree) -> StateVector {
    let to_fund = |v: &Vector3<f64>| rotate_cart1(&rotate_cart3(v, a + 90.0), 90.0 - d);
    StateVector::new(
        Frame::Fundamental,
        to_fund(&osv.position),
        // TODO: add the term from the time derivative of (a, d)
        to_fund(&osv.velocity),
        osv.time,
    )
}

/// Fundamental frame of a shadow axis at (`a`, `d`) degrees → true of date.
pub fn coord_fund_tod(osv: &StateVector, a: Degree, d: Degree) -> StateVector {
    let to_tod = |v: &Vector3<f64>| rotate_cart3(&rotate_cart1(v, -(90.0 - d)), -(a + 90.0));
    StateVector::new(
        Frame::TrueOfDate,
        to_tod(&osv.position),
        // TODO: add the term from the time derivative of (a, d)
        to_tod(&osv.velocity),
        osv.time,
    )
}

/// Besselian elements at `time`.
///
/// Arguments
/// -----------------
/// * `ctx`: computation context.
/// * `_eclipse`: eclipse the elements describe; the geometry only depends on `time`.
/// * `time`: instant of the elements.
/// * `nutation`: nutation angles used for the true-of-date frame and the sidereal time.
///
/// Return
/// ----------
/// * Elements with zero rates, or the error of the heliocentric ephemeris.
pub fn besselian_solar<L: LunarEphemeris, H: HeliocentricEphemeris>(
    ctx: &Umbra<L, H>,
    _eclipse: &SolarEclipse,
    time: &TimeStamp,
    nutation: &NutationData,
) -> Result<BesselianElements, UmbraError> {
    let corr = ctx.get_time_correlation();
    let planets = ctx.get_planets();

    // Earth at the emission time of the light received at `time`
    let earth = planets.for_body(Body::Earth, time)?;
    let light_time = earth.position.norm() / VLIGHT_KM_DAY;
    let earth = planets.for_body(Body::Earth, &corr.shift(time, -light_time))?;

    let sun_ecl = StateVector::new(
        Frame::EclipticGeocentric,
        -earth.position,
        -earth.velocity,
        *time,
    );
    let sun_j2000 = stellar_aberration(&ecliptic_to_equatorial(&sun_ecl), &earth);
    let sun_tod = mod_to_tod(&equatorial_j2000_to_mod(&sun_j2000), nutation);

    let moon_ecl = ctx.get_moon().geocentric_ecliptic(time);
    let moon_tod = mod_to_tod(
        &equatorial_j2000_to_mod(&ecliptic_to_equatorial(&moon_ecl)),
        nutation,
    );

    // Shadow axis, from the Moon toward the Sun
    let g = sun_tod.position - moon_tod.position;
    let g_norm = g.norm();
    let a = g.y.atan2(g.x) / RADEG;
    let d = (g.z / g_norm).asin() / RADEG;
    let mu = gast(time.jd_ut1, time.jd_tdb, nutation) - a;

    let moon_fund = coord_tod_fund(&moon_tod, a, d);
    let x = moon_fund.position.x / EARTH_EQUATORIAL_RADIUS;
    let y = moon_fund.position.y / EARTH_EQUATORIAL_RADIUS;
    let z = moon_fund.position.z / EARTH_EQUATORIAL_RADIUS;

    // Half-angles of the penumbral (f1) and umbral (f2) cones
    let k = MOON_RADIUS / EARTH_EQUATORIAL_RADIUS;
    let f1 = ((SUN_RADIUS + MOON_RADIUS) / g_norm).asin();
    let f2 = ((SUN_RADIUS - MOON_RADIUS) / g_norm).asin();
    let c1 = z + k / f1.sin();
    let c2 = z - k / f2.sin();

    let (sin_d, cos_d) = (d * RADEG).sin_cos();

    Ok(BesselianElements {
        a,
        d,
        sin_d,
        cos_d,
        x,
        y,
        mu,
        l1: c1 * f1.tan(),
        l2: c2 * f2.tan(),
        tan_f1: f1.tan(),
        tan_f2: f2.tan(),
        ..Default::default()
    })
}

/// Besselian elements at `time` with first-order rates.
///
/// The elements are computed at `time` and at `time + delta` (days, TDB) with the same nutation
/// angles; every rate is the forward difference divided by `delta`. Differences of the angles
/// `a` and `mu` are wrapped into (−180°, 180°]. `delta` is not validated: a zero step yields
/// non-finite rates.
pub fn besselian_solar_with_delta<L: LunarEphemeris, H: HeliocentricEphemeris>(
    ctx: &Umbra<L, H>,
    eclipse: &SolarEclipse,
    time: &TimeStamp,
    delta: f64,
    nutation: &NutationData,
) -> Result<BesselianElements, UmbraError> {
    let later = ctx.get_time_correlation().shift(time, delta);

    let b0 = besselian_solar(ctx, eclipse, time, nutation)?;
    let b1 = besselian_solar(ctx, eclipse, &later, nutation)?;

    Ok(BesselianElements {
        a_dot: angle_diff(b1.a, b0.a) / delta,
        d_dot: (b1.d - b0.d) / delta,
        x_dot: (b1.x - b0.x) / delta,
        y_dot: (b1.y - b0.y) / delta,
        mu_dot: angle_diff(b1.mu, b0.mu) / delta,
        l1_dot: (b1.l1 - b0.l1) / delta,
        l2_dot: (b1.l2 - b0.l2) / delta,
        ..b0
    })
}

#[cfg(test)]
mod besselian_test {
    use super::*;
    use crate::{
        time::{TimeConvention, TimeCorrelation},
        unit_test_global::{ECLIPSES_2017, UMBRA_TEST},
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_fundamental_axes() {
        let corr = TimeCorrelation::default();
        let time = corr.to_instant(2451545.0, TimeConvention::Tdb);
        let (a, d): (Degree, Degree) = (150.0, 12.0);

        // A vector along the shadow axis becomes +z
        let axis = Vector3::new(
            (d * RADEG).cos() * (a * RADEG).cos(),
            (d * RADEG).cos() * (a * RADEG).sin(),
            (d * RADEG).sin(),
        );
        let osv = StateVector::new(Frame::TrueOfDate, axis * 2.0, axis, time);
        let fund = coord_tod_fund(&osv, a, d);
        assert_eq!(fund.frame, Frame::Fundamental);
        assert_relative_eq!(fund.position, Vector3::new(0.0, 0.0, 2.0), epsilon = 1e-14);
        assert_relative_eq!(fund.velocity, Vector3::z(), epsilon = 1e-14);

        // The x axis points east along the equator
        let east = Vector3::new(((a + 90.0) * RADEG).cos(), ((a + 90.0) * RADEG).sin(), 0.0);
        let osv = StateVector::new(Frame::TrueOfDate, east, Vector3::zeros(), time);
        assert_relative_eq!(
            coord_tod_fund(&osv, a, d).position,
            Vector3::x(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_fundamental_round_trip() {
        let corr = TimeCorrelation::default();
        let time = corr.to_instant(2457987.25, TimeConvention::Tt);
        let osv = StateVector::new(
            Frame::TrueOfDate,
            Vector3::new(-250_000.0, 290_000.0, 80_000.0),
            Vector3::new(-60_000.0, -55_000.0, -2_000.0),
            time,
        );
        let back = coord_fund_tod(&coord_tod_fund(&osv, 150.7, 11.87), 150.7, 11.87);
        assert_eq!(back.frame, Frame::TrueOfDate);
        assert_relative_eq!(back.position, osv.position, epsilon = 1e-8);
        assert_relative_eq!(back.velocity, osv.velocity, epsilon = 1e-8);
    }

    #[test]
    fn test_besselian_2017_august_21() {
        // Reference elements at t0 = 18:00 TT (Espenak, NASA/GSFC)
        let ctx = &*UMBRA_TEST;
        let corr = ctx.get_time_correlation();
        let eclipse = &ECLIPSES_2017[1];
        let t0 = corr.to_instant(2457987.25, TimeConvention::Tt);
        let nut = ctx.nutation(&t0);

        let b = besselian_solar(ctx, eclipse, &t0, &nut).unwrap();
        // Truncated lunar series: about 40 km on the shadow axis
        assert_relative_eq!(b.x, -0.129571, epsilon = 1e-2);
        assert_relative_eq!(b.y, 0.485416, epsilon = 5e-3);
        assert_relative_eq!(b.d, 11.86696, epsilon = 5e-3);
        assert_relative_eq!(b.mu, 89.24545, epsilon = 1e-2);
        assert_relative_eq!(b.l1, 0.542093, epsilon = 2e-3);
        assert_relative_eq!(b.l2, -0.004025, epsilon = 2e-3);
        assert_relative_eq!(b.tan_f1, 0.0046222, epsilon = 2e-5);
        assert_relative_eq!(b.tan_f2, 0.0045992, epsilon = 2e-5);

        assert_relative_eq!(b.sin_d, (b.d * RADEG).sin(), epsilon = 1e-15);
        assert_relative_eq!(b.cos_d, (b.d * RADEG).cos(), epsilon = 1e-15);
        assert_eq!(b.x_dot, 0.0);
        assert_eq!(b.mu_dot, 0.0);
    }

    #[test]
    fn test_besselian_idempotent() {
        let ctx = &*UMBRA_TEST;
        let eclipse = &ECLIPSES_2017[1];
        let nut = ctx.nutation(&eclipse.max_time);

        let b1 = besselian_solar(ctx, eclipse, &eclipse.max_time, &nut).unwrap();
        let b2 = besselian_solar(ctx, eclipse, &eclipse.max_time, &nut).unwrap();
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_besselian_rates() {
        let ctx = &*UMBRA_TEST;
        let corr = ctx.get_time_correlation();
        let eclipse = &ECLIPSES_2017[1];
        let t0 = corr.to_instant(2457987.25, TimeConvention::Tt);
        let nut = ctx.nutation(&t0);

        let b = besselian_solar_with_delta(ctx, eclipse, &t0, 1.0 / 24.0, &nut).unwrap();
        let plain = besselian_solar(ctx, eclipse, &t0, &nut).unwrap();
        assert_eq!(b.x, plain.x);
        assert_eq!(b.l2, plain.l2);

        // Hourly rates: x' 0.5406 Earth radii, y' −0.1417, mu' 15.004°
        assert_relative_eq!(b.x_dot / 24.0, 0.5406, epsilon = 2e-3);
        assert_relative_eq!(b.y_dot / 24.0, -0.1417, epsilon = 5e-3);
        assert_relative_eq!(b.mu_dot / 24.0, 15.004, epsilon = 2e-3);
        assert!(b.d_dot < 0.0);
    }
}
