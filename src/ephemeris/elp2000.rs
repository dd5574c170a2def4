//! Geocentric position of the Moon from the principal terms of ELP2000-82.
//!
//! The 60 + 60 periodic terms and the additive corrections follow the truncation published in
//! Meeus, *Astronomical Algorithms*, 2nd ed., Ch. 47 (about 10" in longitude, 4" in latitude).
use nalgebra::Vector3;

use super::{central_difference, LunarEphemeris};
use crate::{
    constants::{Degree, Kilometer, DAYS_PER_CENTURY, JD, JD2000, JDTOMJD, RADEG},
    ref_system::{ecliptic_of_date_to_j2000, Frame, StateVector},
    time::TimeStamp,
};

/// Multiples of (D, M, M′, F), coefficient of Σl (1e-6 deg) and of Σr (1e-3 km).
#[rustfmt::skip]
const LON_DIST_TERMS: [(i8, i8, i8, i8, f64, f64); 60] = [
    (0, 0, 1, 0, 6288774.0, -20905355.0),
    (2, 0, -1, 0, 1274027.0, -3699111.0),
    (2, 0, 0, 0, 658314.0, -2955968.0),
    (0, 0, 2, 0, 213618.0, -569925.0),
    (0, 1, 0, 0, -185116.0, 48888.0),
    (0, 0, 0, 2, -114332.0, -3149.0),
    (2, 0, -2, 0, 58793.0, 246158.0),
    (2, -1, -1, 0, 57066.0, -152138.0),
    (2, 0, 1, 0, 53322.0, -170733.0),
    (2, -1, 0, 0, 45758.0, -204586.0),
    (0, 1, -1, 0, -40923.0, -129620.0),
    (1, 0, 0, 0, -34720.0, 108743.0),
    (0, 1, 1, 0, -30383.0, 104755.0),
    (2, 0, 0, -2, 15327.0, 10321.0),
    (0, 0, 1, 2, -12528.0, 0.0),
    (0, 0, 1, -2, 10980.0, 79661.0),
    (4, 0, -1, 0, 10675.0, -34782.0),
    (0, 0, 3, 0, 10034.0, -23210.0),
    (4, 0, -2, 0, 8548.0, -21636.0),
    (2, 1, -1, 0, -7888.0, 24208.0),
    (2, 1, 0, 0, -6766.0, 30824.0),
    (1, 0, -1, 0, -5163.0, -8379.0),
    (1, 1, 0, 0, 4987.0, -16675.0),
    (2, -1, 1, 0, 4036.0, -12831.0),
    (2, 0, 2, 0, 3994.0, -10445.0),
    (4, 0, 0, 0, 3861.0, -11650.0),
    (2, 0, -3, 0, 3665.0, 14403.0),
    (0, 1, -2, 0, -2689.0, -7003.0),
    (2, 0, -1, 2, -2602.0, 0.0),
    (2, -1, -2, 0, 2390.0, 10056.0),
    (1, 0, 1, 0, -2348.0, 6322.0),
    (2, -2, 0, 0, 2236.0, -9884.0),
    (0, 1, 2, 0, -2120.0, 5751.0),
    (0, 2, 0, 0, -2069.0, 0.0),
    (2, -2, -1, 0, 2048.0, -4950.0),
    (2, 0, 1, -2, -1773.0, 4130.0),
    (2, 0, 0, 2, -1595.0, 0.0),
    (4, -1, -1, 0, 1215.0, -3958.0),
    (0, 0, 2, 2, -1110.0, 0.0),
    (3, 0, -1, 0, -892.0, 3258.0),
    (2, 1, 1, 0, -810.0, 2616.0),
    (4, -1, -2, 0, 759.0, -1897.0),
    (0, 2, -1, 0, -713.0, -2117.0),
    (2, 2, -1, 0, -700.0, 2354.0),
    (2, 1, -2, 0, 691.0, 0.0),
    (2, -1, 0, -2, 596.0, 0.0),
    (4, 0, 1, 0, 549.0, -1423.0),
    (0, 0, 4, 0, 537.0, -1117.0),
    (4, -1, 0, 0, 520.0, -1571.0),
    (1, 0, -2, 0, -487.0, -1739.0),
    (2, 1, 0, -2, -399.0, 0.0),
    (0, 0, 2, -2, -381.0, -4421.0),
    (1, 1, 1, 0, 351.0, 0.0),
    (3, 0, -2, 0, -340.0, 0.0),
    (4, 0, -3, 0, 330.0, 0.0),
    (2, -1, 2, 0, 327.0, 0.0),
    (0, 2, 1, 0, -323.0, 1165.0),
    (1, 1, -1, 0, 299.0, 0.0),
    (2, 0, 3, 0, 294.0, 0.0),
    (2, 0, -1, -2, 0.0, 8752.0),
];

/// Multiples of (D, M, M′, F) and coefficient of Σb (1e-6 deg).
#[rustfmt::skip]
const LAT_TERMS: [(i8, i8, i8, i8, f64); 60] = [
    (0, 0, 0, 1, 5128122.0),
    (0, 0, 1, 1, 280602.0),
    (0, 0, 1, -1, 277693.0),
    (2, 0, 0, -1, 173237.0),
    (2, 0, -1, 1, 55413.0),
    (2, 0, -1, -1, 46271.0),
    (2, 0, 0, 1, 32573.0),
    (0, 0, 2, 1, 17198.0),
    (2, 0, 1, -1, 9266.0),
    (0, 0, 2, -1, 8822.0),
    (2, -1, 0, -1, 8216.0),
    (2, 0, -2, -1, 4324.0),
    (2, 0, 1, 1, 4200.0),
    (2, 1, 0, -1, -3359.0),
    (2, -1, -1, 1, 2463.0),
    (2, -1, 0, 1, 2211.0),
    (2, -1, -1, -1, 2065.0),
    (0, 1, -1, -1, -1870.0),
    (4, 0, -1, -1, 1828.0),
    (0, 1, 0, 1, -1794.0),
    (0, 0, 0, 3, -1749.0),
    (0, 1, -1, 1, -1565.0),
    (1, 0, 0, 1, -1491.0),
    (0, 1, 1, 1, -1475.0),
    (0, 1, 1, -1, -1410.0),
    (0, 1, 0, -1, -1344.0),
    (1, 0, 0, -1, -1335.0),
    (0, 0, 3, 1, 1107.0),
    (4, 0, 0, -1, 1021.0),
    (4, 0, -1, 1, 833.0),
    (0, 0, 1, -3, 777.0),
    (4, 0, -2, 1, 671.0),
    (2, 0, 0, -3, 607.0),
    (2, 0, 2, -1, 596.0),
    (2, -1, 1, -1, 491.0),
    (2, 0, -2, 1, -451.0),
    (0, 0, 3, -1, 439.0),
    (2, 0, 2, 1, 422.0),
    (2, 0, -3, -1, 421.0),
    (2, 1, -1, 1, -366.0),
    (2, 1, 0, 1, -351.0),
    (4, 0, 0, 1, 331.0),
    (2, -1, 1, 1, 315.0),
    (2, -2, 0, -1, 302.0),
    (0, 0, 1, 3, -283.0),
    (2, 1, 1, -1, -229.0),
    (1, 1, 0, -1, 223.0),
    (1, 1, 0, 1, 223.0),
    (0, 1, -2, -1, -220.0),
    (2, 1, -1, -1, -220.0),
    (1, 0, 1, 1, -185.0),
    (2, -1, -2, -1, 181.0),
    (0, 1, 2, 1, -177.0),
    (4, 0, -2, -1, 176.0),
    (4, -1, -1, -1, 166.0),
    (1, 0, 1, -1, -164.0),
    (4, 0, 1, -1, 132.0),
    (1, 0, -1, -1, -119.0),
    (4, -1, 0, -1, 115.0),
    (2, -2, 0, 1, 107.0),
];

/// Mean distance Earth–Moon of the theory, km.
const MEAN_DISTANCE: Kilometer = 385000.56;

/// Geocentric ecliptic longitude, latitude (degrees) and distance (km) of the Moon,
/// mean ecliptic and equinox of date.
///
/// Arguments
/// ---------
/// * `t`: Julian centuries of TDB since J2000.0.
pub fn moon_ecliptic_of_date(t: f64) -> (Degree, Degree, Kilometer) {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    // Mean longitude, elongation, anomalies and argument of latitude (degrees)
    let lp = 218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538841.0
        - t4 / 65194000.0;
    let d = 297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545868.0
        - t4 / 113065000.0;
    let m = 357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24490000.0;
    let mp = 134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69699.0
        - t4 / 14712000.0;
    let f = 93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3526000.0
        + t4 / 863310000.0;

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479264.290 * t;
    let a3 = 313.45 + 481266.484 * t;

    // Decreasing eccentricity of the Earth orbit
    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let ecc_factor = |mult: i8| match mult.abs() {
        0 => 1.0,
        1 => e,
        _ => e * e,
    };

    let arg = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        (f64::from(cd) * d + f64::from(cm) * m + f64::from(cmp) * mp + f64::from(cf) * f) * RADEG
    };

    let (mut sl, mut sr) = (0.0, 0.0);
    for &(cd, cm, cmp, cf, coef_l, coef_r) in LON_DIST_TERMS.iter() {
        let (sin_a, cos_a) = arg(cd, cm, cmp, cf).sin_cos();
        let ecc = ecc_factor(cm);
        sl += coef_l * ecc * sin_a;
        sr += coef_r * ecc * cos_a;
    }

    let mut sb = LAT_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coef_b)| coef_b * ecc_factor(cm) * arg(cd, cm, cmp, cf).sin())
        .sum::<f64>();

    let sind = |x: f64| (x * RADEG).sin();
    sl += 3958.0 * sind(a1) + 1962.0 * sind(lp - f) + 318.0 * sind(a2);
    sb += -2235.0 * sind(lp) + 382.0 * sind(a3) + 175.0 * sind(a1 - f) + 175.0 * sind(a1 + f)
        + 127.0 * sind(lp - mp)
        - 115.0 * sind(lp + mp);

    let lon = (lp + sl / 1e6).rem_euclid(360.0);
    let lat = sb / 1e6;
    let dist = MEAN_DISTANCE + sr / 1000.0;

    (lon, lat, dist)
}

/// Geocentric position of the Moon in km, ecliptic and equinox J2000.
fn moon_position_j2000(jd_tdb: JD) -> Vector3<f64> {
    let t = (jd_tdb - JD2000) / DAYS_PER_CENTURY;
    let (lon, lat, dist) = moon_ecliptic_of_date(t);

    let (sin_lon, cos_lon) = (lon * RADEG).sin_cos();
    let (sin_lat, cos_lat) = (lat * RADEG).sin_cos();
    let of_date = Vector3::new(
        dist * cos_lat * cos_lon,
        dist * cos_lat * sin_lon,
        dist * sin_lat,
    );

    ecliptic_of_date_to_j2000(jd_tdb - JDTOMJD) * of_date
}

/// Lunar ephemeris from the principal ELP2000-82 terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elp2000;

impl LunarEphemeris for Elp2000 {
    fn geocentric_ecliptic(&self, time: &TimeStamp) -> StateVector {
        StateVector::new(
            Frame::EclipticGeocentric,
            moon_position_j2000(time.jd_tdb),
            central_difference(moon_position_j2000, time.jd_tdb),
            *time,
        )
    }
}

#[cfg(test)]
mod elp2000_test {
    use super::*;
    use crate::time::{TimeConvention, TimeCorrelation};
    use approx::assert_relative_eq;

    #[test]
    fn test_moon_1992_april_12() {
        // Meeus, example 47.a: 1992 April 12, 0h TD
        let t = (2448724.5 - JD2000) / DAYS_PER_CENTURY;
        let (lon, lat, dist) = moon_ecliptic_of_date(t);
        assert_relative_eq!(lon, 133.162655, epsilon = 2e-5);
        assert_relative_eq!(lat, -3.229126, epsilon = 2e-5);
        assert_relative_eq!(dist, 368409.7, epsilon = 0.5);
    }

    #[test]
    fn test_j2000_frame_matches_date_frame_at_epoch() {
        let t = 0.0;
        let (lon, lat, dist) = moon_ecliptic_of_date(t);
        let pos = moon_position_j2000(JD2000);
        assert_relative_eq!(pos.norm(), dist, epsilon = 1e-6);
        let lon_diff = (pos.y.atan2(pos.x) / RADEG - lon + 540.0).rem_euclid(360.0) - 180.0;
        assert_relative_eq!(lon_diff, 0.0, epsilon = 1e-9);
        assert_relative_eq!((pos.z / pos.norm()).asin() / RADEG, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_moon_state_vector() {
        let corr = TimeCorrelation::default();
        let elp = Elp2000;
        for k in 0..50 {
            let time = corr.to_instant(2451545.0 + 7.3 * k as f64, TimeConvention::Tdb);
            let moon = elp.geocentric_ecliptic(&time);

            assert_eq!(moon.frame, Frame::EclipticGeocentric);
            let dist = moon.position.norm();
            assert!((356_000.0..407_000.0).contains(&dist), "distance {dist}");
            // Orbital speed about 1 km/s
            let speed = moon.velocity.norm() / 86400.0;
            assert!((0.9..1.15).contains(&speed), "speed {speed}");
            // Latitude bounded by the inclination of the orbit
            assert!(moon.latitude().abs() < 5.35);
        }
    }
}
