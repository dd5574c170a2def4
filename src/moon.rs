//! # Lunar periodic events
//!
//! Instants at which the Moon crosses the ecliptic (node passages) and at which it is in
//! conjunction in longitude with the Sun (new moons).
//!
//! Both searches follow the same two stages:
//!
//! 1. **Raw estimate** from the closed-form series of Meeus, *Astronomical Algorithms*, 2nd ed.
//!    (Ch. 49 for the new moons, Ch. 51 for the node passages), evaluated for each integer (or
//!    half-integer) cycle index `k` covering the requested years.
//! 2. **Single linear correction**: the relevant quantity is sampled at the estimate and one
//!    refinement step later (one minute by default) and the estimate is moved to the zero of the
//!    linear interpolant.
//!
//! Angles are handled in degrees throughout. Outputs are sorted by increasing `k`, hence by time.
//!
//! The two helpers [`moon_node_inclination`] and [`moon_longitude_rate`] give the local
//! geometry of the lunar orbit used by the eclipse detector at each node passage.
use log::debug;

use crate::{
    constants::{Degree, Year, RADEG, SECONDS_PER_DAY},
    ephemeris::{Body, HeliocentricEphemeris, LunarEphemeris},
    time::{TimeConvention, TimeCorrelation, TimeStamp},
    umbra::Umbra,
    umbra_errors::UmbraError,
};

/// Sine of an angle in degrees.
#[inline]
fn sind(x: Degree) -> f64 {
    (x * RADEG).sin()
}

/// Difference `a − b` of two angles in degrees, wrapped into (−180, 180].
pub fn angle_diff(a: Degree, b: Degree) -> Degree {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Half-open range of cycle indices covering `[year_start, year_end)` for a series whose
/// index `k = 0` falls at `epoch` and which counts `per_year` cycles a year.
///
/// Empty when `year_end <= year_start`.
fn cycle_range(year_start: Year, year_end: Year, epoch: Year, per_year: f64) -> std::ops::Range<i64> {
    if year_end <= year_start {
        return 0..0;
    }
    let k_start = ((year_start - epoch) * per_year).floor() as i64;
    let k_end = ((year_end - epoch) * per_year).ceil() as i64;
    k_start..k_end
}

/// Raw instant of the new moon of lunation `k` (Meeus Ch. 49), as a TDB timestamp.
///
/// `k = 0` is the new moon of 2000 January 6. Only integer values of `k` give new moons.
pub fn new_moon_estimate(time_correlation: &TimeCorrelation, k: f64) -> TimeStamp {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mut jde = 2451550.09766 + 29.530588861 * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;

    // Sun mean anomaly, Moon mean anomaly, argument of latitude, ascending node
    let m = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let mp = 201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3 - 0.000000058 * t4;
    let f = 160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    let omega = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;

    let e = 1.0 - 0.002516 * t - 0.0000074 * t2;

    let periodic = -0.40720 * sind(mp) + 0.17241 * e * sind(m) + 0.01608 * sind(2.0 * mp)
        + 0.01039 * sind(2.0 * f)
        + 0.00739 * e * sind(mp - m)
        - 0.00514 * e * sind(mp + m)
        + 0.00208 * e * e * sind(2.0 * m)
        - 0.00111 * sind(mp - 2.0 * f)
        - 0.00057 * sind(mp + 2.0 * f)
        + 0.00056 * e * sind(2.0 * mp + m)
        - 0.00042 * sind(3.0 * mp)
        + 0.00042 * e * sind(m + 2.0 * f)
        + 0.00038 * e * sind(m - 2.0 * f)
        - 0.00024 * e * sind(2.0 * mp - m)
        - 0.00017 * sind(omega)
        - 0.00007 * sind(mp + 2.0 * m)
        + 0.00004 * sind(2.0 * mp - 2.0 * f)
        + 0.00004 * sind(3.0 * m)
        + 0.00003 * sind(mp + m - 2.0 * f)
        + 0.00003 * sind(2.0 * mp + 2.0 * f)
        - 0.00003 * sind(mp + m + 2.0 * f)
        + 0.00003 * sind(mp - m + 2.0 * f)
        - 0.00002 * sind(mp - m - 2.0 * f)
        - 0.00002 * sind(3.0 * mp + m)
        + 0.00002 * sind(4.0 * mp);

    // Planetary arguments A1..A14: (constant, rate per lunation, amplitude in days)
    #[rustfmt::skip]
    const PLANETARY: [(f64, f64, f64); 14] = [
        (299.77, 0.107408, 0.000325),
        (251.88, 0.016321, 0.000165),
        (251.83, 26.651886, 0.000164),
        (349.42, 36.412478, 0.000126),
        (84.66, 18.206239, 0.000110),
        (141.74, 53.303771, 0.000062),
        (207.14, 2.453732, 0.000060),
        (154.84, 7.306860, 0.000056),
        (34.52, 27.261239, 0.000047),
        (207.19, 0.121824, 0.000042),
        (291.34, 1.844379, 0.000040),
        (161.72, 24.198154, 0.000037),
        (239.56, 25.513099, 0.000035),
        (331.55, 3.592518, 0.000023),
    ];
    let planetary: f64 = PLANETARY
        .iter()
        .enumerate()
        .map(|(i, &(a0, rate, amp))| {
            // A1 carries a quadratic term
            let quadratic = if i == 0 { -0.009173 * t2 } else { 0.0 };
            amp * sind(a0 + rate * k + quadratic)
        })
        .sum();

    jde += periodic + planetary;
    time_correlation.to_instant(jde, TimeConvention::Tdb)
}

/// Raw instant of the passage of the Moon through a node of its orbit (Meeus Ch. 51).
///
/// Integer `k` gives ascending nodes, `k + 0.5` the following descending node. `k = 0` is the
/// ascending node of 2000 January 21.
pub fn node_passage_estimate(time_correlation: &TimeCorrelation, k: f64) -> TimeStamp {
    let t = k / 1342.23;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let d = 183.6380 + 331.73735682 * k + 0.0014852 * t2 + 0.00000209 * t3 - 0.00000001 * t4;
    let m = 17.4006 + 26.82037250 * k + 0.0001186 * t2 + 0.00000006 * t3;
    let mp = 38.3776 + 355.52747313 * k + 0.0123499 * t2 + 0.000014627 * t3 - 0.000000069 * t4;
    let omega = 123.9767 - 1.44098956 * k + 0.0020608 * t2 + 0.00000214 * t3 - 0.000000016 * t4;
    let v = 299.75 + 132.85 * t - 0.009173 * t2;
    let p = omega + 272.75 - 2.3 * t;

    let jde = 2451565.1619 + 27.212220817 * k + 0.0002762 * t2 + 0.000000021 * t3
        - 0.000000000088 * t4
        - 0.4721 * sind(mp)
        - 0.1649 * sind(2.0 * d)
        - 0.0868 * sind(2.0 * d - mp)
        + 0.0084 * sind(2.0 * d + mp)
        - 0.0083 * sind(2.0 * d - m)
        - 0.0039 * sind(2.0 * d - m - mp)
        + 0.0034 * sind(2.0 * mp)
        - 0.0031 * sind(2.0 * d - 2.0 * mp)
        + 0.0030 * sind(2.0 * d + m)
        + 0.0028 * sind(m - mp)
        + 0.0026 * sind(m)
        + 0.0025 * sind(4.0 * d)
        + 0.0024 * sind(d)
        + 0.0022 * sind(m + mp)
        + 0.0017 * sind(omega)
        + 0.0014 * sind(4.0 * d - mp)
        + 0.0005 * sind(2.0 * d + m - mp)
        + 0.0004 * sind(2.0 * d - m + mp)
        - 0.0003 * sind(2.0 * d - 2.0 * m)
        + 0.0003 * sind(4.0 * d - m)
        + 0.0003 * sind(v)
        + 0.0003 * sind(p);

    time_correlation.to_instant(jde, TimeConvention::Tdb)
}

/// Passages of the Moon through the ecliptic plane between two fractional years.
///
/// For every node cycle `k` in `floor((year_start − 2000.05)·13.4223) ..
/// ceil((year_end − 2000.05)·13.4223)` the ascending (`k`) and the descending (`k + 0.5`)
/// estimates are emitted, then each is refined once: the ecliptic J2000 `z` of the Moon is
/// sampled at the estimate and one refinement step later and the estimate is shifted to the
/// zero of the linear fit.
///
/// Arguments
/// -----------------
/// * `ctx`: computation context.
/// * `year_start`, `year_end`: fractional years bounding the search.
///
/// Return
/// ----------
/// * Time-ordered timestamps, alternating ascending and descending nodes. Empty when
///   `year_end <= year_start` collapses the index range.
pub fn node_passages<L: LunarEphemeris, H>(
    ctx: &Umbra<L, H>,
    year_start: Year,
    year_end: Year,
) -> Vec<TimeStamp> {
    let corr = ctx.get_time_correlation();
    let step = ctx.get_params().refine_step();

    cycle_range(year_start, year_end, 2000.05, 13.4223)
        .flat_map(|k| [k as f64, k as f64 + 0.5])
        .map(|k| {
            let initial = node_passage_estimate(corr, k);
            let later = corr.shift(&initial, step);

            let z0 = ctx.get_moon().geocentric_ecliptic(&initial).position.z;
            let z1 = ctx.get_moon().geocentric_ecliptic(&later).position.z;
            let num_steps = -z0 / (z1 - z0);

            debug!(
                "node passage k={k}: refined by {:.3} min",
                num_steps * step * 1440.0
            );
            corr.shift(&initial, num_steps * step)
        })
        .collect()
}

/// New moons between two fractional years.
///
/// For every lunation `k` in `floor((year_start − 2000)·12.3685) .. ceil((year_end −
/// 2000)·12.3685)` the raw estimate is refined once: the ecliptic longitudes of the Moon and of
/// the Sun are sampled at the estimate and one refinement step later, and the estimate is shifted
/// to the zero of the linearly interpolated longitude difference. The Sun is the opposite of the
/// heliocentric Earth taken one fixed light time earlier.
///
/// Return
/// ----------
/// * Time-ordered timestamps, or the error of the heliocentric ephemeris.
pub fn new_moons<L: LunarEphemeris, H: HeliocentricEphemeris>(
    ctx: &Umbra<L, H>,
    year_start: Year,
    year_end: Year,
) -> Result<Vec<TimeStamp>, UmbraError> {
    let corr = ctx.get_time_correlation();
    let params = ctx.get_params();
    let step = params.refine_step();

    let sun_longitude = |time: &TimeStamp| -> Result<Degree, UmbraError> {
        let emitted = corr.shift(time, -params.sun_light_time());
        Ok(ctx
            .get_planets()
            .for_body(Body::Earth, &emitted)?
            .negated()
            .longitude())
    };
    let moon_longitude = |time: &TimeStamp| ctx.get_moon().geocentric_ecliptic(time).longitude();

    cycle_range(year_start, year_end, 2000.0, 12.3685)
        .map(|k| -> Result<TimeStamp, UmbraError> {
            let initial = new_moon_estimate(corr, k as f64);
            let later = corr.shift(&initial, step);

            let lon_sun0 = sun_longitude(&initial)?;
            let lon_sun1 = sun_longitude(&later)?;
            let lon_moon0 = moon_longitude(&initial);
            let lon_moon1 = moon_longitude(&later);

            let diff_sun = angle_diff(lon_sun1, lon_sun0);
            let diff_moon = angle_diff(lon_moon1, lon_moon0);
            let num_steps = angle_diff(lon_sun0, lon_moon0) / (diff_moon - diff_sun);

            debug!(
                "new moon k={k}: refined by {:.3} min",
                num_steps * step * 1440.0
            );
            Ok(corr.shift(&initial, num_steps * step))
        })
        .collect()
}

/// Rate of the geocentric ecliptic longitude of the Moon, in degrees per day.
///
/// Forward difference over `step_seconds`, with the longitude difference wrapped into
/// (−180°, 180°].
pub fn moon_longitude_rate<L: LunarEphemeris, H>(
    ctx: &Umbra<L, H>,
    time: &TimeStamp,
    step_seconds: f64,
) -> f64 {
    let step = step_seconds / SECONDS_PER_DAY;
    let later = ctx.get_time_correlation().shift(time, step);

    let lon0 = ctx.get_moon().geocentric_ecliptic(time).longitude();
    let lon1 = ctx.get_moon().geocentric_ecliptic(&later).longitude();
    angle_diff(lon1, lon0) / step
}

/// Inclination of the lunar motion on the ecliptic, in degrees, `asin(Δz / |Δr|)` of the
/// displacement of the Moon over `step_seconds`.
///
/// Evaluated at a node passage this is the inclination of the orbit, positive at an ascending
/// node and negative at a descending one.
pub fn moon_node_inclination<L: LunarEphemeris, H>(
    ctx: &Umbra<L, H>,
    time: &TimeStamp,
    step_seconds: f64,
) -> Degree {
    let later = ctx
        .get_time_correlation()
        .shift(time, step_seconds / SECONDS_PER_DAY);

    let r0 = ctx.get_moon().geocentric_ecliptic(time).position;
    let r1 = ctx.get_moon().geocentric_ecliptic(&later).position;
    let dr = r1 - r0;
    (dr.z / dr.norm()).asin() / RADEG
}
