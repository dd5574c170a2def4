//! # Solar eclipse detection
//!
//! Eclipse search and classification after Urban & Seidelmann, *Explanatory Supplement to the
//! Astronomical Almanac*, 3rd ed., §11.2.
//!
//! ## Method
//!
//! 1. Node passages and new moons are listed over the search window.
//! 2. At every node passage the inclination of the lunar path on the ecliptic and the rate of
//!    lunar longitude are sampled once.
//! 3. Each new moon is paired with the node passage nearest in TDB. With the Moon's latitude
//!    `β_m` at conjunction and `λ` the ratio of the lunar to the solar longitude rates:
//!
//!    ```text
//!    γ = atan( λ·tan i / ((λ−1)² + λ²·tan² i) )          (11.6)
//!    σ = β_m·(λ−1) / sqrt((λ−1)² + λ²·tan² i)             (11.7)
//!    ```
//!
//!    `σ` is the least geocentric angular separation of the centres, reached `β_m·tan γ` of solar
//!    longitude before the conjunction.
//! 4. `σ` is compared with the limits built from the semi-diameters `s` and horizontal
//!    parallaxes `π` of the Sun and the Moon:
//!
//!    ```text
//!    partial:         s☉ + s☾ + π☾ − π☉                   (11.21)
//!    total/annular:   s☉ − s☾ + π☾ − π☉                   (11.23)
//!    ```
//!
//! Candidates beyond the partial limit are discarded; they are not errors.
use std::fmt;

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Kilometer, Year, EARTH_MEAN_RADIUS, MOON_RADIUS, RADEG, SUN_RADIUS},
    ephemeris::{Body, HeliocentricEphemeris, LunarEphemeris},
    moon::{moon_longitude_rate, moon_node_inclination, new_moons, node_passages},
    time::{TimeConvention, TimeStamp},
    umbra::Umbra,
    umbra_errors::UmbraError,
};

/// Kind of a solar eclipse, from the least geocentric separation of the centres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EclipseType {
    Partial,
    Total,
    Annular,
}

impl fmt::Display for EclipseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EclipseType::Partial => "Partial",
            EclipseType::Total => "Total",
            EclipseType::Annular => "Annular",
        };
        write!(f, "{name}")
    }
}

/// A detected solar eclipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEclipse {
    /// Refined instant of the new moon
    pub new_moon: TimeStamp,
    /// Instant of least separation of the centres
    pub max_time: TimeStamp,
    pub eclipse_type: EclipseType,
    /// Least geocentric separation of the centres (deg), signed as `β_m`
    pub sigma: Degree,
    /// Ecliptic latitude of the Moon at the new moon (deg)
    pub beta_m: Degree,
    /// Angle of the relative path of the Moon with the ecliptic (deg)
    pub gamma: Degree,
}

/// Node passage with the local geometry of the lunar path.
#[derive(Debug, Clone, Copy)]
struct NodePassage {
    time: TimeStamp,
    /// Degrees, positive at an ascending node
    inclination: Degree,
    /// Degrees per day
    longitude_rate: f64,
}

/// Angular limits on the least separation of the centres, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipseLimits {
    pub semi_sun: Degree,
    pub semi_moon: Degree,
    /// No eclipse at or beyond this separation (11.21)
    pub partial: Degree,
    /// Central eclipse below this separation (11.23)
    pub total: Degree,
}

impl EclipseLimits {
    /// Limits from the geocentric distances of the Moon and of the Sun, in km.
    pub fn new(moon_dist: Kilometer, sun_dist: Kilometer) -> Self {
        let semi_moon = atand(MOON_RADIUS / moon_dist);
        let semi_sun = atand(SUN_RADIUS / sun_dist);
        let hori_moon = atand(EARTH_MEAN_RADIUS / moon_dist);
        let hori_sun = atand(EARTH_MEAN_RADIUS / sun_dist);

        EclipseLimits {
            semi_sun,
            semi_moon,
            partial: semi_sun + semi_moon + hori_moon - hori_sun,
            total: semi_sun - semi_moon + hori_moon - hori_sun,
        }
    }

    /// Classify a least separation `sigma`, `None` when no eclipse occurs.
    pub fn classify(&self, sigma: Degree) -> Option<EclipseType> {
        let sep = sigma.abs();
        if sep >= self.partial {
            None
        } else if sep < self.total {
            if self.semi_sun < self.semi_moon {
                Some(EclipseType::Total)
            } else {
                Some(EclipseType::Annular)
            }
        } else {
            Some(EclipseType::Partial)
        }
    }
}

/// Index of the item of `items` with the smallest `distance`.
///
/// When several items share the smallest distance the first one wins.
///
/// Return
/// ----------
/// * `None` for an empty slice.
pub fn find_closest<T, F>(items: &[T], distance: F) -> Option<usize>
where
    F: Fn(&T) -> f64,
{
    items
        .iter()
        .position_min_by(|a, b| distance(a).total_cmp(&distance(b)))
}

/// Arctangent in degrees.
#[inline]
fn atand(x: f64) -> Degree {
    x.atan() / RADEG
}

/// Solar eclipses of the lunations found from `start_year` to `end_year + 1`.
///
/// Node passages and new moons are searched over `(start_year, end_year + 1)`, so the year
/// following `end_year` is covered as well.
///
/// Arguments
/// -----------------
/// * `ctx`: computation context.
/// * `start_year`, `end_year`: fractional years.
///
/// Return
/// ----------
/// * The eclipses sorted by new moon, or the error of the heliocentric ephemeris. Empty when
///   `end_year <= start_year`.
pub fn solar_eclipses<L: LunarEphemeris, H: HeliocentricEphemeris>(
    ctx: &Umbra<L, H>,
    start_year: Year,
    end_year: Year,
) -> Result<Vec<SolarEclipse>, UmbraError> {
    if end_year <= start_year {
        debug!("empty eclipse search window {start_year}..{end_year}");
        return Ok(Vec::new());
    }

    let corr = ctx.get_time_correlation();
    let params = ctx.get_params();
    let step = params.node_sample_step_seconds();

    let nodes: Vec<NodePassage> = node_passages(ctx, start_year, end_year + 1.0)
        .into_iter()
        .map(|time| NodePassage {
            time,
            inclination: moon_node_inclination(ctx, &time, step),
            longitude_rate: moon_longitude_rate(ctx, &time, step),
        })
        .collect();
    let candidates = new_moons(ctx, start_year, end_year + 1.0)?;

    let mut eclipses = Vec::new();
    for new_moon in &candidates {
        let Some(idx) = find_closest(&nodes, |node| (node.time.jd_tdb - new_moon.jd_tdb).abs())
        else {
            continue;
        };
        let node = &nodes[idx];

        let moon = ctx.get_moon().geocentric_ecliptic(new_moon);
        let moon_dist = moon.position.norm();
        let beta_m = moon.latitude();

        let tan_i = (node.inclination * RADEG).tan();
        let lambda = node.longitude_rate / params.sun_mean_rate();
        let lambda_m1 = lambda - 1.0;
        let denom = lambda_m1.powi(2) + lambda * lambda * tan_i * tan_i;

        let gamma = atand(lambda * tan_i / denom);
        let sigma = beta_m * lambda_m1 / denom.sqrt();

        let lon_diff_min = beta_m * (gamma * RADEG).tan();
        let jd_max = new_moon.jd_tdb - lon_diff_min / params.sun_mean_rate();

        let emitted = corr.shift(new_moon, -params.sun_light_time());
        let sun_dist = ctx
            .get_planets()
            .for_body(Body::Earth, &emitted)?
            .position
            .norm();

        let limits = EclipseLimits::new(moon_dist, sun_dist);
        let Some(eclipse_type) = limits.classify(sigma) else {
            debug!(
                "new moon JD {:.5} TDB: |sigma| {:.4} >= {:.4}, no eclipse",
                new_moon.jd_tdb,
                sigma.abs(),
                limits.partial
            );
            continue;
        };

        debug!(
            "new moon JD {:.5} TDB: {eclipse_type} eclipse, sigma {sigma:.4}, gamma {gamma:.4}",
            new_moon.jd_tdb
        );

        eclipses.push(SolarEclipse {
            new_moon: *new_moon,
            max_time: corr.to_instant(jd_max, TimeConvention::Tdb),
            eclipse_type,
            sigma,
            beta_m,
            gamma,
        });
    }

    info!(
        "{} solar eclipses from {} new moons and {} node passages ({start_year}..{})",
        eclipses.len(),
        candidates.len(),
        nodes.len(),
        end_year + 1.0
    );

    Ok(eclipses)
}

#[cfg(test)]
mod solar_eclipses_test {
    use super::*;
    use crate::unit_test_global::{ECLIPSES_2017, UMBRA_TEST};
    use approx::assert_relative_eq;

    #[test]
    fn test_find_closest() {
        let items = [1.0, 4.0, 6.0, 10.0];
        let to = |target: f64| move |x: &f64| (x - target).abs();

        assert_eq!(find_closest(&items, to(4.2)), Some(1));
        assert_eq!(find_closest(&items, to(-3.0)), Some(0));
        assert_eq!(find_closest(&items, to(42.0)), Some(3));
        assert_eq!(find_closest(&[] as &[f64], to(1.0)), None);
    }

    #[test]
    fn test_find_closest_tie_first_wins() {
        let items = [2.0, 4.0, 6.0];
        assert_eq!(find_closest(&items, |x: &f64| (*x - 5.0).abs()), Some(1));
        assert_eq!(find_closest(&items, |x: &f64| (*x - 3.0).abs()), Some(0));
    }

    #[test]
    fn test_limits_classification() {
        // Moon at perigee, Sun at aphelion: the Moon covers the Sun
        let limits = EclipseLimits::new(356_500.0, 152.1e6);
        assert!(limits.semi_moon > limits.semi_sun);
        assert!(limits.total < limits.partial);
        assert_relative_eq!(limits.partial - limits.total, 2.0 * limits.semi_moon, epsilon = 1e-12);

        assert_eq!(limits.classify(0.1), Some(EclipseType::Total));
        assert_eq!(limits.classify(-0.1), Some(EclipseType::Total));
        assert_eq!(limits.classify(limits.total), Some(EclipseType::Partial));
        assert_eq!(limits.classify(limits.partial), None);
        assert_eq!(limits.classify(2.0), None);

        // Moon at apogee, Sun at perihelion: annular
        let limits = EclipseLimits::new(406_700.0, 147.1e6);
        assert!(limits.semi_moon < limits.semi_sun);
        assert_eq!(limits.classify(0.0), Some(EclipseType::Annular));
    }

    #[test]
    fn test_eclipse_type_display() {
        assert_eq!(EclipseType::Partial.to_string(), "Partial");
        assert_eq!(EclipseType::Total.to_string(), "Total");
        assert_eq!(EclipseType::Annular.to_string(), "Annular");
    }

    #[test]
    fn test_eclipses_2017() {
        let eclipses = &*ECLIPSES_2017;
        assert_eq!(eclipses.len(), 2);

        // 2017 February 26, greatest eclipse 14:54:33 TD
        let annular = &eclipses[0];
        assert_eq!(annular.eclipse_type, EclipseType::Annular);
        assert_relative_eq!(annular.max_time.jd_tdb, 2457811.121215, epsilon = 120.0 / 86400.0);
        assert!(annular.beta_m < 0.0);

        // 2017 August 21, greatest eclipse 18:26:40 TD
        let total = &eclipses[1];
        assert_eq!(total.eclipse_type, EclipseType::Total);
        assert_relative_eq!(total.max_time.jd_tdb, 2457987.268519, epsilon = 120.0 / 86400.0);
        assert!(total.beta_m > 0.0);

        for eclipse in eclipses {
            assert!(eclipse.sigma.abs() < 1.6);
            assert_eq!(eclipse.sigma.signum(), eclipse.beta_m.signum());
            // Greatest eclipse within a few hours of the conjunction
            assert!((eclipse.max_time.jd_tdb - eclipse.new_moon.jd_tdb).abs() < 0.25);
        }
    }

    #[test]
    fn test_empty_window() {
        assert!(solar_eclipses(&*UMBRA_TEST, 2010.0, 2008.0)
            .unwrap()
            .is_empty());
        // No widening of a collapsed window
        assert!(solar_eclipses(&*UMBRA_TEST, 2012.0, 2012.0)
            .unwrap()
            .is_empty());
        assert!(solar_eclipses(&*UMBRA_TEST, 2015.5, 2015.0)
            .unwrap()
            .is_empty());
    }
}
