//! # Time scales and sidereal time
//!
//! Every instant handled by the eclipse computations is a [`TimeStamp`]: the same physical
//! instant expressed as Julian Dates in TDB, TT, TAI, UTC and UT1. Timestamps are only produced
//! by a [`TimeCorrelation`] context. TT is the pivot scale: [`hifitime`] relates it to TAI and
//! UTC, the Fairhead & Bretagnon series gives TDB and a ΔT = TT − UT1 table gives UT1.
//!
//! ## Overview
//!
//! - [`TimeCorrelation::to_instant`] builds a timestamp from a Julian Date in any [`TimeConvention`].
//! - [`TimeCorrelation::shift`] moves a timestamp by a number of days (TDB).
//! - [`gmst`] / [`gast`] give the Greenwich mean and apparent sidereal time.
use hifitime::{Epoch, TimeScale};
use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    constants::{
        Degree, Year, DAYS_PER_CENTURY, DPI, JD, JD2000, JDTOMJD, MJD, RADEG, RADSEC,
        SECONDS_PER_DAY, T2000,
    },
    earth_orientation::NutationData,
    umbra_errors::UmbraError,
};

/// ΔT = TT − UT1 in seconds at the beginning of selected years.
///
/// Values before 1955 come from historical reconstructions, later values from IERS
/// observations. Outside the table the closest value is held constant.
const DELTA_T_TABLE: [(Year, f64); 45] = [
    (1900.0, -2.72),
    (1905.0, 3.86),
    (1910.0, 10.46),
    (1915.0, 17.20),
    (1920.0, 21.16),
    (1925.0, 23.62),
    (1930.0, 24.02),
    (1935.0, 23.93),
    (1940.0, 24.33),
    (1945.0, 26.77),
    (1950.0, 29.15),
    (1955.0, 31.07),
    (1960.0, 33.15),
    (1965.0, 35.73),
    (1970.0, 40.18),
    (1975.0, 45.48),
    (1980.0, 50.54),
    (1985.0, 54.34),
    (1990.0, 56.86),
    (1995.0, 60.78),
    (2000.0, 63.83),
    (2001.0, 64.09),
    (2002.0, 64.30),
    (2003.0, 64.47),
    (2004.0, 64.57),
    (2005.0, 64.69),
    (2006.0, 64.85),
    (2007.0, 65.15),
    (2008.0, 65.46),
    (2009.0, 65.78),
    (2010.0, 66.07),
    (2011.0, 66.32),
    (2012.0, 66.60),
    (2013.0, 66.91),
    (2014.0, 67.28),
    (2015.0, 67.64),
    (2016.0, 68.10),
    (2017.0, 68.59),
    (2018.0, 68.97),
    (2019.0, 69.22),
    (2020.0, 69.36),
    (2021.0, 69.36),
    (2022.0, 69.29),
    (2023.0, 69.20),
    (2024.0, 69.18),
];

/// Time scale in which a Julian Date is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeConvention {
    Tdb,
    Tt,
    Tai,
    Utc,
    Ut1,
}

/// TDB − TT in days at a TT Julian Date.
///
/// Largest periodic terms of Fairhead & Bretagnon (1990), better than 30 µs over several
/// millennia around J2000.
pub fn tdb_minus_tt(jd_tt: JD) -> f64 {
    let t = (jd_tt - JD2000) / DAYS_PER_CENTURY;

    let m_e = (357.5291092 + 35999.0502909 * t) * RADEG;
    let m_j = (246.4512 + 3035.2335 * t) * RADEG;
    let d = (297.8502042 + 445267.1115168 * t) * RADEG;
    let om = (125.0445550 - 1934.1362091 * t) * RADEG;

    let seconds = 0.001_657 * (m_e + 0.01671 * m_e.sin()).sin()
        + 0.000_022 * (d - m_e).sin()
        + 0.000_014 * (2.0 * d).sin()
        + 0.000_005 * m_j.sin()
        + 0.000_005 * om.sin();
    seconds / SECONDS_PER_DAY
}

/// One physical instant expressed in several time scales.
///
/// All fields are Julian Dates. Instances are built by [`TimeCorrelation`] and never mutated:
/// shifting a timestamp yields a new value with every scale recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeStamp {
    pub jd_tdb: JD,
    pub jd_tt: JD,
    pub jd_tai: JD,
    pub jd_utc: JD,
    pub jd_ut1: JD,
}

impl TimeStamp {
    /// Complete the atomic and civil scales of an instant known in TDB, TT and UT1.
    fn new(jd_tdb: JD, jd_tt: JD, jd_ut1: JD) -> Self {
        let epoch = Epoch::from_mjd_in_time_scale(jd_tt - JDTOMJD, TimeScale::TT);
        TimeStamp {
            jd_tdb,
            jd_tt,
            jd_tai: epoch.to_jde_tai_days(),
            jd_utc: epoch.to_jde_utc_days(),
            jd_ut1,
        }
    }

    /// Modified Julian Date in TT, the argument of the Earth orientation models.
    pub fn mjd_tt(&self) -> MJD {
        self.jd_tt - JDTOMJD
    }

    /// Modified Julian Date in UT1, the argument of [`gmst`].
    pub fn mjd_ut1(&self) -> MJD {
        self.jd_ut1 - JDTOMJD
    }
}

/// Read-only time correlation context.
///
/// Holds the ΔT table used to relate UT1 to the uniform time scales. The context is built once
/// by the caller and passed by reference into every computation.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCorrelation {
    /// (fractional year, ΔT in seconds), sorted by year.
    delta_t: Vec<(Year, f64)>,
}

impl Default for TimeCorrelation {
    fn default() -> Self {
        TimeCorrelation {
            delta_t: DELTA_T_TABLE.to_vec(),
        }
    }
}

impl TimeCorrelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a custom ΔT table.
    ///
    /// Arguments
    /// ---------
    /// * `entries`: pairs of (fractional year, ΔT in seconds).
    ///
    /// Return
    /// ------
    /// * the context, or [`UmbraError::InvalidDeltaTTable`] if the table is empty, contains
    ///   non-finite values or is not strictly increasing in year.
    pub fn with_delta_t(entries: Vec<(Year, f64)>) -> Result<Self, UmbraError> {
        if entries.is_empty() {
            return Err(UmbraError::InvalidDeltaTTable(
                "no ΔT entries provided".into(),
            ));
        }
        if entries
            .iter()
            .any(|(year, dt)| !year.is_finite() || !dt.is_finite())
        {
            return Err(UmbraError::InvalidDeltaTTable(
                "ΔT entries must be finite".into(),
            ));
        }
        if entries.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(UmbraError::InvalidDeltaTTable(
                "years must be strictly increasing".into(),
            ));
        }
        Ok(TimeCorrelation { delta_t: entries })
    }

    /// Parse a ΔT table from text.
    ///
    /// Each non-empty line holds a fractional year and ΔT in seconds separated by whitespace.
    /// Everything after a `#` is ignored.
    pub fn parse_delta_t(content: &str) -> Result<Self, UmbraError> {
        let mut entries = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(year), Some(value), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(UmbraError::DeltaTParse {
                    line: idx + 1,
                    reason: "expected two columns".into(),
                });
            };

            let parse = |s: &str| {
                f64::from_str(s).map_err(|e| UmbraError::DeltaTParse {
                    line: idx + 1,
                    reason: e.to_string(),
                })
            };
            entries.push((parse(year)?, parse(value)?));
        }

        Self::with_delta_t(entries)
    }

    /// ΔT = TT − UT1 in seconds, linearly interpolated in the table.
    ///
    /// Arguments
    /// ---------
    /// * `jd`: Julian Date (TT or UT1, the difference is irrelevant at table resolution).
    pub fn delta_t(&self, jd: JD) -> f64 {
        let year = 2000.0 + (jd - JD2000) / 365.25;

        let (first, last) = match (self.delta_t.first(), self.delta_t.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return 0.0,
        };
        if year <= first.0 {
            if year < first.0 {
                warn!("ΔT requested for {year:.2}, before the table start {:.2}", first.0);
            }
            return first.1;
        }
        if year >= last.0 {
            if year > last.0 {
                warn!("ΔT requested for {year:.2}, after the table end {:.2}", last.0);
            }
            return last.1;
        }

        let idx = self
            .delta_t
            .partition_point(|&(y, _)| y <= year)
            .saturating_sub(1);
        let (y0, d0) = self.delta_t[idx];
        let (y1, d1) = self.delta_t[idx + 1];
        d0 + (year - y0) / (y1 - y0) * (d1 - d0)
    }

    /// Build the timestamp of a Julian Date given in the time scale `convention`.
    ///
    /// The Julian Date is kept as given in its own scale; the other scales are derived from it.
    pub fn to_instant(&self, jd: JD, convention: TimeConvention) -> TimeStamp {
        match convention {
            TimeConvention::Tdb => {
                let jd_tt = jd - tdb_minus_tt(jd);
                TimeStamp::new(jd, jd_tt, self.ut1_from_tt(jd_tt))
            }
            TimeConvention::Tt => TimeStamp::new(jd + tdb_minus_tt(jd), jd, self.ut1_from_tt(jd)),
            TimeConvention::Ut1 => {
                let jd_tt = jd + self.delta_t(jd) / SECONDS_PER_DAY;
                TimeStamp::new(jd_tt + tdb_minus_tt(jd_tt), jd_tt, jd)
            }
            TimeConvention::Tai => self.via_hifitime(jd, TimeScale::TAI),
            TimeConvention::Utc => self.via_hifitime(jd, TimeScale::UTC),
        }
    }

    /// TAI and UTC go through TT with hifitime, which carries the leap seconds.
    fn via_hifitime(&self, jd: JD, scale: TimeScale) -> TimeStamp {
        let jd_tt = Epoch::from_mjd_in_time_scale(jd - JDTOMJD, scale).to_jde_tt_days();
        self.to_instant(jd_tt, TimeConvention::Tt)
    }

    fn ut1_from_tt(&self, jd_tt: JD) -> JD {
        jd_tt - self.delta_t(jd_tt) / SECONDS_PER_DAY
    }

    /// Shift a timestamp by `days` of TDB.
    pub fn shift(&self, time: &TimeStamp, days: f64) -> TimeStamp {
        self.to_instant(time.jd_tdb + days, TimeConvention::Tdb)
    }

    /// Parse an ISO 8601 date (with an optional hifitime time scale suffix, UTC by default).
    pub fn instant_from_str(&self, date: &str) -> Result<TimeStamp, UmbraError> {
        let epoch = Epoch::from_str(date)?;
        Ok(match epoch.time_scale {
            TimeScale::TDB | TimeScale::ET => {
                self.to_instant(epoch.to_jde_tdb_days(), TimeConvention::Tdb)
            }
            _ => self.to_instant(epoch.to_jde_tt_days(), TimeConvention::Tt),
        })
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996.
/// * Explanatory Supplement to the Astronomical Almanac (1992).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_CENTURY;

    // GMST at 0h UT1, seconds → radians
    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / SECONDS_PER_DAY;

    // Fraction of the day, scaled to sidereal rate
    let h = (tjm - itjm) * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Greenwich Apparent Sidereal Time in degrees, in [0, 360).
///
/// GAST is GMST corrected by the equation of the equinoxes Δψ·cos ε, plus the IAU 1994
/// complementary terms in the longitude of the lunar node evaluated at TDB.
///
/// # Arguments
/// * `jd_ut1` - Julian Date, UT1
/// * `jd_tdb` - Julian Date, TDB
/// * `nutation` - nutation angles of the instant
///
/// # See also
/// * [`gmst`]
/// * [`NutationData::equation_of_equinoxes`]
pub fn gast(jd_ut1: JD, jd_tdb: JD, nutation: &NutationData) -> Degree {
    let t = (jd_tdb - JD2000) / DAYS_PER_CENTURY;
    let omega = (125.04452 - 1934.136261 * t) * RADEG;
    let complementary = (0.00264 * omega.sin() + 0.000063 * (2.0 * omega).sin()) * RADSEC;

    let gast = gmst(jd_ut1 - JDTOMJD) + nutation.equation_of_equinoxes() + complementary;
    (gast / RADEG).rem_euclid(360.0)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gmst() {
        let tut = 57028.478514610404;
        let res_gmst = gmst(tut);
        assert_relative_eq!(res_gmst, 4.851925725092499, epsilon = 1e-12);

        let res_gmst = gmst(T2000);
        assert_relative_eq!(res_gmst, 4.894961212789145, epsilon = 1e-12);
    }

    #[test]
    fn test_gast_close_to_gmst() {
        let corr = TimeCorrelation::default();
        let ts = corr.to_instant(2_459_000.5, TimeConvention::Ut1);
        let nut = NutationData::iau1980(&ts);
        let gast_deg = gast(ts.jd_ut1, ts.jd_tdb, &nut);
        let gmst_deg = gmst(ts.mjd_ut1()) / RADEG;

        // The equation of the equinoxes stays below ~1.2 s of time
        let diff = (gast_deg - gmst_deg + 180.0).rem_euclid(360.0) - 180.0;
        assert!(diff.abs() < 0.005, "diff = {diff}");
        assert!((0.0..360.0).contains(&gast_deg));
    }

    #[test]
    fn test_tdb_scales_at_j2000() {
        let corr = TimeCorrelation::default();
        let ts = corr.to_instant(JD2000, TimeConvention::Tt);

        assert_relative_eq!(ts.jd_tt, JD2000, epsilon = 1e-9);
        assert_relative_eq!((ts.jd_tt - ts.jd_tai) * SECONDS_PER_DAY, 32.184, epsilon = 1e-3);
        // 32 leap seconds in effect on 2000-01-01
        assert_relative_eq!((ts.jd_tai - ts.jd_utc) * SECONDS_PER_DAY, 32.0, epsilon = 1e-3);
        assert_relative_eq!((ts.jd_tt - ts.jd_ut1) * SECONDS_PER_DAY, 63.83, epsilon = 0.05);
        // TDB − TT is below 2 ms
        assert!((ts.jd_tdb - ts.jd_tt).abs() * SECONDS_PER_DAY < 2e-3);

        // Back from the civil and atomic scales
        let from_utc = corr.to_instant(ts.jd_utc, TimeConvention::Utc);
        assert_relative_eq!(from_utc.jd_tt, JD2000, epsilon = 1e-8);
        let from_tai = corr.to_instant(ts.jd_tai, TimeConvention::Tai);
        assert_relative_eq!(from_tai.jd_tdb, ts.jd_tdb, epsilon = 1e-8);
    }

    #[test]
    fn test_ut1_round_trip() {
        let corr = TimeCorrelation::default();
        for jd_ut1 in [2_415_020.5, 2_451_544.5, 2_458_849.5, 2_466_154.5] {
            let ts = corr.to_instant(jd_ut1, TimeConvention::Ut1);
            let back = corr.to_instant(ts.jd_tdb, TimeConvention::Tdb);
            // A few ulps of a Julian Date near 2.4e6
            assert_relative_eq!(back.jd_ut1, jd_ut1, epsilon = 2e-9);
            assert_relative_eq!(back.jd_tt, ts.jd_tt, epsilon = 2e-9);
        }
    }

    #[test]
    fn test_tdb_instant_is_kept() {
        let corr = TimeCorrelation::default();
        let ts = corr.to_instant(JD2000, TimeConvention::Tdb);
        assert_eq!(ts.jd_tdb, JD2000);
        assert!((ts.jd_tt - JD2000).abs() * SECONDS_PER_DAY < 2e-3);

        // Repeated shifts accumulate exactly the requested durations
        let mut shifted = ts;
        for _ in 0..1440 {
            shifted = corr.shift(&shifted, 1.0 / 1440.0);
        }
        assert_relative_eq!(shifted.jd_tdb - ts.jd_tdb, 1.0, epsilon = 1e-6);
        assert_relative_eq!(shifted.jd_ut1 - ts.jd_ut1, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tdb_minus_tt() {
        // Annual term of 1.657 ms, maximum near perihelion + 90 days
        for day in 0..366 {
            let dt = tdb_minus_tt(JD2000 + day as f64) * SECONDS_PER_DAY;
            assert!(dt.abs() < 1.72e-3, "dt = {dt}");
        }
        let early_april = tdb_minus_tt(JD2000 + 92.0) * SECONDS_PER_DAY;
        assert!(early_april > 1.5e-3, "dt = {early_april}");
    }

    #[test]
    fn test_shift() {
        let corr = TimeCorrelation::default();
        let ts = corr.to_instant(2_458_849.5, TimeConvention::Tdb);
        let shifted = corr.shift(&ts, 1.0 / 1440.0);
        assert_relative_eq!(
            (shifted.jd_tdb - ts.jd_tdb) * 1440.0,
            1.0,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            (shifted.jd_ut1 - ts.jd_ut1) * 1440.0,
            1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_delta_t_interpolation() {
        let corr = TimeCorrelation::default();
        // Mid 2010 lies between 66.07 and 66.32
        let dt = corr.delta_t(JD2000 + 10.5 * 365.25);
        assert_relative_eq!(dt, (66.07 + 66.32) / 2.0, epsilon = 1e-9);
        // Held constant beyond the table
        assert_eq!(corr.delta_t(JD2000 + 60.0 * 365.25), 69.18);
    }

    #[test]
    fn test_parse_delta_t() {
        let content = "# year  dT\n2000.0 63.83\n\n2010.0 66.07 # comment\n";
        let corr = TimeCorrelation::parse_delta_t(content).unwrap();
        assert_relative_eq!(
            corr.delta_t(JD2000 + 5.0 * 365.25),
            (63.83 + 66.07) / 2.0,
            epsilon = 1e-9
        );

        let err = TimeCorrelation::parse_delta_t("2000.0 abc").unwrap_err();
        assert!(matches!(err, UmbraError::DeltaTParse { line: 1, .. }));

        let err = TimeCorrelation::parse_delta_t("2000.0 1.0 2.0").unwrap_err();
        assert!(matches!(err, UmbraError::DeltaTParse { line: 1, .. }));

        let err = TimeCorrelation::parse_delta_t("# nothing").unwrap_err();
        assert_eq!(
            err,
            UmbraError::InvalidDeltaTTable("no ΔT entries provided".into())
        );
    }

    #[test]
    fn test_with_delta_t_rejects_unsorted() {
        let err = TimeCorrelation::with_delta_t(vec![(2001.0, 64.0), (2000.0, 63.8)]).unwrap_err();
        assert_eq!(
            err,
            UmbraError::InvalidDeltaTTable("years must be strictly increasing".into())
        );
    }

    #[test]
    fn test_instant_from_str() {
        let corr = TimeCorrelation::default();
        let ts = corr.instant_from_str("2021-01-01T00:00:00 UTC").unwrap();
        assert_relative_eq!(ts.jd_utc, 2_459_215.5, epsilon = 1e-8);

        // Greatest eclipse of 2017 August 21, given in TDB
        let ts = corr.instant_from_str("2017-08-21T18:26:40 TDB").unwrap();
        assert_relative_eq!(ts.jd_tdb, 2_457_987.268_518_5, epsilon = 1e-7);

        assert!(corr.instant_from_str("not a date").is_err());
    }
}
