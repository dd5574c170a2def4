//! # Umbra: eclipse computation context
//!
//! This module defines the [`Umbra`] struct, the façade holding everything the eclipse
//! computations read:
//!
//! 1. **Time correlation** ([`TimeCorrelation`]): ΔT table relating UT1 to the uniform scales.
//! 2. **Lunar ephemeris** ([`LunarEphemeris`]): geocentric Moon, [`Elp2000`] by default.
//! 3. **Heliocentric ephemeris** ([`HeliocentricEphemeris`]): heliocentric Earth, [`Vsop87`]
//!    by default.
//! 4. **Search parameters** ([`EclipseParams`]).
//!
//! The context is immutable once built and is shared by reference, so a single instance can
//! serve concurrent callers.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use umbra::umbra::Umbra;
//! use umbra::time::TimeConvention;
//!
//! let ctx = Umbra::new();
//! let eclipses = ctx.solar_eclipses(2017.0, 2017.9).unwrap();
//!
//! for eclipse in &eclipses {
//!     let nutation = ctx.nutation(&eclipse.max_time);
//!     let bessel = ctx.besselian_solar(eclipse, &eclipse.max_time, &nutation).unwrap();
//!     let line = ctx.besselian_central_line(eclipse, &bessel);
//!     println!("{} {:?} zeta={}", eclipse.eclipse_type, eclipse.max_time, line.zeta);
//! }
//! ```
//!
//! ## See also
//! ------------
//! * [`moon`](crate::moon) – node passages and new moons.
//! * [`solar_eclipses`](crate::solar_eclipses) – detection and classification.
//! * [`besselian`](crate::besselian) – shadow-axis geometry.
//! * [`central_line`](crate::central_line) – projection on the Earth ellipsoid.
use crate::{
    besselian::{self, BesselianElements},
    central_line::{self, CentralLine},
    constants::Year,
    earth_orientation::NutationData,
    eclipse_params::EclipseParams,
    ephemeris::{elp2000::Elp2000, vsop87::Vsop87, HeliocentricEphemeris, LunarEphemeris},
    moon,
    solar_eclipses::{self, SolarEclipse},
    time::{TimeCorrelation, TimeStamp},
    umbra_errors::UmbraError,
};

#[derive(Debug, Clone)]
pub struct Umbra<L = Elp2000, H = Vsop87> {
    time_correlation: TimeCorrelation,
    moon: L,
    planets: H,
    params: EclipseParams,
}

impl Umbra {
    /// Construct a context with the built-in ΔT table, the analytical ephemerides and the
    /// default [`EclipseParams`].
    pub fn new() -> Self {
        Umbra {
            time_correlation: TimeCorrelation::default(),
            moon: Elp2000,
            planets: Vsop87,
            params: EclipseParams::default(),
        }
    }
}

impl Default for Umbra {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, H> Umbra<L, H> {
    /// Construct a context from caller-supplied ephemerides.
    ///
    /// Arguments
    /// -----------------
    /// * `time_correlation`: ΔT context used to build every [`TimeStamp`].
    /// * `moon`: geocentric lunar positions.
    /// * `planets`: heliocentric planetary positions (the Earth at least).
    pub fn with_ephemerides(time_correlation: TimeCorrelation, moon: L, planets: H) -> Self {
        Umbra {
            time_correlation,
            moon,
            planets,
            params: EclipseParams::default(),
        }
    }

    /// Replace the search parameters, consuming the context.
    pub fn with_params(self, params: EclipseParams) -> Self {
        Umbra { params, ..self }
    }

    pub fn get_time_correlation(&self) -> &TimeCorrelation {
        &self.time_correlation
    }

    pub fn get_moon(&self) -> &L {
        &self.moon
    }

    pub fn get_planets(&self) -> &H {
        &self.planets
    }

    pub fn get_params(&self) -> &EclipseParams {
        &self.params
    }

    /// IAU 1980 nutation angles at `time`.
    pub fn nutation(&self, time: &TimeStamp) -> NutationData {
        NutationData::iau1980(time)
    }
}

impl<L: LunarEphemeris, H: HeliocentricEphemeris> Umbra<L, H> {
    /// See [`moon::node_passages`].
    pub fn node_passages(&self, year_start: Year, year_end: Year) -> Vec<TimeStamp> {
        moon::node_passages(self, year_start, year_end)
    }

    /// See [`moon::new_moons`].
    pub fn new_moons(&self, year_start: Year, year_end: Year) -> Result<Vec<TimeStamp>, UmbraError> {
        moon::new_moons(self, year_start, year_end)
    }

    /// See [`solar_eclipses::solar_eclipses`].
    pub fn solar_eclipses(
        &self,
        start_year: Year,
        end_year: Year,
    ) -> Result<Vec<SolarEclipse>, UmbraError> {
        solar_eclipses::solar_eclipses(self, start_year, end_year)
    }

    /// See [`besselian::besselian_solar`].
    pub fn besselian_solar(
        &self,
        eclipse: &SolarEclipse,
        time: &TimeStamp,
        nutation: &NutationData,
    ) -> Result<BesselianElements, UmbraError> {
        besselian::besselian_solar(self, eclipse, time, nutation)
    }

    /// See [`besselian::besselian_solar_with_delta`].
    pub fn besselian_solar_with_delta(
        &self,
        eclipse: &SolarEclipse,
        time: &TimeStamp,
        delta: f64,
        nutation: &NutationData,
    ) -> Result<BesselianElements, UmbraError> {
        besselian::besselian_solar_with_delta(self, eclipse, time, delta, nutation)
    }

    /// See [`central_line::besselian_central_line`].
    pub fn besselian_central_line(
        &self,
        eclipse: &SolarEclipse,
        bessel: &BesselianElements,
    ) -> CentralLine {
        central_line::besselian_central_line(eclipse, bessel)
    }
}
