//! Solar eclipse prediction: lunar node passages and new moons, eclipse detection and
//! classification, Besselian elements and central line.
pub mod besselian;
pub mod central_line;
pub mod constants;
pub mod earth_orientation;
pub mod eclipse_params;
pub mod ephemeris;
pub mod moon;
pub mod ref_system;
pub mod solar_eclipses;
pub mod time;
pub mod umbra;
pub mod umbra_errors;

#[cfg(test)]
pub(crate) mod unit_test_global {
    use std::sync::LazyLock;

    use crate::{solar_eclipses::SolarEclipse, umbra::Umbra};

    pub(crate) static UMBRA_TEST: LazyLock<Umbra> = LazyLock::new(Umbra::new);

    /// Annular eclipse of 2017 February 26 and total eclipse of 2017 August 21; the search
    /// stops before the new moon of 2018 February 15.
    pub(crate) static ECLIPSES_2017: LazyLock<Vec<SolarEclipse>> = LazyLock::new(|| {
        UMBRA_TEST
            .solar_eclipses(2017.0, 2017.05)
            .expect("2017 eclipse search")
    });
}
