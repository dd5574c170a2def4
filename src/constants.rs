//! # Constants and type definitions for Umbra
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `umbra` library.
//!
//! ## Overview
//!
//! - Astronomical and geophysical constants
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Radii of the bodies involved in a solar eclipse
//! - Core type aliases used across the crate
//!
//! Distances are expressed in kilometers and velocities in kilometers per day everywhere in the
//! crate, unless a name says otherwise.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of minutes in a Julian day
pub const MINUTES_PER_DAY: f64 = 1_440.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Julian Date of J2000.0
pub const JD2000: f64 = 2_451_545.0;

/// Conversion factor between Julian Date and Modified Julian Date
pub const JDTOMJD: f64 = 2400000.5;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36525.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth equatorial radius in meters (GRS1980/WGS84)
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// Earth polar radius in meters, as used by the Explanatory Supplement central line
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.3142;

/// Earth equatorial radius in kilometers
pub const EARTH_EQUATORIAL_RADIUS: Kilometer = EARTH_MAJOR_AXIS / 1000.;

/// Earth mean radius in kilometers, used for horizontal parallaxes
pub const EARTH_MEAN_RADIUS: Kilometer = 6371.0;

/// Moon mean radius in kilometers
pub const MOON_RADIUS: Kilometer = 1737.4;

/// Sun nominal radius in kilometers
pub const SUN_RADIUS: Kilometer = 696_340.0;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Speed of light in kilometers per day
pub const VLIGHT_KM_DAY: f64 = VLIGHT * SECONDS_PER_DAY;

/// Mean light travel time from the Sun to the Earth, in days
pub const SUN_LIGHT_TIME: f64 = AU / VLIGHT_KM_DAY;

/// Mean motion of the Sun in ecliptic longitude, in degrees per day
pub const SUN_MEAN_RATE: f64 = 360.0 / 365.256;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian Date (days)
pub type JD = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
/// Fractional calendar year (e.g. 2001.1)
pub type Year = f64;
