//! # Eclipse search parameters
//!
//! Numerical knobs of the periodic-event finder and of the eclipse detector, grouped in
//! [`EclipseParams`] and configured through the validating [`EclipseParamsBuilder`].
//!
//! ```rust
//! use umbra::eclipse_params::EclipseParams;
//!
//! let params = EclipseParams::builder()
//!     .node_sample_step_seconds(30.0)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.node_sample_step_seconds(), 30.0);
//! ```
use std::cmp::Ordering::Greater;

use serde::Serialize;

use crate::{
    constants::{MINUTES_PER_DAY, SUN_LIGHT_TIME, SUN_MEAN_RATE},
    umbra_errors::UmbraError,
};

/// Configuration of the eclipse search.
///
/// Fields
/// -----------------
/// * `refine_step` – time step, in days, of the single linear correction applied to the raw
///   node-passage and new-moon estimates.
/// * `node_sample_step_seconds` – time step, in seconds, used to estimate the lunar inclination
///   and longitude rate at each node passage.
/// * `sun_light_time` – fixed light time, in days, subtracted before evaluating the Earth when the
///   apparent Sun is needed during the search.
/// * `sun_mean_rate` – mean motion of the Sun in longitude, in degrees per day.
///
/// Defaults
/// -----------------
/// * `refine_step`: one minute
/// * `node_sample_step_seconds`: 60 s
/// * `sun_light_time`: 1 AU / c (≈ 8.3 min)
/// * `sun_mean_rate`: 360° / 365.256 d
///
/// The fields are only set through [`EclipseParamsBuilder::build`], so every instance holds
/// valid steps and rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EclipseParams {
    refine_step: f64,
    node_sample_step_seconds: f64,
    sun_light_time: f64,
    sun_mean_rate: f64,
}

impl EclipseParams {
    /// Construct a new [`EclipseParams`] with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`EclipseParamsBuilder`] initialised with the default values.
    pub fn builder() -> EclipseParamsBuilder {
        EclipseParamsBuilder::new()
    }

    /// Step of the linear refinement, in days.
    pub fn refine_step(&self) -> f64 {
        self.refine_step
    }

    /// Sampling step of the lunar motion at node passages, in seconds.
    pub fn node_sample_step_seconds(&self) -> f64 {
        self.node_sample_step_seconds
    }

    /// Light time applied to the Sun during the search, in days.
    pub fn sun_light_time(&self) -> f64 {
        self.sun_light_time
    }

    /// Mean motion of the Sun in longitude, in degrees per day.
    pub fn sun_mean_rate(&self) -> f64 {
        self.sun_mean_rate
    }
}

impl Default for EclipseParams {
    fn default() -> Self {
        EclipseParams {
            refine_step: 1.0 / MINUTES_PER_DAY,
            node_sample_step_seconds: 60.0,
            sun_light_time: SUN_LIGHT_TIME,
            sun_mean_rate: SUN_MEAN_RATE,
        }
    }
}

/// Builder for [`EclipseParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct EclipseParamsBuilder {
    params: EclipseParams,
}

impl EclipseParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: EclipseParams::default(),
        }
    }

    pub fn refine_step(mut self, v: f64) -> Self {
        self.params.refine_step = v;
        self
    }
    pub fn node_sample_step_seconds(mut self, v: f64) -> Self {
        self.params.node_sample_step_seconds = v;
        self
    }
    pub fn sun_light_time(mut self, v: f64) -> Self {
        self.params.sun_light_time = v;
        self
    }
    pub fn sun_mean_rate(mut self, v: f64) -> Self {
        self.params.sun_mean_rate = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `refine_step > 0`, `node_sample_step_seconds > 0`: the finite differences need a
    ///   non-degenerate step.
    /// * `sun_mean_rate > 0`.
    /// * `sun_light_time >= 0` and finite.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(EclipseParams)` when every rule holds.
    /// * `Err(UmbraError::InvalidEclipseParameter)` naming the first offending field otherwise.
    pub fn build(self) -> Result<EclipseParams, UmbraError> {
        let p = &self.params;

        if !Self::gt0(p.refine_step) || !p.refine_step.is_finite() {
            return Err(UmbraError::InvalidEclipseParameter(
                "refine_step must be > 0".into(),
            ));
        }
        if !Self::gt0(p.node_sample_step_seconds) || !p.node_sample_step_seconds.is_finite() {
            return Err(UmbraError::InvalidEclipseParameter(
                "node_sample_step_seconds must be > 0".into(),
            ));
        }
        if !Self::gt0(p.sun_mean_rate) || !p.sun_mean_rate.is_finite() {
            return Err(UmbraError::InvalidEclipseParameter(
                "sun_mean_rate must be > 0".into(),
            ));
        }
        if !(p.sun_light_time >= 0.0 && p.sun_light_time.is_finite()) {
            return Err(UmbraError::InvalidEclipseParameter(
                "sun_light_time must be >= 0".into(),
            ));
        }

        Ok(self.params)
    }
}
