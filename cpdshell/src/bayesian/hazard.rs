//! Hazard functions.

use crate::error::{CpdError, Result};
use crate::traits::Hazard;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// A constant hazard function.
/// This is the hazard function that corresponds to a geometric distribution
/// with timescale λ.
pub fn constant_hazard(lambda: f64) -> impl Fn(usize) -> f64 {
    let inv_lambda = 1.0 / lambda;
    move |_: usize| inv_lambda
}

/// Constant hazard `1 / rate`, i.e. an exponential prior on the time between
/// change points with the given mean.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantHazard {
    rate: f64,
}

impl ConstantHazard {
    /// Create a new `ConstantHazard`
    ///
    /// # Errors
    /// `rate` must be finite and at least one, otherwise the hazard is not a
    /// probability.
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate < 1.0 {
            return Err(CpdError::InvalidParameter(format!(
                "constant hazard rate must be finite and >= 1; got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    /// Mean distance between change points.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Hazard for ConstantHazard {
    fn hazard(&self, _run_length: usize) -> f64 {
        self.rate.recip()
    }
}

/// Logistic Hazard parameters
///
/// LH(x, h, a, b) = logistic(h) * logistic(a * x + b)
///
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct LogisticHazard {
    /// Logit scaled, scaling factor for the logistic hazard function
    /// (increasing increases hazard over the whole space).
    h: f64,
    /// Scale Term (Higher means the slope of the logistic is higher).
    a: f64,
    /// Translation term (increasing moves the logistic to the left).
    b: f64,
}

impl LogisticHazard {
    /// Create a new `LogisticHazard`
    pub fn new(h: f64, a: f64, b: f64) -> Self {
        Self { h, a, b }
    }
}

impl Hazard for LogisticHazard {
    #[allow(clippy::cast_precision_loss)]
    fn hazard(&self, run_length: usize) -> f64 {
        logistic(self.h) * logistic(self.a * run_length as f64 + self.b)
    }
}

#[inline]
fn logistic(x: f64) -> f64 {
    (1.0 + (-x).exp()).recip()
}

/// Built-in hazards, for selection from configuration.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HazardKind {
    /// See [`ConstantHazard`].
    Constant(ConstantHazard),
    /// See [`LogisticHazard`].
    Logistic(LogisticHazard),
}

impl Hazard for HazardKind {
    fn hazard(&self, run_length: usize) -> f64 {
        match self {
            Self::Constant(h) => h.hazard(run_length),
            Self::Logistic(h) => h.hazard(run_length),
        }
    }
}

impl From<ConstantHazard> for HazardKind {
    fn from(h: ConstantHazard) -> Self {
        Self::Constant(h)
    }
}

impl From<LogisticHazard> for HazardKind {
    fn from(h: LogisticHazard) -> Self {
        Self::Logistic(h)
    }
}
