//! Change point detectors reading the run-length posterior.
//!
//! Both detectors look at the last entry of the growth probabilities, the
//! probability that no change point happened since the current learning
//! phase started.

use crate::error::{CpdError, Result};
use crate::traits::Detector;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

fn check_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(CpdError::InvalidParameter(format!(
            "detector threshold must be in [0, 1]; got {threshold}"
        )))
    }
}

/// Fires when the probability of the maximal run length falls below a
/// threshold.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleDetector {
    threshold: f64,
}

impl SimpleDetector {
    /// Create a new `SimpleDetector`
    ///
    /// # Errors
    /// `threshold` must lie in `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: check_threshold(threshold)?,
        })
    }
}

impl Detector for SimpleDetector {
    fn detect(&mut self, growth_probs: &[f64]) -> bool {
        growth_probs.last().is_some_and(|&p| p < self.threshold)
    }

    fn clear(&mut self) {}
}

/// Fires when the probability of the maximal run length drops by at least a
/// threshold between two consecutive calls.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropDetector {
    threshold: f64,
    previous: Option<f64>,
}

impl DropDetector {
    /// Create a new `DropDetector`
    ///
    /// # Errors
    /// `threshold` must lie in `[0, 1]`.
    pub fn new(threshold: f64) -> Result<Self> {
        Ok(Self {
            threshold: check_threshold(threshold)?,
            previous: None,
        })
    }
}

impl Detector for DropDetector {
    fn detect(&mut self, growth_probs: &[f64]) -> bool {
        let Some(&last) = growth_probs.last() else {
            return false;
        };
        match self.previous.replace(last) {
            // A rising probability is no drop at all
            Some(previous) => previous - last >= self.threshold,
            None => false,
        }
    }

    fn clear(&mut self) {
        self.previous = None;
    }
}

/// Built-in detectors, for selection from configuration.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DetectorKind {
    /// See [`SimpleDetector`].
    Simple(SimpleDetector),
    /// See [`DropDetector`].
    Drop(DropDetector),
}

impl Detector for DetectorKind {
    fn detect(&mut self, growth_probs: &[f64]) -> bool {
        match self {
            Self::Simple(d) => d.detect(growth_probs),
            Self::Drop(d) => d.detect(growth_probs),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Simple(d) => d.clear(),
            Self::Drop(d) => d.clear(),
        }
    }
}

impl From<SimpleDetector> for DetectorKind {
    fn from(d: SimpleDetector) -> Self {
        Self::Simple(d)
    }
}

impl From<DropDetector> for DetectorKind {
    fn from(d: DropDetector) -> Self {
        Self::Drop(d)
    }
}
