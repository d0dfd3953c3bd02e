//! Errors raised by the scrubbing engine and the detection algorithms.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CpdError>;

/// Errors that can occur while detecting change points.
///
/// Usage errors come from driving a [`Scrubber`](crate::Scrubber) past the
/// end of its run. Every other variant is a numerical or modelling
/// precondition violation: the data or parameters are unsuitable for the
/// chosen algorithm, and the run cannot continue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CpdError {
    /// A window was requested after the run terminated.
    #[error("all windows were given")]
    WindowsExhausted,

    /// Change points were added while no window was pending.
    #[error("there are no windows to consider")]
    NoPendingWindow,

    /// A Gaussian likelihood estimated a variance that is not strictly
    /// positive.
    #[error("non-positive variance estimate: {variance}")]
    NonPositiveVariance {
        /// The offending estimate.
        variance: f64,
    },

    /// A likelihood produced a scale parameter that is not strictly
    /// positive.
    #[error("non-positive scale parameter: {scale}")]
    NonPositiveScale {
        /// The offending scale.
        scale: f64,
    },

    /// The run-length posterior summed to zero during renormalization.
    #[error(
        "zero evidence while renormalizing growth probabilities at time {time}"
    )]
    ZeroEvidence {
        /// Window-relative time of the failed update.
        time: usize,
    },

    /// A localizer returned a run length outside of the analysed sample.
    #[error(
        "localized run length {run_length} is out of range for a sample of \
         size {sample_size}"
    )]
    RunLengthOutOfRange {
        /// Run length returned by the localizer.
        run_length: usize,
        /// Size of the window being analysed.
        sample_size: usize,
    },

    /// A likelihood returned a predictive vector that does not cover the live
    /// run lengths.
    #[error(
        "predictive probabilities have length {got}, expected {expected}"
    )]
    PredictiveShape {
        /// Number of live run lengths.
        expected: usize,
        /// Length of the predictive vector.
        got: usize,
    },

    /// The learning sample is too small to estimate the likelihood
    /// parameters.
    #[error("insufficient learning sample: need at least {needed}, got {got}")]
    InsufficientLearningSample {
        /// Minimal number of observations.
        needed: usize,
        /// Observations supplied.
        got: usize,
    },

    /// `learn` was called on a likelihood that already holds parameters, or
    /// `update`/`predict` on one that holds none.
    #[error("likelihood is not in a learnable state: {0}")]
    LikelihoodState(&'static str),

    /// A configuration parameter is outside of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
