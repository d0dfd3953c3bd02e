//! This library provides windowed Change Point Detection (CPD) tools:
//!  * A [`Scrubber`] that splits a sequence into overlapping windows
//!  * A [`CpdCore`] that drives any [`Algorithm`] over those windows
//!  * Bayesian online CPD with pluggable parts as
//!    [`bayesian::BayesianAlgorithm`]
//!  * A [`CpdShell`] facade that times runs against labeled data
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

#[cfg(test)]
pub mod generators;

mod error;
pub use error::{CpdError, Result};

mod traits;
pub use self::traits::*;

mod scenario;
pub use scenario::Scenario;

mod scrubber;
pub use scrubber::{to_global, Scrubber, ScrubberConfig};

mod core;
pub use self::core::CpdCore;

pub mod bayesian;

mod shell;
pub use shell::{
    run_labeled_batch, CpContainer, CpdShell, LabeledCpData, ShellData,
};

pub mod utils;

pub use rv;
