//! Capability interfaces shared by the scrubbing engine and the Bayesian
//! plug-ins.
use crate::error::Result;
use ndarray::Array1;

/// Change point detection algorithm working on one window at a time.
///
/// Indices returned by [`localize`](Algorithm::localize) are relative to the
/// start of the window; the [`Scrubber`](crate::Scrubber) maps them back to
/// global coordinates.
pub trait Algorithm {
    /// Count the change points in `window`.
    ///
    /// # Errors
    /// Implementations return an error when the window violates their
    /// modelling preconditions.
    fn detect(&mut self, window: &[f64]) -> Result<usize>;

    /// Find the window-relative positions of the change points in `window`.
    ///
    /// # Errors
    /// Implementations return an error when the window violates their
    /// modelling preconditions.
    fn localize(&mut self, window: &[f64]) -> Result<Vec<usize>>;
}

impl<A: Algorithm + ?Sized> Algorithm for Box<A> {
    fn detect(&mut self, window: &[f64]) -> Result<usize> {
        (**self).detect(window)
    }

    fn localize(&mut self, window: &[f64]) -> Result<Vec<usize>> {
        (**self).localize(window)
    }
}

/// Per-run-length sufficient statistics of an observation model.
pub trait Likelihood {
    /// Learn the parameters for run length zero from `sample`.
    ///
    /// # Errors
    /// Fails when the likelihood already holds parameters, or when the sample
    /// is too small or degenerate to produce positive scale parameters.
    fn learn(&mut self, sample: &[f64]) -> Result<()>;

    /// Predictive probability of `observation`, one entry per live run
    /// length.
    ///
    /// # Errors
    /// Fails when the likelihood holds no parameters.
    fn predict(&self, observation: f64) -> Result<Array1<f64>>;

    /// Integrate `observation`, adding one live run length.
    ///
    /// # Errors
    /// Fails when a scale parameter stops being strictly positive.
    fn update(&mut self, observation: f64) -> Result<()>;

    /// Drop all parameters.
    fn clear(&mut self);
}

impl<L: Likelihood + ?Sized> Likelihood for Box<L> {
    fn learn(&mut self, sample: &[f64]) -> Result<()> {
        (**self).learn(sample)
    }

    fn predict(&self, observation: f64) -> Result<Array1<f64>> {
        (**self).predict(observation)
    }

    fn update(&mut self, observation: f64) -> Result<()> {
        (**self).update(observation)
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Prior probability of a change point given the current run length.
pub trait Hazard {
    /// Hazard for a single run length.
    fn hazard(&self, run_length: usize) -> f64;

    /// Hazard for every run length in `0..gap_size`.
    fn hazards(&self, gap_size: usize) -> Array1<f64> {
        (0..gap_size).map(|r| self.hazard(r)).collect()
    }
}

impl<F> Hazard for F
where
    F: Fn(usize) -> f64,
{
    fn hazard(&self, run_length: usize) -> f64 {
        self(run_length)
    }
}

/// Decides from the run-length posterior whether a change point just
/// occurred.
pub trait Detector {
    /// Inspect the growth probabilities of the live run lengths.
    fn detect(&mut self, growth_probs: &[f64]) -> bool;

    /// Forget any state carried between calls.
    fn clear(&mut self);
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, growth_probs: &[f64]) -> bool {
        (**self).detect(growth_probs)
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Picks the run length identifying the most recent change point.
pub trait Localizer {
    /// Run length at which the break most likely occurred.
    fn localize(&self, growth_probs: &[f64]) -> usize;
}

impl<Lc: Localizer + ?Sized> Localizer for Box<Lc> {
    fn localize(&self, growth_probs: &[f64]) -> usize {
        (**self).localize(growth_probs)
    }
}
