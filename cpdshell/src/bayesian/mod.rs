//! Bayesian Change Point Detection over a window
//!
//! This code is derived from
//! "Bayesian Online Changepoint Detection"; Ryan Adams, David `MacKay`; arXiv:0710.3742
//! Which can be found [here](https://arxiv.org/pdf/0710.3742.pdf).
//!
//! A window is processed in repeating stages: the likelihood learns its
//! initial parameters from a short prefix, the run-length posterior is then
//! updated one observation at a time until the detector fires, and the
//! detected change point is recorded before the model is reset and learning
//! starts over.

pub mod detector;
pub mod hazard;
pub mod likelihood;
pub mod localizer;

use crate::error::{CpdError, Result};
use crate::traits::{Algorithm, Detector, Hazard, Likelihood, Localizer};
use ndarray::ArrayView1;
use tracing::{debug, trace};

/// Mutable state of a single pass over a window.
#[derive(Clone, Debug, Default, PartialEq)]
struct PassState {
    /// Run-length probabilities, sized to the rest of the window.
    growth_probs: Vec<f64>,
    /// Window-relative cursor.
    time: usize,
    /// Number of Bayesian updates since the last learning stage.
    gap_size: usize,
    /// Every predictive probability of the last observation was zero.
    pred_probs_are_zero: bool,
    change_points: Vec<usize>,
    change_points_count: usize,
}

/// Bayesian online change point detection as a windowed [`Algorithm`].
///
/// The observation model, the change point prior, and the decision rules are
/// supplied as plug-ins:
/// * `L` - [`Likelihood`] tracking per-run-length parameters.
/// * `H` - [`Hazard`] prior on change points given a run length.
/// * `D` - [`Detector`] deciding when a change point occurred.
/// * `Lc` - [`Localizer`] turning the posterior into a position.
#[derive(Clone, Debug, PartialEq)]
pub struct BayesianAlgorithm<L, H, D, Lc> {
    learning_steps: usize,
    likelihood: L,
    hazard: H,
    detector: D,
    localizer: Lc,
    state: PassState,
}

impl<L, H, D, Lc> BayesianAlgorithm<L, H, D, Lc>
where
    L: Likelihood,
    H: Hazard,
    D: Detector,
    Lc: Localizer,
{
    /// Create a new Bayesian change point algorithm
    ///
    /// # Parameters
    /// * `learning_steps` - Number of observations used to learn the
    ///   likelihood's parameters after every change point.
    /// * `likelihood` - Observation model.
    /// * `hazard` - Prior probability of a change point per run length.
    /// * `detector` - Rule deciding that a change point occurred.
    /// * `localizer` - Rule placing a detected change point.
    ///
    /// # Errors
    /// `learning_steps` must be at least two.
    ///
    /// # Example
    /// ```rust
    /// use cpdshell::bayesian::{
    ///     detector::SimpleDetector, hazard::ConstantHazard,
    ///     likelihood::GaussianUnknownMeanAndVariance,
    ///     localizer::SimpleLocalizer, BayesianAlgorithm,
    /// };
    ///
    /// let algorithm = BayesianAlgorithm::new(
    ///     10,
    ///     GaussianUnknownMeanAndVariance::new(),
    ///     ConstantHazard::new(200.0)?,
    ///     SimpleDetector::new(0.1)?,
    ///     SimpleLocalizer,
    /// )?;
    /// # Ok::<(), cpdshell::CpdError>(())
    /// ```
    pub fn new(
        learning_steps: usize,
        likelihood: L,
        hazard: H,
        detector: D,
        localizer: Lc,
    ) -> Result<Self> {
        if learning_steps < 2 {
            return Err(CpdError::InvalidParameter(format!(
                "learning_steps must be at least 2; got {learning_steps}"
            )));
        }
        Ok(Self {
            learning_steps,
            likelihood,
            hazard,
            detector,
            localizer,
            state: PassState::default(),
        })
    }

    /// Number of observations used to learn the likelihood.
    #[must_use]
    pub fn learning_steps(&self) -> usize {
        self.learning_steps
    }

    /// Run every stage over `window`, collecting change points.
    fn process_data(&mut self, window: &[f64], localize: bool) -> Result<()> {
        let sample_size = window.len();
        self.prepare(sample_size);
        if sample_size == 0 {
            return Ok(());
        }

        while self.state.time + self.learning_steps < sample_size {
            self.learning_stage(window)?;
            self.bayesian_stage(window)?;
            if self.state.time < sample_size - 1 {
                self.process_change_point(sample_size, localize)?;
            }
        }
        Ok(())
    }

    fn learning_stage(&mut self, window: &[f64]) -> Result<()> {
        let start = self.state.time;
        self.likelihood
            .learn(&window[start..start + self.learning_steps])?;
        self.state.time += self.learning_steps - 1;
        Ok(())
    }

    fn bayesian_stage(&mut self, window: &[f64]) -> Result<()> {
        let sample_size = window.len();
        self.state.gap_size = 0;

        while self.bayesian_condition(sample_size) {
            let observation = window[self.state.time];
            self.state.time += 1;
            self.state.gap_size += 1;
            self.bayesian_update(observation)?;
        }
        Ok(())
    }

    fn bayesian_condition(&mut self, sample_size: usize) -> bool {
        let state = &self.state;
        if state.time + 1 >= sample_size || state.pred_probs_are_zero {
            return false;
        }
        let live = (state.gap_size + 1).min(state.growth_probs.len());
        !self.detector.detect(&state.growth_probs[..live])
    }

    /// Advance the run-length posterior by one observation.
    fn bayesian_update(&mut self, observation: f64) -> Result<()> {
        let gap = self.state.gap_size;
        let predictive = self.likelihood.predict(observation)?;
        if predictive.len() != gap {
            return Err(CpdError::PredictiveShape {
                expected: gap,
                got: predictive.len(),
            });
        }

        // All mass on an impossible observation: the run ended here
        if predictive.iter().all(|&p| p == 0.0) {
            self.state.pred_probs_are_zero = true;
            return Ok(());
        }

        let hazards = self.hazard.hazards(gap);
        let growth_probs = &mut self.state.growth_probs;
        let weighted = &ArrayView1::from(&growth_probs[..gap]) * &predictive;
        let changepoint_prob = (&weighted * &hazards).sum();
        let grown = weighted * &hazards.mapv(|h| 1.0 - h);

        growth_probs[1..=gap]
            .iter_mut()
            .zip(grown.iter())
            .for_each(|(r, &g)| *r = g);
        growth_probs[0] = changepoint_prob;

        let live = (gap + 2).min(growth_probs.len());
        let evidence: f64 = growth_probs[..live].iter().sum();
        if !(evidence > 0.0) {
            return Err(CpdError::ZeroEvidence {
                time: self.state.time,
            });
        }
        for r in &mut growth_probs[..live] {
            *r /= evidence;
        }
        trace!(time = self.state.time, gap, evidence, "bayesian update");

        debug_assert!(
            growth_probs.iter().all(|r| (0.0..=1.0).contains(r)),
            "Growth probabilities must lie in [0, 1]"
        );
        debug_assert!(
            approx::abs_diff_eq!(
                growth_probs[..live].iter().sum::<f64>(),
                1.0,
                epsilon = 1E-8
            ),
            "Growth probabilities must sum to one"
        );

        self.likelihood.update(observation)
    }

    fn process_change_point(
        &mut self,
        sample_size: usize,
        localize: bool,
    ) -> Result<()> {
        self.state.change_points_count += 1;
        if localize {
            let change_point = if self.state.pred_probs_are_zero {
                self.state.time
            } else {
                let gap = self.state.gap_size;
                let live = gap.min(self.state.growth_probs.len());
                let run_length =
                    self.localizer.localize(&self.state.growth_probs[..live]);
                if run_length > gap || run_length > sample_size {
                    return Err(CpdError::RunLengthOutOfRange {
                        run_length,
                        sample_size,
                    });
                }
                // Resume learning right after the located change point
                self.state.time = self.state.time + 1 - run_length;
                self.state.time
            };
            debug!(
                change_point,
                collapsed = self.state.pred_probs_are_zero,
                "located change point"
            );
            self.state.change_points.push(change_point);
        } else {
            debug!(time = self.state.time, "detected change point");
        }
        self.clear(sample_size);
        Ok(())
    }

    /// Reset everything tied to one pass over a window.
    fn prepare(&mut self, sample_size: usize) {
        self.state.time = 0;
        self.state.gap_size = 0;
        self.state.change_points.clear();
        self.state.change_points_count = 0;
        self.state.growth_probs = Vec::with_capacity(sample_size + 1);
        self.clear(sample_size);
    }

    /// Reset the model after a change point.
    fn clear(&mut self, sample_size: usize) {
        self.state.pred_probs_are_zero = false;
        self.likelihood.clear();
        self.detector.clear();

        let growth_probs = &mut self.state.growth_probs;
        growth_probs.clear();
        growth_probs.resize(sample_size.saturating_sub(self.state.time), 0.0);
        if let Some(r0) = growth_probs.first_mut() {
            *r0 = 1.0;
        }
    }
}

impl<L, H, D, Lc> Algorithm for BayesianAlgorithm<L, H, D, Lc>
where
    L: Likelihood,
    H: Hazard,
    D: Detector,
    Lc: Localizer,
{
    fn detect(&mut self, window: &[f64]) -> Result<usize> {
        self.process_data(window, false)?;
        Ok(self.state.change_points_count)
    }

    fn localize(&mut self, window: &[f64]) -> Result<Vec<usize>> {
        self.process_data(window, true)?;
        Ok(self.state.change_points.clone())
    }
}
