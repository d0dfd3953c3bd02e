//! Observation models for the Bayesian engine.
//!
//! A likelihood keeps one set of parameters per live run length. `learn`
//! creates the entry for run length zero, every `update` adds one more, and
//! `predict` evaluates the predictive density of an observation under each
//! of them.

use crate::error::{CpdError, Result};
use crate::traits::Likelihood;
use ndarray::Array1;
use rv::prelude::{Gaussian, Rv, StudentsT as RvStudentsT};
use std::iter::once;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

const MIN_LEARNING_SAMPLE: usize = 2;

fn check_learning_sample(sample: &[f64]) -> Result<()> {
    if sample.len() < MIN_LEARNING_SAMPLE {
        Err(CpdError::InsufficientLearningSample {
            needed: MIN_LEARNING_SAMPLE,
            got: sample.len(),
        })
    } else {
        Ok(())
    }
}

/// Gaussian likelihood tracking the sample mean and standard deviation of
/// each run.
///
/// Parameters for a run are re-estimated from running sums, so a run of
/// length `n` is modelled by the unbiased estimates over its `n`
/// observations.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GaussianLikelihood {
    means: Vec<f64>,
    standard_deviations: Vec<f64>,
    sample_sum: f64,
    squared_sample_sum: f64,
    gap_size: usize,
}

impl GaussianLikelihood {
    /// Create an empty `GaussianLikelihood`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::cast_precision_loss)]
    fn push_parameters(&mut self) -> Result<()> {
        debug_assert!(self.gap_size > 1);
        let n = self.gap_size as f64;
        let mean = self.sample_sum / n;
        let variance = (self.squared_sample_sum - self.sample_sum.powi(2) / n)
            / (n - 1.0);
        if !(variance > 0.0) {
            return Err(CpdError::NonPositiveVariance { variance });
        }
        self.means.push(mean);
        self.standard_deviations.push(variance.sqrt());
        Ok(())
    }
}

impl Likelihood for GaussianLikelihood {
    fn learn(&mut self, sample: &[f64]) -> Result<()> {
        if !self.means.is_empty() || self.gap_size != 0 {
            return Err(CpdError::LikelihoodState(
                "learn requires a cleared likelihood",
            ));
        }
        check_learning_sample(sample)?;

        self.sample_sum = sample.iter().sum();
        self.squared_sample_sum = sample.iter().map(|x| x * x).sum();
        self.gap_size = sample.len();
        self.push_parameters()
    }

    fn predict(&self, observation: f64) -> Result<Array1<f64>> {
        if self.means.is_empty() {
            return Err(CpdError::LikelihoodState("predict before learn"));
        }
        Ok(self
            .means
            .iter()
            .zip(self.standard_deviations.iter())
            .map(|(&mean, &sd)| {
                Gaussian::new_unchecked(mean, sd).f(&observation)
            })
            .collect())
    }

    fn update(&mut self, observation: f64) -> Result<()> {
        if self.means.is_empty() {
            return Err(CpdError::LikelihoodState("update before learn"));
        }
        self.sample_sum += observation;
        self.squared_sample_sum += observation * observation;
        self.gap_size += 1;
        self.push_parameters()
    }

    fn clear(&mut self) {
        self.means.clear();
        self.standard_deviations.clear();
        self.sample_sum = 0.0;
        self.squared_sample_sum = 0.0;
        self.gap_size = 0;
    }
}

/// Location-scale Student's t distribution.
#[derive(Clone, Debug, PartialEq)]
struct StudentT {
    st: RvStudentsT,
    mean: f64,
    sigma: f64,
}

impl StudentT {
    fn new(mean: f64, sigma: f64, v: f64) -> Self {
        Self {
            st: RvStudentsT::new_unchecked(v),
            mean,
            sigma,
        }
    }

    fn f(&self, x: f64) -> f64 {
        self.st.f(&((x - self.mean) / self.sigma)) / self.sigma
    }
}

/// Normal-inverse-gamma hyperparameters of a single run.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
struct NigPrior {
    mu: f64,
    k: f64,
    alpha: f64,
    beta: f64,
}

/// Gaussian likelihood with unknown mean and variance.
///
/// Uses a normal-inverse-gamma conjugate prior whose hyperparameters are
/// estimated from the learning sample: the mean was seen `k0 = n` times with
/// sample mean `mu0`, and the precision from `2 * alpha0 = n` observations
/// with sum of squared deviations `2 * beta0`. The predictive distribution of
/// each run is Student's t with `2 * alpha` degrees of freedom.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GaussianUnknownMeanAndVariance {
    prior: Option<NigPrior>,
    mu: Array1<f64>,
    k: Array1<f64>,
    alpha: Array1<f64>,
    beta: Array1<f64>,
}

impl GaussianUnknownMeanAndVariance {
    /// Create an empty `GaussianUnknownMeanAndVariance`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale of the Student's t predictive of every live run length.
    ///
    /// This is a standard deviation, `sqrt(beta (k + 1) / (alpha k))`; the
    /// variance is never used as the scale.
    fn scales(&self) -> Array1<f64> {
        ((&self.beta * &(&self.k + 1.0)) / (&self.alpha * &self.k))
            .mapv(f64::sqrt)
    }
}

fn prepend(head: f64, tail: &Array1<f64>) -> Array1<f64> {
    once(head).chain(tail.iter().copied()).collect()
}

impl Likelihood for GaussianUnknownMeanAndVariance {
    #[allow(clippy::cast_precision_loss)]
    fn learn(&mut self, sample: &[f64]) -> Result<()> {
        if self.prior.is_some() {
            return Err(CpdError::LikelihoodState(
                "learn requires a cleared likelihood",
            ));
        }
        check_learning_sample(sample)?;

        let n = sample.len() as f64;
        let mu = sample.iter().sum::<f64>() / n;
        let beta = sample.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / 2.0;
        if !(beta > 0.0) {
            return Err(CpdError::NonPositiveScale { scale: beta });
        }
        let prior = NigPrior {
            mu,
            k: n,
            alpha: n / 2.0,
            beta,
        };

        self.mu = Array1::from_elem(1, prior.mu);
        self.k = Array1::from_elem(1, prior.k);
        self.alpha = Array1::from_elem(1, prior.alpha);
        self.beta = Array1::from_elem(1, prior.beta);
        self.prior = Some(prior);
        Ok(())
    }

    fn predict(&self, observation: f64) -> Result<Array1<f64>> {
        if self.prior.is_none() {
            return Err(CpdError::LikelihoodState("predict before learn"));
        }
        let scales = self.scales();
        Ok(self
            .mu
            .iter()
            .zip(scales.iter())
            .zip(self.alpha.iter())
            .map(|((&mu, &scale), &alpha)| {
                StudentT::new(mu, scale, 2.0 * alpha).f(observation)
            })
            .collect())
    }

    fn update(&mut self, observation: f64) -> Result<()> {
        let prior = self
            .prior
            .ok_or(CpdError::LikelihoodState("update before learn"))?;

        // Textbook conjugate step: beta grows by k (x - mu)^2 / (2 (k + 1)),
        // not by a 2k + 1 denominator.
        let k_next = &self.k + 1.0;
        let deviation = self.mu.mapv(|mu| (observation - mu).powi(2));
        let mu = (&self.mu * &self.k + observation) / &k_next;
        let beta = &self.beta + &(&self.k * &deviation / (2.0 * &k_next));

        self.mu = prepend(prior.mu, &mu);
        self.k = prepend(prior.k, &k_next);
        self.alpha = prepend(prior.alpha, &(&self.alpha + 0.5));
        self.beta = prepend(prior.beta, &beta);
        Ok(())
    }

    fn clear(&mut self) {
        self.prior = None;
        self.mu = Array1::zeros(0);
        self.k = Array1::zeros(0);
        self.alpha = Array1::zeros(0);
        self.beta = Array1::zeros(0);
    }
}

/// Built-in likelihoods, for selection from configuration.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum LikelihoodKind {
    /// See [`GaussianLikelihood`].
    Gaussian(GaussianLikelihood),
    /// See [`GaussianUnknownMeanAndVariance`].
    GaussianUnknownMeanAndVariance(GaussianUnknownMeanAndVariance),
}

impl Likelihood for LikelihoodKind {
    fn learn(&mut self, sample: &[f64]) -> Result<()> {
        match self {
            Self::Gaussian(l) => l.learn(sample),
            Self::GaussianUnknownMeanAndVariance(l) => l.learn(sample),
        }
    }

    fn predict(&self, observation: f64) -> Result<Array1<f64>> {
        match self {
            Self::Gaussian(l) => l.predict(observation),
            Self::GaussianUnknownMeanAndVariance(l) => l.predict(observation),
        }
    }

    fn update(&mut self, observation: f64) -> Result<()> {
        match self {
            Self::Gaussian(l) => l.update(observation),
            Self::GaussianUnknownMeanAndVariance(l) => l.update(observation),
        }
    }

    fn clear(&mut self) {
        match self {
            Self::Gaussian(l) => l.clear(),
            Self::GaussianUnknownMeanAndVariance(l) => l.clear(),
        }
    }
}

impl From<GaussianLikelihood> for LikelihoodKind {
    fn from(l: GaussianLikelihood) -> Self {
        Self::Gaussian(l)
    }
}

impl From<GaussianUnknownMeanAndVariance> for LikelihoodKind {
    fn from(l: GaussianUnknownMeanAndVariance) -> Self {
        Self::GaussianUnknownMeanAndVariance(l)
    }
}
