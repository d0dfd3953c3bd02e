//! User facing facade wiring data, scrubber, algorithm, and scenario.

use crate::core::CpdCore;
use crate::error::Result;
use crate::scenario::Scenario;
use crate::scrubber::{Scrubber, ScrubberConfig};
use crate::traits::Algorithm;
use crate::utils::symmetric_difference;
use rayon::prelude::*;
use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// A sequence together with its known change points.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabeledCpData {
    /// Observations handed to the algorithm.
    pub raw_data: Vec<f64>,
    /// Ground truth change points.
    pub change_points: Vec<usize>,
}

impl LabeledCpData {
    /// Create a new `LabeledCpData`
    #[must_use]
    pub fn new(raw_data: Vec<f64>, change_points: Vec<usize>) -> Self {
        Self {
            raw_data,
            change_points,
        }
    }
}

/// Result of a change point detection run.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct CpContainer {
    /// Change points found by the algorithm.
    pub result: Vec<usize>,
    /// Ground truth, when the data was labeled.
    pub expected: Option<Vec<usize>>,
    /// Wall time of the run.
    pub time: Duration,
}

impl CpContainer {
    /// Change points found or expected, but not both.
    #[must_use]
    pub fn difference(&self) -> Option<Vec<usize>> {
        self.expected
            .as_deref()
            .map(|expected| symmetric_difference(&self.result, expected))
    }
}

fn join(points: &[usize]) -> String {
    points
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

impl fmt::Display for CpContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Located change points: ({})", join(&self.result))?;
        if let (Some(expected), Some(diff)) =
            (self.expected.as_deref(), self.difference())
        {
            write!(f, "\nExpected change point: ({})", join(expected))?;
            write!(f, "\nDifference: ({})", join(&diff))?;
        }
        Ok(())
    }
}

/// Data given to a [`CpdShell`], with or without ground truth.
#[derive(Clone, Debug, PartialEq)]
pub enum ShellData {
    /// Plain observations.
    Raw(Vec<f64>),
    /// Observations with known change points.
    Labeled(LabeledCpData),
}

impl ShellData {
    fn split(self) -> (Vec<f64>, Option<Vec<usize>>) {
        match self {
            Self::Raw(data) => (data, None),
            Self::Labeled(labeled) => {
                (labeled.raw_data, Some(labeled.change_points))
            }
        }
    }
}

impl From<Vec<f64>> for ShellData {
    fn from(data: Vec<f64>) -> Self {
        Self::Raw(data)
    }
}

impl From<LabeledCpData> for ShellData {
    fn from(data: LabeledCpData) -> Self {
        Self::Labeled(data)
    }
}

/// Convenience interface over [`CpdCore`].
///
/// By default the shell looks for up to ten localized change points using
/// the default [`ScrubberConfig`].
///
/// # Example
/// ```rust
/// use cpdshell::bayesian::{
///     detector::DropDetector, hazard::ConstantHazard,
///     likelihood::GaussianUnknownMeanAndVariance,
///     localizer::SimpleLocalizer, BayesianAlgorithm,
/// };
/// use cpdshell::{CpdShell, LabeledCpData, ScrubberConfig};
///
/// let data: Vec<f64> = (0..60).map(|i| f64::from(i % 3)).collect();
/// let algorithm = BayesianAlgorithm::new(
///     10,
///     GaussianUnknownMeanAndVariance::new(),
///     ConstantHazard::new(100.0)?,
///     DropDetector::new(0.5)?,
///     SimpleLocalizer,
/// )?;
/// let mut shell =
///     CpdShell::new(LabeledCpData::new(data, vec![]), algorithm);
/// shell.set_scrubber_config(ScrubberConfig::new(30, 0.5)?);
/// let container = shell.run_cpd()?;
/// assert_eq!(container.expected, Some(vec![]));
/// # Ok::<(), cpdshell::CpdError>(())
/// ```
#[derive(Clone, Debug)]
pub struct CpdShell<A> {
    core: CpdCore<A>,
    expected: Option<Vec<usize>>,
}

impl<A: Algorithm> CpdShell<A> {
    /// Create a new `CpdShell`
    pub fn new(data: impl Into<ShellData>, algorithm: A) -> Self {
        Self::with_config(
            data,
            algorithm,
            Scenario::new_unchecked(10, true),
            ScrubberConfig::default(),
        )
    }

    /// Create a shell with an explicit scenario and window geometry.
    pub fn with_config(
        data: impl Into<ShellData>,
        algorithm: A,
        scenario: Scenario,
        config: ScrubberConfig,
    ) -> Self {
        let (data, expected) = data.into().split();
        Self {
            core: CpdCore::new(
                Scrubber::with_config(scenario, data, config),
                algorithm,
            ),
            expected,
        }
    }

    /// Data being analysed.
    pub fn data(&self) -> &[f64] {
        self.core.scrubber().data()
    }

    /// Replace the data and its ground truth.
    pub fn set_data(&mut self, data: impl Into<ShellData>) {
        let (data, expected) = data.into().split();
        self.core.scrubber_mut().set_data(data);
        self.expected = expected;
    }

    /// The scrubber splitting the data.
    pub fn scrubber(&self) -> &Scrubber {
        self.core.scrubber()
    }

    /// Replace the window geometry.
    pub fn set_scrubber_config(&mut self, config: ScrubberConfig) {
        self.core.scrubber_mut().set_config(config);
    }

    /// The detection algorithm.
    pub fn algorithm(&self) -> &A {
        self.core.algorithm()
    }

    /// Replace the detection algorithm.
    pub fn set_algorithm(&mut self, algorithm: A) {
        self.core.set_algorithm(algorithm);
    }

    /// The current scenario.
    pub fn scenario(&self) -> &Scenario {
        self.core.scrubber().scenario()
    }

    /// Replace the scenario.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.core.scrubber_mut().set_scenario(scenario);
    }

    /// Replace the scenario from its parts.
    ///
    /// # Errors
    /// `change_point_number` must be positive; the scenario is left
    /// unchanged otherwise.
    pub fn change_scenario(
        &mut self,
        change_point_number: usize,
        to_localize: bool,
    ) -> Result<()> {
        self.set_scenario(Scenario::new(change_point_number, to_localize)?);
        Ok(())
    }

    /// Run change point detection over the whole data.
    ///
    /// # Errors
    /// Any error raised by the algorithm is returned as is.
    pub fn run_cpd(&mut self) -> Result<CpContainer> {
        let start = Instant::now();
        let result = self.core.run()?;
        Ok(CpContainer {
            result,
            expected: self.expected.clone(),
            time: start.elapsed(),
        })
    }
}

/// Run change point detection over independent datasets in parallel.
///
/// Each dataset gets its own scrubber and a fresh algorithm from
/// `make_algorithm`. Results come back in the order of `datasets`.
pub fn run_labeled_batch<A, F>(
    datasets: &[LabeledCpData],
    scenario: Scenario,
    config: ScrubberConfig,
    make_algorithm: F,
) -> Vec<Result<CpContainer>>
where
    A: Algorithm,
    F: Fn() -> A + Sync,
{
    datasets
        .par_iter()
        .map(|dataset| {
            CpdShell::with_config(
                dataset.clone(),
                make_algorithm(),
                scenario,
                config,
            )
            .run_cpd()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CpdError;

    /// Never finds anything.
    struct Silent;

    impl Algorithm for Silent {
        fn detect(&mut self, _window: &[f64]) -> Result<usize> {
            Ok(0)
        }

        fn localize(&mut self, _window: &[f64]) -> Result<Vec<usize>> {
            Ok(Vec::new())
        }
    }

    /// Localizes the first index whose value exceeds the threshold.
    struct Above(f64);

    impl Algorithm for Above {
        fn detect(&mut self, window: &[f64]) -> Result<usize> {
            Ok(self.localize(window)?.len())
        }

        fn localize(&mut self, window: &[f64]) -> Result<Vec<usize>> {
            Ok(window
                .iter()
                .skip(1)
                .position(|&x| x > self.0)
                .map(|i| vec![i + 1])
                .unwrap_or_default())
        }
    }

    #[test]
    fn raw_data_has_no_expectation() -> Result<()> {
        let mut shell = CpdShell::new(vec![1.0, 2.0, 3.0, 4.0], Silent);
        assert_eq!(shell.data(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(*shell.scenario(), Scenario::new(10, true)?);
        let container = shell.run_cpd()?;
        assert!(container.result.is_empty());
        assert_eq!(container.expected, None);
        assert_eq!(container.difference(), None);
        Ok(())
    }

    #[test]
    fn labeled_data_carries_expectation() -> Result<()> {
        let labeled = LabeledCpData::new(vec![1.0, 2.0, 3.0, 4.0], vec![4, 5]);
        let mut shell = CpdShell::new(labeled, Silent);
        let container = shell.run_cpd()?;
        assert!(container.result.is_empty());
        assert_eq!(container.expected, Some(vec![4, 5]));
        assert_eq!(container.difference(), Some(vec![4, 5]));
        Ok(())
    }

    #[test]
    fn setters_rewire_the_core() -> Result<()> {
        let mut shell = CpdShell::new(vec![0.0; 4], Above(5.0));
        shell.set_data(LabeledCpData::new(
            [vec![0.0; 6], vec![9.0; 6]].concat(),
            vec![6],
        ));
        shell.change_scenario(1, true)?;
        assert!(shell.change_scenario(0, true).is_err());
        assert_eq!(shell.scenario().change_point_number(), 1);
        shell.set_scrubber_config(ScrubberConfig::new(12, 0.5)?);
        assert_eq!(shell.scrubber().window_length(), 12);
        let container = shell.run_cpd()?;
        assert_eq!(container.result, vec![6]);
        assert_eq!(container.difference(), Some(vec![]));

        shell.set_algorithm(Above(100.0));
        assert!(shell.run_cpd()?.result.is_empty());
        Ok(())
    }

    #[test]
    fn display_lists_all_three_lines() {
        let container = CpContainer {
            result: vec![3, 8],
            expected: Some(vec![3, 9]),
            time: Duration::from_millis(1),
        };
        assert_eq!(
            container.to_string(),
            "Located change points: (3;8)\n\
             Expected change point: (3;9)\n\
             Difference: (8;9)"
        );

        let container = CpContainer {
            expected: None,
            ..container
        };
        assert_eq!(container.to_string(), "Located change points: (3;8)");
    }

    #[test]
    fn batch_preserves_order() {
        let datasets = vec![
            LabeledCpData::new([vec![0.0; 5], vec![9.0; 5]].concat(), vec![5]),
            LabeledCpData::new(vec![0.0; 10], vec![]),
            LabeledCpData::new([vec![0.0; 3], vec![9.0; 7]].concat(), vec![3]),
        ];
        let results = run_labeled_batch(
            &datasets,
            Scenario::new(1, true).unwrap(),
            ScrubberConfig::default(),
            || Above(5.0),
        );
        let found: Vec<Vec<usize>> = results
            .into_iter()
            .map(|r| r.map(|c| c.result))
            .collect::<std::result::Result<_, CpdError>>()
            .unwrap();
        assert_eq!(found, vec![vec![5], vec![], vec![3]]);
    }
}
