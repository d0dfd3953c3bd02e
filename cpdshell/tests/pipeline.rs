use cpdshell::bayesian::detector::{DetectorKind, DropDetector};
use cpdshell::bayesian::hazard::{ConstantHazard, HazardKind};
use cpdshell::bayesian::likelihood::{
    GaussianUnknownMeanAndVariance, LikelihoodKind,
};
use cpdshell::bayesian::localizer::SimpleLocalizer;
use cpdshell::bayesian::BayesianAlgorithm;
use cpdshell::{
    run_labeled_batch, Algorithm, CpdCore, CpdError, CpdShell, LabeledCpData,
    Scenario, Scrubber, ScrubberConfig,
};
use rand::{rngs::SmallRng, SeedableRng};
use rv::prelude::*;
use std::error::Error;

type KindAlgorithm = BayesianAlgorithm<
    LikelihoodKind,
    HazardKind,
    DetectorKind,
    SimpleLocalizer,
>;

fn piecewise(seed: u64, segments: &[(f64, usize)]) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    segments
        .iter()
        .flat_map(|&(mu, len)| {
            let draws: Vec<f64> =
                Gaussian::new_unchecked(mu, 1.0).sample(len, &mut rng);
            draws
        })
        .collect()
}

fn bayesian(learning_steps: usize) -> Result<KindAlgorithm, CpdError> {
    BayesianAlgorithm::new(
        learning_steps,
        GaussianUnknownMeanAndVariance::new().into(),
        ConstantHazard::new(100.0)?.into(),
        DropDetector::new(0.5)?.into(),
        SimpleLocalizer,
    )
}

/// Reports the first index where the value jumps by more than one.
struct StepAlgorithm;

impl Algorithm for StepAlgorithm {
    fn detect(&mut self, window: &[f64]) -> cpdshell::Result<usize> {
        Ok(self.localize(window)?.len())
    }

    fn localize(&mut self, window: &[f64]) -> cpdshell::Result<Vec<usize>> {
        Ok(window
            .windows(2)
            .position(|w| (w[1] - w[0]).abs() > 1.0)
            .map(|i| vec![i + 1])
            .unwrap_or_default())
    }
}

#[test]
fn step_of_ones_and_hundreds() -> Result<(), Box<dyn Error>> {
    let data = [vec![1.0; 7], vec![100.0; 7]].concat();
    let scrubber = Scrubber::with_config(
        Scenario::new(1, true)?,
        data,
        ScrubberConfig::new(14, 1.0 / 3.0)?,
    );
    let mut core = CpdCore::new(scrubber, StepAlgorithm);
    assert_eq!(core.run()?, vec![7]);
    Ok(())
}

#[test]
fn scrubber_slides_then_stops_on_budget() -> Result<(), Box<dyn Error>> {
    let data: Vec<f64> = (1..=7).map(f64::from).collect();

    let mut scrubber = Scrubber::with_config(
        Scenario::new(1, true)?,
        data.clone(),
        ScrubberConfig::new(5, 1.0 / 3.0)?,
    );
    assert_eq!(scrubber.generate_window()?, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    scrubber.add_change_points(&[])?;
    assert_eq!(scrubber.generate_window()?, &[2.0, 3.0, 4.0, 5.0, 6.0]);

    let mut scrubber = Scrubber::new(Scenario::new(2, true)?, data);
    scrubber.add_change_points(&[1, 2])?;
    assert_eq!(scrubber.change_points(), &[1, 2]);
    assert!(!scrubber.is_running());
    assert_eq!(
        scrubber.generate_window().unwrap_err(),
        CpdError::WindowsExhausted
    );
    Ok(())
}

#[test]
fn shell_locates_both_shifts() -> Result<(), Box<dyn Error>> {
    let data = piecewise(0x5EED, &[(0.0, 40), (25.0, 40), (-25.0, 40)]);
    let labeled = LabeledCpData::new(data, vec![40, 80]);
    let mut shell = CpdShell::new(labeled, bayesian(10)?);
    shell.set_scrubber_config(ScrubberConfig::new(120, 1.0 / 3.0)?);
    shell.change_scenario(5, true)?;

    let container = shell.run_cpd()?;
    assert!(container.result.iter().any(|cp| cp.abs_diff(40) <= 2));
    assert!(container.result.iter().any(|cp| cp.abs_diff(80) <= 2));
    assert!(container.to_string().starts_with("Located change points: ("));

    let rerun = shell.run_cpd()?;
    assert_eq!(rerun.result, container.result);
    Ok(())
}

#[test]
fn detection_respects_budget() -> Result<(), Box<dyn Error>> {
    let data = piecewise(
        0xABCD,
        &[(0.0, 30), (8.0, 30), (0.0, 30), (8.0, 30), (0.0, 30)],
    );
    for budget in 1..=4 {
        let scrubber = Scrubber::with_config(
            Scenario::new(budget, false)?,
            data.clone(),
            ScrubberConfig::new(40, 0.5)?,
        );
        let mut core = CpdCore::new(scrubber, bayesian(5)?);
        assert!(core.run()?.len() <= budget);
    }
    Ok(())
}

#[test]
fn batch_runs_each_dataset_independently() -> Result<(), Box<dyn Error>> {
    let datasets: Vec<LabeledCpData> = [(1_u64, 30), (2, 50), (3, 70)]
        .iter()
        .map(|&(seed, switch)| {
            let data = piecewise(seed, &[(0.0, switch), (20.0, 100 - switch)]);
            LabeledCpData::new(data, vec![switch])
        })
        .collect();

    let results = run_labeled_batch(
        &datasets,
        Scenario::new(3, true)?,
        ScrubberConfig::new(100, 0.5)?,
        || bayesian(10).expect("valid parameters"),
    );
    assert_eq!(results.len(), datasets.len());
    for (result, dataset) in results.into_iter().zip(&datasets) {
        let container = result?;
        let switch = dataset.change_points[0];
        assert_eq!(container.expected.as_deref(), Some(&[switch][..]));
        assert!(container.result.iter().any(|cp| cp.abs_diff(switch) <= 2));
    }
    Ok(())
}

#[test]
fn zero_budget_is_refused_everywhere() -> Result<(), Box<dyn Error>> {
    assert!(Scenario::new(0, true).is_err());

    let mut shell = CpdShell::new(vec![0.0; 30], StepAlgorithm);
    assert!(shell.change_scenario(0, false).is_err());
    assert_eq!(shell.scenario().change_point_number(), 10);

    let mut scrubber = Scrubber::new(Scenario::new(1, true)?, vec![0.0; 30]);
    scrubber.add_change_points(&[3, 4])?;
    assert_eq!(scrubber.change_points(), &[3]);
    Ok(())
}
