//! A toy model with three known regime switches

use cpdshell::bayesian::detector::DropDetector;
use cpdshell::bayesian::hazard::ConstantHazard;
use cpdshell::bayesian::likelihood::GaussianUnknownMeanAndVariance;
use cpdshell::bayesian::localizer::SimpleLocalizer;
use cpdshell::bayesian::BayesianAlgorithm;
use cpdshell::{CpdShell, LabeledCpData, ScrubberConfig};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rv::prelude::*;

fn constant_sequence<'a, R: Rng>(
    c: f64,
    stddev: f64,
    rng: &'a mut R,
) -> impl Iterator<Item = f64> + 'a {
    let dist = Gaussian::new_unchecked(c, stddev);
    (0..).map(move |_| dist.draw(rng))
}

fn line_sequence<'a, R: Rng>(
    start: f64,
    delta: f64,
    stddev: f64,
    rng: &'a mut R,
) -> impl Iterator<Item = f64> + 'a {
    let noise = Gaussian::new_unchecked(0.0, stddev);

    (0..)
        .scan(start, move |state, _| {
            *state += delta;
            Some(*state)
        })
        .map(move |x| {
            let n: f64 = noise.draw(rng);
            x + n
        })
}

fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    let mut rng = SmallRng::seed_from_u64(0xABCD);

    println!("Generating sequence");
    let mut seq: Vec<f64> =
        constant_sequence(0.0, 1.0, &mut rng).take(150).collect();
    seq.extend(constant_sequence(15.0, 1.0, &mut rng).take(150));
    seq.extend(line_sequence(15.0, 0.05, 1.0, &mut rng).take(150));
    seq.extend(constant_sequence(-10.0, 2.0, &mut rng).take(150));

    println!("Creating cpd");
    let algorithm = BayesianAlgorithm::new(
        20,
        GaussianUnknownMeanAndVariance::new(),
        ConstantHazard::new(250.0)?,
        DropDetector::new(0.5)?,
        SimpleLocalizer,
    )?;
    let mut shell =
        CpdShell::new(LabeledCpData::new(seq, vec![150, 300, 450]), algorithm);
    shell.set_scrubber_config(ScrubberConfig::new(200, 1.0 / 3.0)?);

    println!("Locating change points");
    let container = shell.run_cpd()?;
    println!("{container}");
    println!("Took {:?}", container.time);

    Ok(())
}
