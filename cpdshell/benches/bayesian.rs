use cpdshell::bayesian::detector::DropDetector;
use cpdshell::bayesian::hazard::ConstantHazard;
use cpdshell::bayesian::likelihood::GaussianUnknownMeanAndVariance;
use cpdshell::bayesian::localizer::SimpleLocalizer;
use cpdshell::bayesian::BayesianAlgorithm;
use cpdshell::Algorithm;
use criterion::*;
use rand::{rngs::SmallRng, SeedableRng};
use rv::prelude::*;

fn bench_bayesian_localize(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0xABCD);
    let data: Vec<f64> = (0..5)
        .flat_map(|i| {
            let mu = if i % 2 == 0 { 0.0 } else { 10.0 };
            let draws: Vec<f64> =
                Gaussian::new_unchecked(mu, 1.0).sample(100, &mut rng);
            draws
        })
        .collect();

    let mut group = c.benchmark_group("BayesianAlgorithm");
    for nelems in (100..=500).step_by(100) {
        let subdata: Vec<f64> = data.iter().take(nelems).copied().collect();

        group.throughput(Throughput::Elements(nelems as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(nelems),
            &subdata,
            |b, data| {
                b.iter(|| {
                    let mut algorithm = BayesianAlgorithm::new(
                        10,
                        GaussianUnknownMeanAndVariance::new(),
                        ConstantHazard::new(250.0).unwrap(),
                        DropDetector::new(0.5).unwrap(),
                        SimpleLocalizer,
                    )
                    .unwrap();

                    black_box(algorithm.localize(data).unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_bayesian_localize);
criterion_main!(benches);
