//! Functions to generate random sequences
use rand::Rng;
use rv::dist::Gaussian;
use rv::traits::Rv;

/// Generate a series of draws from two Gaussian process that switches
/// at `switch` into the sequence.
pub fn discontinuous_jump<R: Rng>(
    rng: &mut R,
    mu_1: f64,
    sigma_1: f64,
    mu_2: f64,
    sigma_2: f64,
    switch: usize,
    size: usize,
) -> Vec<f64> {
    piecewise_gaussian(
        rng,
        &[(mu_1, sigma_1, switch), (mu_2, sigma_2, size - switch)],
    )
}

/// Concatenate draws from a sequence of `(mean, sigma, length)` Gaussian
/// segments. Change points sit at the cumulative segment lengths.
pub fn piecewise_gaussian<R: Rng>(
    rng: &mut R,
    segments: &[(f64, f64, usize)],
) -> Vec<f64> {
    segments
        .iter()
        .flat_map(|&(mu, sigma, len)| {
            let g =
                Gaussian::new(mu, sigma).expect("Arguments should be valid");
            let draws: Vec<f64> = g.sample(len, rng);
            draws
        })
        .collect()
}

/// Seven ones followed by seven hundreds.
#[must_use]
pub fn step_ones_hundreds() -> Vec<f64> {
    [vec![1.0; 7], vec![100.0; 7]].concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn segments_have_requested_lengths() {
        let mut rng = SmallRng::seed_from_u64(0xABCD);
        let seq = piecewise_gaussian(
            &mut rng,
            &[(0.0, 1.0, 10), (5.0, 2.0, 20), (1.0, 1.0, 5)],
        );
        assert_eq!(seq.len(), 35);
        assert_eq!(
            discontinuous_jump(&mut rng, 0.0, 1.0, 10.0, 5.0, 500, 1000).len(),
            1000
        );
    }
}
