//! General Utilities

use std::collections::BTreeSet;

fn diff<T>(a: &T, b: &T) -> T
where
    T: PartialOrd + std::ops::Sub<Output = T>,
    for<'a> &'a T: std::ops::Sub<&'a T, Output = T>,
{
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// The max-norm or max-error between two sequences.
///
/// Returns `None` when the sequences differ in length or are empty.
pub fn max_error<T>(predicted: &[T], expected: &[T]) -> Option<T>
where
    T: PartialOrd + std::ops::Sub<Output = T>,
    for<'a> &'a T: std::ops::Sub<&'a T, Output = T>,
{
    if predicted.len() != expected.len() {
        return None;
    }
    predicted
        .iter()
        .zip(expected.iter())
        .map(|(a, b)| diff(a, b))
        .fold(None, |acc, d| match acc {
            Some(m) if m >= d => Some(m),
            _ => Some(d),
        })
}

/// Sorted change points present in exactly one of the two sets.
#[must_use]
pub fn symmetric_difference(found: &[usize], expected: &[usize]) -> Vec<usize> {
    let found: BTreeSet<usize> = found.iter().copied().collect();
    let expected: BTreeSet<usize> = expected.iter().copied().collect();
    found.symmetric_difference(&expected).copied().collect()
}
