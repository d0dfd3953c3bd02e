//! Change point localizers.

use crate::traits::Localizer;
use rv::misc::argmax;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Picks the most probable run length other than the maximal one.
///
/// The maximal run length stands for "no change point since learning", so
/// the best alternative to it marks where the break most likely happened.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimpleLocalizer;

impl Localizer for SimpleLocalizer {
    fn localize(&self, growth_probs: &[f64]) -> usize {
        match growth_probs.split_last() {
            Some((_, rest)) if !rest.is_empty() => {
                argmax(rest).first().copied().unwrap_or(0)
            }
            _ => 0,
        }
    }
}
