//! Change point detection core
//!
//! Drives a [`Scrubber`] and an [`Algorithm`] over one data stream.

use crate::error::Result;
use crate::scrubber::Scrubber;
use crate::traits::Algorithm;
use tracing::{debug, debug_span};

/// Runs an algorithm on every window a scrubber produces.
#[derive(Clone, Debug)]
pub struct CpdCore<A> {
    scrubber: Scrubber,
    algorithm: A,
}

impl<A: Algorithm> CpdCore<A> {
    /// Create a new `CpdCore`
    pub fn new(scrubber: Scrubber, algorithm: A) -> Self {
        Self {
            scrubber,
            algorithm,
        }
    }

    /// The scrubber splitting the data.
    pub fn scrubber(&self) -> &Scrubber {
        &self.scrubber
    }

    /// Mutable access to the scrubber, e.g. to swap data or scenario.
    pub fn scrubber_mut(&mut self) -> &mut Scrubber {
        &mut self.scrubber
    }

    /// The detection algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// Replace the detection algorithm.
    pub fn set_algorithm(&mut self, algorithm: A) {
        self.algorithm = algorithm;
    }

    /// Give back the scrubber and the algorithm.
    pub fn into_parts(self) -> (Scrubber, A) {
        (self.scrubber, self.algorithm)
    }

    /// Find the change points of the whole sequence.
    ///
    /// The scrubber is restarted first, so repeated runs are independent.
    /// Without localization the positions are unknown, and each detected
    /// change point is placed at the end of its window.
    ///
    /// # Errors
    /// Any error raised by the algorithm is returned as is.
    pub fn run(&mut self) -> Result<Vec<usize>> {
        let span = debug_span!(
            "cpd_run",
            window_length = self.scrubber.window_length(),
            scenario = %self.scrubber.scenario(),
        );
        let _guard = span.enter();

        self.scrubber.restart();
        while self.scrubber.is_running() {
            let window = self.scrubber.generate_window()?;
            let window_change_points =
                if self.scrubber.scenario().to_localize() {
                    self.algorithm.localize(window)?
                } else {
                    let count = self.algorithm.detect(window)?;
                    vec![window.len(); count]
                };
            self.scrubber.add_change_points(&window_change_points)?;
        }

        debug!(found = self.scrubber.change_points().len(), "run finished");
        Ok(self.scrubber.change_points().to_vec())
    }
}
