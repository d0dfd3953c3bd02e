//! Windowing over a finite sequence
//!
//! The [`Scrubber`] hands out fixed-length, overlapping windows of the data
//! and folds the window-relative change points found in each of them back
//! into global indices. A run ends either when the scenario's change point
//! budget is spent or when the next window would reach the end of the data.

use crate::error::{CpdError, Result};
use crate::scenario::Scenario;
use tracing::debug;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// Map a window-relative index into the coordinates of the full sequence.
#[inline]
#[must_use]
pub fn to_global(window_start: usize, relative: usize) -> usize {
    window_start + relative
}

/// Window geometry of a [`Scrubber`].
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "RawScrubberConfig"))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrubberConfig {
    window_length: usize,
    movement_fraction: f64,
}

impl ScrubberConfig {
    /// Create a new `ScrubberConfig`
    ///
    /// # Errors
    /// `window_length` must be positive, `movement_fraction` must lie in
    /// `(0, 1]`, and together they must move the window by at least one
    /// observation.
    pub fn new(window_length: usize, movement_fraction: f64) -> Result<Self> {
        if window_length == 0 {
            return Err(CpdError::InvalidParameter(
                "window_length must be positive".into(),
            ));
        }
        if !(movement_fraction > 0.0 && movement_fraction <= 1.0) {
            return Err(CpdError::InvalidParameter(format!(
                "movement_fraction must be in (0, 1]; got {movement_fraction}"
            )));
        }
        let config = Self {
            window_length,
            movement_fraction,
        };
        if config.movement() == 0 {
            return Err(CpdError::InvalidParameter(format!(
                "movement_fraction {movement_fraction} moves a window of \
                 length {window_length} by zero observations"
            )));
        }
        Ok(config)
    }

    /// Number of observations per window.
    #[must_use]
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Fraction of the window length a window slides when nothing was found.
    #[must_use]
    pub fn movement_fraction(&self) -> f64 {
        self.movement_fraction
    }

    /// Number of observations a window slides by, truncated towards zero.
    /// Always positive.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn movement(&self) -> usize {
        (self.movement_fraction * self.window_length as f64) as usize
    }
}

impl Default for ScrubberConfig {
    fn default() -> Self {
        Self {
            window_length: 10,
            movement_fraction: 1.0 / 3.0,
        }
    }
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct RawScrubberConfig {
    window_length: usize,
    movement_fraction: f64,
}

#[cfg(feature = "serde1")]
impl TryFrom<RawScrubberConfig> for ScrubberConfig {
    type Error = CpdError;

    fn try_from(raw: RawScrubberConfig) -> Result<Self> {
        Self::new(raw.window_length, raw.movement_fraction)
    }
}

/// Splits data into windows and collects the change points found in them.
#[derive(Clone, Debug, PartialEq)]
pub struct Scrubber {
    scenario: Scenario,
    config: ScrubberConfig,
    data: Vec<f64>,
    /// Bounds of the pending window, `None` once the run terminated.
    next_window: Option<(usize, usize)>,
    change_points: Vec<usize>,
}

impl Scrubber {
    /// Create a scrubber with windows of 10 observations moving by a third.
    ///
    /// # Example
    /// ```rust
    /// use cpdshell::{Scenario, Scrubber};
    ///
    /// let data: Vec<f64> = (1..=7).map(f64::from).collect();
    /// let scrubber = Scrubber::new(Scenario::new(1, true)?, data);
    /// assert!(scrubber.is_running());
    /// # Ok::<(), cpdshell::CpdError>(())
    /// ```
    #[must_use]
    pub fn new(scenario: Scenario, data: Vec<f64>) -> Self {
        Self::with_config(scenario, data, ScrubberConfig::default())
    }

    /// Create a scrubber with an explicit window geometry.
    #[must_use]
    pub fn with_config(
        scenario: Scenario,
        data: Vec<f64>,
        config: ScrubberConfig,
    ) -> Self {
        Self {
            scenario,
            config,
            data,
            next_window: Some((0, config.window_length)),
            change_points: Vec::new(),
        }
    }

    /// The scenario driving this run.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Window geometry.
    #[must_use]
    pub fn config(&self) -> &ScrubberConfig {
        &self.config
    }

    /// Length of a full window.
    #[must_use]
    pub fn window_length(&self) -> usize {
        self.config.window_length
    }

    /// The scrubbed sequence.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Whether windows are still being produced.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.next_window.is_some()
    }

    /// Global indices of the change points found so far.
    #[must_use]
    pub fn change_points(&self) -> &[usize] {
        &self.change_points
    }

    /// Bounds `(start, end)` of the pending window. `end` may lie past the
    /// end of the data; the window is clipped when generated.
    #[must_use]
    pub fn next_window(&self) -> Option<(usize, usize)> {
        self.next_window
    }

    /// Replace the scenario and start over.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
        self.restart();
    }

    /// Replace the data and start over.
    pub fn set_data(&mut self, data: Vec<f64>) {
        self.data = data;
        self.restart();
    }

    /// Replace the window geometry and start over.
    pub fn set_config(&mut self, config: ScrubberConfig) {
        self.config = config;
        self.restart();
    }

    /// Current window of data.
    ///
    /// # Errors
    /// Returns [`CpdError::WindowsExhausted`] after the run terminated.
    pub fn generate_window(&self) -> Result<&[f64]> {
        let (start, end) = self.next_window.ok_or(CpdError::WindowsExhausted)?;
        let len = self.data.len();
        Ok(&self.data[start.min(len)..end.min(len)])
    }

    /// Fold the change points of the current window into the global list
    /// and move to the next window.
    ///
    /// Indices past the scenario's budget are dropped. A non-empty batch
    /// moves the next window to the last change point found; an empty batch
    /// slides it by [`ScrubberConfig::movement`].
    ///
    /// # Errors
    /// Returns [`CpdError::NoPendingWindow`] after the run terminated.
    pub fn add_change_points(
        &mut self,
        window_change_points: &[usize],
    ) -> Result<()> {
        let (start, end) = self.next_window.ok_or(CpdError::NoPendingWindow)?;

        for &relative in window_change_points {
            self.change_points.push(to_global(start, relative));
            if self.change_points.len() >= self.scenario.change_point_number() {
                debug!(
                    found = self.change_points.len(),
                    "change point budget reached, stopping"
                );
                self.next_window = None;
                return Ok(());
            }
        }

        let window_length = self.config.window_length;
        match self.change_points.last() {
            Some(&last) if !window_change_points.is_empty() => {
                debug!(
                    start = last,
                    end = last + window_length,
                    "moving window to last change point"
                );
                self.next_window = Some((last, last + window_length));
            }
            _ => {
                let delta = self.config.movement();
                let (start, end) = (start + delta, end + delta);
                if end >= self.data.len() {
                    debug!(end, len = self.data.len(), "data exhausted");
                    self.next_window = None;
                } else {
                    debug!(start, end, "sliding window");
                    self.next_window = Some((start, end));
                }
            }
        }
        Ok(())
    }

    /// Go back to the first window and forget all change points.
    pub fn restart(&mut self) {
        self.next_window = Some((0, self.config.window_length));
        self.change_points.clear();
    }
}
