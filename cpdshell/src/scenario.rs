//! Task description for a scrubbing run.

use crate::error::{CpdError, Result};
use derive_more::Display;

#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

/// How many change points to look for and whether their positions matter.
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(try_from = "RawScenario"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[display(
    fmt = "Scenario(change_point_number={}, to_localize={})",
    change_point_number,
    to_localize
)]
pub struct Scenario {
    change_point_number: usize,
    to_localize: bool,
}

impl Scenario {
    /// Create a new `Scenario`.
    ///
    /// # Errors
    /// `change_point_number` must be positive.
    ///
    /// # Example
    /// ```rust
    /// use cpdshell::Scenario;
    ///
    /// let scenario = Scenario::new(3, true)?;
    /// assert_eq!(scenario.change_point_number(), 3);
    /// assert!(Scenario::new(0, true).is_err());
    /// # Ok::<(), cpdshell::CpdError>(())
    /// ```
    pub fn new(change_point_number: usize, to_localize: bool) -> Result<Self> {
        if change_point_number == 0 {
            return Err(CpdError::InvalidParameter(
                "change_point_number must be positive".into(),
            ));
        }
        Ok(Self::new_unchecked(change_point_number, to_localize))
    }

    pub(crate) const fn new_unchecked(
        change_point_number: usize,
        to_localize: bool,
    ) -> Self {
        Self {
            change_point_number,
            to_localize,
        }
    }

    /// The run terminates once this many change points were found.
    #[must_use]
    pub fn change_point_number(&self) -> usize {
        self.change_point_number
    }

    /// Collect positions with `localize` instead of counts with `detect`.
    #[must_use]
    pub fn to_localize(&self) -> bool {
        self.to_localize
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new_unchecked(1, false)
    }
}

#[cfg(feature = "serde1")]
#[derive(Deserialize)]
struct RawScenario {
    change_point_number: usize,
    to_localize: bool,
}

#[cfg(feature = "serde1")]
impl TryFrom<RawScenario> for Scenario {
    type Error = CpdError;

    fn try_from(raw: RawScenario) -> Result<Self> {
        Self::new(raw.change_point_number, raw.to_localize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_for_one_unlocalized_change_point() {
        let scenario = Scenario::default();
        assert_eq!(scenario.change_point_number(), 1);
        assert!(!scenario.to_localize());
    }

    #[test]
    fn zero_budget_is_rejected() {
        assert!(matches!(
            Scenario::new(0, true),
            Err(CpdError::InvalidParameter(_))
        ));
        assert!(Scenario::new(0, false).is_err());
    }

    #[test]
    fn display() -> Result<()> {
        assert_eq!(
            Scenario::new(3, true)?.to_string(),
            "Scenario(change_point_number=3, to_localize=true)"
        );
        Ok(())
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn serde_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let scenario = Scenario::new(4, true)?;
        let json = serde_json::to_string(&scenario)?;
        let back: Scenario = serde_json::from_str(&json)?;
        assert_eq!(back, scenario);
        Ok(())
    }

    #[cfg(feature = "serde1")]
    #[test]
    fn deserializing_zero_budget_fails() {
        let res: std::result::Result<Scenario, _> = serde_json::from_str(
            r#"{"change_point_number":0,"to_localize":true}"#,
        );
        assert!(res.is_err());
    }
}
