use std::{fmt::Display, ops::Deref};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Share of a whole, stored as a value in percent (`45.0` means 45%).
///
/// Deserialized values go through [Percentage::new_opt].
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

#[derive(Debug, Error)]
#[error("percentage must be a finite non-negative number, got {0}")]
pub struct InvalidPercentage(f64);

impl TryFrom<f64> for Percentage {
    type Error = InvalidPercentage;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Percentage::new_opt(value).ok_or(InvalidPercentage(value))
    }
}

impl From<Percentage> for f64 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.);

    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || !value.is_finite() {
            None
        } else {
            Some(Percentage(value))
        }
    }

    /// Same as [Percentage::new_opt] but negative values are allowed. Shares of batches with
    /// negative minute values can be negative.
    pub(crate) fn raw(value: f64) -> Percentage {
        Percentage(value)
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rounds to one decimal place. Ties go to the even digit, which is what numpy does for
/// `round(1)`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.).round_ties_even() / 10.
}

/// Share of `value` in `whole`, rounded to one decimal. A whole that isn't positive yields 0 so
/// callers never divide by zero.
pub fn share_percentage(value: i64, whole: i64) -> Percentage {
    if whole <= 0 {
        return Percentage::ZERO;
    }
    Percentage::raw(round_one_decimal(value as f64 / whole as f64 * 100.))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_percentage_rounds_to_one_decimal() {
        assert_eq!(*share_percentage(1, 3), 33.3);
        assert_eq!(*share_percentage(2, 3), 66.7);
        assert_eq!(*share_percentage(90, 90), 100.);
    }

    #[test]
    fn test_share_percentage_zero_whole() {
        assert_eq!(share_percentage(0, 0), Percentage::ZERO);
        assert_eq!(share_percentage(10, -5), Percentage::ZERO);
    }

    #[test]
    fn test_round_one_decimal_ties_to_even() {
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(12.34), 12.3);
    }

    #[test]
    fn test_new_opt_rejects_negative() {
        assert!(Percentage::new_opt(-3.).is_none());
        assert!(Percentage::new_opt(f64::NAN).is_none());
        assert_eq!(*Percentage::new_opt(12.5).unwrap(), 12.5);
    }

    #[test]
    fn test_deserialize_validates() {
        let value: Percentage = serde_json::from_str("40").unwrap();
        assert_eq!(*value, 40.);
        assert!(serde_json::from_str::<Percentage>("-5").is_err());
        assert_eq!(serde_json::to_string(&value).unwrap(), "40.0");
        assert_eq!(serde_json::to_string(&Percentage::raw(-2.5)).unwrap(), "-2.5");
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::new_opt(45.).unwrap().to_string(), "45.0%");
    }
}
