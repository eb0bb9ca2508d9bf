//! Base rate model and hourly normalization.
//!
//! Base rates arrive per classification in hourly, weekly, or annual units
//! and are normalized once to an hourly figure before any rule is applied.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The unit a base rate value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateUnit {
    /// Dollars per hour.
    Hourly,
    /// Dollars per week.
    Weekly,
    /// Dollars per annum.
    Annual,
}

/// Divisors used to normalize weekly and annual rates to hourly figures.
///
/// Defaults follow a standard 38-hour week: weekly ÷ 38, annual ÷ 1976
/// (38 × 52). Award packs may override either divisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateNormalization {
    /// Ordinary hours per week.
    pub weekly_divisor: Decimal,
    /// Ordinary hours per year.
    pub annual_divisor: Decimal,
}

impl Default for RateNormalization {
    fn default() -> Self {
        Self {
            weekly_divisor: Decimal::from(38),
            annual_divisor: Decimal::from(1976),
        }
    }
}

/// A classification's base rate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRate {
    /// The classification this rate belongs to.
    pub classification_id: String,
    /// The rate value, in `unit` terms.
    pub value: Decimal,
    /// The unit of the rate value.
    pub unit: RateUnit,
    /// First date (inclusive) the rate is in effect.
    pub effective_from: NaiveDate,
    /// Last date (inclusive) the rate is in effect; `None` is open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

impl BaseRate {
    /// Returns true if `date` falls within the rate's effective window,
    /// inclusive at both ends.
    pub fn in_effect_on(&self, date: NaiveDate) -> bool {
        if date < self.effective_from {
            return false;
        }
        match self.effective_to {
            Some(to) => date <= to,
            None => true,
        }
    }

    /// Normalizes the rate to an hourly figure.
    ///
    /// Returns an error for a non-positive rate value or divisor; callers
    /// treat that as a skip for the classification, not a fatal failure.
    ///
    /// # Example
    ///
    /// ```
    /// use award_rates::models::{BaseRate, RateNormalization, RateUnit};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let rate = BaseRate {
    ///     classification_id: "level_3".to_string(),
    ///     value: Decimal::from(950),
    ///     unit: RateUnit::Weekly,
    ///     effective_from: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
    ///     effective_to: None,
    /// };
    /// let hourly = rate.hourly(&RateNormalization::default()).unwrap();
    /// assert_eq!(hourly, Decimal::from(25));
    /// ```
    pub fn hourly(&self, normalization: &RateNormalization) -> EngineResult<Decimal> {
        if self.value <= Decimal::ZERO {
            return Err(EngineError::NonPositiveBaseRate {
                classification: self.classification_id.clone(),
                value: self.value.to_string(),
            });
        }

        let divisor = match self.unit {
            RateUnit::Hourly => return Ok(self.value),
            RateUnit::Weekly => normalization.weekly_divisor,
            RateUnit::Annual => normalization.annual_divisor,
        };

        if divisor <= Decimal::ZERO {
            return Err(EngineError::CalculationError {
                message: format!("Non-positive normalization divisor: {}", divisor),
            });
        }

        Ok(self.value / divisor)
    }
}
