//! Calculated rate and run result models.
//!
//! This module contains the [`CalculatedRate`] record produced by one
//! evaluator invocation and the [`RunResult`] summary produced by a full
//! calculation run. Both are immutable once created: a recomputation creates
//! a new record, it does not patch an old one.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::{FlatFrequency, RuleKind};
use super::scenario::Scenario;

/// The contribution one applied rule made to a calculated rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Contribution {
    /// A multiplicative step on the running rate.
    Multiplier {
        /// The factor applied.
        factor: Decimal,
        /// The running rate before this step.
        rate_before: Decimal,
        /// The running rate after this step.
        rate_after: Decimal,
    },
    /// A flat amount accumulated into the shift total.
    FlatAmount {
        /// The flat dollar amount.
        amount: Decimal,
        /// The payment frequency tag.
        frequency: FlatFrequency,
    },
}

/// One entry in the ordered trace of applied rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedRule {
    /// The identifier of the applied rule.
    pub rule_id: String,
    /// The human-readable rule name.
    pub rule_name: String,
    /// Whether the rule was a penalty or an allowance.
    pub kind: RuleKind,
    /// Free-text clause or source annotation carried from the rule.
    pub reference: String,
    /// What the rule contributed.
    pub contribution: Contribution,
}

/// The complete, auditable result of pricing one scenario.
///
/// Created by one evaluator invocation; owned by the calculation runner until
/// handed to the result sink; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedRate {
    /// Unique identifier for this record.
    pub id: Uuid,
    /// The award the rate belongs to.
    pub award_code: String,
    /// The classification the rate belongs to.
    pub classification_id: String,
    /// The evaluation date.
    pub as_of: NaiveDate,
    /// The scenario that was priced.
    pub scenario: Scenario,
    /// The normalized hourly base rate the fold started from.
    pub base_rate_hourly: Decimal,
    /// The ordered list of applied rules and their contributions.
    pub applied: Vec<AppliedRule>,
    /// Product of all applied multiplier factors.
    pub cumulative_multiplier: Decimal,
    /// Sum of all applied flat amounts.
    pub flat_sum: Decimal,
    /// The final hourly rate after all multipliers.
    pub final_hourly_rate: Decimal,
    /// Total compensation for the shift: `final_hourly_rate × duration +
    /// flat_sum`. `None` when the scenario carries no duration.
    pub total_shift_compensation: Option<Decimal>,
    /// The human-readable calculation trace, one line per step.
    pub trace: String,
    /// First date (inclusive) the underlying base rate is in effect.
    pub effective_from: NaiveDate,
    /// Last date (inclusive) the underlying base rate is in effect.
    pub effective_to: Option<NaiveDate>,
}

/// The overall status of a calculation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every scenario evaluated successfully.
    Success,
    /// Some scenarios were skipped or failed; the rest were published.
    Partial,
    /// Nothing useful was produced.
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Partial => write!(f, "partial"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The execution log of one calculation run.
///
/// A run outcome always reports its counts and error messages; a partial
/// result is never silent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// The award that was calculated.
    pub award_code: String,
    /// The evaluation date.
    pub as_of: NaiveDate,
    /// The overall run status.
    pub status: RunStatus,
    /// Scenarios submitted for evaluation.
    pub scenarios_attempted: u32,
    /// Scenarios that produced a calculated rate.
    pub scenarios_succeeded: u32,
    /// Scenarios skipped before evaluation (e.g. missing base rate).
    pub scenarios_skipped: u32,
    /// Calculated rates handed to the result sink.
    pub results_published: u32,
    /// Error messages recorded during the run.
    pub errors: Vec<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunResult {
    /// Scenarios that were attempted but did not produce a result.
    pub fn scenarios_failed(&self) -> u32 {
        self.scenarios_attempted
            .saturating_sub(self.scenarios_succeeded)
    }

    /// Total run duration in seconds, if the run has finished.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}
