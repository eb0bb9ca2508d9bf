//! Rule model and related types.
//!
//! A [`Rule`] is a declarative penalty or allowance record: a set of
//! condition predicates that must all hold against a scenario, and an action
//! applied when they do. Conditions are a closed tagged variant type rather
//! than a formula language, which keeps matching exhaustive and total.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::scenario::ConditionField;

/// The kind of rule: penalties multiply the running rate, allowances add a
/// flat amount to total compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A conditional multiplier on the running rate (e.g. weekend penalty).
    Penalty,
    /// A conditional flat amount added to shift compensation (e.g. meal
    /// allowance).
    Allowance,
}

/// The lifecycle status of a rule.
///
/// Only [`RuleStatus::Active`] rules ever contribute to a result, regardless
/// of how well their conditions match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// The rule participates in evaluation.
    Active,
    /// The rule is retained but never applied.
    Inactive,
    /// The rule is being authored and never applied.
    Draft,
}

/// A comparison operator for [`Condition::FieldCompare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal.
    Eq,
}

impl CompareOp {
    /// Applies the operator to an ordered pair of values.
    pub fn holds<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            CompareOp::Gt => left > right,
            CompareOp::Gte => left >= right,
            CompareOp::Lt => left < right,
            CompareOp::Lte => left <= right,
            CompareOp::Eq => left == right,
        }
    }
}

/// The right-hand side of a comparison: numeric or time-of-day.
///
/// Untagged for serialization: `"19:00:00"` parses as a time, `"5"` or `5`
/// as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareValue {
    /// A numeric comparison value.
    Number(Decimal),
    /// A time-of-day comparison value.
    Time(NaiveTime),
}

/// A single condition predicate within a rule's condition set.
///
/// All predicates in a set conjoin: the rule matches only when every one
/// holds. A predicate referencing a field absent from the scenario evaluates
/// false rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// The field's textual value is a member of `values`. Case-sensitive
    /// exact match against the fixed enumerations.
    FieldInSet {
        /// The scenario field to read.
        field: ConditionField,
        /// The accepted values.
        values: Vec<String>,
    },
    /// The field's numeric or time value compares true against `value`.
    FieldCompare {
        /// The scenario field to read.
        field: ConditionField,
        /// The comparison operator.
        op: CompareOp,
        /// The value to compare against.
        value: CompareValue,
    },
    /// The scenario's time window overlaps this time range for a non-zero
    /// duration. The range may cross midnight.
    TimeRangeOverlap {
        /// Range start time of day.
        start: NaiveTime,
        /// Range end time of day.
        end: NaiveTime,
    },
    /// The named scenario boolean attribute equals `value`.
    BooleanFlagEquals {
        /// The attribute flag name.
        flag: String,
        /// The required value.
        value: bool,
    },
}

/// How often a flat allowance amount is paid.
///
/// The tag travels with the amount into the calculated result; the engine
/// itself adds the amount once per evaluated scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatFrequency {
    /// Paid once per shift.
    PerShift,
    /// Paid once per week.
    PerWeek,
    /// Paid once per qualifying occasion.
    PerOccasion,
}

impl std::fmt::Display for FlatFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlatFrequency::PerShift => write!(f, "per shift"),
            FlatFrequency::PerWeek => write!(f, "per week"),
            FlatFrequency::PerOccasion => write!(f, "per occasion"),
        }
    }
}

/// The action a matched rule applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Multiply the running rate by `factor`.
    Multiplier {
        /// The multiplicative factor (e.g. 1.25 for a 25% loading).
        factor: Decimal,
    },
    /// Add a flat amount to total shift compensation. Never alters the
    /// running hourly rate.
    FlatAmount {
        /// The flat dollar amount.
        amount: Decimal,
        /// The payment frequency tag.
        frequency: FlatFrequency,
    },
}

/// A declarative penalty or allowance rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier within the award.
    pub id: String,
    /// The award this rule belongs to.
    pub award_code: String,
    /// Optional classification scope; `None` applies award-wide.
    #[serde(default)]
    pub classification_id: Option<String>,
    /// Human-readable rule name.
    pub name: String,
    /// Whether the rule is a penalty or an allowance.
    pub kind: RuleKind,
    /// Evaluation priority; ascending priority is evaluated earlier.
    pub priority: i32,
    /// Lifecycle status.
    pub status: RuleStatus,
    /// The condition set. Empty means the rule always matches.
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// The action applied when the rule matches.
    pub action: RuleAction,
    /// First date (inclusive) the rule is in effect.
    pub effective_from: NaiveDate,
    /// Last date (inclusive) the rule is in effect; `None` is open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Free-text clause or source annotation.
    #[serde(default)]
    pub reference: String,
}

impl Rule {
    /// Returns true if the rule's status is active.
    pub fn is_active(&self) -> bool {
        self.status == RuleStatus::Active
    }

    /// Returns true if `date` falls within the rule's effective window,
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

    /// Returns true if the rule applies to the given classification: either
    /// the rule is award-wide or its classification scope matches.
    pub fn applies_to_classification(&self, classification_id: &str) -> bool {
        match &self.classification_id {
            Some(scope) => scope == classification_id,
            None => true,
        }
    }
}
