//! Data models for the rule evaluation engine.
//!
//! This module contains the core value types: declarative rules and their
//! conditions, scenario contexts, base rates, and the calculated-rate and
//! run-result records produced by the engine.

mod base_rate;
mod result;
mod rule;
mod scenario;

pub use base_rate::{BaseRate, RateNormalization, RateUnit};
pub use result::{AppliedRule, CalculatedRate, Contribution, RunResult, RunStatus};
pub use rule::{CompareOp, CompareValue, Condition, FlatFrequency, Rule, RuleAction, RuleKind, RuleStatus};
pub use scenario::{
    ConditionField, DayType, EmploymentType, FieldValue, Scenario, ShiftType, TimeWindow,
};
