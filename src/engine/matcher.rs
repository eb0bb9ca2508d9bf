//! Condition matching against scenario contexts.
//!
//! Matching is a pure function with no side effects and no failure mode: a
//! predicate that references a field absent from the scenario evaluates
//! false, which fails the whole rule since predicates conjoin.

use crate::models::{CompareValue, Condition, FieldValue, Scenario, TimeWindow};

/// Evaluates a single condition predicate against a scenario.
///
/// # Example
///
/// ```
/// use award_rates::engine::matches;
/// use award_rates::models::{Condition, ConditionField, DayType, EmploymentType, Scenario, ShiftType};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let scenario = Scenario {
///     label: "casual saturday".to_string(),
///     employment_type: EmploymentType::Casual,
///     day_type: DayType::Saturday,
///     shift_type: ShiftType::Day,
///     window: None,
///     shift_duration_hours: Decimal::from(8),
///     overtime_hours: Decimal::ZERO,
///     age: None,
///     flags: BTreeMap::new(),
/// };
///
/// let weekend = Condition::FieldInSet {
///     field: ConditionField::DayType,
///     values: vec!["saturday".to_string(), "sunday".to_string()],
/// };
/// assert!(matches(&weekend, &scenario));
/// ```
pub fn matches(condition: &Condition, scenario: &Scenario) -> bool {
    match condition {
        Condition::FieldInSet { field, values } => match scenario.field(*field) {
            Some(FieldValue::Text(text)) => values.iter().any(|v| v == &text),
            // Set membership is defined for textual enumerations only.
            Some(_) | None => false,
        },
        Condition::FieldCompare { field, op, value } => {
            match (scenario.field(*field), value) {
                (Some(FieldValue::Number(actual)), CompareValue::Number(expected)) => {
                    op.holds(&actual, expected)
                }
                (Some(FieldValue::Time(actual)), CompareValue::Time(expected)) => {
                    op.holds(&actual, expected)
                }
                // Missing field or mismatched value kinds never match.
                _ => false,
            }
        }
        Condition::TimeRangeOverlap { start, end } => match scenario.window {
            Some(window) => window.overlaps(&TimeWindow::new(*start, *end)),
            None => false,
        },
        Condition::BooleanFlagEquals { flag, value } => scenario.flag(flag) == Some(*value),
    }
}

/// Evaluates a full condition set: every predicate must hold.
///
/// An empty condition set always matches, which is how unconditional
/// loadings are expressed alongside single-predicate rules such as a casual
/// loading keyed only on employment type.
pub fn all_match(conditions: &[Condition], scenario: &Scenario) -> bool {
    conditions.iter().all(|c| matches(c, scenario))
}
