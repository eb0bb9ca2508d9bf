//! Rule evaluation: filter, order, and fold matched rules into a rate.
//!
//! The evaluator is a pure function of (rules snapshot, scenario, base rate,
//! as-of date). All accumulators are local to a single call; repeated
//! evaluation of identical inputs yields an identical trace and final rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AppliedRule, CalculatedRate, Contribution, Rule, RuleAction, Scenario,
};

use super::matcher::all_match;

/// Identifies whose rate is being calculated and the effective window the
/// result inherits from its base rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateScope {
    /// The award being calculated.
    pub award_code: String,
    /// The classification being calculated.
    pub classification_id: String,
    /// First date (inclusive) the underlying base rate is in effect.
    pub effective_from: NaiveDate,
    /// Last date (inclusive) the underlying base rate is in effect.
    pub effective_to: Option<NaiveDate>,
}

/// Prices one scenario against a candidate rule set.
///
/// The algorithm:
/// 1. Filter candidates to rules that are active, within their effective
///    window at `as_of`, scoped to this classification, and whose condition
///    set matches the scenario.
/// 2. Stable-sort survivors by `(priority, id)` ascending. The id tie-break
///    makes equal-priority ordering deterministic rather than undefined.
/// 3. Fold: multiplier actions multiply the running rate; flat amounts
///    accumulate separately and never alter the running rate.
///
/// The final hourly rate is the folded running rate. Total shift
/// compensation (`running rate × duration + flat sum`) is reported
/// separately because flat allowances apply to the shift total, not the
/// rate; it is `None` when the scenario has no positive duration.
///
/// If no rule matches, the result is the base rate with an empty applied
/// list. A negative resulting rate is an invariant violation, fatal for this
/// scenario only.
pub fn evaluate(
    scope: &RateScope,
    base_rate_hourly: Decimal,
    scenario: &Scenario,
    candidate_rules: &[Rule],
    as_of: NaiveDate,
) -> EngineResult<CalculatedRate> {
    let mut matched: Vec<&Rule> = candidate_rules
        .iter()
        .filter(|rule| {
            rule.is_active()
                && rule.in_effect_on(as_of)
                && rule.applies_to_classification(&scope.classification_id)
                && all_match(&rule.conditions, scenario)
        })
        .collect();
    matched.sort_by(|a, b| (a.priority, &a.id).cmp(&(b.priority, &b.id)));

    let mut running_rate = base_rate_hourly;
    let mut cumulative_multiplier = Decimal::ONE;
    let mut flat_sum = Decimal::ZERO;
    let mut applied = Vec::with_capacity(matched.len());
    let mut trace_lines = vec![format!("Base rate: ${}/hr", base_rate_hourly.normalize())];

    for rule in matched {
        let contribution = match &rule.action {
            RuleAction::Multiplier { factor } => {
                let rate_before = running_rate;
                running_rate *= *factor;
                cumulative_multiplier *= *factor;
                trace_lines.push(format!(
                    "{} [{}]: ${} x {} = ${}",
                    rule.name,
                    rule.id,
                    rate_before.normalize(),
                    factor.normalize(),
                    running_rate.normalize()
                ));
                Contribution::Multiplier {
                    factor: *factor,
                    rate_before,
                    rate_after: running_rate,
                }
            }
            RuleAction::FlatAmount { amount, frequency } => {
                flat_sum += *amount;
                trace_lines.push(format!(
                    "{} [{}]: +${} {}",
                    rule.name,
                    rule.id,
                    amount.normalize(),
                    frequency
                ));
                Contribution::FlatAmount {
                    amount: *amount,
                    frequency: *frequency,
                }
            }
        };

        applied.push(AppliedRule {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            kind: rule.kind,
            reference: rule.reference.clone(),
            contribution,
        });
    }

    if running_rate < Decimal::ZERO {
        return Err(EngineError::InvariantViolation {
            message: format!(
                "Negative hourly rate {} for classification '{}' scenario '{}'",
                running_rate, scope.classification_id, scenario.label
            ),
        });
    }

    let total_shift_compensation = if scenario.shift_duration_hours > Decimal::ZERO {
        Some(running_rate * scenario.shift_duration_hours + flat_sum)
    } else {
        None
    };

    if flat_sum > Decimal::ZERO {
        trace_lines.push(format!(
            "Final rate: ${}/hr (flat allowances ${})",
            running_rate.normalize(),
            flat_sum.normalize()
        ));
    } else {
        trace_lines.push(format!("Final rate: ${}/hr", running_rate.normalize()));
    }

    Ok(CalculatedRate {
        id: Uuid::new_v4(),
        award_code: scope.award_code.clone(),
        classification_id: scope.classification_id.clone(),
        as_of,
        scenario: scenario.clone(),
        base_rate_hourly,
        applied,
        cumulative_multiplier,
        flat_sum,
        final_hourly_rate: running_rate,
        total_shift_compensation,
        trace: trace_lines.join("\n"),
        effective_from: scope.effective_from,
        effective_to: scope.effective_to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CompareOp, CompareValue, Condition, ConditionField, DayType, EmploymentType,
        FlatFrequency, RuleKind, RuleStatus, ShiftType, TimeWindow,
    };
    use chrono::NaiveTime;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn scope() -> RateScope {
        RateScope {
            award_code: "MA000018".to_string(),
            classification_id: "level_3".to_string(),
            effective_from: date("2025-07-01"),
            effective_to: None,
        }
    }

    fn scenario(employment: EmploymentType, day: DayType) -> Scenario {
        Scenario {
            label: format!("{} {}", employment, day),
            employment_type: employment,
            day_type: day,
            shift_type: ShiftType::Day,
            window: Some(TimeWindow::new(time(9, 0), time(17, 0))),
            shift_duration_hours: dec("8"),
            overtime_hours: Decimal::ZERO,
            age: None,
            flags: BTreeMap::new(),
        }
    }

    fn multiplier_rule(id: &str, priority: i32, factor: &str, conditions: Vec<Condition>) -> Rule {
        Rule {
            id: id.to_string(),
            award_code: "MA000018".to_string(),
            classification_id: None,
            name: id.replace('_', " "),
            kind: RuleKind::Penalty,
            priority,
            status: RuleStatus::Active,
            conditions,
            action: RuleAction::Multiplier { factor: dec(factor) },
            effective_from: date("2025-07-01"),
            effective_to: None,
            reference: String::new(),
        }
    }

    fn casual_condition() -> Condition {
        Condition::FieldInSet {
            field: ConditionField::EmploymentType,
            values: vec!["casual".to_string()],
        }
    }

    fn sunday_condition() -> Condition {
        Condition::FieldInSet {
            field: ConditionField::DayType,
            values: vec!["sunday".to_string()],
        }
    }

    /// Scenario 1 from the acceptance set: casual loading alone.
    #[test]
    fn test_casual_loading_alone() {
        let rules = vec![multiplier_rule(
            "casual_loading",
            50,
            "1.25",
            vec![casual_condition()],
        )];
        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::Casual, DayType::Weekday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        assert_eq!(result.final_hourly_rate, dec("31.2500"));
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].rule_id, "casual_loading");
        assert_eq!(result.cumulative_multiplier, dec("1.25"));
    }

    /// Scenario 2: casual loading then Sunday penalty compound.
    #[test]
    fn test_casual_loading_and_sunday_penalty_compound() {
        let rules = vec![
            multiplier_rule("sunday_penalty", 130, "2.0", vec![sunday_condition()]),
            multiplier_rule("casual_loading", 50, "1.25", vec![casual_condition()]),
        ];
        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::Casual, DayType::Sunday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        // 25.00 x 1.25 x 2.0, with the lower priority applied first.
        assert_eq!(result.final_hourly_rate, dec("62.50000"));
        let ids: Vec<&str> = result.applied.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["casual_loading", "sunday_penalty"]);
    }

    /// Scenario 3: a single night-shift multiplier.
    #[test]
    fn test_night_shift_multiplier() {
        let night = Condition::FieldInSet {
            field: ConditionField::ShiftType,
            values: vec!["night".to_string()],
        };
        let rules = vec![multiplier_rule("night_shift", 90, "1.15", vec![night])];

        let mut s = scenario(EmploymentType::FullTime, DayType::Weekday);
        s.shift_type = ShiftType::Night;
        s.window = Some(TimeWindow::new(time(22, 0), time(6, 0)));

        let result = evaluate(&scope(), dec("25.00"), &s, &rules, date("2025-08-01")).unwrap();
        assert_eq!(result.final_hourly_rate, dec("28.7500"));
    }

    /// Scenario 4: a flat meal allowance leaves the hourly rate untouched
    /// but raises total shift compensation.
    #[test]
    fn test_flat_allowance_affects_total_not_rate() {
        let meal_allowance = Rule {
            id: "meal_allowance".to_string(),
            award_code: "MA000018".to_string(),
            classification_id: None,
            name: "Meal Allowance".to_string(),
            kind: RuleKind::Allowance,
            priority: 200,
            status: RuleStatus::Active,
            conditions: vec![
                Condition::FieldCompare {
                    field: ConditionField::ShiftDurationHours,
                    op: CompareOp::Gte,
                    value: CompareValue::Number(dec("5")),
                },
                Condition::FieldCompare {
                    field: ConditionField::ShiftEndTime,
                    op: CompareOp::Gte,
                    value: CompareValue::Time(time(19, 0)),
                },
            ],
            action: RuleAction::FlatAmount {
                amount: dec("17.07"),
                frequency: FlatFrequency::PerShift,
            },
            effective_from: date("2025-07-01"),
            effective_to: None,
            reference: String::new(),
        };

        let mut s = scenario(EmploymentType::FullTime, DayType::Weekday);
        s.window = Some(TimeWindow::new(time(9, 0), time(20, 0)));
        s.shift_duration_hours = dec("11");

        let result = evaluate(
            &scope(),
            dec("25.00"),
            &s,
            &[meal_allowance],
            date("2025-08-01"),
        )
        .unwrap();

        assert_eq!(result.final_hourly_rate, dec("25.00"));
        assert_eq!(result.flat_sum, dec("17.07"));
        assert_eq!(result.total_shift_compensation, Some(dec("292.07")));
    }

    /// Scenario 5: an inactive rule never contributes, even in-window with
    /// matching conditions.
    #[test]
    fn test_inactive_rule_never_contributes() {
        let mut inactive = multiplier_rule("casual_loading", 50, "1.25", vec![casual_condition()]);
        inactive.status = RuleStatus::Inactive;

        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::Casual, DayType::Weekday),
            &[inactive],
            date("2025-08-01"),
        )
        .unwrap();

        assert_eq!(result.final_hourly_rate, dec("25.00"));
        assert!(result.applied.is_empty());
        assert!(!result.trace.contains("casual_loading"));
    }

    #[test]
    fn test_rule_outside_effective_window_never_contributes() {
        let mut expired = multiplier_rule("casual_loading", 50, "1.25", vec![casual_condition()]);
        expired.effective_to = Some(date("2025-07-31"));

        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::Casual, DayType::Weekday),
            &[expired],
            date("2025-08-01"),
        )
        .unwrap();
        assert!(result.applied.is_empty());
        assert_eq!(result.final_hourly_rate, dec("25.00"));
    }

    #[test]
    fn test_no_matching_rules_returns_base_rate() {
        let rules = vec![multiplier_rule(
            "sunday_penalty",
            130,
            "2.0",
            vec![sunday_condition()],
        )];
        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::FullTime, DayType::Weekday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        assert_eq!(result.final_hourly_rate, dec("25.00"));
        assert!(result.applied.is_empty());
        assert_eq!(result.cumulative_multiplier, Decimal::ONE);
        assert_eq!(result.trace.lines().count(), 2); // base + final
    }

    #[test]
    fn test_priority_order_not_insertion_order() {
        // Insert the higher-priority rule first; it must still apply second.
        let rules = vec![
            multiplier_rule("b_late", 100, "2.0", vec![]),
            multiplier_rule("a_early", 10, "1.5", vec![]),
        ];
        let result = evaluate(
            &scope(),
            dec("10.00"),
            &scenario(EmploymentType::FullTime, DayType::Weekday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        let ids: Vec<&str> = result.applied.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["a_early", "b_late"]);
        assert_eq!(result.final_hourly_rate, dec("30.0000"));
    }

    #[test]
    fn test_equal_priority_ties_break_on_rule_id() {
        let rules = vec![
            multiplier_rule("zeta", 50, "2.0", vec![]),
            multiplier_rule("alpha", 50, "1.5", vec![]),
        ];
        let result = evaluate(
            &scope(),
            dec("10.00"),
            &scenario(EmploymentType::FullTime, DayType::Weekday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        let ids: Vec<&str> = result.applied.iter().map(|a| a.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_classification_scoped_rule_skipped_for_other_classification() {
        let mut scoped = multiplier_rule("level_4_loading", 50, "1.1", vec![]);
        scoped.classification_id = Some("level_4".to_string());

        let result = evaluate(
            &scope(), // level_3
            dec("25.00"),
            &scenario(EmploymentType::FullTime, DayType::Weekday),
            &[scoped],
            date("2025-08-01"),
        )
        .unwrap();
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_negative_rate_is_invariant_violation() {
        let rules = vec![multiplier_rule("bad_factor", 50, "-1.0", vec![])];
        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::FullTime, DayType::Weekday),
            &rules,
            date("2025-08-01"),
        );
        match result {
            Err(EngineError::InvariantViolation { message }) => {
                assert!(message.contains("Negative hourly rate"));
            }
            other => panic!("Expected InvariantViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_trace_records_every_step() {
        let rules = vec![
            multiplier_rule("casual_loading", 50, "1.25", vec![casual_condition()]),
            multiplier_rule("sunday_penalty", 130, "2.0", vec![sunday_condition()]),
        ];
        let result = evaluate(
            &scope(),
            dec("25.00"),
            &scenario(EmploymentType::Casual, DayType::Sunday),
            &rules,
            date("2025-08-01"),
        )
        .unwrap();

        let lines: Vec<&str> = result.trace.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Base rate: $25/hr");
        assert!(lines[1].contains("[casual_loading]"));
        assert!(lines[1].contains("$25 x 1.25 = $31.25"));
        assert!(lines[2].contains("[sunday_penalty]"));
        assert!(lines[3].starts_with("Final rate: $62.5/hr"));
    }

    #[test]
    fn test_determinism_identical_inputs_identical_output() {
        let rules = vec![
            multiplier_rule("sunday_penalty", 130, "2.0", vec![sunday_condition()]),
            multiplier_rule("casual_loading", 50, "1.25", vec![casual_condition()]),
        ];
        let s = scenario(EmploymentType::Casual, DayType::Sunday);

        let first = evaluate(&scope(), dec("25.00"), &s, &rules, date("2025-08-01")).unwrap();
        let second = evaluate(&scope(), dec("25.00"), &s, &rules, date("2025-08-01")).unwrap();

        assert_eq!(first.trace, second.trace);
        assert_eq!(first.final_hourly_rate, second.final_hourly_rate);
        assert_eq!(first.applied, second.applied);
    }
}
