//! Scenario enumeration: the curated representative set.
//!
//! Rather than the full cross-product of every dimension (combinatorially
//! explosive and mostly redundant), the enumerator generates a curated set:
//! a baseline weekday scenario per employment type, one scenario per
//! employment type × special day type, one per shift-type variant, one per
//! junior age where junior rates apply, and one per classification attribute
//! flag. A caller needing a fuller cross-product composes multiple curated
//! sets.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DayType, EmploymentType, Scenario, ShiftType, TimeWindow};

/// The junior ages enumerated for classifications with junior rates.
pub const JUNIOR_AGES: [u8; 5] = [16, 17, 18, 19, 20];

const EMPLOYMENT_TYPES: [EmploymentType; 3] = [
    EmploymentType::FullTime,
    EmploymentType::PartTime,
    EmploymentType::Casual,
];

const SPECIAL_DAYS: [DayType; 3] = [DayType::Saturday, DayType::Sunday, DayType::PublicHoliday];

/// The classification attributes that drive scenario enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationProfile {
    /// The classification identifier.
    pub id: String,
    /// The human-readable classification name.
    pub name: String,
    /// Whether junior (age-conditioned) rates apply to this classification.
    #[serde(default)]
    pub junior_rates: bool,
    /// Boolean attribute flags that get a dedicated scenario each
    /// (e.g. "certified_first_aid").
    #[serde(default)]
    pub attribute_flags: Vec<String>,
}

fn time(h: u32, m: u32) -> NaiveTime {
    // Safe for the fixed constants used below.
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time constant")
}

fn day_window() -> TimeWindow {
    TimeWindow::new(time(9, 0), time(17, 0))
}

fn base_scenario(label: String, employment: EmploymentType, day: DayType) -> Scenario {
    Scenario {
        label,
        employment_type: employment,
        day_type: day,
        shift_type: ShiftType::Day,
        window: Some(day_window()),
        shift_duration_hours: Decimal::from(8),
        overtime_hours: Decimal::ZERO,
        age: None,
        flags: BTreeMap::new(),
    }
}

/// Produces the curated representative scenario set for a classification.
///
/// The sequence is finite and restartable: the same profile always yields
/// the same ordered scenarios.
///
/// # Example
///
/// ```
/// use award_rates::engine::{enumerate_scenarios, ClassificationProfile};
///
/// let profile = ClassificationProfile {
///     id: "level_3".to_string(),
///     name: "Level 3".to_string(),
///     junior_rates: false,
///     attribute_flags: vec![],
/// };
/// let scenarios = enumerate_scenarios(&profile);
/// // 3 weekday baselines + 3 employment types x 3 special days + 2 shift variants.
/// assert_eq!(scenarios.len(), 14);
/// assert_eq!(enumerate_scenarios(&profile), scenarios);
/// ```
pub fn enumerate_scenarios(profile: &ClassificationProfile) -> Vec<Scenario> {
    let mut scenarios = Vec::new();

    // Baseline weekday scenario per employment type.
    for employment in EMPLOYMENT_TYPES {
        scenarios.push(base_scenario(
            format!("{} weekday baseline", employment),
            employment,
            DayType::Weekday,
        ));
    }

    // Employment type x special day type.
    for employment in EMPLOYMENT_TYPES {
        for day in SPECIAL_DAYS {
            scenarios.push(base_scenario(
                format!("{} {}", employment, day),
                employment,
                day,
            ));
        }
    }

    // Shift-type variants, priced on the full-time weekday baseline.
    let mut evening = base_scenario(
        "full_time weekday evening shift".to_string(),
        EmploymentType::FullTime,
        DayType::Weekday,
    );
    evening.shift_type = ShiftType::Evening;
    evening.window = Some(TimeWindow::new(time(14, 0), time(22, 0)));
    scenarios.push(evening);

    let mut night = base_scenario(
        "full_time weekday night shift".to_string(),
        EmploymentType::FullTime,
        DayType::Weekday,
    );
    night.shift_type = ShiftType::Night;
    night.window = Some(TimeWindow::new(time(22, 0), time(6, 0)));
    scenarios.push(night);

    // Junior age brackets where junior rates apply.
    if profile.junior_rates {
        for age in JUNIOR_AGES {
            let mut junior = base_scenario(
                format!("full_time weekday junior age {}", age),
                EmploymentType::FullTime,
                DayType::Weekday,
            );
            junior.age = Some(age);
            scenarios.push(junior);
        }
    }

    // One scenario per classification attribute flag.
    for flag in &profile.attribute_flags {
        let mut flagged = base_scenario(
            format!("full_time weekday with {}", flag),
            EmploymentType::FullTime,
            DayType::Weekday,
        );
        flagged.flags.insert(flag.clone(), true);
        scenarios.push(flagged);
    }

    scenarios
}
