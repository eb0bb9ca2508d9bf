//! Scenario model and related types.
//!
//! A [`Scenario`] is an immutable description of one concrete work situation
//! to price: employment type, day type, shift type, an optional time window,
//! duration, overtime hours, age, and boolean attributes. Scenarios are
//! produced by the enumerator and never mutated during evaluation.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Full-time employment (typically 38 hours per week).
    FullTime,
    /// Part-time employment with a regular pattern.
    PartTime,
    /// Casual employment (no guaranteed hours, attracts casual loading).
    Casual,
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentType::FullTime => write!(f, "full_time"),
            EmploymentType::PartTime => write!(f, "part_time"),
            EmploymentType::Casual => write!(f, "casual"),
        }
    }
}

/// Represents the type of day for penalty rate purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
    /// A gazetted public holiday.
    PublicHoliday,
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "weekday"),
            DayType::Saturday => write!(f, "saturday"),
            DayType::Sunday => write!(f, "sunday"),
            DayType::PublicHoliday => write!(f, "public_holiday"),
        }
    }
}

/// Represents the shift-type variant being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    /// An ordinary day shift.
    Day,
    /// An afternoon/evening shift.
    Evening,
    /// A night shift, typically crossing midnight.
    Night,
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftType::Day => write!(f, "day"),
            ShiftType::Evening => write!(f, "evening"),
            ShiftType::Night => write!(f, "night"),
        }
    }
}

/// A time-of-day window, possibly crossing midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// The start time of the window.
    pub start: NaiveTime,
    /// The end time of the window. An end at or before the start means the
    /// window crosses midnight.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Returns true if the window crosses midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the window as half-open minute intervals within a day.
    ///
    /// A window crossing midnight yields two segments; any other window
    /// yields one.
    fn minute_segments(&self) -> Vec<(u32, u32)> {
        let start = minute_of_day(self.start);
        let end = minute_of_day(self.end);
        if self.crosses_midnight() {
            vec![(start, 1440), (0, end)]
        } else {
            vec![(start, end)]
        }
    }

    /// Returns true if this window overlaps another for a non-zero duration.
    ///
    /// # Example
    ///
    /// ```
    /// use award_rates::models::TimeWindow;
    /// use chrono::NaiveTime;
    ///
    /// let night = TimeWindow::new(
    ///     NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    /// );
    /// let early = TimeWindow::new(
    ///     NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
    ///     NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
    /// );
    /// assert!(night.overlaps(&early));
    /// ```
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        for (a_start, a_end) in self.minute_segments() {
            for (b_start, b_end) in other.minute_segments() {
                if a_start < b_end && b_start < a_end {
                    return true;
                }
            }
        }
        false
    }
}

fn minute_of_day(time: NaiveTime) -> u32 {
    use chrono::Timelike;
    time.hour() * 60 + time.minute()
}

/// The scenario fields a condition predicate may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    /// The employment type, as text ("full_time", "part_time", "casual").
    EmploymentType,
    /// The day type, as text ("weekday", "saturday", "sunday", "public_holiday").
    DayType,
    /// The shift type, as text ("day", "evening", "night").
    ShiftType,
    /// The shift duration in hours, numeric.
    ShiftDurationHours,
    /// The overtime hours worked, numeric.
    OvertimeHours,
    /// The employee age in years, numeric. Absent for adult baselines.
    Age,
    /// The shift start time of day. Absent when no window is set.
    ShiftStartTime,
    /// The shift end time of day. Absent when no window is set.
    ShiftEndTime,
}

/// A value read from a scenario for condition evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A textual enumeration value.
    Text(String),
    /// A numeric value.
    Number(Decimal),
    /// A time-of-day value.
    Time(NaiveTime),
}

/// A concrete combination of work attributes to price.
///
/// Produced by the scenario enumerator; treated as an immutable value for the
/// whole evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// A short human-readable label (e.g. "casual saturday").
    pub label: String,
    /// The employment type.
    pub employment_type: EmploymentType,
    /// The day type.
    pub day_type: DayType,
    /// The shift type.
    pub shift_type: ShiftType,
    /// The shift time window, if one is relevant to the scenario.
    pub window: Option<TimeWindow>,
    /// The shift duration in hours.
    pub shift_duration_hours: Decimal,
    /// Overtime hours worked beyond ordinary hours.
    pub overtime_hours: Decimal,
    /// The employee age in years, for junior-rate scenarios.
    pub age: Option<u8>,
    /// Boolean attributes (e.g. "certified_first_aid").
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl Scenario {
    /// Looks up a condition field on this scenario.
    ///
    /// Returns `None` when the field is absent (no time window, no age);
    /// the matcher treats an absent field as a failed predicate.
    pub fn field(&self, field: ConditionField) -> Option<FieldValue> {
        match field {
            ConditionField::EmploymentType => {
                Some(FieldValue::Text(self.employment_type.to_string()))
            }
            ConditionField::DayType => Some(FieldValue::Text(self.day_type.to_string())),
            ConditionField::ShiftType => Some(FieldValue::Text(self.shift_type.to_string())),
            ConditionField::ShiftDurationHours => {
                Some(FieldValue::Number(self.shift_duration_hours))
            }
            ConditionField::OvertimeHours => Some(FieldValue::Number(self.overtime_hours)),
            ConditionField::Age => self.age.map(|a| FieldValue::Number(Decimal::from(a))),
            ConditionField::ShiftStartTime => self.window.map(|w| FieldValue::Time(w.start)),
            ConditionField::ShiftEndTime => self.window.map(|w| FieldValue::Time(w.end)),
        }
    }

    /// Looks up a boolean attribute flag. Returns `None` when the flag is
    /// not present on the scenario.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }
}
