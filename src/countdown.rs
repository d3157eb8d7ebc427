//! Exam D-Day countdown.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Days shown by the progress ring before it starts filling.
pub const PROGRESS_WINDOW_DAYS: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "days", rename_all = "camelCase")]
pub enum DDay {
    Unset,
    Before(i64),
    Today,
    After(i64),
}

impl DDay {
    pub fn between(exam: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(exam) = exam else {
            return DDay::Unset;
        };
        let days = (exam - today).num_days();
        match days {
            d if d > 0 => DDay::Before(d),
            0 => DDay::Today,
            d => DDay::After(-d),
        }
    }

    /// Fill of the progress ring in `[0, 1]`: empty 100 or more days out,
    /// full on the day, and empty again once the exam has passed.
    pub fn progress(self) -> f64 {
        match self {
            DDay::Before(d) => (1.0 - d as f64 / PROGRESS_WINDOW_DAYS as f64).max(0.0),
            DDay::Today => 1.0,
            DDay::Unset | DDay::After(_) => 0.0,
        }
    }
}

impl fmt::Display for DDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DDay::Unset => write!(f, "D-?"),
            DDay::Before(d) => write!(f, "D-{d}"),
            DDay::Today => write!(f, "D-DAY"),
            DDay::After(d) => write!(f, "D+{d}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_labels() {
        let today = date(2024, 3, 1);
        assert_eq!(DDay::between(None, today).to_string(), "D-?");
        assert_eq!(DDay::between(Some(date(2024, 3, 11)), today).to_string(), "D-10");
        assert_eq!(DDay::between(Some(today), today).to_string(), "D-DAY");
        assert_eq!(DDay::between(Some(date(2024, 2, 28)), today).to_string(), "D+2");
    }

    #[test]
    fn test_leap_day_counted() {
        let dday = DDay::between(Some(date(2024, 3, 1)), date(2024, 2, 28));
        assert_eq!(dday, DDay::Before(2));
    }

    #[test]
    fn test_progress() {
        assert_eq!(DDay::Before(150).progress(), 0.0);
        assert_eq!(DDay::Before(100).progress(), 0.0);
        assert!((DDay::Before(25).progress() - 0.75).abs() < f64::EPSILON);
        assert_eq!(DDay::Today.progress(), 1.0);
        assert_eq!(DDay::After(3).progress(), 0.0);
        assert_eq!(DDay::Unset.progress(), 0.0);
    }
}
