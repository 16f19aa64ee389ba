//! Calendar cell generation for month and week layouts.
//!
//! Weeks start on Sunday. A month view always covers whole weeks, so
//! leading and trailing days from the neighbouring months are included
//! and behave exactly like in-month days.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column headers for month layout, in grid order.
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Month => ViewMode::Week,
            ViewMode::Week => ViewMode::Month,
        }
    }

    /// Move the reference date one page forward or back.
    /// Month steps clamp the day to the target month's length.
    pub fn step(self, reference: NaiveDate, forward: bool) -> NaiveDate {
        let moved = match (self, forward) {
            (ViewMode::Month, true) => reference.checked_add_months(Months::new(1)),
            (ViewMode::Month, false) => reference.checked_sub_months(Months::new(1)),
            (ViewMode::Week, true) => reference.checked_add_days(Days::new(7)),
            (ViewMode::Week, false) => reference.checked_sub_days(Days::new(7)),
        };
        moved.unwrap_or(reference)
    }

    /// Header text for the page containing `reference`.
    pub fn title(self, reference: NaiveDate) -> String {
        match self {
            ViewMode::Month => reference.format("%B %Y").to_string(),
            ViewMode::Week => {
                let (start, end) = visible_range(reference, ViewMode::Week);
                format!("Week of {} - {}", start.format("%b %-d"), end.format("%b %-d"))
            }
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewMode::Month => write!(f, "month"),
            ViewMode::Week => write!(f, "week"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            other => Err(format!("Unknown view '{}'. Expected 'month' or 'week'", other)),
        }
    }
}

/// One visible cell. Derived on every call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    /// Strictly before today (day granularity)
    pub is_past: bool,
    /// Falls in the same Sunday-started week as today
    pub is_in_current_week: bool,
    /// Belongs to the reference month (always true in week view)
    pub is_in_reference_month: bool,
}

impl CalendarDay {
    fn new(date: NaiveDate, reference: NaiveDate, mode: ViewMode, today: NaiveDate) -> Self {
        let is_in_reference_month = match mode {
            ViewMode::Month => {
                date.year() == reference.year() && date.month() == reference.month()
            }
            ViewMode::Week => true,
        };

        CalendarDay {
            date,
            is_today: date == today,
            is_past: date < today,
            is_in_current_week: start_of_week(date) == start_of_week(today),
            is_in_reference_month,
        }
    }
}

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// Saturday on or after `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    let offset = 6 - u64::from(date.weekday().num_days_from_sunday());
    date.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX)
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(date.day0())))
        .unwrap_or(NaiveDate::MIN)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// First and last visible day (inclusive) for a view.
pub fn visible_range(reference: NaiveDate, mode: ViewMode) -> (NaiveDate, NaiveDate) {
    match mode {
        ViewMode::Month => (
            start_of_week(first_of_month(reference)),
            end_of_week(last_of_month(reference)),
        ),
        ViewMode::Week => (start_of_week(reference), end_of_week(reference)),
    }
}

/// All visible cells for `reference` in `mode`, in display order.
///
/// The result length is always a multiple of 7. `today` only affects the
/// per-cell flags, never which cells are produced.
pub fn generate(reference: NaiveDate, mode: ViewMode, today: NaiveDate) -> Vec<CalendarDay> {
    let (start, end) = visible_range(reference, mode);

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| CalendarDay::new(date, reference, mode, today))
        .collect()
}

/// Split a generated sequence into Sunday-to-Saturday rows.
pub fn weeks(days: &[CalendarDay]) -> impl Iterator<Item = &[CalendarDay]> {
    days.chunks(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // --- month view ---

    #[test]
    fn january_2024_spans_five_weeks() {
        let days = generate(date(2024, 1, 15), ViewMode::Month, date(2024, 1, 15));

        assert_eq!(days.len(), 35);
        assert_eq!(days[0].date, date(2023, 12, 31));
        assert_eq!(days[0].date.weekday(), Weekday::Sun);
        assert_eq!(days[34].date, date(2024, 2, 3));
        assert_eq!(days[34].date.weekday(), Weekday::Sat);
    }

    #[test]
    fn month_starting_on_sunday_has_no_leading_days() {
        // February 2015: starts Sunday, ends Saturday
        let days = generate(date(2015, 2, 10), ViewMode::Month, date(2015, 2, 10));
        assert_eq!(days.len(), 28);
        assert_eq!(days[0].date, date(2015, 2, 1));
        assert!(days.iter().all(|d| d.is_in_reference_month));
    }

    #[test]
    fn six_week_month() {
        // August 2026 starts Saturday and has 31 days
        let days = generate(date(2026, 8, 1), ViewMode::Month, date(2026, 8, 1));
        assert_eq!(days.len(), 42);
    }

    #[test]
    fn every_month_is_minimal_whole_weeks() {
        for year in 1990..=2040 {
            for month in 1..=12 {
                let reference = date(year, month, 1);
                let days = generate(reference, ViewMode::Month, reference);
                let first = first_of_month(reference);
                let last = last_of_month(reference);

                assert_eq!(days.len() % 7, 0, "{year}-{month}");
                assert_eq!(days[0].date.weekday(), Weekday::Sun);
                // minimal: first row holds day 1, last row holds the last day
                assert!(days[..7].iter().any(|d| d.date == first), "{year}-{month}");
                assert!(days[days.len() - 7..].iter().any(|d| d.date == last));
                // contiguous
                for pair in days.windows(2) {
                    assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
                }
            }
        }
    }

    #[test]
    fn adjacent_month_days_are_kept_and_tagged() {
        let days = generate(date(2024, 1, 15), ViewMode::Month, date(2024, 1, 15));
        assert!(!days[0].is_in_reference_month);
        assert!(days[1].is_in_reference_month);
        assert!(!days[34].is_in_reference_month);
    }

    #[test]
    fn weeks_align_to_sunday() {
        let days = generate(date(2024, 1, 15), ViewMode::Month, date(2024, 1, 15));
        let rows: Vec<_> = weeks(&days).collect();
        assert_eq!(rows.len(), 5);
        for row in rows {
            assert_eq!(row.len(), 7);
            assert_eq!(row[0].date.weekday(), Weekday::Sun);
        }
    }

    // --- week view ---

    #[test]
    fn week_view_is_seven_days_from_sunday() {
        let mut reference = date(2023, 12, 1);
        for _ in 0..120 {
            let days = generate(reference, ViewMode::Week, reference);
            assert_eq!(days.len(), 7);
            assert_eq!(days[0].date.weekday(), Weekday::Sun);
            assert!(days.iter().any(|d| d.date == reference));
            reference = reference.succ_opt().unwrap();
        }
    }

    #[test]
    fn week_view_crosses_month_boundary() {
        let days = generate(date(2024, 1, 2), ViewMode::Week, date(2024, 1, 2));
        assert_eq!(days[0].date, date(2023, 12, 31));
        assert_eq!(days[6].date, date(2024, 1, 6));
        assert!(days.iter().all(|d| d.is_in_reference_month));
    }

    // --- flags ---

    #[test]
    fn flags_follow_injected_today() {
        let today = date(2024, 1, 10);
        let days = generate(date(2024, 1, 1), ViewMode::Month, today);

        let cell = |d: NaiveDate| days.iter().find(|c| c.date == d).unwrap();

        assert!(cell(today).is_today);
        assert!(!cell(today).is_past);
        assert!(cell(date(2024, 1, 9)).is_past);
        assert!(!cell(date(2024, 1, 11)).is_past);

        // Week of Jan 7 - Jan 13
        assert!(cell(date(2024, 1, 7)).is_in_current_week);
        assert!(cell(date(2024, 1, 13)).is_in_current_week);
        assert!(!cell(date(2024, 1, 6)).is_in_current_week);
        assert!(!cell(date(2024, 1, 14)).is_in_current_week);
    }

    #[test]
    fn generate_is_deterministic() {
        let a = generate(date(2025, 6, 10), ViewMode::Month, date(2025, 6, 1));
        let b = generate(date(2025, 6, 10), ViewMode::Month, date(2025, 6, 1));
        assert_eq!(a, b);
    }

    // --- navigation ---

    #[test]
    fn month_step_clamps_day() {
        assert_eq!(ViewMode::Month.step(date(2024, 1, 31), true), date(2024, 2, 29));
        assert_eq!(ViewMode::Month.step(date(2024, 3, 31), false), date(2024, 2, 29));
        assert_eq!(ViewMode::Month.step(date(2024, 12, 5), true), date(2025, 1, 5));
    }

    #[test]
    fn week_step_moves_seven_days() {
        assert_eq!(ViewMode::Week.step(date(2024, 1, 2), true), date(2024, 1, 9));
        assert_eq!(ViewMode::Week.step(date(2024, 1, 2), false), date(2023, 12, 26));
    }

    #[test]
    fn titles() {
        assert_eq!(ViewMode::Month.title(date(2024, 1, 15)), "January 2024");
        assert_eq!(
            ViewMode::Week.title(date(2024, 1, 2)),
            "Week of Dec 31 - Jan 6"
        );
    }

    #[test]
    fn view_mode_parsing() {
        assert_eq!("Month".parse::<ViewMode>(), Ok(ViewMode::Month));
        assert_eq!(" week ".parse::<ViewMode>(), Ok(ViewMode::Week));
        assert!("year".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Month.toggled(), ViewMode::Week);
    }
}
