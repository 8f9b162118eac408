//! Period slicing and totals.
//!
//! Groups a flat list of entries into the reference day, the Monday-start
//! week containing it, and the two-week window ending with that week. All
//! three slices compare normalized [`NaiveDate`] values, so a timestamp-style
//! `entry_date` lands in the same day and week.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::entry::TimeEntry;

/// Summed hours for a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub working_hours: f64,
    pub driving_hours: f64,
    pub break_hours: f64,
    pub overtime_hours: f64,
    pub entry_count: usize,
}

impl PeriodTotals {
    fn add(&mut self, entry: &TimeEntry) {
        self.working_hours += entry.total_hours();
        self.driving_hours += entry.driving_hours();
        self.break_hours += entry.break_hours();
        self.overtime_hours += entry.overtime_hours();
        self.entry_count += 1;
    }

    /// Snaps each sum to whole minutes so accumulated float error cannot push
    /// a total past a limit it actually equals.
    fn to_whole_minutes(mut self) -> Self {
        self.working_hours = round_to_minute(self.working_hours);
        self.driving_hours = round_to_minute(self.driving_hours);
        self.break_hours = round_to_minute(self.break_hours);
        self.overtime_hours = round_to_minute(self.overtime_hours);
        self
    }
}

/// Rounds decimal hours to the nearest whole minute.
pub fn round_to_minute(hours: f64) -> f64 {
    (hours * 60.0).round() / 60.0
}

/// Entries falling inside an inclusive date range.
#[derive(Debug, Clone)]
pub struct PeriodSlice<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<&'a TimeEntry>,
    pub totals: PeriodTotals,
    /// Entries excluded because their date was missing or malformed.
    pub skipped: usize,
}

impl PeriodSlice<'_> {
    /// Driving hours per calendar day within the slice.
    pub fn driving_hours_by_day(&self) -> BTreeMap<NaiveDate, f64> {
        let mut by_day = BTreeMap::new();
        for entry in &self.entries {
            if let Some(date) = entry.date() {
                *by_day.entry(date).or_insert(0.0) += entry.driving_hours();
            }
        }
        for hours in by_day.values_mut() {
            *hours = round_to_minute(*hours);
        }
        by_day
    }
}

/// Calculates week boundaries (Monday through Sunday, inclusive).
///
/// Weeks always start on Monday regardless of locale.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since_monday = date.weekday().num_days_from_monday();
    let monday = date - Duration::days(i64::from(days_since_monday));
    let sunday = monday + Duration::days(6);
    (monday, sunday)
}

/// Entries recorded on the reference date.
///
/// Entries without a usable date are dropped without comment.
pub fn daily_slice(entries: &[TimeEntry], date: NaiveDate) -> PeriodSlice<'_> {
    slice_between(entries, date, date)
}

/// Entries recorded in the Monday-start week containing the reference date.
pub fn weekly_slice(entries: &[TimeEntry], date: NaiveDate) -> PeriodSlice<'_> {
    let (monday, sunday) = week_bounds(date);
    let slice = slice_between(entries, monday, sunday);
    if slice.skipped > 0 {
        tracing::debug!(
            skipped = slice.skipped,
            week_start = %monday,
            "excluded entries with missing or malformed dates"
        );
    }
    slice
}

/// Entries recorded in the previous week and the week containing the
/// reference date.
pub fn fortnight_slice(entries: &[TimeEntry], date: NaiveDate) -> PeriodSlice<'_> {
    let (monday, sunday) = week_bounds(date);
    let previous_monday = monday - Duration::days(7);
    slice_between(entries, previous_monday, sunday)
}

fn slice_between(entries: &[TimeEntry], start: NaiveDate, end: NaiveDate) -> PeriodSlice<'_> {
    let mut slice = PeriodSlice {
        start,
        end,
        entries: Vec::new(),
        totals: PeriodTotals::default(),
        skipped: 0,
    };

    for entry in entries {
        let Some(date) = entry.date() else {
            slice.skipped += 1;
            continue;
        };
        if date >= start && date <= end {
            slice.totals.add(entry);
            slice.entries.push(entry);
        }
    }

    slice.totals = slice.totals.to_whole_minutes();
    slice
}
