use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::errors::{EngineError, Result};
use crate::types::{CustomRecurrence, RecurrenceRule};

/// generates ordered, finite due-date sequences from a recurrence rule
///
/// Clamping policy: month-based increments are always computed from the
/// anchor date with day-overflow clamped to the target month's last day,
/// so the original day-of-month is recovered after short months
/// (Jan 31 -> Feb 29 -> Mar 31). Day-targeting rules
/// (MultipleDatesPerMonth, DayOfMonth, DayOfWeek) emit only dates
/// strictly after the anchor; Interval includes its anchor.
pub struct RecurrenceGenerator;

impl RecurrenceGenerator {
    /// produce exactly `count` strictly increasing due-dates
    ///
    /// OneTime produces a single date regardless of `count`.
    pub fn generate(
        rule: &RecurrenceRule,
        start_date: NaiveDate,
        count: usize,
    ) -> Result<Vec<NaiveDate>> {
        rule.validate()?;

        if count == 0 {
            return Ok(Vec::new());
        }

        let mut dates = match rule {
            RecurrenceRule::Weekly => Self::every_n_days(start_date, 7, 1, count)?,
            RecurrenceRule::Biweekly => Self::every_n_days(start_date, 14, 1, count)?,
            RecurrenceRule::Monthly => Self::every_n_months(start_date, 1, count)?,
            RecurrenceRule::Quarterly => Self::every_n_months(start_date, 3, count)?,
            RecurrenceRule::SemiAnnually => Self::every_n_months(start_date, 6, count)?,
            RecurrenceRule::Annually => Self::every_n_months(start_date, 12, count)?,
            RecurrenceRule::OneTime => vec![start_date],
            RecurrenceRule::Custom(custom) => match custom {
                CustomRecurrence::MultipleDatesPerMonth { days_of_month } => {
                    Self::multiple_dates_per_month(start_date, days_of_month, count)?
                }
                CustomRecurrence::DayOfMonth { day } => {
                    Self::day_of_month(start_date, *day, count)?
                }
                CustomRecurrence::DayOfWeek {
                    weekday,
                    every_n_weeks,
                } => Self::day_of_week(start_date, *weekday, *every_n_weeks, count)?,
                CustomRecurrence::Interval {
                    every_n_days,
                    anchor_date,
                } => Self::every_n_days(
                    anchor_date.unwrap_or(start_date),
                    *every_n_days as i64,
                    0,
                    count,
                )?,
            },
        };

        dates.truncate(count);
        Ok(dates)
    }

    /// anchor + i * step days, for i in first_index..
    fn every_n_days(
        anchor: NaiveDate,
        step_days: i64,
        first_index: i64,
        count: usize,
    ) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(count);
        for i in 0..count as i64 {
            let offset = (first_index + i) * step_days;
            let date = anchor
                .checked_add_signed(Duration::days(offset))
                .ok_or_else(out_of_range)?;
            dates.push(date);
        }
        Ok(dates)
    }

    /// anchor + i * step months, for i in 1..=count, clamped from the anchor
    fn every_n_months(anchor: NaiveDate, step_months: u32, count: usize) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(count);
        for i in 1..=count as u32 {
            dates.push(add_months_clamped(anchor, i * step_months)?);
        }
        Ok(dates)
    }

    fn multiple_dates_per_month(
        start_date: NaiveDate,
        days_of_month: &[u32],
        count: usize,
    ) -> Result<Vec<NaiveDate>> {
        let mut days = days_of_month.to_vec();
        days.sort_unstable();
        days.dedup();

        let mut dates = Vec::with_capacity(count);
        let mut cursor = month_start(start_date)?;

        while dates.len() < count {
            // clamped days ascend within a month, so tracking the last
            // emitted date drops clamp collisions like [30, 31] in February
            let mut last_emitted: Option<NaiveDate> = None;
            for &day in &days {
                let date = date_with_day_clamped(cursor.year(), cursor.month(), day)?;
                if date <= start_date || last_emitted == Some(date) {
                    continue;
                }
                last_emitted = Some(date);
                dates.push(date);
                if dates.len() == count {
                    break;
                }
            }
            cursor = add_months_clamped(cursor, 1)?;
        }

        Ok(dates)
    }

    fn day_of_month(start_date: NaiveDate, day: u32, count: usize) -> Result<Vec<NaiveDate>> {
        let mut dates = Vec::with_capacity(count);
        let mut months_ahead = 0;

        while dates.len() < count {
            let base = add_months_clamped(start_date, months_ahead)?;
            let date = date_with_day_clamped(base.year(), base.month(), day)?;
            if date > start_date {
                dates.push(date);
            }
            months_ahead += 1;
        }

        Ok(dates)
    }

    fn day_of_week(
        start_date: NaiveDate,
        weekday: Weekday,
        every_n_weeks: u32,
        count: usize,
    ) -> Result<Vec<NaiveDate>> {
        // next occurrence strictly after the anchor, even when the anchor
        // already falls on the target weekday
        let days_ahead = (weekday.num_days_from_monday() + 7
            - start_date.weekday().num_days_from_monday())
            % 7;
        let days_ahead = if days_ahead == 0 { 7 } else { days_ahead };

        let first = start_date
            .checked_add_signed(Duration::days(days_ahead as i64))
            .ok_or_else(out_of_range)?;

        Self::every_n_days(first, every_n_weeks as i64 * 7, 0, count)
    }
}

/// add months with day-overflow clamped to the target month's last day
fn add_months_clamped(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(out_of_range)
}

fn month_start(date: NaiveDate) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).ok_or_else(out_of_range)
}

fn date_with_day_clamped(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let clamped = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped).ok_or_else(out_of_range)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn out_of_range() -> EngineError {
    EngineError::InvalidRecurrenceRule {
        message: "due date out of calendar range".to_string(),
    }
}
