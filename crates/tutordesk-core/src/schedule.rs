//! Lesson schedule arithmetic.
//!
//! Invoices bill one lesson per occurrence of the student's lesson weekday in
//! the target month, so the auto-generation flow needs to count how often a
//! given weekday falls within a month.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{Result, TutordeskError};

/// Parse a full English weekday name, case-insensitively.
///
/// Abbreviations are rejected: the schedule data and the invoice endpoints
/// both carry full names ("Monday", not "Mon").
///
/// # Errors
///
/// Returns [`TutordeskError::InvalidWeekday`] for anything else.
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    match name.to_ascii_lowercase().as_str() {
        "monday" => Ok(Weekday::Mon),
        "tuesday" => Ok(Weekday::Tue),
        "wednesday" => Ok(Weekday::Wed),
        "thursday" => Ok(Weekday::Thu),
        "friday" => Ok(Weekday::Fri),
        "saturday" => Ok(Weekday::Sat),
        "sunday" => Ok(Weekday::Sun),
        _ => Err(TutordeskError::InvalidWeekday(name.to_string())),
    }
}

/// Count how many times the named weekday occurs in the given month.
///
/// The count covers every date from the first to the last day of the month,
/// both inclusive. Pure and deterministic; leap years are handled by the
/// calendar itself.
///
/// # Errors
///
/// Returns [`TutordeskError::InvalidWeekday`] for an unrecognized weekday name
/// and [`TutordeskError::InvalidArgument`] for a month outside `1..=12` (or a
/// year/month combination the calendar cannot represent).
pub fn count_weekday_occurrences(year: i32, month: u32, weekday_name: &str) -> Result<u32> {
    let target = parse_weekday(weekday_name)?;

    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        TutordeskError::InvalidArgument(format!("no such month: year {year}, month {month}"))
    })?;

    let count = first_day
        .iter_days()
        .take_while(|d| d.month() == month)
        .filter(|d| d.weekday() == target)
        .count();

    Ok(u32::try_from(count).unwrap_or(0))
}
