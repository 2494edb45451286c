//! Tenure strings such as `"March 2020 - June 2021 (1 year, 3 months)"`.
//!
//! The duration is two independent approximations: whole years come from a
//! fixed 365-day year over the day count, months from the difference of the
//! month numbers alone. They can disagree around year boundaries and leap
//! years. Existing resumes depend on the exact output, so keep both.

use chrono::{Datelike, Month, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

const DAYS_PER_YEAR: i64 = 365;

fn month_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)\s+(\d{4})$").expect("month/year pattern is valid")
    })
}

/// Parses `"<FullMonthName> <4-digit year>"` into the first day of that
/// month. Month names are matched case-insensitively but must be spelled out.
pub fn parse_month_year(value: &str) -> Option<NaiveDate> {
    let caps = month_year_pattern().captures(value.trim())?;
    let month: Month = caps[1].parse().ok()?;
    if !month.name().eq_ignore_ascii_case(&caps[1]) {
        return None;
    }
    let year: i32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
}

pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

fn year_part(years: i64) -> String {
    match years {
        0 => String::new(),
        1 => "1 year, ".to_string(),
        n => format!("{} years, ", n),
    }
}

fn month_part(months: i32) -> String {
    match months {
        0 => String::new(),
        1 => "1 month".to_string(),
        n => format!("{} months", n),
    }
}

/// Builds the tenure line for one job. Missing dates fall back to `today`;
/// a missing end date is displayed as `Present`.
pub fn compute_tenure(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> String {
    let start_date = start.unwrap_or(today);
    let end_date = end.unwrap_or(today);

    let years = (end_date - start_date).num_days().div_euclid(DAYS_PER_YEAR);
    let month_delta = end_date.month() as i32 - start_date.month() as i32;
    let months = if month_delta >= 0 { month_delta } else { month_delta + 12 };

    let end_str = match end {
        Some(_) => format_month_year(end_date),
        None => "Present".to_string(),
    };

    format!(
        "{} - {} ({}{})",
        format_month_year(start_date),
        end_str,
        year_part(years),
        month_part(months)
    )
}
