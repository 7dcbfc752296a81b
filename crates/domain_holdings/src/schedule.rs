//! SIP contribution scheduling
//!
//! Generates the monthly contribution dates for a plan. The scheduled day
//! of month is clamped to the last day of months too short for it: a plan
//! on the 31st contributes on Feb 28/29, Apr 30, and so on.

use chrono::{Datelike, Days, NaiveDate};

/// Last calendar day of the given month
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}

/// The contribution date for one month, clamping short months
fn contribution_date(year: i32, month: u32, day_of_month: u8) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, u32::from(day_of_month))
        .or_else(|| last_day_of_month(year, month))
}

/// All scheduled contribution dates between `start` and `end` inclusive
///
/// # Arguments
///
/// * `start` - Plan start date
/// * `end` - Plan end date, or "today" for an active plan
/// * `day_of_month` - Scheduled day (1-31)
pub fn installment_dates(start: NaiveDate, end: NaiveDate, day_of_month: u8) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if end < start {
        return dates;
    }

    let mut year = start.year();
    let mut month = start.month();
    loop {
        match contribution_date(year, month, day_of_month) {
            Some(date) if date > end => break,
            Some(date) => {
                if date >= start {
                    dates.push(date);
                }
            }
            None => break,
        }

        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    dates
}
