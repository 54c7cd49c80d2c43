//! Pure date arithmetic for birthdays.
//!
//! Every function takes `today` as a parameter; nothing here reads the
//! wall clock.

use chrono::{Datelike, NaiveDate};

/// Parse a `YYYY-MM-DD` birthday string.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Current age in whole years, clamped to zero for future birthdates.
pub fn calculate_age(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age.max(0)
}

/// Whole days until the next occurrence of the birthday. Zero means the
/// birthday is today.
pub fn days_until_birthday(birthday: NaiveDate, today: NaiveDate) -> i64 {
    let this_year = anniversary(today.year(), birthday);
    let next = if this_year < today {
        anniversary(today.year() + 1, birthday)
    } else {
        this_year
    };
    (next - today).num_days()
}

/// The birthday's occurrence in the given year. Feb 29 birthdays fall back
/// to Feb 28 in non-leap years.
fn anniversary(year: i32, birthday: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birthday)
}

/// Short display form, e.g. "Jun 15". The web client does its own
/// locale-aware date rendering, so no endpoint uses this; it lives here
/// with the rest of the date logic for non-browser consumers.
pub fn format_birthday(birthday: NaiveDate) -> String {
    format!("{} {}", birthday.format("%b"), birthday.day())
}
