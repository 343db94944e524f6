use chrono::{Datelike, NaiveDate};

use super::{IntakeError, IntakeResult};

/// Birth date format accepted at registration.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whole years between `birth` and `today`.
///
/// One year is subtracted while this year's birthday has not arrived yet.
/// Someone born on Feb 29 turns a year older on Mar 1 in common years.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Parse a `YYYY-MM-DD` birth date.
pub fn parse_birth_date(value: &str) -> IntakeResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), BIRTH_DATE_FORMAT)
        .map_err(|_| IntakeError::InvalidBirthDate(value.to_string()))
}

/// Resolve a patient's age from a birth date, or from a manually entered
/// age when no birth date was given.
///
/// The manual age is used verbatim and falls back to 0 when it does not
/// parse as a whole number.
pub fn resolve_age(
    birth_date: Option<&str>,
    manual_age: Option<&str>,
    today: NaiveDate,
) -> IntakeResult<u32> {
    match birth_date.map(str::trim).filter(|s| !s.is_empty()) {
        Some(date) => Ok(age_on(parse_birth_date(date)?, today)),
        None => Ok(manual_age
            .and_then(|age| age.trim().parse::<u32>().ok())
            .unwrap_or(0)),
    }
}
