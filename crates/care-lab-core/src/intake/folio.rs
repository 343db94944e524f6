use chrono::NaiveDate;

/// Width of the per-day sequence part of a folio.
pub const FOLIO_SEQUENCE_WIDTH: usize = 3;

/// Date prefix of folios issued on `date` (`YYMMDD`).
pub fn folio_prefix(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Sequence number of a folio issued on the day with the given prefix.
fn sequence_of(folio: &str, prefix: &str) -> Option<u32> {
    folio
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .and_then(|rest| rest.parse().ok())
}

/// Next per-day sequence number, recomputed from the stored folios.
///
/// This is the highest sequence already issued for the day plus one, so it
/// equals the count of that day's patients plus one until a patient is
/// deleted, and never hands out a folio that is still in use. Two writers
/// computing it at the same time can still obtain the same value. At
/// `u32::MAX` the sequence saturates, and the store then refuses the
/// duplicate folio.
pub fn next_sequence<'a, I>(existing: I, date: NaiveDate) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = folio_prefix(date);
    existing
        .into_iter()
        .filter_map(|folio| sequence_of(folio, &prefix))
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Generate the folio for a new registration on `date`.
pub fn next_folio<'a, I>(existing: I, date: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    format!(
        "{}{:0width$}",
        folio_prefix(date),
        next_sequence(existing, date),
        width = FOLIO_SEQUENCE_WIDTH
    )
}
