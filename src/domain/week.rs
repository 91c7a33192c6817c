//! Calendar-date arithmetic for one batch week.

use std::iter::successors;

use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;

/// Days covered by one batch run.
pub const DAYS_PER_WEEK: usize = 7;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, &YMD_FMT)
}

/// The seven consecutive dates starting at `start`, in order.
pub fn week_dates(start: Date) -> impl Iterator<Item = Date> {
    successors(Some(start), |&date| date.next_day()).take(DAYS_PER_WEEK)
}

/// File stem for one day's output artifact, zero-padded `YYYY-MM-DD`.
pub fn file_stem(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
