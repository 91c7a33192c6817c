//! The normalized record behind one printable day sheet.

/// Field values extracted from one calendar day page.
///
/// Every field is a single line with collapsed whitespace. Content the page
/// omits is carried as an empty string, never as an absent value, so the
/// renderer stays total over all records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySheet {
    /// Weekday name, capitalized per word.
    pub weekday: String,
    /// Civil calendar date, style label already stripped.
    pub new_style: String,
    /// Julian calendar date, style label already stripped.
    pub old_style: String,
    /// Liturgical week name, empty on days without one.
    pub week_name: String,
    /// Feast or commemoration line, empty on plain days.
    pub description: String,
    /// Scripture references joined into one line, kept in source casing.
    pub readings: String,
}
