//! Field extraction from a loaded day page.

use std::time::Duration;

use thiserror::Error;
use time::Date;
use tracing::debug;

use crate::application::page::{DayPage, PageError};
use crate::domain::sheet::DaySheet;
use crate::domain::text::{self, ElementTexts, TextSource};

/// Weekday name inside the day header block.
pub const WEEKDAY_SELECTOR: &str = "#calendar_day .days.mob-hide";
/// Civil date, carries the "Новый стиль" label on the page.
pub const NEW_STYLE_SELECTOR: &str = "#calendar_day .newstyle";
/// Julian date, carries the "Старый стиль" label on the page.
pub const OLD_STYLE_SELECTOR: &str = "#calendar_day .oldstyle";
/// Liturgical week name; some days omit it.
pub const WEEK_NAME_SELECTOR: &str = "#calendar_day .sedmica";
/// Feast or commemoration line; some days omit it.
pub const DESCRIPTION_SELECTOR: &str = "#calendar_day .prazdnik";
/// Scripture reference links for the day, zero or more.
pub const READINGS_SELECTOR: &str = "#chteniya .readings-text a.bibref";

/// Blocks that must be visible before extraction may proceed.
const MANDATORY_SELECTORS: [&str; 3] = [WEEKDAY_SELECTOR, NEW_STYLE_SELECTOR, OLD_STYLE_SELECTOR];

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A mandatory block never became visible for the given day.
    #[error("{date}: mandatory block `{selector}` is not visible")]
    MissingAnchor {
        date: Date,
        selector: &'static str,
        #[source]
        source: PageError,
    },

    /// Reading a field's text failed at the automation layer.
    #[error("{date}: failed to read `{selector}`")]
    Query {
        date: Date,
        selector: &'static str,
        #[source]
        source: PageError,
    },
}

/// Extracts and normalizes the six sheet fields for one day.
///
/// The weekday and the two style dates must be visible or the day is
/// abandoned; optional blocks that are absent yield empty strings.
pub async fn extract_day_sheet<P>(
    page: &P,
    date: Date,
    visibility_timeout: Duration,
) -> Result<DaySheet, ExtractError>
where
    P: DayPage + ?Sized,
{
    for selector in MANDATORY_SELECTORS {
        page.wait_visible(selector, visibility_timeout)
            .await
            .map_err(|source| ExtractError::MissingAnchor {
                date,
                selector,
                source,
            })?;
    }

    let weekday = clean_field(page, date, WEEKDAY_SELECTOR, true).await?;
    let new_style = clean_field(page, date, NEW_STYLE_SELECTOR, true).await?;
    let old_style = clean_field(page, date, OLD_STYLE_SELECTOR, true).await?;
    let week_name = clean_field(page, date, WEEK_NAME_SELECTOR, true).await?;
    let description = clean_field(page, date, DESCRIPTION_SELECTOR, true).await?;
    let readings = clean_field(page, date, READINGS_SELECTOR, false).await?;

    // The labels survive capitalization in canonical form, so stripping
    // after it still matches.
    let sheet = DaySheet {
        weekday,
        new_style: text::strip_style_label(&new_style, text::NEW_STYLE_LABEL),
        old_style: text::strip_style_label(&old_style, text::OLD_STYLE_LABEL),
        week_name,
        description,
        readings,
    };

    debug!(
        target = "listok::extract",
        date = %date,
        weekday = %sheet.weekday,
        week_name = %sheet.week_name,
        readings = %sheet.readings,
        "extracted day sheet"
    );

    Ok(sheet)
}

async fn clean_field<P>(
    page: &P,
    date: Date,
    selector: &'static str,
    capitalize: bool,
) -> Result<String, ExtractError>
where
    P: DayPage + ?Sized,
{
    let texts = page
        .texts(selector)
        .await
        .map_err(|source| ExtractError::Query {
            date,
            selector,
            source,
        })?;

    Ok(text::clean(
        TextSource::Element(ElementTexts::new(texts)),
        capitalize,
    ))
}
