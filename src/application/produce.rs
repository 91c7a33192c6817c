//! One day end to end: navigate, extract, render, capture, write.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use time::Date;
use tracing::{info, warn};
use url::Url;

use crate::application::extract::{self, ExtractError};
use crate::application::page::{DayPage, PageError};
use crate::config::Settings;
use crate::domain::week;
use crate::presentation::views::{self, SheetRenderError};

/// Everything the per-day pipeline needs besides the page handle.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Site root that day addresses are joined onto. Its path ends with a
    /// slash, which the configuration layer guarantees.
    pub base_url: Url,
    pub output_dir: PathBuf,
    pub visibility_timeout: Duration,
    pub settle_delay: Duration,
}

impl From<&Settings> for PipelineSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            output_dir: settings.output_dir.clone(),
            visibility_timeout: settings.visibility_timeout,
            settle_delay: settings.settle_delay,
        }
    }
}

/// A failed day. Every variant names the date so the batch log stays
/// attributable after the abort.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// The day's URL could not be built from the configured base.
    #[error("{date}: cannot build day address")]
    Address {
        date: Date,
        #[source]
        source: url::ParseError,
    },

    /// Navigation to the day page failed.
    #[error("{date}: failed to open {url}")]
    Navigation {
        date: Date,
        url: Url,
        #[source]
        source: PageError,
    },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// The sheet template did not render.
    #[error("{date}: failed to render sheet")]
    Render {
        date: Date,
        #[source]
        source: SheetRenderError,
    },

    /// The rendered sheet could not be installed into the page.
    #[error("{date}: failed to install rendered sheet")]
    Inject {
        date: Date,
        #[source]
        source: PageError,
    },

    /// The installed sheet never became visible.
    #[error("{date}: rendered sheet stayed hidden")]
    SheetHidden {
        date: Date,
        #[source]
        source: PageError,
    },

    /// Screenshot capture failed.
    #[error("{date}: failed to capture sheet")]
    Capture {
        date: Date,
        #[source]
        source: PageError,
    },

    /// The PNG could not be written to disk.
    #[error("{date}: failed to write {}", path.display())]
    Write {
        date: Date,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Produces one day's PNG and returns the written path.
///
/// The page is navigated to the day's address, the sheet fields are
/// extracted and rendered, the rendered document replaces the page content,
/// and after a short settle delay the sheet container is captured.
pub async fn produce_day<P>(
    page: &P,
    date: Date,
    settings: &PipelineSettings,
) -> Result<PathBuf, ProduceError>
where
    P: DayPage + ?Sized,
{
    let stem = week::file_stem(date);
    let url = settings
        .base_url
        .join(&format!("days/{stem}"))
        .map_err(|source| ProduceError::Address { date, source })?;

    page.navigate(&url)
        .await
        .map_err(|source| ProduceError::Navigation {
            date,
            url: url.clone(),
            source,
        })?;

    let sheet = extract::extract_day_sheet(page, date, settings.visibility_timeout).await?;

    let markup =
        views::render_sheet(&sheet).map_err(|source| ProduceError::Render { date, source })?;

    page.set_content(&markup)
        .await
        .map_err(|source| ProduceError::Inject { date, source })?;

    page.wait_visible(views::SHEET_SELECTOR, settings.visibility_timeout)
        .await
        .map_err(|source| ProduceError::SheetHidden { date, source })?;
    page.sleep(settings.settle_delay).await;

    let png = page
        .screenshot(views::SHEET_SELECTOR)
        .await
        .map_err(|source| ProduceError::Capture { date, source })?;
    check_capture_size(date, &png);

    let path = settings.output_dir.join(format!("{stem}.png"));
    tokio::fs::write(&path, &png)
        .await
        .map_err(|source| ProduceError::Write {
            date,
            path: path.clone(),
            source,
        })?;

    info!(
        target = "listok::produce",
        date = %date,
        path = %path.display(),
        bytes = png.len(),
        "captured day sheet"
    );

    Ok(path)
}

/// Warns when the capture deviates from the printable page size.
fn check_capture_size(date: Date, png: &[u8]) {
    match imagesize::blob_size(png) {
        Ok(size) => {
            let expected = (
                views::PAGE_WIDTH_PX as usize,
                views::PAGE_HEIGHT_PX as usize,
            );
            if (size.width, size.height) != expected {
                warn!(
                    target = "listok::produce",
                    date = %date,
                    width = size.width,
                    height = size.height,
                    "capture size differs from the printable page"
                );
            }
        }
        Err(error) => warn!(
            target = "listok::produce",
            date = %date,
            error = %error,
            "could not determine capture dimensions"
        ),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::application::extract::{NEW_STYLE_SELECTOR, OLD_STYLE_SELECTOR, WEEKDAY_SELECTOR};
    use crate::application::page::fixtures::ScriptedPage;

    fn settings(output_dir: PathBuf) -> PipelineSettings {
        PipelineSettings {
            base_url: Url::parse("https://example.org").expect("valid base"),
            output_dir,
            visibility_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_millis(200),
        }
    }

    fn anchored_page() -> ScriptedPage {
        ScriptedPage::new()
            .with_field(WEEKDAY_SELECTOR, &["понедельник"])
            .with_field(NEW_STYLE_SELECTOR, &["Новый стиль 23 февраля"])
            .with_field(OLD_STYLE_SELECTOR, &["Старый стиль 10 февраля"])
    }

    #[tokio::test]
    async fn writes_png_at_date_derived_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = anchored_page();

        let path = produce_day(&page, date!(2026 - 02 - 23), &settings(dir.path().into()))
            .await
            .expect("day succeeds");

        assert_eq!(path, dir.path().join("2026-02-23.png"));
        let bytes = std::fs::read(&path).expect("png on disk");
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn drives_the_page_in_pipeline_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = anchored_page();

        produce_day(&page, date!(2026 - 02 - 23), &settings(dir.path().into()))
            .await
            .expect("day succeeds");

        let calls = page.recorded_calls();
        assert_eq!(
            calls.first().map(String::as_str),
            Some("navigate https://example.org/days/2026-02-23")
        );

        let position = |needle: &str| {
            calls
                .iter()
                .position(|call| call == needle)
                .unwrap_or_else(|| panic!("missing call: {needle}"))
        };
        let install = position("set_content");
        let reveal = position("wait_visible .calendar-sheet");
        let settle = position("sleep");
        let capture = position("screenshot .calendar-sheet");
        assert!(install < reveal && reveal < settle && settle < capture);
    }

    #[tokio::test]
    async fn day_address_extends_a_path_bearing_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = anchored_page();
        let mut settings = settings(dir.path().into());
        settings.base_url = Url::parse("https://example.org/mirror/").expect("valid base");

        produce_day(&page, date!(2026 - 02 - 23), &settings)
            .await
            .expect("day succeeds");

        let calls = page.recorded_calls();
        assert_eq!(
            calls.first().map(String::as_str),
            Some("navigate https://example.org/mirror/days/2026-02-23")
        );
    }

    #[tokio::test]
    async fn navigation_failure_aborts_before_any_write() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut page = anchored_page();
        page.failing_url_fragments.push("2026-02-23".to_string());

        let error = produce_day(&page, date!(2026 - 02 - 23), &settings(dir.path().into()))
            .await
            .expect_err("navigation must fail");

        assert!(matches!(error, ProduceError::Navigation { .. }));
        assert!(error.to_string().contains("2026-02-23"));
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    #[tokio::test]
    async fn hidden_sheet_fails_the_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut page = anchored_page();
        page.hidden_selectors
            .insert(views::SHEET_SELECTOR.to_string());

        let error = produce_day(&page, date!(2026 - 02 - 23), &settings(dir.path().into()))
            .await
            .expect_err("capture must fail");

        assert!(matches!(error, ProduceError::SheetHidden { .. }));
    }
}
