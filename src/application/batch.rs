//! Sequential week batch over the per-day pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use time::Date;
use tracing::info;

use crate::application::page::DayPage;
use crate::application::produce::{self, PipelineSettings, ProduceError};
use crate::domain::week;

#[derive(Debug, Error)]
pub enum BatchError {
    /// The output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Day(#[from] ProduceError),
}

/// Produces the seven day sheets for the week starting at `start`.
///
/// Days run strictly one after another over a single shared page; the first
/// failure aborts the batch and leaves sheets already written in place.
pub async fn produce_week<P>(
    page: &P,
    start: Date,
    settings: &PipelineSettings,
) -> Result<Vec<PathBuf>, BatchError>
where
    P: DayPage + ?Sized,
{
    tokio::fs::create_dir_all(&settings.output_dir)
        .await
        .map_err(|source| BatchError::OutputDir {
            path: settings.output_dir.clone(),
            source,
        })?;

    let mut written = Vec::with_capacity(week::DAYS_PER_WEEK);
    for date in week::week_dates(start) {
        let path = produce::produce_day(page, date, settings).await?;
        written.push(path);
    }

    info!(
        target = "listok::batch",
        start = %start,
        sheets = written.len(),
        output_dir = %settings.output_dir.display(),
        "week batch complete"
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::time::Duration;

    use time::macros::date;
    use url::Url;

    use super::*;
    use crate::application::page::fixtures::ScriptedPage;

    fn settings(output_dir: PathBuf) -> PipelineSettings {
        PipelineSettings {
            base_url: Url::parse("https://example.org").expect("valid base"),
            output_dir,
            visibility_timeout: Duration::from_secs(5),
            settle_delay: Duration::from_millis(200),
        }
    }

    fn written_file_names(dir: &std::path::Path) -> BTreeSet<String> {
        std::fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[tokio::test]
    async fn writes_exactly_seven_date_named_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output_dir = dir.path().join("sheets");
        let page = ScriptedPage::new();

        let written = produce_week(&page, date!(2026 - 02 - 17), &settings(output_dir.clone()))
            .await
            .expect("batch succeeds");

        assert_eq!(written.len(), 7);
        let expected: BTreeSet<String> = (17..=23)
            .map(|day| format!("2026-02-{day}.png"))
            .collect();
        assert_eq!(written_file_names(&output_dir), expected);
    }

    #[tokio::test]
    async fn batch_rolls_over_month_boundaries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output_dir = dir.path().join("sheets");
        let page = ScriptedPage::new();

        produce_week(&page, date!(2026 - 02 - 26), &settings(output_dir.clone()))
            .await
            .expect("batch succeeds");

        let names = written_file_names(&output_dir);
        assert!(names.contains("2026-02-26.png"));
        assert!(names.contains("2026-03-01.png"));
        assert!(names.contains("2026-03-04.png"));
        assert_eq!(names.len(), 7);
    }

    #[tokio::test]
    async fn days_are_visited_in_calendar_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let page = ScriptedPage::new();

        produce_week(&page, date!(2026 - 02 - 17), &settings(dir.path().into()))
            .await
            .expect("batch succeeds");

        let navigations: Vec<String> = page
            .recorded_calls()
            .into_iter()
            .filter(|call| call.starts_with("navigate "))
            .collect();
        let expected: Vec<String> = (17..=23)
            .map(|day| format!("navigate https://example.org/days/2026-02-{day}"))
            .collect();
        assert_eq!(navigations, expected);
    }

    #[tokio::test]
    async fn mid_batch_failure_keeps_earlier_sheets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut page = ScriptedPage::new();
        page.failing_url_fragments.push("2026-02-19".to_string());

        let error = produce_week(&page, date!(2026 - 02 - 17), &settings(dir.path().into()))
            .await
            .expect_err("batch must abort");

        assert!(error.to_string().contains("2026-02-19"));
        let names = written_file_names(dir.path());
        assert_eq!(
            names,
            BTreeSet::from(["2026-02-17.png".to_string(), "2026-02-18.png".to_string()])
        );
    }
}
