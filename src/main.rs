use std::process;

use clap::{Parser, error::ErrorKind};
use listok::{
    application::{batch, error::AppError, produce::PipelineSettings},
    config,
    infra::{telemetry, webdriver::WebDriverPage},
    presentation::views,
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    // Usage problems exit with status 1, not clap's default 2. Help and
    // version requests keep their zero status.
    let args = match config::CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    if let Err(error) = run(args).await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run(args: config::CliArgs) -> Result<(), AppError> {
    let settings = config::Settings::from_args(args)
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    info!(
        target = "listok::run",
        start = %settings.start_date,
        output_dir = %settings.output_dir.display(),
        base_url = %settings.base_url,
        "starting week batch"
    );

    let page = WebDriverPage::connect(
        &settings.webdriver_url,
        views::PAGE_WIDTH_PX,
        views::PAGE_HEIGHT_PX,
    )
    .await
    .map_err(AppError::from)?;

    let pipeline = PipelineSettings::from(&settings);
    let result = batch::produce_week(&page, settings.start_date, &pipeline).await;

    // The session is released on both exit paths.
    if let Err(err) = page.close().await {
        warn!(target = "listok::webdriver", error = %err, "failed to close webdriver session");
    }

    result.map(|_| ()).map_err(AppError::from)
}
