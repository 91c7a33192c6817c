//! Configuration layer: CLI arguments resolved into validated settings.

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Parser, builder::BoolishValueParser};
use thiserror::Error;
use time::Date;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::domain::week;

const DEFAULT_OUTPUT_DIR: &str = "output_calendar";
const DEFAULT_BASE_URL: &str = "https://azbyka.ru";
const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
const DEFAULT_VISIBILITY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SETTLE_DELAY_MS: u64 = 200;

/// Command-line arguments for the listok binary.
#[derive(Debug, Parser)]
#[command(
    name = "listok",
    version,
    about = "Renders a week of printable calendar day sheets to PNG files"
)]
pub struct CliArgs {
    /// First day of the batch, `YYYY-MM-DD`.
    #[arg(value_name = "START_DATE", value_parser = parse_start_date)]
    pub start_date: Date,

    /// Directory receiving the generated PNG files.
    #[arg(long = "output-dir", value_name = "PATH", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Base URL of the calendar site.
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// WebDriver endpoint hosting the headless browser.
    #[arg(long = "webdriver-url", value_name = "URL", default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Upper bound on waiting for page blocks to become visible.
    #[arg(
        long = "visibility-timeout-ms",
        value_name = "MS",
        default_value_t = DEFAULT_VISIBILITY_TIMEOUT_MS
    )]
    pub visibility_timeout_ms: u64,

    /// Pause between installing the rendered sheet and capturing it, so
    /// asynchronous layout and font loading can finish.
    #[arg(
        long = "settle-delay-ms",
        value_name = "MS",
        default_value_t = DEFAULT_SETTLE_DELAY_MS
    )]
    pub settle_delay_ms: u64,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON instead of the compact format.
    #[arg(long = "log-json", value_name = "BOOL", value_parser = BoolishValueParser::new())]
    pub log_json: Option<bool>,
}

fn parse_start_date(raw: &str) -> Result<Date, String> {
    week::parse_date(raw).map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

/// Fully-resolved run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub start_date: Date,
    pub base_url: Url,
    pub webdriver_url: Url,
    pub output_dir: PathBuf,
    pub visibility_timeout: Duration,
    pub settle_delay: Duration,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

impl Settings {
    /// Validates parsed arguments into run settings.
    pub fn from_args(args: CliArgs) -> Result<Self, LoadError> {
        let logging = build_logging_settings(args.log_level.as_deref(), args.log_json)?;

        let mut base_url = Url::parse(&args.base_url)
            .map_err(|err| LoadError::invalid("base-url", format!("failed to parse: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(LoadError::invalid("base-url", "must be an absolute url"));
        }
        // Day addresses are joined onto the base, and relative resolution
        // drops the last path segment unless the path ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let webdriver_url = Url::parse(&args.webdriver_url).map_err(|err| {
            LoadError::invalid("webdriver-url", format!("failed to parse: {err}"))
        })?;

        if args.output_dir.as_os_str().is_empty() {
            return Err(LoadError::invalid("output-dir", "path must not be empty"));
        }
        if args.visibility_timeout_ms == 0 {
            return Err(LoadError::invalid(
                "visibility-timeout-ms",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            start_date: args.start_date,
            base_url,
            webdriver_url,
            output_dir: args.output_dir,
            visibility_timeout: Duration::from_millis(args.visibility_timeout_ms),
            settle_delay: Duration::from_millis(args.settle_delay_ms),
            logging,
        })
    }
}

fn build_logging_settings(
    level: Option<&str>,
    json: Option<bool>,
) -> Result<LoggingSettings, LoadError> {
    let level = match level {
        Some(level) => LevelFilter::from_str(level)
            .map_err(|err| LoadError::invalid("log-level", format!("failed to parse: {err}")))?,
        None => LevelFilter::INFO,
    };

    let format = if json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}
