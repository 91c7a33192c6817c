//! WebDriver-backed page automation.
//!
//! Talks to a running geckodriver (or any WebDriver endpoint) and opens a
//! headless Firefox window sized to the printable page. The whole pipeline
//! shares the one session held here.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::application::page::{DayPage, PageError};

use super::error::InfraError;

/// How often visibility is re-checked while waiting.
const VISIBILITY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A live headless-browser window driven over the WebDriver protocol.
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Opens a headless Firefox session and sizes its window to the
    /// printable page.
    pub async fn connect(webdriver_url: &Url, width: u32, height: u32) -> Result<Self, InfraError> {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["--headless"] }),
        );

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url.as_str())
            .await
            .map_err(|err| {
                InfraError::session(format!("failed to connect to {webdriver_url}: {err}"))
            })?;

        client
            .set_window_size(width, height)
            .await
            .map_err(|err| InfraError::session(format!("failed to size window: {err}")))?;

        debug!(
            target = "listok::webdriver",
            url = %webdriver_url,
            width,
            height,
            "webdriver session established"
        );

        Ok(Self { client })
    }

    /// Ends the browser session.
    pub async fn close(self) -> Result<(), InfraError> {
        self.client
            .close()
            .await
            .map_err(|err| InfraError::session(format!("failed to close session: {err}")))
    }
}

fn command_failure(error: CmdError) -> PageError {
    PageError::command(error.to_string())
}

/// True when the driver reports a missed selector rather than a failed
/// command.
fn element_missing(error: &CmdError) -> bool {
    error.is_no_such_element()
}

#[async_trait]
impl DayPage for WebDriverPage {
    async fn navigate(&self, url: &Url) -> Result<(), PageError> {
        self.client
            .goto(url.as_str())
            .await
            .map_err(command_failure)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>, PageError> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(command_failure)?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await.map_err(command_failure)?);
        }

        Ok(texts)
    }

    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), PageError> {
        let deadline = Instant::now() + timeout;
        loop {
            // A missing or still-hidden element keeps the poll alive until
            // the deadline. Any other driver failure ends the wait as a
            // command error.
            match self.client.find(Locator::Css(selector)).await {
                Ok(element) => {
                    if element.is_displayed().await.map_err(command_failure)? {
                        return Ok(());
                    }
                }
                Err(error) if element_missing(&error) => {}
                Err(error) => return Err(command_failure(error)),
            }
            if Instant::now() >= deadline {
                return Err(PageError::visibility_timeout(selector, timeout));
            }
            tokio::time::sleep(VISIBILITY_POLL_INTERVAL).await;
        }
    }

    async fn set_content(&self, markup: &str) -> Result<(), PageError> {
        // document.write swaps the DOM in place without another navigation.
        self.client
            .execute(
                "document.open(); document.write(arguments[0]); document.close();",
                vec![Value::String(markup.to_string())],
            )
            .await
            .map_err(command_failure)?;
        Ok(())
    }

    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }

    async fn screenshot(&self, selector: &str) -> Result<Vec<u8>, PageError> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .map_err(command_failure)?;
        element.screenshot().await.map_err(command_failure)
    }
}
