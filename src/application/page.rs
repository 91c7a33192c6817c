//! The page-automation contract the pipeline drives.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Failures surfaced by the page collaborator.
#[derive(Debug, Error)]
pub enum PageError {
    /// The automation session rejected or failed a command.
    #[error("page command failed: {message}")]
    Command { message: String },

    /// An element never became visible within the allowed wait.
    #[error("`{selector}` not visible after {waited:?}")]
    VisibilityTimeout { selector: String, waited: Duration },
}

impl PageError {
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    pub fn visibility_timeout(selector: impl Into<String>, waited: Duration) -> Self {
        Self::VisibilityTimeout {
            selector: selector.into(),
            waited,
        }
    }
}

/// One browser page under automation.
///
/// Implementations hold the live session; the pipeline drives a single page
/// serially, one day at a time, through this handle.
#[async_trait]
pub trait DayPage: Send + Sync {
    /// Navigates to `url` and waits for the document to load.
    async fn navigate(&self, url: &Url) -> Result<(), PageError>;

    /// Inner text of every element matching `selector`, in document order.
    /// An empty list means nothing matched, which is not an error.
    async fn texts(&self, selector: &str) -> Result<Vec<String>, PageError>;

    /// Waits until an element matching `selector` is displayed.
    async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), PageError>;

    /// Replaces the displayed document with `markup`.
    async fn set_content(&self, markup: &str) -> Result<(), PageError>;

    /// Pauses the pipeline without touching the page.
    async fn sleep(&self, delay: Duration);

    /// PNG screenshot clipped to the first element matching `selector`.
    async fn screenshot(&self, selector: &str) -> Result<Vec<u8>, PageError>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;

    /// Scripted in-memory page for pipeline tests.
    ///
    /// Selectors resolve to preconfigured texts, every selector counts as
    /// visible unless listed in `hidden_selectors`, and each call is recorded
    /// for ordering assertions.
    pub(crate) struct ScriptedPage {
        pub(crate) texts_by_selector: HashMap<String, Vec<String>>,
        pub(crate) hidden_selectors: HashSet<String>,
        pub(crate) failing_url_fragments: Vec<String>,
        pub(crate) screenshot_png: Vec<u8>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedPage {
        pub(crate) fn new() -> Self {
            Self {
                texts_by_selector: HashMap::new(),
                hidden_selectors: HashSet::new(),
                failing_url_fragments: Vec::new(),
                screenshot_png: b"png-bytes".to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_field(mut self, selector: &str, texts: &[&str]) -> Self {
            self.texts_by_selector.insert(
                selector.to_string(),
                texts.iter().map(ToString::to_string).collect(),
            );
            self
        }

        pub(crate) fn recorded_calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().expect("calls lock").push(call.into());
        }
    }

    #[async_trait]
    impl DayPage for ScriptedPage {
        async fn navigate(&self, url: &Url) -> Result<(), PageError> {
            self.record(format!("navigate {url}"));
            if self
                .failing_url_fragments
                .iter()
                .any(|fragment| url.as_str().contains(fragment.as_str()))
            {
                return Err(PageError::command(format!("navigation refused for {url}")));
            }
            Ok(())
        }

        async fn texts(&self, selector: &str) -> Result<Vec<String>, PageError> {
            self.record(format!("texts {selector}"));
            Ok(self
                .texts_by_selector
                .get(selector)
                .cloned()
                .unwrap_or_default())
        }

        async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<(), PageError> {
            self.record(format!("wait_visible {selector}"));
            if self.hidden_selectors.contains(selector) {
                return Err(PageError::visibility_timeout(selector, timeout));
            }
            Ok(())
        }

        async fn set_content(&self, _markup: &str) -> Result<(), PageError> {
            self.record("set_content");
            Ok(())
        }

        async fn sleep(&self, _delay: Duration) {
            self.record("sleep");
        }

        async fn screenshot(&self, selector: &str) -> Result<Vec<u8>, PageError> {
            self.record(format!("screenshot {selector}"));
            Ok(self.screenshot_png.clone())
        }
    }
}
