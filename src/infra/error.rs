//! Infrastructure failures outside the page contract.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    /// The WebDriver session could not be established, sized, or torn down.
    #[error("webdriver session failure: {message}")]
    Session { message: String },

    /// The tracing stack could not be installed.
    #[error("telemetry initialization failure: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
