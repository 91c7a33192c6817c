//! Infrastructure adapters: the WebDriver session and process telemetry.

pub mod error;
pub mod telemetry;
pub mod webdriver;
