//! Application layer: the per-day pipeline and its week batch driver.

pub mod batch;
pub mod error;
pub mod extract;
pub mod page;
pub mod produce;
