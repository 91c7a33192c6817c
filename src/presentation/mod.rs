//! Presentation layer: the printable sheet template.

pub mod views;
