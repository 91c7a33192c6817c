//! Printable A4 day sheets from an online liturgical calendar.
//!
//! One run scrapes seven consecutive day pages, normalizes the extracted
//! fields, renders each day into a fixed 2480x3508 px sheet, and captures
//! one PNG per day through a WebDriver session.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
