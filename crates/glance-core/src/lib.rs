//! Core glance library (display types, content formatter, config).

pub mod config;
pub mod display;
pub mod format;
pub mod logging;
