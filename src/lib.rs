//! Compares a personal time-use log with a public reference dataset, derives per-category
//! totals and shares and recommends a time slot for focused study.
//!
//! The core is [analysis]: cells are parsed into minutes, rows are aggregated into a fixed set
//! of categories and the aggregates are fed to an ordered rule table. [session] keeps the latest
//! state for the [cli], which renders it as a terminal dashboard or an exported report.

pub mod analysis;
pub mod cli;
pub mod input;
pub mod session;
pub mod settings;
pub mod utils;
