//! Storage growth and people statistics for a Photos library database.
//!
//! Two linear pipelines share one transformation core:
//!
//! - growth: asset sizes by the month they were added, with a running total
//! - people: named people ranked by the assets they appear on, plus a
//!   monthly appearance timeline for the most frequent ones
//!
//! Both read the library's `Photos.sqlite` read-only, print a summary, and
//! write CSV files and PNG charts with fixed names.

pub mod aggregate;
pub mod anonymize;
pub mod chart;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod timestamp;

pub use error::{PipelineError, Result};
