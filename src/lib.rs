//! Photo Date Sorter - moves photos into date-named folders
//!
//! This library provides functionality for organizing images by the
//! capture date recorded in their EXIF metadata:
//! - `DateTimeOriginal` extraction that never fails (missing dates fall back to `NoDate`)
//! - Configurable bucket folder naming via strftime date formats
//! - Collision-free destination names (`img.jpg`, `img_1.jpg`, ...)
//! - Per-file error isolation with a run summary

pub mod cli;
pub mod config;
pub mod error;
pub mod i18n;
pub mod process;
pub mod time;

#[cfg(test)]
mod test_support;

pub use cli::Cli;
pub use config::{ConfigError, DEFAULT_DATE_FORMAT, DateFormat, SortRequest};
pub use error::{Error, Result};
pub use process::{Bucket, FileOutcome, NO_DATE_BUCKET, RunSummary, Sorter, sort};
pub use time::CaptureDate;
pub use time::exif::read_capture_date;
