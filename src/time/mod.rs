//! Capture date extraction
//!
//! Dates come from a single source: the `DateTimeOriginal` tag of the
//! image's EXIF metadata. See [`exif::read_capture_date`].

pub mod exif;

use chrono::NaiveDate;

/// Normalized form of a capture date, independent of the bucket date format
pub const NORMALIZED_DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of reading a file's capture date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDate {
    /// A well-formed calendar date was recorded in the metadata
    Found(NaiveDate),
    /// No usable date: missing field, unreadable file, or malformed value
    NotFound,
}

impl CaptureDate {
    /// The calendar date, if one was found
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CaptureDate::Found(date) => Some(*date),
            CaptureDate::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CaptureDate::Found(_))
    }

    /// The date as `YYYY-MM-DD`
    pub fn normalized(&self) -> Option<String> {
        self.date()
            .map(|date| date.format(NORMALIZED_DATE_FORMAT).to_string())
    }
}

impl From<Option<NaiveDate>> for CaptureDate {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(CaptureDate::NotFound, CaptureDate::Found)
    }
}
