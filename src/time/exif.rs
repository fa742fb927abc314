//! EXIF capture date extraction for images

use super::CaptureDate;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Read the capture date of an image from its `DateTimeOriginal` EXIF tag
///
/// Never fails: a missing file, an unsupported or corrupt container, a
/// missing tag, and a malformed value all map to [`CaptureDate::NotFound`].
/// The file is closed before this function returns.
pub fn read_capture_date(path: &Path) -> CaptureDate {
    match extract_date_time_original(path) {
        Ok(date) => {
            trace!(?path, %date, "Found EXIF capture date");
            CaptureDate::Found(date)
        }
        Err(e) => {
            debug!(?path, reason = %e, "No capture date available");
            CaptureDate::NotFound
        }
    }
}

fn extract_date_time_original(path: &Path) -> Result<NaiveDate> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| exif_error(path, e.to_string()))?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or_else(|| exif_error(path, "No DateTimeOriginal tag"))?;

    let raw = match &field.value {
        Value::Ascii(values) => values
            .first()
            .and_then(|v| std::str::from_utf8(v).ok())
            .ok_or_else(|| exif_error(path, "DateTimeOriginal is not valid ASCII"))?,
        other => {
            return Err(exif_error(
                path,
                format!("Unexpected DateTimeOriginal value type: {:?}", other),
            ));
        }
    };

    parse_exif_date(raw)
        .ok_or_else(|| exif_error(path, format!("Malformed DateTimeOriginal value '{}'", raw)))
}

fn exif_error(path: &Path, message: impl Into<String>) -> Error {
    Error::ExifRead {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Parse the date portion of an EXIF datetime: "YYYY:MM:DD HH:MM:SS"
///
/// Everything from the first space on is ignored.
fn parse_exif_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim_matches(|c: char| c == '"' || c == '\0' || c.is_whitespace());
    let date_part = s.split(' ').next()?;
    NaiveDate::parse_from_str(&date_part.replace(':', "-"), "%Y-%m-%d").ok()
}
