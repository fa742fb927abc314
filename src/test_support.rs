//! Synthetic image fixtures shared by unit tests

use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

const TAG_ORIENTATION: u16 = 0x0112;
const TAG_EXIF_IFD_POINTER: u16 = 0x8769;
const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;

const TYPE_ASCII: u16 = 2;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;

/// Size in bytes of an IFD with `entries` entries (count + entries + next offset)
fn ifd_len(entries: usize) -> u32 {
    (2 + 12 * entries + 4) as u32
}

fn push_entry(out: &mut Vec<u8>, tag: u16, typ: u16, count: u32, value: [u8; 4]) {
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(&typ.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&value);
}

/// Little-endian TIFF block with an Orientation tag in IFD0 and, when given,
/// a `DateTimeOriginal` tag in the Exif sub-IFD
fn tiff_block(date_time_original: Option<&str>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    let ifd0_entries = if date_time_original.is_some() { 2 } else { 1 };
    let exif_ifd_offset = 8 + ifd_len(ifd0_entries);

    out.extend_from_slice(&(ifd0_entries as u16).to_le_bytes());
    push_entry(&mut out, TAG_ORIENTATION, TYPE_SHORT, 1, [1, 0, 0, 0]);
    if date_time_original.is_some() {
        push_entry(
            &mut out,
            TAG_EXIF_IFD_POINTER,
            TYPE_LONG,
            1,
            exif_ifd_offset.to_le_bytes(),
        );
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    if let Some(value) = date_time_original {
        let mut ascii = value.as_bytes().to_vec();
        ascii.push(0);
        let count = ascii.len() as u32;

        out.extend_from_slice(&1u16.to_le_bytes());
        if ascii.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..ascii.len()].copy_from_slice(&ascii);
            push_entry(&mut out, TAG_DATE_TIME_ORIGINAL, TYPE_ASCII, count, inline);
            out.extend_from_slice(&0u32.to_le_bytes());
        } else {
            let value_offset = exif_ifd_offset + ifd_len(1);
            push_entry(
                &mut out,
                TAG_DATE_TIME_ORIGINAL,
                TYPE_ASCII,
                count,
                value_offset.to_le_bytes(),
            );
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&ascii);
        }
    }

    out
}

/// Minimal JPEG carrying an EXIF APP1 segment
pub fn jpeg_with_exif(date_time_original: Option<&str>) -> Vec<u8> {
    let tiff = tiff_block(date_time_original);
    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// JPEG markers only, no metadata segment
pub fn jpeg_without_exif() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

/// Write `bytes` to `path`, creating parent directories
pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, bytes).unwrap();
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a thread-local subscriber and return its formatted output
///
/// Lines start with the level (`ERROR`, ` WARN`, ` INFO`, `DEBUG`, `TRACE`).
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

/// Log lines emitted at ERROR level
pub fn error_lines(logs: &str) -> Vec<&str> {
    logs.lines()
        .filter(|line| line.trim_start().starts_with("ERROR"))
        .collect()
}
