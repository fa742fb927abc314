//! Sorting engine
//!
//! Handles the core logic of:
//! - Validating the input and output directories
//! - Scanning the input tree
//! - Reading capture dates and choosing a bucket folder
//! - Moving files without overwriting anything in the output tree

use crate::config::{DateFormat, SortRequest};
use crate::error::{Error, Result};
use crate::time::CaptureDate;
use crate::time::exif::read_capture_date;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{Level, debug, error, info, span, warn};
use walkdir::WalkDir;

/// Bucket folder for files without a usable capture date
pub const NO_DATE_BUCKET: &str = "NoDate";

/// Destination folder under the output root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bucket {
    /// Capture date rendered with the run's date format
    Dated(String),
    /// Fallback for files without a capture date
    NoDate,
}

impl Bucket {
    pub fn for_capture_date(capture_date: CaptureDate, format: &DateFormat) -> Self {
        match capture_date.date() {
            Some(date) => Bucket::Dated(format.render(date)),
            None => Bucket::NoDate,
        }
    }

    /// Folder name of this bucket
    pub fn dir_name(&self) -> &str {
        match self {
            Bucket::Dated(name) => name,
            Bucket::NoDate => NO_DATE_BUCKET,
        }
    }
}

/// Result of processing a single file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// File was moved into its bucket
    Moved {
        source: PathBuf,
        destination: PathBuf,
        bucket: Bucket,
    },
    /// File already sits in the bucket it would be moved to
    AlreadySorted { source: PathBuf },
    /// File could not be moved and was left in place
    Failed { source: PathBuf, error: String },
}

impl FileOutcome {
    pub fn source(&self) -> &Path {
        match self {
            FileOutcome::Moved { source, .. }
            | FileOutcome::AlreadySorted { source }
            | FileOutcome::Failed { source, .. } => source,
        }
    }
}

/// Aggregated results of one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files moved into dated buckets
    pub dated: usize,
    /// Files moved into the NoDate bucket
    pub no_date: usize,
    /// Files left alone because they were already in their bucket
    pub skipped: usize,
    /// Files that could not be moved
    pub failed: usize,
    /// Per-file outcomes in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match &outcome {
            FileOutcome::Moved {
                bucket: Bucket::Dated(_),
                ..
            } => self.dated += 1,
            FileOutcome::Moved {
                bucket: Bucket::NoDate,
                ..
            } => self.no_date += 1,
            FileOutcome::AlreadySorted { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn moved(&self) -> usize {
        self.dated + self.no_date
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    pub fn summary(&self) -> String {
        format!(
            "Total: {}, Dated: {}, NoDate: {}, Skipped: {}, Failed: {}",
            self.total(),
            self.dated,
            self.no_date,
            self.skipped,
            self.failed
        )
    }
}

/// Sort the images under `input_dir` into date buckets under `output_dir`
///
/// Fails only when the request itself is unusable (invalid date format,
/// missing input directory, uncreatable output directory). Per-file
/// failures are logged and reported in the returned summary.
pub fn sort(
    input_dir: impl Into<PathBuf>,
    output_dir: impl Into<PathBuf>,
    date_format: &str,
) -> Result<RunSummary> {
    Sorter::new(SortRequest::new(input_dir, output_dir, date_format))?.run()
}

/// Moves files into bucket folders for one sort request
#[derive(Debug, Clone)]
pub struct Sorter {
    input_dir: PathBuf,
    output_dir: PathBuf,
    date_format: DateFormat,
}

impl Sorter {
    /// Create a sorter, validating the request's date format
    pub fn new(request: SortRequest) -> Result<Self> {
        let date_format = DateFormat::parse(&request.date_format)?;
        Ok(Self {
            input_dir: request.input_dir,
            output_dir: request.output_dir,
            date_format,
        })
    }

    /// Run the sort
    pub fn run(&self) -> Result<RunSummary> {
        let _span = span!(Level::INFO, "sort_run").entered();

        self.check_input_dir()?;

        fs::create_dir_all(&self.output_dir).map_err(|e| Error::OutputDir {
            path: self.output_dir.clone(),
            source: e,
        })?;

        info!(
            input = %self.input_dir.display(),
            output = %self.output_dir.display(),
            date_format = self.date_format.as_str(),
            "Scanning input directory..."
        );

        let mut summary = RunSummary::default();
        let files = self.collect_files(&mut summary);
        info!(count = files.len(), "Found files");

        for path in &files {
            summary.record(self.process_file(path));
        }

        info!("{}", summary.summary());
        Ok(summary)
    }

    fn check_input_dir(&self) -> Result<()> {
        match fs::metadata(&self.input_dir) {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(Error::InputNotDirectory {
                path: self.input_dir.clone(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::InputDirMissing {
                path: self.input_dir.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Collect every non-directory entry under the input directory
    ///
    /// The full list is gathered before anything moves. If the output
    /// directory is nested inside the input, its subtree is skipped.
    /// Traversal errors are recorded as failed outcomes.
    fn collect_files(&self, summary: &mut RunSummary) -> Vec<PathBuf> {
        let output_root = fs::canonicalize(&self.output_dir).ok();
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.input_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.depth() > 0 && self.is_output_dir(e, output_root.as_deref())));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_dir() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let source = e.path().unwrap_or(self.input_dir.as_path()).to_path_buf();
                    let e = Error::from(e);
                    error!(path = %source.display(), error = %e, "Error reading directory entry");
                    summary.record(FileOutcome::Failed {
                        source,
                        error: e.to_string(),
                    });
                }
            }
        }

        files
    }

    fn is_output_dir(&self, entry: &walkdir::DirEntry, output_root: Option<&Path>) -> bool {
        let Some(output_root) = output_root else {
            return false;
        };
        if !entry.file_type().is_dir() {
            return false;
        }
        let skip = fs::canonicalize(entry.path()).is_ok_and(|p| p == output_root);
        if skip {
            warn!(path = %entry.path().display(), "Skipping output directory inside input");
        }
        skip
    }

    fn process_file(&self, path: &Path) -> FileOutcome {
        let _file_span = span!(Level::DEBUG, "process_file", ?path).entered();

        let capture_date = read_capture_date(path);
        let bucket = Bucket::for_capture_date(capture_date, &self.date_format);
        let bucket_dir = self.output_dir.join(bucket.dir_name());

        if is_in_dir(path, &bucket_dir) {
            debug!(?path, bucket = %bucket_dir.display(), "File already in its bucket");
            return FileOutcome::AlreadySorted {
                source: path.to_path_buf(),
            };
        }

        match place_file(path, &bucket_dir) {
            Ok(destination) => {
                info!(
                    file = %path.file_name().unwrap_or_default().to_string_lossy(),
                    bucket = %bucket_dir.display(),
                    "Moved file"
                );
                FileOutcome::Moved {
                    source: path.to_path_buf(),
                    destination,
                    bucket,
                }
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error moving file");
                FileOutcome::Failed {
                    source: path.to_path_buf(),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Whether `path` is an entry directly inside the existing directory `dir`
fn is_in_dir(path: &Path, dir: &Path) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    match (fs::canonicalize(parent), fs::canonicalize(dir)) {
        (Ok(parent), Ok(dir)) => parent == dir,
        _ => false,
    }
}

/// Move one file into `bucket_dir`, returning its final path
fn place_file(source: &Path, bucket_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| Error::InvalidFileName {
        path: source.to_path_buf(),
    })?;

    fs::create_dir_all(bucket_dir).map_err(|e| Error::BucketDir {
        path: bucket_dir.to_path_buf(),
        source: e,
    })?;

    let destination = resolve_destination(bucket_dir, file_name)?;
    move_file(source, &destination)?;
    Ok(destination)
}

/// First free path for `file_name` in `dir`
///
/// Taken names get a numeric suffix before the extension: `img.jpg`,
/// `img_1.jpg`, `img_2.jpg`, ... Every candidate is checked on disk.
fn resolve_destination(dir: &Path, file_name: &OsStr) -> Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !path_taken(&candidate)? {
        return Ok(candidate);
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut suffixed = OsString::from(stem);
        suffixed.push(format!("_{}", counter));
        if let Some(ext) = extension {
            suffixed.push(".");
            suffixed.push(ext);
        }

        let candidate = dir.join(suffixed);
        if !path_taken(&candidate)? {
            debug!(?candidate, "Resolved filename conflict");
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Whether anything (file, directory, or dangling symlink) exists at `path`
fn path_taken(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::DestinationCheck {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Move a file, falling back to copy + delete across filesystems
///
/// On failure the source is left in place and no partial copy remains.
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    let move_error = |e: io::Error| Error::Move {
        from: source.to_path_buf(),
        to: dest.to_path_buf(),
        source: e,
    };

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(?source, ?dest, "Rename crosses filesystems, copying instead");

            if let Err(e) = copy_entry(source, dest) {
                let _ = fs::remove_file(dest);
                return Err(move_error(e));
            }

            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(dest);
                return Err(move_error(e));
            }
            Ok(())
        }
        Err(e) => Err(move_error(e)),
    }
}

/// Copy a file or symlink to `dest`, keeping links as links
fn copy_entry(source: &Path, dest: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(source)?;

    if metadata.file_type().is_symlink() {
        let target = fs::read_link(source)?;
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(&target, dest)?;
        }
        #[cfg(windows)]
        {
            if fs::metadata(source).is_ok_and(|m| m.is_dir()) {
                std::os::windows::fs::symlink_dir(&target, dest)?;
            } else {
                std::os::windows::fs::symlink_file(&target, dest)?;
            }
        }
        return Ok(());
    }

    fs::copy(source, dest)?;

    // Preserve modification time
    if let Ok(mtime) = metadata.modified() {
        let _ = filetime::set_file_mtime(dest, filetime::FileTime::from_system_time(mtime));
    }
    Ok(())
}
