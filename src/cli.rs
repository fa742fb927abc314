//! CLI argument parsing with clap

use crate::config::SortRequest;
use clap::Parser;
use std::path::PathBuf;

/// Photo Date Sorter - moves photos into folders named after their capture date
///
/// Reads the EXIF DateTimeOriginal tag of every file under the input
/// directory and moves the file to OUTPUT/<date>/. Files without a capture
/// date go to OUTPUT/NoDate/. Existing files are never overwritten.
#[derive(Parser, Debug)]
#[command(name = "photo-date-sorter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Input directory to scan for images
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory for the date folders
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder name format for dated buckets (strftime syntax)
    ///
    /// Examples: "%Y-%m-%d" (default), "%d-%m-%Y", "%m-%d-%Y"
    #[arg(short = 'f', long)]
    pub date_format: Option<String>,

    /// Write a configuration file and exit without sorting
    ///
    /// Saves the request built from the other arguments, or a commented
    /// sample when no input/output directories were given.
    #[arg(long, value_name = "FILE")]
    pub init_config: Option<PathBuf>,

    /// Log file path (defaults to Log/ next to the executable)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with a request loaded from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_request(&self, mut request: SortRequest) -> SortRequest {
        if let Some(ref input) = self.input {
            request.input_dir = input.clone();
        }
        if let Some(ref output) = self.output {
            request.output_dir = output.clone();
        }
        if let Some(ref date_format) = self.date_format {
            request.date_format = date_format.clone();
        }

        request
    }

    /// Convert CLI arguments to a request (when no config file is used)
    pub fn to_request(&self) -> SortRequest {
        self.merge_with_request(SortRequest::default())
    }
}
