//! Sort request and configuration file handling

use crate::error::{Error, Result};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Default bucket folder format, yielding `YYYY-MM-DD`
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything the sorting engine needs for one run
///
/// Built by the shell from CLI flags and/or a TOML config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortRequest {
    /// Directory scanned recursively for images
    pub input_dir: PathBuf,

    /// Root under which bucket folders are created
    pub output_dir: PathBuf,

    /// strftime format used to name dated bucket folders
    pub date_format: String,
}

impl Default for SortRequest {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl SortRequest {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        date_format: impl Into<String>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            date_format: date_format.into(),
        }
    }

    /// Both directories have been specified
    pub fn has_paths(&self) -> bool {
        !self.input_dir.as_os_str().is_empty() && !self.output_dir.as_os_str().is_empty()
    }

    /// Load a request from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Save the request to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            source: e,
        })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Write the commented sample configuration to `path`
    pub fn write_sample_config<P: AsRef<Path>>(path: P) -> std::result::Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::sample_config()).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# Photo Date Sorter Configuration File
# This file uses TOML format (https://toml.io)

# Directory scanned recursively for images
input_dir = "D:/Photos/Unsorted"

# Output directory; one folder per capture date is created here,
# plus "NoDate" for images without a capture date
output_dir = "D:/Photos/Sorted"

# Folder name format for dated buckets (strftime syntax)
# - "%Y-%m-%d": 2023-05-10 (default)
# - "%d-%m-%Y": 10-05-2023
# - "%m-%d-%Y": 05-10-2023
date_format = "%Y-%m-%d"
"#
        .to_string()
    }
}

/// Characters that are not allowed in Windows file names
const RESERVED_NAME_CHARS: [char; 7] = [':', '*', '?', '"', '<', '>', '|'];

/// A validated bucket folder date format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat(String);

impl DateFormat {
    /// Validate a strftime format for naming bucket folders
    ///
    /// The format must only use date fields and must render to a single,
    /// non-empty path component that is also a valid Windows file name.
    pub fn parse(format: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidDateFormat {
            format: format.to_string(),
            message: message.to_string(),
        };

        let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(invalid("unrecognized format specifier"));
        }

        let sample = NaiveDate::from_ymd_opt(2000, 12, 31)
            .ok_or_else(|| invalid("sample date out of range"))?;
        let mut rendered = String::new();
        if write!(rendered, "{}", sample.format_with_items(items.iter())).is_err() {
            return Err(invalid("only date fields can be used in folder names"));
        }

        if rendered.trim().is_empty() || rendered == "." || rendered == ".." {
            return Err(invalid("folder name would be empty"));
        }
        if rendered.trim() != rendered {
            return Err(invalid("folder name must not start or end with whitespace"));
        }
        if rendered.chars().any(|c| c.is_control()) {
            return Err(invalid("folder name must not contain control characters"));
        }
        if rendered.contains(['/', '\\']) {
            return Err(invalid("folder name must not contain path separators"));
        }
        if rendered.contains(RESERVED_NAME_CHARS) {
            return Err(invalid("folder name must not contain any of : * ? \" < > |"));
        }

        Ok(Self(format.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render a capture date as a bucket folder name
    pub fn render(&self, date: NaiveDate) -> String {
        date.format(&self.0).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self(DEFAULT_DATE_FORMAT.to_string())
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    SerializeError { source: toml::ser::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
            ConfigError::WriteError { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path.display(), source)
            }
            ConfigError::SerializeError { source } => {
                write!(f, "Failed to serialize config: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::WriteError { source, .. } => Some(source),
            ConfigError::SerializeError { source } => Some(source),
        }
    }
}
