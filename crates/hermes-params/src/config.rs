//! Request parsing configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{DateFormat, TempDirStorage};

/// Default size (10 KB) up to which uploaded files stay in memory.
pub const DEFAULT_SIZE_THRESHOLD: usize = 10 * 1024;

/// Default maximum total body size for multipart (50 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum size per field (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of multipart fields.
pub const DEFAULT_MAX_FIELDS: usize = 100;

/// Configuration for parsing a request into [`RequestParams`](crate::RequestParams).
///
/// # Example
///
/// ```rust
/// use hermes_params::{DateFormat, ParamsConfig};
///
/// let config = ParamsConfig::new()
///     .date_format(DateFormat::new("%Y-%m-%d"))
///     .size_threshold(0)
///     .max_fields(10);
///
/// assert_eq!(config.size_threshold, 0);
/// assert_eq!(config.date_format.pattern(), "%Y-%m-%d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsConfig {
    /// Pattern used by date accessors.
    #[serde(default)]
    pub date_format: DateFormat,

    /// Uploaded files up to this many bytes are kept in memory; larger ones
    /// are written to the upload directory.
    #[serde(default = "default_size_threshold")]
    pub size_threshold: usize,

    /// Maximum total multipart body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Maximum size per multipart field in bytes.
    #[serde(default = "default_max_field_size")]
    pub max_field_size: usize,

    /// Maximum number of multipart fields.
    #[serde(default = "default_max_fields")]
    pub max_fields: usize,

    /// Directory receiving uploaded files. `None` uses the OS temp directory.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            date_format: DateFormat::default(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
            upload_dir: None,
        }
    }
}

impl ParamsConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the date format.
    #[must_use]
    pub fn date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Set the in-memory size threshold for uploaded files.
    #[must_use]
    pub fn size_threshold(mut self, size: usize) -> Self {
        self.size_threshold = size;
        self
    }

    /// Set the maximum body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }

    /// Set the upload directory.
    #[must_use]
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = Some(dir.into());
        self
    }

    /// Returns the default upload storage for this configuration.
    #[must_use]
    pub fn upload_storage(&self) -> TempDirStorage {
        match &self.upload_dir {
            Some(dir) => TempDirStorage::new(dir),
            None => TempDirStorage::system(),
        }
    }
}

fn default_size_threshold() -> usize {
    DEFAULT_SIZE_THRESHOLD
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_max_field_size() -> usize {
    DEFAULT_MAX_FIELD_SIZE
}

fn default_max_fields() -> usize {
    DEFAULT_MAX_FIELDS
}
