//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use ziptree_core::CompressReport;
use ziptree_core::EntryInfo;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format compression result
    fn format_compress_result(&self, archive: &Path, report: &CompressReport) -> Result<()>;

    /// Format extraction result
    fn format_extract_result(&self, output_dir: &Path, extracted: &[PathBuf]) -> Result<()>;

    /// Format entry names, one per line
    fn format_entry_names(&self, names: &[String]) -> Result<()>;

    /// Format detailed entry listing
    fn format_entry_details(&self, entries: &[EntryInfo], human_readable: bool) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
